use std::collections::BTreeMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use sqlx::{FromRow, Postgres, QueryBuilder};

use super::{PgStore, parse_column, to_db_time, to_utc, update_error};
use crate::{
    entity::{
        AttributeSetAssignments, AttributeSets, AttributeValues, Attributes,
        ProductAttributeValues, attribute_set_assignments, attribute_sets, attribute_values,
        attributes, product_attribute_values,
    },
    error::AppResult,
    models::{
        Attribute, AttributeFilter, AttributeSet, AttributeSetAssignment, AttributeValue,
        FacetValue, ProductAttributeValue,
    },
    repository::{
        AttributeRepository, AttributeSetAssignmentRepository, AttributeSetRepository,
        AttributeValueRepository, ProductAttributeValueRepository,
    },
};

pub(crate) fn attribute_from_entity(model: attributes::Model) -> AppResult<Attribute> {
    Ok(Attribute {
        id: model.id,
        input_type: parse_column(&model.input_type, "input_type")?,
        data_type: parse_column(&model.data_type, "data_type")?,
        code: model.code,
        name: model.name,
        unit: model.unit,
        created_at: to_utc(model.created_at),
        updated_at: to_utc(model.updated_at),
    })
}

fn attribute_value_from_entity(model: attribute_values::Model) -> AttributeValue {
    AttributeValue {
        id: model.id,
        attribute_id: model.attribute_id,
        value_code: model.value_code,
        label: model.label,
        sort_order: model.sort_order,
        created_at: to_utc(model.created_at),
        updated_at: to_utc(model.updated_at),
    }
}

fn attribute_set_from_entity(model: attribute_sets::Model) -> AttributeSet {
    AttributeSet {
        id: model.id,
        name: model.name,
        description: model.description,
        is_system: model.is_system,
        sort_order: model.sort_order,
        created_at: to_utc(model.created_at),
        updated_at: to_utc(model.updated_at),
        attributes: Vec::new(),
    }
}

fn assignment_from_entity(model: attribute_set_assignments::Model) -> AttributeSetAssignment {
    AttributeSetAssignment {
        id: model.id,
        attribute_set_id: model.attribute_set_id,
        attribute_id: model.attribute_id,
        sort_order: model.sort_order,
        is_required: model.is_required,
        created_at: to_utc(model.created_at),
    }
}

fn product_attribute_value_from_entity(
    model: product_attribute_values::Model,
) -> ProductAttributeValue {
    ProductAttributeValue {
        id: model.id,
        product_id: model.product_id,
        attribute_id: model.attribute_id,
        attribute_value_id: model.attribute_value_id,
        value_text: model.value_text,
        value_number: model.value_number,
        value_boolean: model.value_boolean,
        created_at: to_utc(model.created_at),
        updated_at: to_utc(model.updated_at),
    }
}

fn attribute_active(attribute: Attribute) -> attributes::ActiveModel {
    attributes::ActiveModel {
        id: if attribute.id == 0 { NotSet } else { Set(attribute.id) },
        code: Set(attribute.code),
        name: Set(attribute.name),
        input_type: Set(attribute.input_type.to_string()),
        data_type: Set(attribute.data_type.to_string()),
        unit: Set(attribute.unit),
        created_at: Set(to_db_time(attribute.created_at)),
        updated_at: Set(to_db_time(attribute.updated_at)),
    }
}

#[async_trait]
impl AttributeRepository for PgStore {
    async fn find_all(&self) -> AppResult<Vec<Attribute>> {
        Attributes::find()
            .order_by_asc(attributes::Column::Code)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(attribute_from_entity)
            .collect()
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Attribute>> {
        Attributes::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(attribute_from_entity)
            .transpose()
    }

    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Attribute>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Attributes::find()
            .filter(attributes::Column::Id.is_in(ids.to_vec()))
            .all(&self.orm)
            .await?
            .into_iter()
            .map(attribute_from_entity)
            .collect()
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Attribute>> {
        Attributes::find()
            .filter(attributes::Column::Code.eq(code))
            .one(&self.orm)
            .await?
            .map(attribute_from_entity)
            .transpose()
    }

    async fn create(&self, attribute: Attribute) -> AppResult<Attribute> {
        let model = attribute_active(attribute).insert(&self.orm).await?;
        attribute_from_entity(model)
    }

    async fn update(&self, attribute: Attribute) -> AppResult<Attribute> {
        let id = attribute.id;
        let model = attribute_active(attribute)
            .update(&self.orm)
            .await
            .map_err(|err| update_error(err, "Attribute", id))?;
        attribute_from_entity(model)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = Attributes::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }
}

fn attribute_value_active(value: AttributeValue) -> attribute_values::ActiveModel {
    attribute_values::ActiveModel {
        id: if value.id == 0 { NotSet } else { Set(value.id) },
        attribute_id: Set(value.attribute_id),
        value_code: Set(value.value_code),
        label: Set(value.label),
        sort_order: Set(value.sort_order),
        created_at: Set(to_db_time(value.created_at)),
        updated_at: Set(to_db_time(value.updated_at)),
    }
}

#[async_trait]
impl AttributeValueRepository for PgStore {
    async fn find_all(&self) -> AppResult<Vec<AttributeValue>> {
        Ok(AttributeValues::find()
            .order_by_asc(attribute_values::Column::AttributeId)
            .order_by_asc(attribute_values::Column::SortOrder)
            .order_by_asc(attribute_values::Column::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(attribute_value_from_entity)
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<AttributeValue>> {
        Ok(AttributeValues::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(attribute_value_from_entity))
    }

    async fn find_by_attribute_id(&self, attribute_id: i64) -> AppResult<Vec<AttributeValue>> {
        Ok(AttributeValues::find()
            .filter(attribute_values::Column::AttributeId.eq(attribute_id))
            .order_by_asc(attribute_values::Column::SortOrder)
            .order_by_asc(attribute_values::Column::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(attribute_value_from_entity)
            .collect())
    }

    async fn find_by_attribute_and_code(
        &self,
        attribute_id: i64,
        value_code: &str,
    ) -> AppResult<Option<AttributeValue>> {
        Ok(AttributeValues::find()
            .filter(attribute_values::Column::AttributeId.eq(attribute_id))
            .filter(attribute_values::Column::ValueCode.eq(value_code))
            .one(&self.orm)
            .await?
            .map(attribute_value_from_entity))
    }

    async fn create(&self, value: AttributeValue) -> AppResult<AttributeValue> {
        let model = attribute_value_active(value).insert(&self.orm).await?;
        Ok(attribute_value_from_entity(model))
    }

    async fn update(&self, value: AttributeValue) -> AppResult<AttributeValue> {
        let id = value.id;
        let model = attribute_value_active(value)
            .update(&self.orm)
            .await
            .map_err(|err| update_error(err, "Attribute value", id))?;
        Ok(attribute_value_from_entity(model))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = AttributeValues::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }
}

fn attribute_set_active(set: AttributeSet) -> attribute_sets::ActiveModel {
    attribute_sets::ActiveModel {
        id: if set.id == 0 { NotSet } else { Set(set.id) },
        name: Set(set.name),
        description: Set(set.description),
        is_system: Set(set.is_system),
        sort_order: Set(set.sort_order),
        created_at: Set(to_db_time(set.created_at)),
        updated_at: Set(to_db_time(set.updated_at)),
    }
}

#[async_trait]
impl AttributeSetRepository for PgStore {
    async fn find_all(&self) -> AppResult<Vec<AttributeSet>> {
        Ok(AttributeSets::find()
            .order_by_asc(attribute_sets::Column::SortOrder)
            .order_by_asc(attribute_sets::Column::Name)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(attribute_set_from_entity)
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<AttributeSet>> {
        Ok(AttributeSets::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(attribute_set_from_entity))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<AttributeSet>> {
        Ok(AttributeSets::find()
            .filter(attribute_sets::Column::Name.eq(name))
            .one(&self.orm)
            .await?
            .map(attribute_set_from_entity))
    }

    async fn create(&self, set: AttributeSet) -> AppResult<AttributeSet> {
        let model = attribute_set_active(set).insert(&self.orm).await?;
        Ok(attribute_set_from_entity(model))
    }

    async fn update(&self, set: AttributeSet) -> AppResult<AttributeSet> {
        let id = set.id;
        let attributes = set.attributes.clone();
        let model = attribute_set_active(set)
            .update(&self.orm)
            .await
            .map_err(|err| update_error(err, "Attribute set", id))?;
        Ok(attribute_set_from_entity(model).with_attributes(attributes))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = AttributeSets::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl AttributeSetAssignmentRepository for PgStore {
    async fn find_by_attribute_set_id(
        &self,
        set_id: i64,
    ) -> AppResult<Vec<AttributeSetAssignment>> {
        self.find_by_attribute_set_ids(&[set_id]).await
    }

    async fn find_by_attribute_set_ids(
        &self,
        set_ids: &[i64],
    ) -> AppResult<Vec<AttributeSetAssignment>> {
        if set_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(AttributeSetAssignments::find()
            .filter(attribute_set_assignments::Column::AttributeSetId.is_in(set_ids.to_vec()))
            .order_by_asc(attribute_set_assignments::Column::SortOrder)
            .order_by_asc(attribute_set_assignments::Column::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(assignment_from_entity)
            .collect())
    }

    async fn find_by_set_and_attribute(
        &self,
        set_id: i64,
        attribute_id: i64,
    ) -> AppResult<Option<AttributeSetAssignment>> {
        Ok(AttributeSetAssignments::find()
            .filter(attribute_set_assignments::Column::AttributeSetId.eq(set_id))
            .filter(attribute_set_assignments::Column::AttributeId.eq(attribute_id))
            .one(&self.orm)
            .await?
            .map(assignment_from_entity))
    }

    async fn create(
        &self,
        assignment: AttributeSetAssignment,
    ) -> AppResult<AttributeSetAssignment> {
        let model = attribute_set_assignments::ActiveModel {
            id: NotSet,
            attribute_set_id: Set(assignment.attribute_set_id),
            attribute_id: Set(assignment.attribute_id),
            sort_order: Set(assignment.sort_order),
            is_required: Set(assignment.is_required),
            created_at: Set(to_db_time(assignment.created_at)),
        }
        .insert(&self.orm)
        .await?;
        Ok(assignment_from_entity(model))
    }

    async fn delete_by_set_and_attribute(&self, set_id: i64, attribute_id: i64) -> AppResult<bool> {
        let result = AttributeSetAssignments::delete_many()
            .filter(attribute_set_assignments::Column::AttributeSetId.eq(set_id))
            .filter(attribute_set_assignments::Column::AttributeId.eq(attribute_id))
            .exec(&self.orm)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_by_attribute_set_id(&self, set_id: i64) -> AppResult<u64> {
        let result = AttributeSetAssignments::delete_many()
            .filter(attribute_set_assignments::Column::AttributeSetId.eq(set_id))
            .exec(&self.orm)
            .await?;
        Ok(result.rows_affected)
    }
}

fn product_attribute_value_active(
    value: ProductAttributeValue,
) -> product_attribute_values::ActiveModel {
    product_attribute_values::ActiveModel {
        id: if value.id == 0 { NotSet } else { Set(value.id) },
        product_id: Set(value.product_id),
        attribute_id: Set(value.attribute_id),
        attribute_value_id: Set(value.attribute_value_id),
        value_text: Set(value.value_text),
        value_number: Set(value.value_number),
        value_boolean: Set(value.value_boolean),
        created_at: Set(to_db_time(value.created_at)),
        updated_at: Set(to_db_time(value.updated_at)),
    }
}

#[derive(Debug, FromRow)]
struct FacetRow {
    attribute_id: i64,
    attribute_value_id: i64,
    label: String,
    product_count: i64,
}

impl From<FacetRow> for FacetValue {
    fn from(row: FacetRow) -> Self {
        Self {
            attribute_value_id: row.attribute_value_id,
            label: row.label,
            product_count: row.product_count,
        }
    }
}

const FACET_SQL: &str = r#"
    SELECT av.attribute_id,
           av.id AS attribute_value_id,
           av.label,
           COUNT(DISTINCT pav.product_id) AS product_count
    FROM attribute_values av
    JOIN product_attribute_values pav
      ON pav.attribute_value_id = av.id AND pav.attribute_id = av.attribute_id
    WHERE av.attribute_id = ANY($1)
    GROUP BY av.attribute_id, av.id, av.label
    ORDER BY av.attribute_id, product_count DESC, av.label ASC
"#;

#[async_trait]
impl ProductAttributeValueRepository for PgStore {
    async fn find_all(&self) -> AppResult<Vec<ProductAttributeValue>> {
        Ok(ProductAttributeValues::find()
            .order_by_asc(product_attribute_values::Column::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_attribute_value_from_entity)
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<ProductAttributeValue>> {
        Ok(ProductAttributeValues::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(product_attribute_value_from_entity))
    }

    async fn find_by_product_id(&self, product_id: i64) -> AppResult<Vec<ProductAttributeValue>> {
        Ok(ProductAttributeValues::find()
            .filter(product_attribute_values::Column::ProductId.eq(product_id))
            .order_by_asc(product_attribute_values::Column::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_attribute_value_from_entity)
            .collect())
    }

    async fn find_by_attribute_id(
        &self,
        attribute_id: i64,
    ) -> AppResult<Vec<ProductAttributeValue>> {
        Ok(ProductAttributeValues::find()
            .filter(product_attribute_values::Column::AttributeId.eq(attribute_id))
            .order_by_asc(product_attribute_values::Column::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_attribute_value_from_entity)
            .collect())
    }

    async fn find_by_product_and_attribute(
        &self,
        product_id: i64,
        attribute_id: i64,
    ) -> AppResult<Vec<ProductAttributeValue>> {
        Ok(ProductAttributeValues::find()
            .filter(product_attribute_values::Column::ProductId.eq(product_id))
            .filter(product_attribute_values::Column::AttributeId.eq(attribute_id))
            .order_by_asc(product_attribute_values::Column::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_attribute_value_from_entity)
            .collect())
    }

    async fn create(&self, value: ProductAttributeValue) -> AppResult<ProductAttributeValue> {
        let model = product_attribute_value_active(value)
            .insert(&self.orm)
            .await?;
        Ok(product_attribute_value_from_entity(model))
    }

    async fn update(&self, value: ProductAttributeValue) -> AppResult<ProductAttributeValue> {
        let id = value.id;
        let model = product_attribute_value_active(value)
            .update(&self.orm)
            .await
            .map_err(|err| update_error(err, "Product attribute value", id))?;
        Ok(product_attribute_value_from_entity(model))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = ProductAttributeValues::delete_by_id(id)
            .exec(&self.orm)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_by_product_id(&self, product_id: i64) -> AppResult<u64> {
        let result = ProductAttributeValues::delete_many()
            .filter(product_attribute_values::Column::ProductId.eq(product_id))
            .exec(&self.orm)
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete_by_product_and_attribute(
        &self,
        product_id: i64,
        attribute_id: i64,
    ) -> AppResult<u64> {
        let result = ProductAttributeValues::delete_many()
            .filter(product_attribute_values::Column::ProductId.eq(product_id))
            .filter(product_attribute_values::Column::AttributeId.eq(attribute_id))
            .exec(&self.orm)
            .await?;
        Ok(result.rows_affected)
    }

    async fn faceted_search(&self, attribute_id: i64) -> AppResult<Vec<FacetValue>> {
        let rows = sqlx::query_as::<_, FacetRow>(FACET_SQL)
            .bind(vec![attribute_id])
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(FacetValue::from).collect())
    }

    async fn multi_attribute_faceted_search(
        &self,
        attribute_ids: &[i64],
    ) -> AppResult<BTreeMap<i64, Vec<FacetValue>>> {
        let mut facets: BTreeMap<i64, Vec<FacetValue>> =
            attribute_ids.iter().map(|id| (*id, Vec::new())).collect();
        if attribute_ids.is_empty() {
            return Ok(facets);
        }
        let rows = sqlx::query_as::<_, FacetRow>(FACET_SQL)
            .bind(attribute_ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        for row in rows {
            facets
                .entry(row.attribute_id)
                .or_default()
                .push(FacetValue::from(row));
        }
        Ok(facets)
    }

    async fn filter_products(&self, filters: &[AttributeFilter]) -> AppResult<Vec<i64>> {
        let effective: Vec<&AttributeFilter> = filters
            .iter()
            .filter(|f| !f.attribute_value_ids.is_empty())
            .collect();
        if effective.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("");
        for (index, filter) in effective.into_iter().enumerate() {
            if index > 0 {
                builder.push(" INTERSECT ");
            }
            builder
                .push("SELECT product_id FROM product_attribute_values WHERE attribute_id = ")
                .push_bind(filter.attribute_id)
                .push(" AND attribute_value_id = ANY(")
                .push_bind(filter.attribute_value_ids.clone())
                .push(")");
        }
        builder.push(" ORDER BY product_id");

        let ids = builder
            .build_query_scalar::<i64>()
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn find_products_by_attribute_values(&self, value_ids: &[i64]) -> AppResult<Vec<i64>> {
        if value_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT DISTINCT product_id
            FROM product_attribute_values
            WHERE attribute_value_id = ANY($1)
            ORDER BY product_id
            "#,
        )
        .bind(value_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}
