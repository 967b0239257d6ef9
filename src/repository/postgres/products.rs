use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, Query, extension::postgres::PgExpr},
};

use super::{PgStore, parse_column, to_db_time, to_utc, update_error};
use crate::{
    entity::{
        ProductCategories, ProductVariantAttributeValues, ProductVariants, Products,
        product_attribute_values, product_categories, product_variant_attribute_values,
        product_variants, products,
    },
    error::AppResult,
    models::{
        Product, ProductFilter, ProductSortBy, ProductVariant, ProductVariantAttributeValue,
        SortOrder,
    },
    repository::{ProductRepository, ProductVariantRepository},
};

fn product_from_entity(model: products::Model, categories: Vec<i64>) -> AppResult<Product> {
    Ok(Product {
        id: model.id,
        status: parse_column(&model.status, "status")?,
        product_type: parse_column(&model.product_type, "product_type")?,
        sku: model.sku,
        name: model.name,
        description: model.description,
        price_cents: model.price_cents,
        currency: model.currency,
        metadata: model.metadata,
        categories,
        created_at: to_utc(model.created_at),
        updated_at: to_utc(model.updated_at),
    })
}

fn product_active(product: &Product) -> products::ActiveModel {
    products::ActiveModel {
        id: if product.id == 0 { NotSet } else { Set(product.id) },
        sku: Set(product.sku.clone()),
        name: Set(product.name.clone()),
        description: Set(product.description.clone()),
        price_cents: Set(product.price_cents),
        currency: Set(product.currency.clone()),
        status: Set(product.status.to_string()),
        product_type: Set(product.product_type.to_string()),
        metadata: Set(product.metadata.clone()),
        created_at: Set(to_db_time(product.created_at)),
        updated_at: Set(to_db_time(product.updated_at)),
    }
}

impl PgStore {
    async fn categories_for(&self, product_ids: &[i64]) -> AppResult<HashMap<i64, Vec<i64>>> {
        let mut categories: HashMap<i64, Vec<i64>> = HashMap::new();
        if product_ids.is_empty() {
            return Ok(categories);
        }
        let rows = ProductCategories::find()
            .filter(product_categories::Column::ProductId.is_in(product_ids.to_vec()))
            .order_by_asc(product_categories::Column::CategoryId)
            .all(&self.orm)
            .await?;
        for row in rows {
            categories
                .entry(row.product_id)
                .or_default()
                .push(row.category_id);
        }
        Ok(categories)
    }

    async fn with_categories(&self, models: Vec<products::Model>) -> AppResult<Vec<Product>> {
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut categories = self.categories_for(&ids).await?;
        models
            .into_iter()
            .map(|model| {
                let product_categories = categories.remove(&model.id).unwrap_or_default();
                product_from_entity(model, product_categories)
            })
            .collect()
    }
}

async fn replace_categories<C: ConnectionTrait>(
    conn: &C,
    product_id: i64,
    categories: &[i64],
) -> AppResult<()> {
    ProductCategories::delete_many()
        .filter(product_categories::Column::ProductId.eq(product_id))
        .exec(conn)
        .await?;
    if categories.is_empty() {
        return Ok(());
    }
    let rows = categories
        .iter()
        .map(|category_id| product_categories::ActiveModel {
            product_id: Set(product_id),
            category_id: Set(*category_id),
        });
    ProductCategories::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

fn listing_condition(filter: &ProductFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(search) = filter.search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(products::Column::Name).ilike(pattern.clone()))
                .add(Expr::col(products::Column::Sku).ilike(pattern.clone()))
                .add(Expr::col(products::Column::Description).ilike(pattern)),
        );
    }
    if !filter.statuses.is_empty() {
        condition = condition.add(
            products::Column::Status.is_in(filter.statuses.iter().map(|s| s.to_string())),
        );
    }
    if !filter.types.is_empty() {
        condition = condition.add(
            products::Column::ProductType.is_in(filter.types.iter().map(|t| t.to_string())),
        );
    }
    if let Some(min_price) = filter.min_price_cents {
        condition = condition.add(products::Column::PriceCents.gte(min_price));
    }
    if let Some(max_price) = filter.max_price_cents {
        condition = condition.add(products::Column::PriceCents.lte(max_price));
    }
    if !filter.category_ids.is_empty() {
        condition = condition.add(
            products::Column::Id.in_subquery(
                Query::select()
                    .column(product_categories::Column::ProductId)
                    .from(product_categories::Entity)
                    .and_where(
                        product_categories::Column::CategoryId.is_in(filter.category_ids.clone()),
                    )
                    .to_owned(),
            ),
        );
    }
    if !filter.attribute_value_ids.is_empty() {
        condition = condition.add(
            products::Column::Id.in_subquery(
                Query::select()
                    .column(product_attribute_values::Column::ProductId)
                    .from(product_attribute_values::Entity)
                    .and_where(
                        product_attribute_values::Column::AttributeValueId
                            .is_in(filter.attribute_value_ids.clone()),
                    )
                    .to_owned(),
            ),
        );
    }
    condition
}

#[async_trait]
impl ProductRepository for PgStore {
    async fn list(&self, filter: &ProductFilter) -> AppResult<(Vec<Product>, i64)> {
        let sort_col = match filter.sort_by {
            ProductSortBy::CreatedAt => products::Column::CreatedAt,
            ProductSortBy::UpdatedAt => products::Column::UpdatedAt,
            ProductSortBy::Price => products::Column::PriceCents,
            ProductSortBy::Name => products::Column::Name,
        };

        let mut finder = Products::find().filter(listing_condition(filter));
        finder = match filter.sort_order {
            SortOrder::Asc => finder
                .order_by_asc(sort_col)
                .order_by_asc(products::Column::Id),
            SortOrder::Desc => finder
                .order_by_desc(sort_col)
                .order_by_desc(products::Column::Id),
        };

        let total = finder.clone().count(&self.orm).await? as i64;

        let models = finder
            .limit(filter.limit.max(0) as u64)
            .offset(filter.offset.max(0) as u64)
            .all(&self.orm)
            .await?;
        let items = self.with_categories(models).await?;
        Ok((items, total))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>> {
        let Some(model) = Products::find_by_id(id).one(&self.orm).await? else {
            return Ok(None);
        };
        Ok(self.with_categories(vec![model]).await?.pop())
    }

    async fn find_by_sku(&self, sku: &str) -> AppResult<Option<Product>> {
        let Some(model) = Products::find()
            .filter(products::Column::Sku.eq(sku))
            .one(&self.orm)
            .await?
        else {
            return Ok(None);
        };
        Ok(self.with_categories(vec![model]).await?.pop())
    }

    async fn create(&self, product: Product) -> AppResult<Product> {
        let txn = self.orm.begin().await?;
        let model = product_active(&product).insert(&txn).await?;
        replace_categories(&txn, model.id, &product.categories).await?;
        txn.commit().await?;
        product_from_entity(model, product.categories)
    }

    async fn update(&self, product: Product) -> AppResult<Product> {
        let txn = self.orm.begin().await?;
        let model = product_active(&product)
            .update(&txn)
            .await
            .map_err(|err| update_error(err, "Product", product.id))?;
        replace_categories(&txn, model.id, &product.categories).await?;
        txn.commit().await?;
        product_from_entity(model, product.categories)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = Products::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }
}

fn variant_from_entity(
    model: product_variants::Model,
    attributes: Vec<ProductVariantAttributeValue>,
) -> AppResult<ProductVariant> {
    Ok(ProductVariant {
        id: model.id,
        status: parse_column(&model.status, "status")?,
        product_id: model.product_id,
        sku: model.sku,
        name: model.name,
        price_cents: model.price_cents,
        currency: model.currency,
        attributes,
        created_at: to_utc(model.created_at),
        updated_at: to_utc(model.updated_at),
    })
}

fn variant_active(variant: &ProductVariant) -> product_variants::ActiveModel {
    product_variants::ActiveModel {
        id: if variant.id == 0 { NotSet } else { Set(variant.id) },
        product_id: Set(variant.product_id),
        sku: Set(variant.sku.clone()),
        name: Set(variant.name.clone()),
        price_cents: Set(variant.price_cents),
        currency: Set(variant.currency.clone()),
        status: Set(variant.status.to_string()),
        created_at: Set(to_db_time(variant.created_at)),
        updated_at: Set(to_db_time(variant.updated_at)),
    }
}

fn variant_link_from_entity(
    model: product_variant_attribute_values::Model,
) -> ProductVariantAttributeValue {
    ProductVariantAttributeValue {
        id: model.id,
        variant_id: model.variant_id,
        attribute_id: model.attribute_id,
        attribute_value_id: model.attribute_value_id,
    }
}

async fn replace_variant_links<C: ConnectionTrait>(
    conn: &C,
    variant_id: i64,
    links: &[ProductVariantAttributeValue],
) -> AppResult<Vec<ProductVariantAttributeValue>> {
    ProductVariantAttributeValues::delete_many()
        .filter(product_variant_attribute_values::Column::VariantId.eq(variant_id))
        .exec(conn)
        .await?;
    let mut stored = Vec::with_capacity(links.len());
    for link in links {
        let model = product_variant_attribute_values::ActiveModel {
            id: NotSet,
            variant_id: Set(variant_id),
            attribute_id: Set(link.attribute_id),
            attribute_value_id: Set(link.attribute_value_id),
        }
        .insert(conn)
        .await?;
        stored.push(variant_link_from_entity(model));
    }
    Ok(stored)
}

impl PgStore {
    async fn with_links(&self, models: Vec<product_variants::Model>) -> AppResult<Vec<ProductVariant>> {
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut links: HashMap<i64, Vec<ProductVariantAttributeValue>> = HashMap::new();
        if !ids.is_empty() {
            let rows = ProductVariantAttributeValues::find()
                .filter(product_variant_attribute_values::Column::VariantId.is_in(ids))
                .order_by_asc(product_variant_attribute_values::Column::Id)
                .all(&self.orm)
                .await?;
            for row in rows {
                links
                    .entry(row.variant_id)
                    .or_default()
                    .push(variant_link_from_entity(row));
            }
        }
        models
            .into_iter()
            .map(|model| {
                let variant_links = links.remove(&model.id).unwrap_or_default();
                variant_from_entity(model, variant_links)
            })
            .collect()
    }
}

#[async_trait]
impl ProductVariantRepository for PgStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<ProductVariant>> {
        let Some(model) = ProductVariants::find_by_id(id).one(&self.orm).await? else {
            return Ok(None);
        };
        Ok(self.with_links(vec![model]).await?.pop())
    }

    async fn find_by_product_id(&self, product_id: i64) -> AppResult<Vec<ProductVariant>> {
        let models = ProductVariants::find()
            .filter(product_variants::Column::ProductId.eq(product_id))
            .order_by_asc(product_variants::Column::Id)
            .all(&self.orm)
            .await?;
        self.with_links(models).await
    }

    async fn find_by_sku(&self, sku: &str) -> AppResult<Option<ProductVariant>> {
        let Some(model) = ProductVariants::find()
            .filter(product_variants::Column::Sku.eq(sku))
            .one(&self.orm)
            .await?
        else {
            return Ok(None);
        };
        Ok(self.with_links(vec![model]).await?.pop())
    }

    async fn create(&self, variant: ProductVariant) -> AppResult<ProductVariant> {
        let txn = self.orm.begin().await?;
        let model = variant_active(&variant).insert(&txn).await?;
        let links = replace_variant_links(&txn, model.id, &variant.attributes).await?;
        txn.commit().await?;
        variant_from_entity(model, links)
    }

    async fn update(&self, variant: ProductVariant) -> AppResult<ProductVariant> {
        let txn = self.orm.begin().await?;
        let model = variant_active(&variant)
            .update(&txn)
            .await
            .map_err(|err| update_error(err, "Product variant", variant.id))?;
        let links = replace_variant_links(&txn, model.id, &variant.attributes).await?;
        txn.commit().await?;
        variant_from_entity(model, links)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = ProductVariants::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_by_product_id(&self, product_id: i64) -> AppResult<u64> {
        let result = ProductVariants::delete_many()
            .filter(product_variants::Column::ProductId.eq(product_id))
            .exec(&self.orm)
            .await?;
        Ok(result.rows_affected)
    }
}
