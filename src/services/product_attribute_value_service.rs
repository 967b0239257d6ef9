use std::sync::Arc;

use serde_json::json;

use crate::{
    audit,
    dto::attributes::{
        CreateProductAttributeValueRequest, DeletedCount, FacetList, FacetMap,
        FilterProductsRequest, MultiFacetRequest, ProductAttributeValueList, ProductIds,
        ProductsByValuesRequest, UpdateProductAttributeValueRequest,
    },
    error::{AppError, AppResult},
    models::{ProductAttributeValue, ProductAttributeValuePatch},
    repository::{
        AttributeRepository, AttributeValueRepository, AuditRepository,
        ProductAttributeValueRepository, ProductRepository, Repositories,
    },
    response::{ApiResponse, Meta},
    validation::single_field_error,
};

/// Rejects a record carrying more than one typed value.
pub(crate) fn ensure_single_typed_value(value: &ProductAttributeValue) -> AppResult<()> {
    if value.populated_value_count() > 1 {
        return Err(single_field_error(
            "value",
            "VALUE_MULTIPLE",
            "Only one typed value may be set",
        ));
    }
    Ok(())
}

/// Checks that `value_id` names a value of `attribute_id`.
pub(crate) async fn ensure_value_of_attribute(
    values: &dyn AttributeValueRepository,
    field: &str,
    attribute_id: i64,
    value_id: i64,
) -> AppResult<()> {
    match values.find_by_id(value_id).await? {
        Some(value) if value.attribute_id == attribute_id => Ok(()),
        Some(_) => Err(single_field_error(
            field,
            &format!("{}_MISMATCH", field.to_uppercase()),
            &format!("Attribute value {value_id} does not belong to attribute {attribute_id}"),
        )),
        None => Err(single_field_error(
            field,
            &format!("{}_INVALID", field.to_uppercase()),
            &format!("Attribute value {value_id} does not exist"),
        )),
    }
}

#[derive(Clone)]
pub struct ProductAttributeValuesService {
    records: Arc<dyn ProductAttributeValueRepository>,
    products: Arc<dyn ProductRepository>,
    attributes: Arc<dyn AttributeRepository>,
    values: Arc<dyn AttributeValueRepository>,
    audit: Arc<dyn AuditRepository>,
}

impl ProductAttributeValuesService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            records: repos.product_attribute_values.clone(),
            products: repos.products.clone(),
            attributes: repos.attributes.clone(),
            values: repos.attribute_values.clone(),
            audit: repos.audit.clone(),
        }
    }

    pub async fn create(
        &self,
        payload: CreateProductAttributeValueRequest,
    ) -> AppResult<ApiResponse<ProductAttributeValue>> {
        if self.products.find_by_id(payload.product_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Product with ID {} not found",
                payload.product_id
            )));
        }
        if self.attributes.find_by_id(payload.attribute_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Attribute with ID {} not found",
                payload.attribute_id
            )));
        }

        let record = ProductAttributeValue::create(
            payload.product_id,
            payload.attribute_id,
            payload.attribute_value_id,
            payload.value_text,
            payload.value_number,
            payload.value_boolean,
        );
        ensure_single_typed_value(&record)?;
        if let Some(value_id) = record.attribute_value_id {
            ensure_value_of_attribute(
                self.values.as_ref(),
                "attributeValueId",
                record.attribute_id,
                value_id,
            )
            .await?;
        }

        let record = self.records.create(record).await?;
        tracing::info!(
            product_attribute_value_id = record.id,
            product_id = record.product_id,
            attribute_id = record.attribute_id,
            "product attribute value created"
        );

        audit::record(
            self.audit.as_ref(),
            "product_attribute_value_create",
            "product_attribute_values",
            json!({
                "product_attribute_value_id": record.id,
                "product_id": record.product_id,
                "attribute_id": record.attribute_id,
            }),
        )
        .await;

        Ok(ApiResponse::success(
            "Product attribute value created",
            record,
            Some(Meta::empty()),
        ))
    }

    pub async fn find_all(&self) -> AppResult<ApiResponse<ProductAttributeValueList>> {
        let items = self.records.find_all().await?;
        Ok(list("Product attribute values", items))
    }

    pub async fn find_by_product_id(
        &self,
        product_id: i64,
    ) -> AppResult<ApiResponse<ProductAttributeValueList>> {
        let items = self.records.find_by_product_id(product_id).await?;
        Ok(list("Product attribute values", items))
    }

    pub async fn find_by_attribute_id(
        &self,
        attribute_id: i64,
    ) -> AppResult<ApiResponse<ProductAttributeValueList>> {
        let items = self.records.find_by_attribute_id(attribute_id).await?;
        Ok(list("Product attribute values", items))
    }

    pub async fn find_one(&self, id: i64) -> AppResult<ApiResponse<ProductAttributeValue>> {
        let record = self.get(id).await?;
        Ok(ApiResponse::success("Product attribute value", record, None))
    }

    pub async fn find_by_product_and_attribute(
        &self,
        product_id: i64,
        attribute_id: i64,
    ) -> AppResult<ApiResponse<ProductAttributeValueList>> {
        let items = self
            .records
            .find_by_product_and_attribute(product_id, attribute_id)
            .await?;
        Ok(list("Product attribute values", items))
    }

    pub async fn update(
        &self,
        id: i64,
        payload: UpdateProductAttributeValueRequest,
    ) -> AppResult<ApiResponse<ProductAttributeValue>> {
        let existing = self.get(id).await?;

        let updated = existing.update(ProductAttributeValuePatch {
            attribute_value_id: payload.attribute_value_id,
            value_text: payload
                .value_text
                .map(|text| text.filter(|t| !t.is_empty())),
            value_number: payload.value_number,
            value_boolean: payload.value_boolean,
        });
        ensure_single_typed_value(&updated)?;
        if let Some(Some(value_id)) = payload.attribute_value_id {
            ensure_value_of_attribute(
                self.values.as_ref(),
                "attributeValueId",
                updated.attribute_id,
                value_id,
            )
            .await?;
        }

        let record = self.records.update(updated).await?;
        tracing::info!(product_attribute_value_id = id, "product attribute value updated");

        audit::record(
            self.audit.as_ref(),
            "product_attribute_value_update",
            "product_attribute_values",
            json!({ "product_attribute_value_id": id }),
        )
        .await;

        Ok(ApiResponse::success(
            "Product attribute value updated",
            record,
            Some(Meta::empty()),
        ))
    }

    pub async fn remove(&self, id: i64) -> AppResult<ApiResponse<ProductAttributeValue>> {
        let existing = self.get(id).await?;
        self.records.delete(id).await?;
        tracing::info!(product_attribute_value_id = id, "product attribute value deleted");

        audit::record(
            self.audit.as_ref(),
            "product_attribute_value_delete",
            "product_attribute_values",
            json!({ "product_attribute_value_id": id, "product_id": existing.product_id }),
        )
        .await;

        Ok(ApiResponse::success(
            "Product attribute value deleted",
            existing,
            Some(Meta::empty()),
        ))
    }

    pub async fn remove_by_product_id(
        &self,
        product_id: i64,
    ) -> AppResult<ApiResponse<DeletedCount>> {
        let deleted = self.records.delete_by_product_id(product_id).await?;
        tracing::info!(product_id, deleted, "product attribute values deleted");

        audit::record(
            self.audit.as_ref(),
            "product_attribute_value_delete_by_product",
            "product_attribute_values",
            json!({ "product_id": product_id, "deleted": deleted }),
        )
        .await;

        Ok(ApiResponse::success(
            "Product attribute values deleted",
            DeletedCount { deleted },
            Some(Meta::empty()),
        ))
    }

    pub async fn remove_by_product_and_attribute(
        &self,
        product_id: i64,
        attribute_id: i64,
    ) -> AppResult<ApiResponse<DeletedCount>> {
        let deleted = self
            .records
            .delete_by_product_and_attribute(product_id, attribute_id)
            .await?;
        tracing::info!(product_id, attribute_id, deleted, "product attribute values deleted");

        audit::record(
            self.audit.as_ref(),
            "product_attribute_value_delete_by_attribute",
            "product_attribute_values",
            json!({ "product_id": product_id, "attribute_id": attribute_id, "deleted": deleted }),
        )
        .await;

        Ok(ApiResponse::success(
            "Product attribute values deleted",
            DeletedCount { deleted },
            Some(Meta::empty()),
        ))
    }

    pub async fn get_faceted_search_data(
        &self,
        attribute_id: i64,
    ) -> AppResult<ApiResponse<FacetList>> {
        let items = self.records.faceted_search(attribute_id).await?;
        let meta = Meta::total(items.len());
        Ok(ApiResponse::success("Facets", FacetList { items }, Some(meta)))
    }

    pub async fn get_multi_attribute_faceted_search_data(
        &self,
        payload: MultiFacetRequest,
    ) -> AppResult<ApiResponse<FacetMap>> {
        let items = if payload.attribute_ids.is_empty() {
            Default::default()
        } else {
            self.records
                .multi_attribute_faceted_search(&payload.attribute_ids)
                .await?
        };
        let meta = Meta::total(items.len());
        Ok(ApiResponse::success("Facets", FacetMap { items }, Some(meta)))
    }

    pub async fn filter_products_by_attributes(
        &self,
        payload: FilterProductsRequest,
    ) -> AppResult<ApiResponse<ProductIds>> {
        let filters: Vec<_> = payload
            .filters
            .into_iter()
            .filter(|f| !f.attribute_value_ids.is_empty())
            .collect();
        let product_ids = if filters.is_empty() {
            Vec::new()
        } else {
            self.records.filter_products(&filters).await?
        };
        let meta = Meta::total(product_ids.len());
        Ok(ApiResponse::success(
            "Filtered products",
            ProductIds { product_ids },
            Some(meta),
        ))
    }

    pub async fn find_products_by_attribute_values(
        &self,
        payload: ProductsByValuesRequest,
    ) -> AppResult<ApiResponse<ProductIds>> {
        let product_ids = if payload.attribute_value_ids.is_empty() {
            Vec::new()
        } else {
            self.records
                .find_products_by_attribute_values(&payload.attribute_value_ids)
                .await?
        };
        let meta = Meta::total(product_ids.len());
        Ok(ApiResponse::success(
            "Products",
            ProductIds { product_ids },
            Some(meta),
        ))
    }

    async fn get(&self, id: i64) -> AppResult<ProductAttributeValue> {
        self.records.find_by_id(id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Product attribute value with ID {id} not found"))
        })
    }
}

fn list(
    message: &str,
    items: Vec<ProductAttributeValue>,
) -> ApiResponse<ProductAttributeValueList> {
    let meta = Meta::total(items.len());
    ApiResponse::success(message, ProductAttributeValueList { items }, Some(meta))
}
