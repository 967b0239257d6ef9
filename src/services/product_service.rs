use std::{collections::BTreeMap, sync::Arc};

use serde_json::json;

use crate::{
    audit,
    dto::products::{
        CreateProductRequest, ProductAttributeInput, ProductList, UpdateProductRequest,
        normalize_currency, price_to_cents,
    },
    error::{AppError, AppResult},
    models::{InputType, Product, ProductAttributeValue, ProductDetails, ProductPatch},
    repository::{
        AttributeRepository, AttributeValueRepository, AuditRepository, CategoryRepository,
        ProductAttributeValueRepository, ProductRepository, ProductVariantRepository,
        Repositories,
    },
    response::{ApiResponse, Meta},
    routes::params::ProductListQuery,
    services::product_attribute_value_service::{
        ensure_single_typed_value, ensure_value_of_attribute,
    },
    validation::single_field_error,
};

#[derive(Clone)]
pub struct ProductsService {
    products: Arc<dyn ProductRepository>,
    variants: Arc<dyn ProductVariantRepository>,
    attribute_values: Arc<dyn ProductAttributeValueRepository>,
    attributes: Arc<dyn AttributeRepository>,
    values: Arc<dyn AttributeValueRepository>,
    categories: Arc<dyn CategoryRepository>,
    audit: Arc<dyn AuditRepository>,
}

impl ProductsService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            products: repos.products.clone(),
            variants: repos.variants.clone(),
            attribute_values: repos.product_attribute_values.clone(),
            attributes: repos.attributes.clone(),
            values: repos.attribute_values.clone(),
            categories: repos.categories.clone(),
            audit: repos.audit.clone(),
        }
    }

    pub async fn list(&self, query: ProductListQuery) -> AppResult<ApiResponse<ProductList>> {
        let (page, per_page, _) = query.pagination().normalize();
        let filter = query.to_filter()?;
        let (items, total) = self.products.list(&filter).await?;
        let meta = Meta::new(page, per_page, total);
        Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<ApiResponse<ProductDetails>> {
        let product = self.get(id).await?;
        let attributes = self.attribute_values.find_by_product_id(id).await?;
        let variants = self.variants.find_by_product_id(id).await?;
        Ok(ApiResponse::success(
            "Product",
            ProductDetails {
                product,
                attributes,
                variants,
            },
            None,
        ))
    }

    pub async fn create(&self, payload: CreateProductRequest) -> AppResult<ApiResponse<Product>> {
        let sku = payload.sku.trim().to_string();
        if self.products.find_by_sku(&sku).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Product with SKU {sku} already exists"
            )));
        }
        let categories = self.checked_categories(payload.categories).await?;
        let pending_values = match payload.attribute_values {
            Some(map) => self.prepare_attribute_values(map).await?,
            None => Vec::new(),
        };

        let product = Product {
            description: clean_text(payload.description),
            status: payload.status.unwrap_or_default(),
            product_type: payload.product_type.unwrap_or_default(),
            metadata: payload.metadata,
            categories,
            ..Product::create(
                sku,
                payload.name.trim().to_string(),
                price_to_cents(payload.price),
                normalize_currency(&payload.currency),
            )
        };
        let product = self.products.create(product).await?;
        let stored = self.store_attribute_values(product.id, pending_values).await?;
        tracing::info!(
            product_id = product.id,
            sku = %product.sku,
            attribute_values = stored,
            "product created"
        );

        audit::record(
            self.audit.as_ref(),
            "product_create",
            "products",
            json!({ "product_id": product.id, "sku": product.sku }),
        )
        .await;

        Ok(ApiResponse::success(
            "Product created",
            product,
            Some(Meta::empty()),
        ))
    }

    pub async fn update(
        &self,
        id: i64,
        payload: UpdateProductRequest,
    ) -> AppResult<ApiResponse<Product>> {
        let existing = self.get(id).await?;

        let sku = payload.sku.map(|s| s.trim().to_string());
        if let Some(sku) = sku.as_deref().filter(|s| *s != existing.sku) {
            if self.products.find_by_sku(sku).await?.is_some() {
                return Err(AppError::Conflict(format!(
                    "Product with SKU {sku} already exists"
                )));
            }
        }
        let categories = match payload.categories {
            Some(ids) => Some(self.checked_categories(ids).await?),
            None => None,
        };
        let replacement_values = match payload.attribute_values {
            Some(map) => Some(self.prepare_attribute_values(map).await?),
            None => None,
        };

        let updated = existing.update(ProductPatch {
            sku,
            name: payload.name.map(|n| n.trim().to_string()),
            description: payload.description.map(clean_text),
            price_cents: payload.price.map(price_to_cents),
            currency: payload.currency.as_deref().map(normalize_currency),
            status: payload.status,
            product_type: payload.product_type,
            metadata: payload.metadata,
            categories,
        });
        let product = self.products.update(updated).await?;

        if let Some(values) = replacement_values {
            self.attribute_values.delete_by_product_id(id).await?;
            self.store_attribute_values(id, values).await?;
        }
        tracing::info!(product_id = id, "product updated");

        audit::record(
            self.audit.as_ref(),
            "product_update",
            "products",
            json!({ "product_id": id }),
        )
        .await;

        Ok(ApiResponse::success(
            "Product updated",
            product,
            Some(Meta::empty()),
        ))
    }

    /// Removes the product with its attribute values and variants.
    pub async fn delete(&self, id: i64) -> AppResult<ApiResponse<Product>> {
        let existing = self.get(id).await?;
        let values_removed = self.attribute_values.delete_by_product_id(id).await?;
        let variants_removed = self.variants.delete_by_product_id(id).await?;
        self.products.delete(id).await?;
        tracing::info!(
            product_id = id,
            values_removed,
            variants_removed,
            "product deleted"
        );

        audit::record(
            self.audit.as_ref(),
            "product_delete",
            "products",
            json!({ "product_id": id, "sku": existing.sku }),
        )
        .await;

        Ok(ApiResponse::success(
            "Product deleted",
            existing,
            Some(Meta::empty()),
        ))
    }

    async fn get(&self, id: i64) -> AppResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product with ID {id} not found")))
    }

    /// Validates an attribute value map into unsaved records (product id 0).
    async fn prepare_attribute_values(
        &self,
        map: BTreeMap<i64, ProductAttributeInput>,
    ) -> AppResult<Vec<ProductAttributeValue>> {
        if map.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = map.keys().copied().collect();
        let attributes: BTreeMap<i64, InputType> = self
            .attributes
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|a| (a.id, a.input_type))
            .collect();

        let mut records = Vec::new();
        for (attribute_id, input) in map {
            let Some(input_type) = attributes.get(&attribute_id).copied() else {
                return Err(single_field_error(
                    "attributeValues",
                    "ATTRIBUTEVALUES_INVALID",
                    &format!("Attribute {attribute_id} does not exist"),
                ));
            };

            if let Some(mut value_ids) = input.attribute_value_ids.filter(|ids| !ids.is_empty()) {
                value_ids.sort_unstable();
                value_ids.dedup();
                if value_ids.len() > 1 && input_type != InputType::Multiselect {
                    return Err(single_field_error(
                        "attributeValues",
                        "ATTRIBUTEVALUES_MULTIPLE",
                        &format!("Attribute {attribute_id} accepts a single value"),
                    ));
                }
                for value_id in value_ids {
                    ensure_value_of_attribute(
                        self.values.as_ref(),
                        "attributeValues",
                        attribute_id,
                        value_id,
                    )
                    .await?;
                    records.push(ProductAttributeValue::create(
                        0,
                        attribute_id,
                        Some(value_id),
                        None,
                        None,
                        None,
                    ));
                }
                continue;
            }

            let record = ProductAttributeValue::create(
                0,
                attribute_id,
                input.attribute_value_id,
                input.value_text.map(|t| t.trim().to_string()),
                input.value_number,
                input.value_boolean,
            );
            if record.attribute_value_id.is_none() && !record.has_value() {
                continue;
            }
            ensure_single_typed_value(&record)?;
            if let Some(value_id) = record.attribute_value_id {
                ensure_value_of_attribute(
                    self.values.as_ref(),
                    "attributeValues",
                    attribute_id,
                    value_id,
                )
                .await?;
            }
            records.push(record);
        }
        Ok(records)
    }

    /// Sorted, deduplicated ids; every one must name an existing category.
    async fn checked_categories(&self, ids: Vec<i64>) -> AppResult<Vec<i64>> {
        let ids = sorted_ids(ids);
        let found = self.categories.find_by_ids(&ids).await?;
        if found.len() != ids.len() {
            let unknown: Vec<String> = ids
                .iter()
                .filter(|id| !found.iter().any(|c| c.id == **id))
                .map(i64::to_string)
                .collect();
            return Err(single_field_error(
                "categories",
                "CATEGORIES_INVALID",
                &format!("Unknown category ids: {}", unknown.join(", ")),
            ));
        }
        Ok(ids)
    }

    async fn store_attribute_values(
        &self,
        product_id: i64,
        records: Vec<ProductAttributeValue>,
    ) -> AppResult<usize> {
        let count = records.len();
        for record in records {
            self.attribute_values
                .create(ProductAttributeValue {
                    product_id,
                    ..record
                })
                .await?;
        }
        Ok(count)
    }
}

fn clean_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn sorted_ids(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids.dedup();
    ids
}
