use std::{collections::HashSet, sync::Arc};

use serde_json::json;

use crate::{
    audit,
    dto::{
        attributes::DeletedCount,
        products::{
            CreateVariantRequest, UpdateVariantRequest, VariantAttributeInput, VariantList,
            normalize_currency,
        },
    },
    error::{AppError, AppResult},
    models::{ProductVariant, ProductVariantAttributeValue, VariantPatch},
    repository::{
        AttributeValueRepository, AuditRepository, ProductRepository, ProductVariantRepository,
        Repositories,
    },
    response::{ApiResponse, Meta},
    services::product_attribute_value_service::ensure_value_of_attribute,
    validation::single_field_error,
};

const DEFAULT_CURRENCY: &str = "USD";

#[derive(Clone)]
pub struct ProductVariantsService {
    variants: Arc<dyn ProductVariantRepository>,
    products: Arc<dyn ProductRepository>,
    values: Arc<dyn AttributeValueRepository>,
    audit: Arc<dyn AuditRepository>,
}

impl ProductVariantsService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            variants: repos.variants.clone(),
            products: repos.products.clone(),
            values: repos.attribute_values.clone(),
            audit: repos.audit.clone(),
        }
    }

    pub async fn create(
        &self,
        payload: CreateVariantRequest,
    ) -> AppResult<ApiResponse<ProductVariant>> {
        if self.products.find_by_id(payload.product_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Product with ID {} not found",
                payload.product_id
            )));
        }
        let sku = payload.sku.trim().to_string();
        if self.variants.find_by_sku(&sku).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Variant with SKU {sku} already exists"
            )));
        }
        let links = self.prepare_links(&payload.attributes).await?;

        let variant = ProductVariant::create(
            payload.product_id,
            sku,
            payload.name.trim().to_string(),
            payload.price_cents,
            payload
                .currency
                .as_deref()
                .map(normalize_currency)
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            payload.status.unwrap_or_default(),
        )
        .with_attributes(links);
        let variant = self.variants.create(variant).await?;
        tracing::info!(
            variant_id = variant.id,
            product_id = variant.product_id,
            sku = %variant.sku,
            "product variant created"
        );

        audit::record(
            self.audit.as_ref(),
            "product_variant_create",
            "product_variants",
            json!({ "variant_id": variant.id, "product_id": variant.product_id }),
        )
        .await;

        Ok(ApiResponse::success(
            "Product variant created",
            variant,
            Some(Meta::empty()),
        ))
    }

    pub async fn find_by_product_id(&self, product_id: i64) -> AppResult<ApiResponse<VariantList>> {
        let items = self.variants.find_by_product_id(product_id).await?;
        let meta = Meta::total(items.len());
        Ok(ApiResponse::success(
            "Product variants",
            VariantList { items },
            Some(meta),
        ))
    }

    pub async fn find_one(&self, id: i64) -> AppResult<ApiResponse<ProductVariant>> {
        let variant = self.get(id).await?;
        Ok(ApiResponse::success("Product variant", variant, None))
    }

    pub async fn find_by_sku(&self, sku: &str) -> AppResult<ApiResponse<ProductVariant>> {
        let variant = self
            .variants
            .find_by_sku(sku.trim())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Variant with SKU {sku} not found")))?;
        Ok(ApiResponse::success("Product variant", variant, None))
    }

    pub async fn update(
        &self,
        id: i64,
        payload: UpdateVariantRequest,
    ) -> AppResult<ApiResponse<ProductVariant>> {
        let existing = self.get(id).await?;

        let sku = payload.sku.map(|s| s.trim().to_string());
        if let Some(sku) = sku.as_deref().filter(|s| *s != existing.sku) {
            if self.variants.find_by_sku(sku).await?.is_some() {
                return Err(AppError::Conflict(format!(
                    "Variant with SKU {sku} already exists"
                )));
            }
        }
        let attributes = match payload.attributes {
            Some(pairs) => Some(self.prepare_links(&pairs).await?),
            None => None,
        };

        let updated = existing.update(VariantPatch {
            sku,
            name: payload.name.map(|n| n.trim().to_string()),
            price_cents: payload.price_cents,
            currency: payload.currency.as_deref().map(normalize_currency),
            status: payload.status,
            attributes,
        });
        let variant = self.variants.update(updated).await?;
        tracing::info!(variant_id = id, "product variant updated");

        audit::record(
            self.audit.as_ref(),
            "product_variant_update",
            "product_variants",
            json!({ "variant_id": id }),
        )
        .await;

        Ok(ApiResponse::success(
            "Product variant updated",
            variant,
            Some(Meta::empty()),
        ))
    }

    pub async fn remove(&self, id: i64) -> AppResult<ApiResponse<ProductVariant>> {
        let existing = self.get(id).await?;
        self.variants.delete(id).await?;
        tracing::info!(variant_id = id, "product variant deleted");

        audit::record(
            self.audit.as_ref(),
            "product_variant_delete",
            "product_variants",
            json!({ "variant_id": id, "sku": existing.sku }),
        )
        .await;

        Ok(ApiResponse::success(
            "Product variant deleted",
            existing,
            Some(Meta::empty()),
        ))
    }

    pub async fn remove_by_product_id(
        &self,
        product_id: i64,
    ) -> AppResult<ApiResponse<DeletedCount>> {
        let deleted = self.variants.delete_by_product_id(product_id).await?;
        tracing::info!(product_id, deleted, "product variants deleted");

        audit::record(
            self.audit.as_ref(),
            "product_variant_delete_by_product",
            "product_variants",
            json!({ "product_id": product_id, "deleted": deleted }),
        )
        .await;

        Ok(ApiResponse::success(
            "Product variants deleted",
            DeletedCount { deleted },
            Some(Meta::empty()),
        ))
    }

    async fn get(&self, id: i64) -> AppResult<ProductVariant> {
        self.variants
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product variant with ID {id} not found")))
    }

    /// One link per attribute, each value belonging to its attribute.
    async fn prepare_links(
        &self,
        pairs: &[VariantAttributeInput],
    ) -> AppResult<Vec<ProductVariantAttributeValue>> {
        let mut seen = HashSet::with_capacity(pairs.len());
        let mut links = Vec::with_capacity(pairs.len());
        for pair in pairs {
            if !seen.insert(pair.attribute_id) {
                return Err(single_field_error(
                    "attributes",
                    "ATTRIBUTES_DUPLICATE",
                    &format!("Attribute {} is listed more than once", pair.attribute_id),
                ));
            }
            ensure_value_of_attribute(
                self.values.as_ref(),
                "attributes",
                pair.attribute_id,
                pair.attribute_value_id,
            )
            .await?;
            links.push(ProductVariantAttributeValue::create(
                0,
                pair.attribute_id,
                pair.attribute_value_id,
            ));
        }
        Ok(links)
    }
}
