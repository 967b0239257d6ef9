use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::double_option;
use crate::{
    models::{Product, ProductStatus, ProductType, ProductVariant, VariantStatus},
    validation::unique_ids,
};

/// Decimal price to integer cents, rounded half away from zero.
pub fn price_to_cents(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

pub fn normalize_currency(currency: &str) -> String {
    currency.trim().to_uppercase()
}

fn trimmed_length(value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(ValidationError::new("length"));
    }
    Ok(())
}

fn sku_length(value: &str) -> Result<(), ValidationError> {
    trimmed_length(value, 2, 64)
}

fn name_length(value: &str) -> Result<(), ValidationError> {
    trimmed_length(value, 2, 255)
}

fn currency_length(value: &str) -> Result<(), ValidationError> {
    trimmed_length(value, 3, 8)
}

/// Value assignment for one attribute of a product. Select attributes use
/// `attributeValueIds` (several entries for multiselect); the single-value
/// form carries one typed value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductAttributeInput {
    pub attribute_value_ids: Option<Vec<i64>>,
    pub attribute_value_id: Option<i64>,
    pub value_text: Option<String>,
    pub value_number: Option<f64>,
    pub value_boolean: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(custom(function = "sku_length", message = "SKU must be 2 to 64 characters"))]
    pub sku: String,
    #[validate(custom(function = "name_length", message = "Name must be 2 to 255 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "Price must be positive"))]
    pub price: f64,
    #[validate(custom(function = "currency_length", message = "Currency must be 3 to 8 characters"))]
    pub currency: String,
    pub status: Option<ProductStatus>,
    #[serde(rename = "type")]
    pub product_type: Option<ProductType>,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
    #[validate(custom(function = "unique_ids", message = "Categories must be unique"))]
    #[serde(default)]
    pub categories: Vec<i64>,
    /// Attribute id to the values to store; replaces nothing on create.
    pub attribute_values: Option<BTreeMap<i64, ProductAttributeInput>>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(custom(function = "sku_length", message = "SKU must be 2 to 64 characters"))]
    pub sku: Option<String>,
    #[validate(custom(function = "name_length", message = "Name must be 2 to 255 characters"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[validate(range(exclusive_min = 0.0, message = "Price must be positive"))]
    pub price: Option<f64>,
    #[validate(custom(function = "currency_length", message = "Currency must be 3 to 8 characters"))]
    pub currency: Option<String>,
    pub status: Option<ProductStatus>,
    #[serde(rename = "type")]
    pub product_type: Option<ProductType>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<Option<serde_json::Value>>,
    #[validate(custom(function = "unique_ids", message = "Categories must be unique"))]
    pub categories: Option<Vec<i64>>,
    /// When present, replaces every stored attribute value of the product.
    pub attribute_values: Option<BTreeMap<i64, ProductAttributeInput>>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariantAttributeInput {
    pub attribute_id: i64,
    pub attribute_value_id: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVariantRequest {
    pub product_id: i64,
    #[validate(custom(function = "sku_length", message = "SKU must be 2 to 64 characters"))]
    pub sku: String,
    #[validate(custom(function = "name_length", message = "Name must be 2 to 255 characters"))]
    pub name: String,
    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price_cents: i64,
    #[validate(custom(function = "currency_length", message = "Currency must be 3 to 8 characters"))]
    pub currency: Option<String>,
    pub status: Option<VariantStatus>,
    #[serde(default)]
    pub attributes: Vec<VariantAttributeInput>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVariantRequest {
    #[validate(custom(function = "sku_length", message = "SKU must be 2 to 64 characters"))]
    pub sku: Option<String>,
    #[validate(custom(function = "name_length", message = "Name must be 2 to 255 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price_cents: Option<i64>,
    #[validate(custom(function = "currency_length", message = "Currency must be 3 to 8 characters"))]
    pub currency: Option<String>,
    pub status: Option<VariantStatus>,
    /// When present, replaces the variant's attribute links.
    pub attributes: Option<Vec<VariantAttributeInput>>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct VariantList {
    #[schema(value_type = Vec<ProductVariant>)]
    pub items: Vec<ProductVariant>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_round_to_cents() {
        assert_eq!(price_to_cents(19.99), 1999);
        assert_eq!(price_to_cents(0.005), 1);
        assert_eq!(price_to_cents(12.0), 1200);
    }

    #[test]
    fn create_request_reads_attribute_value_map() {
        let request: CreateProductRequest = serde_json::from_value(serde_json::json!({
            "sku": "TSHIRT-1",
            "name": "T-Shirt",
            "price": 19.5,
            "currency": " usd ",
            "type": "variable",
            "categories": [3, 1],
            "attributeValues": {
                "1": { "attributeValueIds": [10, 11] },
                "2": { "valueText": "Cotton" }
            }
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.product_type, Some(ProductType::Variable));
        let values = request.attribute_values.unwrap();
        assert_eq!(values[&1].attribute_value_ids, Some(vec![10, 11]));
        assert_eq!(values[&2].value_text.as_deref(), Some("Cotton"));
        assert_eq!(normalize_currency(&request.currency), "USD");
    }

    #[test]
    fn create_request_rejects_short_sku_and_free_price() {
        let request: CreateProductRequest = serde_json::from_value(serde_json::json!({
            "sku": " A ",
            "name": "Mug",
            "price": 0.0,
            "currency": "EUR",
            "categories": [1, 1]
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("sku"));
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("categories"));
        assert!(!fields.contains_key("name"));
    }
}
