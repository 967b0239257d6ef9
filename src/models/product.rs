use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProductType {
    #[default]
    Simple,
    Variable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub currency: String,
    pub status: ProductStatus,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
    /// Category ids, ascending.
    pub categories: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price_cents: Option<i64>,
    pub currency: Option<String>,
    pub status: Option<ProductStatus>,
    pub product_type: Option<ProductType>,
    pub metadata: Option<Option<serde_json::Value>>,
    pub categories: Option<Vec<i64>>,
}

impl Product {
    pub fn create(sku: String, name: String, price_cents: i64, currency: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            sku,
            name,
            description: None,
            price_cents,
            currency,
            status: ProductStatus::default(),
            product_type: ProductType::default(),
            metadata: None,
            categories: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update(self, patch: ProductPatch) -> Self {
        Self {
            sku: patch.sku.unwrap_or(self.sku),
            name: patch.name.unwrap_or(self.name),
            description: patch.description.unwrap_or(self.description),
            price_cents: patch.price_cents.unwrap_or(self.price_cents),
            currency: patch.currency.unwrap_or(self.currency),
            status: patch.status.unwrap_or(self.status),
            product_type: patch.product_type.unwrap_or(self.product_type),
            metadata: patch.metadata.unwrap_or(self.metadata),
            categories: patch.categories.unwrap_or(self.categories),
            updated_at: Utc::now(),
            ..self
        }
    }
}

/// A product together with its attribute values and variants.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    #[serde(flatten)]
    pub product: Product,
    pub attributes: Vec<ProductAttributeValue>,
    pub variants: Vec<ProductVariant>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VariantStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: i64,
    pub product_id: i64,
    pub sku: String,
    pub name: String,
    pub price_cents: i64,
    pub currency: String,
    pub status: VariantStatus,
    pub attributes: Vec<ProductVariantAttributeValue>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct VariantPatch {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub price_cents: Option<i64>,
    pub currency: Option<String>,
    pub status: Option<VariantStatus>,
    pub attributes: Option<Vec<ProductVariantAttributeValue>>,
}

impl ProductVariant {
    pub fn create(
        product_id: i64,
        sku: String,
        name: String,
        price_cents: i64,
        currency: String,
        status: VariantStatus,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            product_id,
            sku,
            name,
            price_cents,
            currency,
            status,
            attributes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_attributes(self, attributes: Vec<ProductVariantAttributeValue>) -> Self {
        Self { attributes, ..self }
    }

    pub fn update(self, patch: VariantPatch) -> Self {
        Self {
            sku: patch.sku.unwrap_or(self.sku),
            name: patch.name.unwrap_or(self.name),
            price_cents: patch.price_cents.unwrap_or(self.price_cents),
            currency: patch.currency.unwrap_or(self.currency),
            status: patch.status.unwrap_or(self.status),
            attributes: patch.attributes.unwrap_or(self.attributes),
            updated_at: Utc::now(),
            ..self
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == VariantStatus::Active
    }

    pub fn activate(self) -> Self {
        self.update(VariantPatch {
            status: Some(VariantStatus::Active),
            ..Default::default()
        })
    }

    pub fn deactivate(self) -> Self {
        self.update(VariantPatch {
            status: Some(VariantStatus::Inactive),
            ..Default::default()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariantAttributeValue {
    pub id: i64,
    pub variant_id: i64,
    pub attribute_id: i64,
    pub attribute_value_id: i64,
}

impl ProductVariantAttributeValue {
    pub fn create(variant_id: i64, attribute_id: i64, attribute_value_id: i64) -> Self {
        Self {
            id: 0,
            variant_id,
            attribute_id,
            attribute_value_id,
        }
    }
}

/// Typed payload of a product attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum AttributeScalar {
    Text(String),
    Number(f64),
    Boolean(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductAttributeValue {
    pub id: i64,
    pub product_id: i64,
    pub attribute_id: i64,
    pub attribute_value_id: Option<i64>,
    pub value_text: Option<String>,
    pub value_number: Option<f64>,
    pub value_boolean: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Replacement values for [`ProductAttributeValue::update`]; `Some(None)` clears.
#[derive(Debug, Clone, Default)]
pub struct ProductAttributeValuePatch {
    pub attribute_value_id: Option<Option<i64>>,
    pub value_text: Option<Option<String>>,
    pub value_number: Option<Option<f64>>,
    pub value_boolean: Option<Option<bool>>,
}

impl ProductAttributeValue {
    pub fn create(
        product_id: i64,
        attribute_id: i64,
        attribute_value_id: Option<i64>,
        value_text: Option<String>,
        value_number: Option<f64>,
        value_boolean: Option<bool>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            product_id,
            attribute_id,
            attribute_value_id,
            value_text: value_text.filter(|t| !t.is_empty()),
            value_number,
            value_boolean,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update(self, patch: ProductAttributeValuePatch) -> Self {
        Self {
            attribute_value_id: patch.attribute_value_id.unwrap_or(self.attribute_value_id),
            value_text: patch.value_text.unwrap_or(self.value_text),
            value_number: patch.value_number.unwrap_or(self.value_number),
            value_boolean: patch.value_boolean.unwrap_or(self.value_boolean),
            updated_at: Utc::now(),
            ..self
        }
    }

    /// First populated typed field, checked text, number, boolean.
    pub fn value(&self) -> Option<AttributeScalar> {
        if let Some(text) = &self.value_text {
            return Some(AttributeScalar::Text(text.clone()));
        }
        if let Some(number) = self.value_number {
            return Some(AttributeScalar::Number(number));
        }
        self.value_boolean.map(AttributeScalar::Boolean)
    }

    pub fn has_value(&self) -> bool {
        self.populated_value_count() > 0
    }

    pub fn populated_value_count(&self) -> usize {
        [
            self.value_text.is_some(),
            self.value_number.is_some(),
            self.value_boolean.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }
}

/// One attribute value in a facet, with the number of distinct products using it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacetValue {
    pub attribute_value_id: i64,
    pub label: String,
    pub product_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttributeFilter {
    pub attribute_id: i64,
    pub attribute_value_ids: Vec<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ProductSortBy {
    #[default]
    Name,
    Price,
    CreatedAt,
    UpdatedAt,
}

/// Catalog listing criteria. Empty vectors place no restriction.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub statuses: Vec<ProductStatus>,
    pub types: Vec<ProductType>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
    pub category_ids: Vec<i64>,
    pub attribute_value_ids: Vec<i64>,
    pub sort_by: ProductSortBy,
    pub sort_order: SortOrder,
    pub limit: i64,
    pub offset: i64,
}

impl ProductFilter {
    /// Whether `product` passes every criterion except the attribute value ids.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = product.name.to_lowercase().contains(&needle)
                || product.sku.to_lowercase().contains(&needle)
                || product
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&product.status) {
            return false;
        }
        if !self.types.is_empty() && !self.types.contains(&product.product_type) {
            return false;
        }
        if self.min_price_cents.is_some_and(|min| product.price_cents < min) {
            return false;
        }
        if self.max_price_cents.is_some_and(|max| product.price_cents > max) {
            return false;
        }
        if !self.category_ids.is_empty()
            && !product.categories.iter().any(|c| self.category_ids.contains(c))
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn false_boolean_is_a_real_value() {
        let value = ProductAttributeValue::create(1, 2, None, None, None, Some(false));
        assert!(value.has_value());
        assert_eq!(value.value(), Some(AttributeScalar::Boolean(false)));
    }

    #[test]
    fn update_can_clear_and_replace_fields() {
        let value = ProductAttributeValue::create(1, 2, Some(7), Some("red".into()), None, None);
        let updated = value.update(ProductAttributeValuePatch {
            attribute_value_id: Some(None),
            value_text: Some(None),
            value_number: Some(Some(4.5)),
            ..Default::default()
        });
        assert_eq!(updated.attribute_value_id, None);
        assert_eq!(updated.value(), Some(AttributeScalar::Number(4.5)));
        assert_eq!(updated.populated_value_count(), 1);
    }

    #[test]
    fn filter_matches_search_price_and_categories() {
        let mut product = Product::create("TEE-1".into(), "Cotton Tee".into(), 1500, "USD".into());
        product.categories = vec![4, 9];
        let filter = ProductFilter {
            search: Some("cotton".into()),
            min_price_cents: Some(1000),
            max_price_cents: Some(2000),
            category_ids: vec![9],
            ..Default::default()
        };
        assert!(filter.matches(&product));
        let filter = ProductFilter {
            statuses: vec![ProductStatus::Published],
            ..Default::default()
        };
        assert!(!filter.matches(&product));
    }

    #[test]
    fn variant_activation_toggles_status() {
        let variant = ProductVariant::create(
            3,
            "TEE-RED-M".into(),
            "Tee red M".into(),
            1999,
            "USD".into(),
            VariantStatus::Active,
        );
        let variant = variant.deactivate();
        assert!(!variant.is_active());
        assert!(variant.activate().is_active());
    }
}
