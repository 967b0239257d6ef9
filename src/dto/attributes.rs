use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::double_option;
use crate::{
    models::{Attribute, AttributeFilter, AttributeSet, AttributeValue, DataType, FacetValue,
        InputType, ProductAttributeValue},
    validation::{not_blank, unique_ids},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttributeRequest {
    #[validate(
        length(max = 64, message = "Code must be at most 64 characters"),
        custom(function = "not_blank", message = "Code is required")
    )]
    pub code: String,
    #[validate(
        length(max = 255, message = "Name must be at most 255 characters"),
        custom(function = "not_blank", message = "Name is required")
    )]
    pub name: String,
    pub input_type: InputType,
    pub data_type: DataType,
    #[validate(length(max = 32, message = "Unit must be at most 32 characters"))]
    pub unit: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttributeRequest {
    #[validate(
        length(max = 64, message = "Code must be at most 64 characters"),
        custom(function = "not_blank", message = "Code must not be blank")
    )]
    pub code: Option<String>,
    #[validate(
        length(max = 255, message = "Name must be at most 255 characters"),
        custom(function = "not_blank", message = "Name must not be blank")
    )]
    pub name: Option<String>,
    pub input_type: Option<InputType>,
    pub data_type: Option<DataType>,
    /// `null` clears the unit.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub unit: Option<Option<String>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttributeValueRequest {
    pub attribute_id: i64,
    #[validate(
        length(max = 64, message = "Value code must be at most 64 characters"),
        custom(function = "not_blank", message = "Value code is required")
    )]
    pub value_code: String,
    #[validate(
        length(max = 255, message = "Label must be at most 255 characters"),
        custom(function = "not_blank", message = "Label is required")
    )]
    pub label: String,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttributeValueRequest {
    #[validate(
        length(max = 64, message = "Value code must be at most 64 characters"),
        custom(function = "not_blank", message = "Value code must not be blank")
    )]
    pub value_code: Option<String>,
    #[validate(
        length(max = 255, message = "Label must be at most 255 characters"),
        custom(function = "not_blank", message = "Label must not be blank")
    )]
    pub label: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttributeSetRequest {
    #[validate(
        length(max = 255, message = "Name must be at most 255 characters"),
        custom(function = "not_blank", message = "Name is required")
    )]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttributeSetRequest {
    #[validate(
        length(max = 255, message = "Name must be at most 255 characters"),
        custom(function = "not_blank", message = "Name must not be blank")
    )]
    pub name: Option<String>,
    /// `null` clears the description.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AssignAttributeQuery {
    pub sort_order: Option<i32>,
    pub is_required: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductAttributeValueRequest {
    pub product_id: i64,
    pub attribute_id: i64,
    pub attribute_value_id: Option<i64>,
    pub value_text: Option<String>,
    pub value_number: Option<f64>,
    pub value_boolean: Option<bool>,
}

/// Omitted fields keep their value; `null` clears one.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAttributeValueRequest {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub attribute_value_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub value_text: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub value_number: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<bool>)]
    pub value_boolean: Option<Option<bool>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MultiFacetRequest {
    #[validate(custom(function = "unique_ids", message = "Attribute ids must be unique"))]
    pub attribute_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterProductsRequest {
    pub filters: Vec<AttributeFilter>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductsByValuesRequest {
    pub attribute_value_ids: Vec<i64>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct AttributeList {
    #[schema(value_type = Vec<Attribute>)]
    pub items: Vec<Attribute>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct AttributeValueList {
    #[schema(value_type = Vec<AttributeValue>)]
    pub items: Vec<AttributeValue>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct AttributeSetList {
    #[schema(value_type = Vec<AttributeSet>)]
    pub items: Vec<AttributeSet>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductAttributeValueList {
    #[schema(value_type = Vec<ProductAttributeValue>)]
    pub items: Vec<ProductAttributeValue>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct FacetList {
    #[schema(value_type = Vec<FacetValue>)]
    pub items: Vec<FacetValue>,
}

/// Facets keyed by attribute id.
#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct FacetMap {
    #[schema(value_type = Object)]
    pub items: BTreeMap<i64, Vec<FacetValue>>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductIds {
    pub product_ids: Vec<i64>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedCount {
    pub deleted: u64,
}
