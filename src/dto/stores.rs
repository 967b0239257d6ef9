use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::double_option;
use crate::{
    models::{Store, StoreStatus},
    validation::not_blank,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreRequest {
    pub user_id: i64,
    #[validate(
        length(max = 255, message = "Name must be at most 255 characters"),
        custom(function = "not_blank", message = "Name is required")
    )]
    pub name: String,
    /// Generated from the name when omitted.
    #[validate(
        length(max = 255, message = "Slug must be at most 255 characters"),
        custom(function = "not_blank", message = "Slug must not be blank")
    )]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(url(message = "Logo URL is invalid"))]
    pub logo_url: Option<String>,
    #[validate(url(message = "Banner URL is invalid"))]
    pub banner_url: Option<String>,
    #[validate(range(min = 0.0, max = 100.0, message = "Commission rate must be between 0 and 100"))]
    pub commission_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStoreRequest {
    #[validate(
        length(max = 255, message = "Name must be at most 255 characters"),
        custom(function = "not_blank", message = "Name must not be blank")
    )]
    pub name: Option<String>,
    #[validate(
        length(max = 255, message = "Slug must be at most 255 characters"),
        custom(function = "not_blank", message = "Slug must not be blank")
    )]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub logo_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub banner_url: Option<Option<String>>,
    #[validate(range(min = 0.0, max = 100.0, message = "Commission rate must be between 0 and 100"))]
    pub commission_rate: Option<f64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatusRequest {
    pub status: StoreStatus,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSlugRequest {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlugResponse {
    pub slug: String,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct StoreList {
    #[schema(value_type = Vec<Store>)]
    pub items: Vec<Store>,
}
