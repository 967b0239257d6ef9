use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::attributes::{
        AttributeValueList, CreateAttributeValueRequest, UpdateAttributeValueRequest,
    },
    error::AppResult,
    models::AttributeValue,
    response::ApiResponse,
    routes::extract::ValidatedJson,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attribute_values).post(create_attribute_value))
        .route("/attribute/{attribute_id}", get(list_values_for_attribute))
        .route(
            "/{id}",
            get(get_attribute_value)
                .put(update_attribute_value)
                .delete(delete_attribute_value),
        )
}

#[utoipa::path(
    get,
    path = "/api/attribute-values",
    responses(
        (status = 200, description = "List attribute values", body = ApiResponse<AttributeValueList>)
    ),
    tag = "Attribute values"
)]
pub async fn list_attribute_values(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<AttributeValueList>>> {
    let resp = state.attribute_values.find_all().await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/attribute-values/attribute/{attribute_id}",
    params(("attribute_id" = i64, Path, description = "Attribute ID")),
    responses(
        (status = 200, description = "Values of one attribute", body = ApiResponse<AttributeValueList>),
        (status = 404, description = "Attribute not found"),
    ),
    tag = "Attribute values"
)]
pub async fn list_values_for_attribute(
    State(state): State<AppState>,
    Path(attribute_id): Path<i64>,
) -> AppResult<Json<ApiResponse<AttributeValueList>>> {
    let resp = state.attribute_values.find_by_attribute_id(attribute_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/attribute-values/{id}",
    params(("id" = i64, Path, description = "Attribute value ID")),
    responses(
        (status = 200, description = "Get attribute value", body = ApiResponse<AttributeValue>),
        (status = 404, description = "Attribute value not found"),
    ),
    tag = "Attribute values"
)]
pub async fn get_attribute_value(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<AttributeValue>>> {
    let resp = state.attribute_values.find_by_id(id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/attribute-values",
    request_body = CreateAttributeValueRequest,
    responses(
        (status = 200, description = "Create attribute value", body = ApiResponse<AttributeValue>),
        (status = 404, description = "Attribute not found"),
        (status = 409, description = "Value code already exists for the attribute"),
    ),
    tag = "Attribute values"
)]
pub async fn create_attribute_value(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAttributeValueRequest>,
) -> AppResult<Json<ApiResponse<AttributeValue>>> {
    let resp = state.attribute_values.create(payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/attribute-values/{id}",
    params(("id" = i64, Path, description = "Attribute value ID")),
    request_body = UpdateAttributeValueRequest,
    responses(
        (status = 200, description = "Updated attribute value", body = ApiResponse<AttributeValue>),
        (status = 404, description = "Attribute value not found"),
        (status = 409, description = "Value code already exists for the attribute"),
    ),
    tag = "Attribute values"
)]
pub async fn update_attribute_value(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateAttributeValueRequest>,
) -> AppResult<Json<ApiResponse<AttributeValue>>> {
    let resp = state.attribute_values.update(id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/attribute-values/{id}",
    params(("id" = i64, Path, description = "Attribute value ID")),
    responses(
        (status = 200, description = "Deleted attribute value", body = ApiResponse<AttributeValue>),
        (status = 404, description = "Attribute value not found"),
    ),
    tag = "Attribute values"
)]
pub async fn delete_attribute_value(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<AttributeValue>>> {
    let resp = state.attribute_values.delete(id).await?;
    Ok(Json(resp))
}
