use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::attributes::{AttributeList, CreateAttributeRequest, UpdateAttributeRequest},
    error::AppResult,
    models::Attribute,
    response::ApiResponse,
    routes::extract::ValidatedJson,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attributes).post(create_attribute))
        .route("/code/{code}", get(get_attribute_by_code))
        .route(
            "/{id}",
            get(get_attribute)
                .put(update_attribute)
                .delete(delete_attribute),
        )
}

#[utoipa::path(
    get,
    path = "/api/attributes",
    responses(
        (status = 200, description = "List attributes", body = ApiResponse<AttributeList>)
    ),
    tag = "Attributes"
)]
pub async fn list_attributes(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<AttributeList>>> {
    let resp = state.attributes.find_all().await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/attributes/code/{code}",
    params(("code" = String, Path, description = "Attribute code")),
    responses(
        (status = 200, description = "Get attribute by code", body = ApiResponse<Attribute>),
        (status = 404, description = "Attribute not found"),
    ),
    tag = "Attributes"
)]
pub async fn get_attribute_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<Attribute>>> {
    let resp = state.attributes.find_by_code(&code).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/attributes/{id}",
    params(("id" = i64, Path, description = "Attribute ID")),
    responses(
        (status = 200, description = "Get attribute", body = ApiResponse<Attribute>),
        (status = 404, description = "Attribute not found"),
    ),
    tag = "Attributes"
)]
pub async fn get_attribute(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Attribute>>> {
    let resp = state.attributes.find_by_id(id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/attributes",
    request_body = CreateAttributeRequest,
    responses(
        (status = 200, description = "Create attribute", body = ApiResponse<Attribute>),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Code already exists"),
    ),
    tag = "Attributes"
)]
pub async fn create_attribute(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAttributeRequest>,
) -> AppResult<Json<ApiResponse<Attribute>>> {
    let resp = state.attributes.create(payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/attributes/{id}",
    params(("id" = i64, Path, description = "Attribute ID")),
    request_body = UpdateAttributeRequest,
    responses(
        (status = 200, description = "Updated attribute", body = ApiResponse<Attribute>),
        (status = 404, description = "Attribute not found"),
        (status = 409, description = "Code already exists"),
    ),
    tag = "Attributes"
)]
pub async fn update_attribute(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateAttributeRequest>,
) -> AppResult<Json<ApiResponse<Attribute>>> {
    let resp = state.attributes.update(id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/attributes/{id}",
    params(("id" = i64, Path, description = "Attribute ID")),
    responses(
        (status = 200, description = "Deleted attribute", body = ApiResponse<Attribute>),
        (status = 404, description = "Attribute not found"),
    ),
    tag = "Attributes"
)]
pub async fn delete_attribute(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Attribute>>> {
    let resp = state.attributes.delete(id).await?;
    Ok(Json(resp))
}
