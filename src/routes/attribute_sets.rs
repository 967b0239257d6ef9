use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};

use crate::{
    dto::attributes::{
        AssignAttributeQuery, AttributeSetList, CreateAttributeSetRequest,
        UpdateAttributeSetRequest,
    },
    error::AppResult,
    models::{AttributeSet, AttributeSetAssignment},
    response::ApiResponse,
    routes::extract::ValidatedJson,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attribute_sets).post(create_attribute_set))
        .route("/name/{name}", get(get_attribute_set_by_name))
        .route(
            "/{id}",
            get(get_attribute_set)
                .put(update_attribute_set)
                .delete(delete_attribute_set),
        )
        .route(
            "/{id}/attributes/{attribute_id}",
            post(add_attribute_to_set).delete(remove_attribute_from_set),
        )
}

#[utoipa::path(
    get,
    path = "/api/attribute-sets",
    responses(
        (status = 200, description = "List attribute sets with their attributes", body = ApiResponse<AttributeSetList>)
    ),
    tag = "Attribute sets"
)]
pub async fn list_attribute_sets(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<AttributeSetList>>> {
    let resp = state.attribute_sets.find_all().await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/attribute-sets/name/{name}",
    params(("name" = String, Path, description = "Attribute set name")),
    responses(
        (status = 200, description = "Get attribute set by name", body = ApiResponse<AttributeSet>),
        (status = 404, description = "Attribute set not found"),
    ),
    tag = "Attribute sets"
)]
pub async fn get_attribute_set_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<ApiResponse<AttributeSet>>> {
    let resp = state.attribute_sets.find_by_name(&name).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/attribute-sets/{id}",
    params(("id" = i64, Path, description = "Attribute set ID")),
    responses(
        (status = 200, description = "Get attribute set", body = ApiResponse<AttributeSet>),
        (status = 404, description = "Attribute set not found"),
    ),
    tag = "Attribute sets"
)]
pub async fn get_attribute_set(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<AttributeSet>>> {
    let resp = state.attribute_sets.find_by_id(id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/attribute-sets",
    request_body = CreateAttributeSetRequest,
    responses(
        (status = 200, description = "Create attribute set", body = ApiResponse<AttributeSet>),
        (status = 409, description = "Name already exists"),
    ),
    tag = "Attribute sets"
)]
pub async fn create_attribute_set(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAttributeSetRequest>,
) -> AppResult<Json<ApiResponse<AttributeSet>>> {
    let resp = state.attribute_sets.create(payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/attribute-sets/{id}",
    params(("id" = i64, Path, description = "Attribute set ID")),
    request_body = UpdateAttributeSetRequest,
    responses(
        (status = 200, description = "Updated attribute set", body = ApiResponse<AttributeSet>),
        (status = 404, description = "Attribute set not found"),
        (status = 409, description = "Name already exists"),
    ),
    tag = "Attribute sets"
)]
pub async fn update_attribute_set(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateAttributeSetRequest>,
) -> AppResult<Json<ApiResponse<AttributeSet>>> {
    let resp = state.attribute_sets.update(id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/attribute-sets/{id}",
    params(("id" = i64, Path, description = "Attribute set ID")),
    responses(
        (status = 200, description = "Deleted attribute set", body = ApiResponse<AttributeSet>),
        (status = 404, description = "Attribute set not found"),
        (status = 409, description = "System sets cannot be deleted"),
    ),
    tag = "Attribute sets"
)]
pub async fn delete_attribute_set(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<AttributeSet>>> {
    let resp = state.attribute_sets.delete(id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/attribute-sets/{id}/attributes/{attribute_id}",
    params(
        ("id" = i64, Path, description = "Attribute set ID"),
        ("attribute_id" = i64, Path, description = "Attribute ID"),
        AssignAttributeQuery,
    ),
    responses(
        (status = 200, description = "Attribute assigned", body = ApiResponse<AttributeSetAssignment>),
        (status = 404, description = "Set or attribute not found"),
        (status = 409, description = "Attribute already assigned"),
    ),
    tag = "Attribute sets"
)]
pub async fn add_attribute_to_set(
    State(state): State<AppState>,
    Path((id, attribute_id)): Path<(i64, i64)>,
    Query(options): Query<AssignAttributeQuery>,
) -> AppResult<Json<ApiResponse<AttributeSetAssignment>>> {
    let resp = state
        .attribute_sets
        .add_attribute_to_set(id, attribute_id, options)
        .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/attribute-sets/{id}/attributes/{attribute_id}",
    params(
        ("id" = i64, Path, description = "Attribute set ID"),
        ("attribute_id" = i64, Path, description = "Attribute ID"),
    ),
    responses(
        (status = 200, description = "Attribute unassigned", body = ApiResponse<AttributeSetAssignment>),
        (status = 404, description = "Attribute not assigned to the set"),
    ),
    tag = "Attribute sets"
)]
pub async fn remove_attribute_from_set(
    State(state): State<AppState>,
    Path((id, attribute_id)): Path<(i64, i64)>,
) -> AppResult<Json<ApiResponse<AttributeSetAssignment>>> {
    let resp = state
        .attribute_sets
        .remove_attribute_from_set(id, attribute_id)
        .await?;
    Ok(Json(resp))
}
