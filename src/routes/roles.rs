use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::users::{CreateRoleRequest, RoleList, UpdateRoleRequest},
    error::AppResult,
    models::Role,
    response::ApiResponse,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/{id}", get(get_role).patch(update_role).delete(delete_role))
}

#[utoipa::path(
    get,
    path = "/api/roles",
    responses(
        (status = 200, description = "List roles", body = ApiResponse<RoleList>)
    ),
    tag = "Roles"
)]
pub async fn list_roles(State(state): State<AppState>) -> AppResult<Json<ApiResponse<RoleList>>> {
    let resp = state.roles.list().await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/roles",
    request_body = CreateRoleRequest,
    responses(
        (status = 200, description = "Create role", body = ApiResponse<Role>),
        (status = 400, description = "Name missing or taken"),
    ),
    tag = "Roles"
)]
pub async fn create_role(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoleRequest>,
) -> AppResult<Json<ApiResponse<Role>>> {
    let resp = state.roles.create(payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/roles/{id}",
    params(("id" = i64, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Get role", body = ApiResponse<Role>),
        (status = 404, description = "Role not found"),
    ),
    tag = "Roles"
)]
pub async fn get_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Role>>> {
    let resp = state.roles.find_by_id(id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/roles/{id}",
    params(("id" = i64, Path, description = "Role ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Updated role", body = ApiResponse<Role>),
        (status = 400, description = "Name missing or taken"),
        (status = 404, description = "Role not found"),
    ),
    tag = "Roles"
)]
pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRoleRequest>,
) -> AppResult<Json<ApiResponse<Role>>> {
    let resp = state.roles.update(id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/roles/{id}",
    params(("id" = i64, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Deleted role", body = ApiResponse<Role>),
        (status = 404, description = "Role not found"),
        (status = 409, description = "System roles cannot be deleted"),
    ),
    tag = "Roles"
)]
pub async fn delete_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Role>>> {
    let resp = state.roles.remove(id).await?;
    Ok(Json(resp))
}
