use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::users::{CreateUserRequest, UpdateUserRequest, UserList, UserListQuery},
    error::AppResult,
    models::PublicUser,
    response::ApiResponse,
    state::AppState,
};

// Payloads are checked by the service's user validation, not by `ValidatedJson`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/email/{email}", get(get_user_by_email))
        .route("/{id}", get(get_user).patch(update_user).delete(delete_user))
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(UserListQuery),
    responses(
        (status = 200, description = "List users", body = ApiResponse<UserList>)
    ),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = state.users.list(query.search.as_deref()).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Create user", body = ApiResponse<PublicUser>),
        (status = 400, description = "Validation failed"),
    ),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<Json<ApiResponse<PublicUser>>> {
    let resp = state.users.create(payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/users/email/{email}",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "Get user by email", body = ApiResponse<PublicUser>),
        (status = 404, description = "User not found"),
    ),
    tag = "Users"
)]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<ApiResponse<PublicUser>>> {
    let resp = state.users.find_by_email(&email).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Get user", body = ApiResponse<PublicUser>),
        (status = 404, description = "User not found"),
    ),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<PublicUser>>> {
    let resp = state.users.find_by_id(id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = ApiResponse<PublicUser>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "User not found"),
    ),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<PublicUser>>> {
    let resp = state.users.update(id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Deleted user", body = ApiResponse<PublicUser>),
        (status = 404, description = "User not found"),
    ),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<PublicUser>>> {
    let resp = state.users.remove(id).await?;
    Ok(Json(resp))
}
