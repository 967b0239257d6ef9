use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};

use crate::{
    dto::stores::{
        CreateStoreRequest, GenerateSlugRequest, SlugResponse, StoreList, StoreStatusRequest,
        UpdateStoreRequest,
    },
    error::AppResult,
    models::{Store, StoreStats},
    response::ApiResponse,
    routes::{extract::ValidatedJson, params::Pagination},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stores).post(create_store))
        .route("/stats", get(store_stats))
        .route("/pending", get(pending_stores))
        .route("/approved", get(approved_stores))
        .route("/generate-slug", post(generate_slug))
        .route("/slug/{slug}", get(get_store_by_slug))
        .route("/user/{user_id}", get(stores_for_user))
        .route(
            "/{id}",
            get(get_store).patch(update_store).delete(delete_store),
        )
        .route("/{id}/status", patch(change_store_status))
}

#[utoipa::path(
    get,
    path = "/api/stores",
    params(Pagination),
    responses(
        (status = 200, description = "List stores", body = ApiResponse<StoreList>)
    ),
    tag = "Stores"
)]
pub async fn list_stores(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<StoreList>>> {
    let resp = state.stores.find_all_stores(pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stores",
    request_body = CreateStoreRequest,
    responses(
        (status = 200, description = "Create store", body = ApiResponse<Store>),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Slug taken or user already owns a store"),
    ),
    tag = "Stores"
)]
pub async fn create_store(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateStoreRequest>,
) -> AppResult<Json<ApiResponse<Store>>> {
    let resp = state.stores.create_store(payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/stores/stats",
    responses(
        (status = 200, description = "Store counts by status", body = ApiResponse<StoreStats>)
    ),
    tag = "Stores"
)]
pub async fn store_stats(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<StoreStats>>> {
    let resp = state.stores.get_store_stats().await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/stores/pending",
    responses(
        (status = 200, description = "Stores awaiting approval", body = ApiResponse<StoreList>)
    ),
    tag = "Stores"
)]
pub async fn pending_stores(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<StoreList>>> {
    let resp = state.stores.find_pending_stores().await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/stores/approved",
    responses(
        (status = 200, description = "Approved stores", body = ApiResponse<StoreList>)
    ),
    tag = "Stores"
)]
pub async fn approved_stores(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<StoreList>>> {
    let resp = state.stores.find_approved_stores().await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stores/generate-slug",
    request_body = GenerateSlugRequest,
    responses(
        (status = 200, description = "First free slug for the name", body = ApiResponse<SlugResponse>)
    ),
    tag = "Stores"
)]
pub async fn generate_slug(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<GenerateSlugRequest>,
) -> AppResult<Json<ApiResponse<SlugResponse>>> {
    let resp = state.stores.generate_store_slug(&payload.name).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/stores/slug/{slug}",
    params(("slug" = String, Path, description = "Store slug")),
    responses(
        (status = 200, description = "Get store by slug", body = ApiResponse<Store>),
        (status = 404, description = "Store not found"),
    ),
    tag = "Stores"
)]
pub async fn get_store_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<Store>>> {
    let resp = state.stores.find_store_by_slug(&slug).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/stores/user/{user_id}",
    params(("user_id" = i64, Path, description = "Owner user ID")),
    responses(
        (status = 200, description = "Stores owned by a user", body = ApiResponse<StoreList>)
    ),
    tag = "Stores"
)]
pub async fn stores_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<ApiResponse<StoreList>>> {
    let resp = state.stores.find_stores_by_user_id(user_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/stores/{id}",
    params(("id" = i64, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Get store", body = ApiResponse<Store>),
        (status = 404, description = "Store not found"),
    ),
    tag = "Stores"
)]
pub async fn get_store(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Store>>> {
    let resp = state.stores.find_store_by_id(id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/stores/{id}",
    params(("id" = i64, Path, description = "Store ID")),
    request_body = UpdateStoreRequest,
    responses(
        (status = 200, description = "Updated store", body = ApiResponse<Store>),
        (status = 404, description = "Store not found"),
        (status = 409, description = "Slug taken"),
    ),
    tag = "Stores"
)]
pub async fn update_store(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateStoreRequest>,
) -> AppResult<Json<ApiResponse<Store>>> {
    let resp = state.stores.update_store(id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/stores/{id}/status",
    params(("id" = i64, Path, description = "Store ID")),
    request_body = StoreStatusRequest,
    responses(
        (status = 200, description = "Store with its new status", body = ApiResponse<Store>),
        (status = 404, description = "Store not found"),
        (status = 409, description = "Transition not allowed"),
    ),
    tag = "Stores"
)]
pub async fn change_store_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<StoreStatusRequest>,
) -> AppResult<Json<ApiResponse<Store>>> {
    let resp = state.stores.approve_store(id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/stores/{id}",
    params(("id" = i64, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Deleted store", body = ApiResponse<Store>),
        (status = 404, description = "Store not found"),
    ),
    tag = "Stores"
)]
pub async fn delete_store(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Store>>> {
    let resp = state.stores.delete_store(id).await?;
    Ok(Json(resp))
}
