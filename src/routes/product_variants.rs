use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::{
        attributes::DeletedCount,
        products::{CreateVariantRequest, UpdateVariantRequest, VariantList},
    },
    error::AppResult,
    models::ProductVariant,
    response::ApiResponse,
    routes::extract::ValidatedJson,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_variant))
        .route(
            "/product/{product_id}",
            get(variants_for_product).delete(remove_variants_for_product),
        )
        .route("/sku/{sku}", get(get_variant_by_sku))
        .route(
            "/{id}",
            get(get_variant).patch(update_variant).delete(remove_variant),
        )
}

#[utoipa::path(
    post,
    path = "/api/product-variants",
    request_body = CreateVariantRequest,
    responses(
        (status = 200, description = "Create variant", body = ApiResponse<ProductVariant>),
        (status = 400, description = "Invalid attribute links"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "SKU already exists"),
    ),
    tag = "Product variants"
)]
pub async fn create_variant(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateVariantRequest>,
) -> AppResult<Json<ApiResponse<ProductVariant>>> {
    let resp = state.variants.create(payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/product-variants/product/{product_id}",
    params(("product_id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Variants of a product", body = ApiResponse<VariantList>)
    ),
    tag = "Product variants"
)]
pub async fn variants_for_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<ApiResponse<VariantList>>> {
    let resp = state.variants.find_by_product_id(product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/product-variants/product/{product_id}",
    params(("product_id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Number of removed variants", body = ApiResponse<DeletedCount>)
    ),
    tag = "Product variants"
)]
pub async fn remove_variants_for_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<ApiResponse<DeletedCount>>> {
    let resp = state.variants.remove_by_product_id(product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/product-variants/sku/{sku}",
    params(("sku" = String, Path, description = "Variant SKU")),
    responses(
        (status = 200, description = "Get variant by SKU", body = ApiResponse<ProductVariant>),
        (status = 404, description = "Variant not found"),
    ),
    tag = "Product variants"
)]
pub async fn get_variant_by_sku(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> AppResult<Json<ApiResponse<ProductVariant>>> {
    let resp = state.variants.find_by_sku(&sku).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/product-variants/{id}",
    params(("id" = i64, Path, description = "Variant ID")),
    responses(
        (status = 200, description = "Get variant", body = ApiResponse<ProductVariant>),
        (status = 404, description = "Variant not found"),
    ),
    tag = "Product variants"
)]
pub async fn get_variant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ProductVariant>>> {
    let resp = state.variants.find_one(id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/product-variants/{id}",
    params(("id" = i64, Path, description = "Variant ID")),
    request_body = UpdateVariantRequest,
    responses(
        (status = 200, description = "Updated variant", body = ApiResponse<ProductVariant>),
        (status = 404, description = "Variant not found"),
        (status = 409, description = "SKU already exists"),
    ),
    tag = "Product variants"
)]
pub async fn update_variant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateVariantRequest>,
) -> AppResult<Json<ApiResponse<ProductVariant>>> {
    let resp = state.variants.update(id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/product-variants/{id}",
    params(("id" = i64, Path, description = "Variant ID")),
    responses(
        (status = 200, description = "Deleted variant", body = ApiResponse<ProductVariant>),
        (status = 404, description = "Variant not found"),
    ),
    tag = "Product variants"
)]
pub async fn remove_variant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ProductVariant>>> {
    let resp = state.variants.remove(id).await?;
    Ok(Json(resp))
}
