use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::attributes::{
        CreateProductAttributeValueRequest, DeletedCount, FacetList, FacetMap,
        FilterProductsRequest, MultiFacetRequest, ProductAttributeValueList, ProductIds,
        ProductsByValuesRequest, UpdateProductAttributeValueRequest,
    },
    error::AppResult,
    models::ProductAttributeValue,
    response::ApiResponse,
    routes::extract::ValidatedJson,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_values).post(create_value))
        .route("/facets", post(multi_attribute_facets))
        .route("/facets/{attribute_id}", get(attribute_facets))
        .route("/filter", post(filter_products))
        .route("/products-by-values", post(products_by_values))
        .route(
            "/product/{product_id}",
            get(values_for_product).delete(remove_values_for_product),
        )
        .route(
            "/product/{product_id}/attribute/{attribute_id}",
            get(values_for_product_attribute).delete(remove_values_for_product_attribute),
        )
        .route("/attribute/{attribute_id}", get(values_for_attribute))
        .route("/{id}", get(get_value).put(update_value).delete(remove_value))
}

#[utoipa::path(
    get,
    path = "/api/product-attribute-values",
    responses(
        (status = 200, description = "List product attribute values", body = ApiResponse<ProductAttributeValueList>)
    ),
    tag = "Product attribute values"
)]
pub async fn list_values(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ProductAttributeValueList>>> {
    let resp = state.product_attribute_values.find_all().await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/product-attribute-values",
    request_body = CreateProductAttributeValueRequest,
    responses(
        (status = 200, description = "Create product attribute value", body = ApiResponse<ProductAttributeValue>),
        (status = 400, description = "Invalid value"),
        (status = 404, description = "Product or attribute not found"),
    ),
    tag = "Product attribute values"
)]
pub async fn create_value(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProductAttributeValueRequest>,
) -> AppResult<Json<ApiResponse<ProductAttributeValue>>> {
    let resp = state.product_attribute_values.create(payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/product-attribute-values/{id}",
    params(("id" = i64, Path, description = "Product attribute value ID")),
    responses(
        (status = 200, description = "Get product attribute value", body = ApiResponse<ProductAttributeValue>),
        (status = 404, description = "Product attribute value not found"),
    ),
    tag = "Product attribute values"
)]
pub async fn get_value(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ProductAttributeValue>>> {
    let resp = state.product_attribute_values.find_one(id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/product-attribute-values/{id}",
    params(("id" = i64, Path, description = "Product attribute value ID")),
    request_body = UpdateProductAttributeValueRequest,
    responses(
        (status = 200, description = "Updated product attribute value", body = ApiResponse<ProductAttributeValue>),
        (status = 400, description = "Invalid value"),
        (status = 404, description = "Product attribute value not found"),
    ),
    tag = "Product attribute values"
)]
pub async fn update_value(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateProductAttributeValueRequest>,
) -> AppResult<Json<ApiResponse<ProductAttributeValue>>> {
    let resp = state.product_attribute_values.update(id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/product-attribute-values/{id}",
    params(("id" = i64, Path, description = "Product attribute value ID")),
    responses(
        (status = 200, description = "Deleted product attribute value", body = ApiResponse<ProductAttributeValue>),
        (status = 404, description = "Product attribute value not found"),
    ),
    tag = "Product attribute values"
)]
pub async fn remove_value(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ProductAttributeValue>>> {
    let resp = state.product_attribute_values.remove(id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/product-attribute-values/product/{product_id}",
    params(("product_id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Values attached to a product", body = ApiResponse<ProductAttributeValueList>)
    ),
    tag = "Product attribute values"
)]
pub async fn values_for_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<ApiResponse<ProductAttributeValueList>>> {
    let resp = state
        .product_attribute_values
        .find_by_product_id(product_id)
        .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/product-attribute-values/product/{product_id}",
    params(("product_id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Number of removed values", body = ApiResponse<DeletedCount>)
    ),
    tag = "Product attribute values"
)]
pub async fn remove_values_for_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<ApiResponse<DeletedCount>>> {
    let resp = state
        .product_attribute_values
        .remove_by_product_id(product_id)
        .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/product-attribute-values/product/{product_id}/attribute/{attribute_id}",
    params(
        ("product_id" = i64, Path, description = "Product ID"),
        ("attribute_id" = i64, Path, description = "Attribute ID"),
    ),
    responses(
        (status = 200, description = "Values of one attribute on a product", body = ApiResponse<ProductAttributeValueList>)
    ),
    tag = "Product attribute values"
)]
pub async fn values_for_product_attribute(
    State(state): State<AppState>,
    Path((product_id, attribute_id)): Path<(i64, i64)>,
) -> AppResult<Json<ApiResponse<ProductAttributeValueList>>> {
    let resp = state
        .product_attribute_values
        .find_by_product_and_attribute(product_id, attribute_id)
        .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/product-attribute-values/product/{product_id}/attribute/{attribute_id}",
    params(
        ("product_id" = i64, Path, description = "Product ID"),
        ("attribute_id" = i64, Path, description = "Attribute ID"),
    ),
    responses(
        (status = 200, description = "Number of removed values", body = ApiResponse<DeletedCount>)
    ),
    tag = "Product attribute values"
)]
pub async fn remove_values_for_product_attribute(
    State(state): State<AppState>,
    Path((product_id, attribute_id)): Path<(i64, i64)>,
) -> AppResult<Json<ApiResponse<DeletedCount>>> {
    let resp = state
        .product_attribute_values
        .remove_by_product_and_attribute(product_id, attribute_id)
        .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/product-attribute-values/attribute/{attribute_id}",
    params(("attribute_id" = i64, Path, description = "Attribute ID")),
    responses(
        (status = 200, description = "Values recorded for an attribute", body = ApiResponse<ProductAttributeValueList>)
    ),
    tag = "Product attribute values"
)]
pub async fn values_for_attribute(
    State(state): State<AppState>,
    Path(attribute_id): Path<i64>,
) -> AppResult<Json<ApiResponse<ProductAttributeValueList>>> {
    let resp = state
        .product_attribute_values
        .find_by_attribute_id(attribute_id)
        .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/product-attribute-values/facets/{attribute_id}",
    params(("attribute_id" = i64, Path, description = "Attribute ID")),
    responses(
        (status = 200, description = "Distinct values with product counts", body = ApiResponse<FacetList>)
    ),
    tag = "Product attribute values"
)]
pub async fn attribute_facets(
    State(state): State<AppState>,
    Path(attribute_id): Path<i64>,
) -> AppResult<Json<ApiResponse<FacetList>>> {
    let resp = state
        .product_attribute_values
        .get_faceted_search_data(attribute_id)
        .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/product-attribute-values/facets",
    request_body = MultiFacetRequest,
    responses(
        (status = 200, description = "Facets keyed by attribute ID", body = ApiResponse<FacetMap>)
    ),
    tag = "Product attribute values"
)]
pub async fn multi_attribute_facets(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<MultiFacetRequest>,
) -> AppResult<Json<ApiResponse<FacetMap>>> {
    let resp = state
        .product_attribute_values
        .get_multi_attribute_faceted_search_data(payload)
        .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/product-attribute-values/filter",
    request_body = FilterProductsRequest,
    responses(
        (status = 200, description = "Products matching every filter", body = ApiResponse<ProductIds>)
    ),
    tag = "Product attribute values"
)]
pub async fn filter_products(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<FilterProductsRequest>,
) -> AppResult<Json<ApiResponse<ProductIds>>> {
    let resp = state
        .product_attribute_values
        .filter_products_by_attributes(payload)
        .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/product-attribute-values/products-by-values",
    request_body = ProductsByValuesRequest,
    responses(
        (status = 200, description = "Products holding any of the values", body = ApiResponse<ProductIds>)
    ),
    tag = "Product attribute values"
)]
pub async fn products_by_values(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProductsByValuesRequest>,
) -> AppResult<Json<ApiResponse<ProductIds>>> {
    let resp = state
        .product_attribute_values
        .find_products_by_attribute_values(payload)
        .await?;
    Ok(Json(resp))
}
