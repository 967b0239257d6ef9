use axum::Router;

use crate::state::AppState;

pub mod attribute_sets;
pub mod attribute_values;
pub mod attributes;
pub mod categories;
pub mod doc;
pub mod extract;
pub mod health;
pub mod params;
pub mod product_attribute_values;
pub mod product_variants;
pub mod products;
pub mod roles;
pub mod stores;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/attributes", attributes::router())
        .nest("/attribute-values", attribute_values::router())
        .nest("/attribute-sets", attribute_sets::router())
        .nest("/product-attribute-values", product_attribute_values::router())
        .nest("/categories", categories::router())
        .nest("/products", products::router())
        .nest("/product-variants", product_variants::router())
        .nest("/stores", stores::router())
        .nest("/users", users::router())
        .nest("/roles", roles::router())
}
