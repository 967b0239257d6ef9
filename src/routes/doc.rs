use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        attributes::{
            AttributeList, AttributeSetList, AttributeValueList, DeletedCount, FacetList,
            FacetMap, ProductAttributeValueList, ProductIds,
        },
        categories::{CategoryListing, CategoryView},
        products::{ProductList, VariantList},
        stores::{SlugResponse, StoreList},
        users::{RoleList, UserList},
    },
    error::ErrorData,
    models::{
        Attribute, AttributeFilter, AttributeSet, AttributeSetAssignment, AttributeValue,
        Category, CategoryNode, CategoryOption, DataType, FacetValue, InputType, Product,
        ProductAttributeValue, ProductDetails, ProductStatus, ProductType, ProductVariant,
        ProductVariantAttributeValue, PublicUser, Role, Store, StoreStats, StoreStatus,
        VariantStatus,
    },
    response::{ApiResponse, Meta},
    routes::{
        attribute_sets, attribute_values, attributes, categories, health, params,
        product_attribute_values, product_variants, products, roles, stores, users,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        attributes::list_attributes,
        attributes::get_attribute_by_code,
        attributes::get_attribute,
        attributes::create_attribute,
        attributes::update_attribute,
        attributes::delete_attribute,
        attribute_values::list_attribute_values,
        attribute_values::list_values_for_attribute,
        attribute_values::get_attribute_value,
        attribute_values::create_attribute_value,
        attribute_values::update_attribute_value,
        attribute_values::delete_attribute_value,
        attribute_sets::list_attribute_sets,
        attribute_sets::get_attribute_set_by_name,
        attribute_sets::get_attribute_set,
        attribute_sets::create_attribute_set,
        attribute_sets::update_attribute_set,
        attribute_sets::delete_attribute_set,
        attribute_sets::add_attribute_to_set,
        attribute_sets::remove_attribute_from_set,
        product_attribute_values::list_values,
        product_attribute_values::create_value,
        product_attribute_values::get_value,
        product_attribute_values::update_value,
        product_attribute_values::remove_value,
        product_attribute_values::values_for_product,
        product_attribute_values::remove_values_for_product,
        product_attribute_values::values_for_product_attribute,
        product_attribute_values::remove_values_for_product_attribute,
        product_attribute_values::values_for_attribute,
        product_attribute_values::attribute_facets,
        product_attribute_values::multi_attribute_facets,
        product_attribute_values::filter_products,
        product_attribute_values::products_by_values,
        categories::list_categories,
        categories::create_category,
        categories::get_category,
        categories::update_category,
        categories::delete_category,
        products::list_products,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        product_variants::create_variant,
        product_variants::variants_for_product,
        product_variants::remove_variants_for_product,
        product_variants::get_variant_by_sku,
        product_variants::get_variant,
        product_variants::update_variant,
        product_variants::remove_variant,
        stores::list_stores,
        stores::create_store,
        stores::store_stats,
        stores::pending_stores,
        stores::approved_stores,
        stores::generate_slug,
        stores::get_store_by_slug,
        stores::stores_for_user,
        stores::get_store,
        stores::update_store,
        stores::change_store_status,
        stores::delete_store,
        users::list_users,
        users::create_user,
        users::get_user_by_email,
        users::get_user,
        users::update_user,
        users::delete_user,
        roles::list_roles,
        roles::create_role,
        roles::get_role,
        roles::update_role,
        roles::delete_role
    ),
    components(
        schemas(
            Attribute,
            AttributeValue,
            AttributeSet,
            AttributeSetAssignment,
            InputType,
            DataType,
            Product,
            ProductDetails,
            ProductStatus,
            ProductType,
            ProductVariant,
            ProductVariantAttributeValue,
            VariantStatus,
            ProductAttributeValue,
            FacetValue,
            AttributeFilter,
            Category,
            CategoryNode,
            CategoryOption,
            CategoryView,
            CategoryListing,
            Store,
            StoreStatus,
            StoreStats,
            PublicUser,
            Role,
            AttributeList,
            AttributeValueList,
            AttributeSetList,
            ProductAttributeValueList,
            FacetList,
            FacetMap,
            ProductIds,
            DeletedCount,
            ProductList,
            VariantList,
            StoreList,
            SlugResponse,
            UserList,
            RoleList,
            ErrorData,
            params::Pagination,
            params::ProductListQuery,
            Meta,
            ApiResponse<Attribute>,
            ApiResponse<AttributeSet>,
            ApiResponse<Category>,
            ApiResponse<CategoryListing>,
            ApiResponse<ProductList>,
            ApiResponse<ProductDetails>,
            ApiResponse<Store>,
            ApiResponse<StoreList>,
            ApiResponse<PublicUser>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Attributes", description = "Attribute definitions"),
        (name = "Attribute values", description = "Predefined values of select attributes"),
        (name = "Attribute sets", description = "Named groups of attributes"),
        (name = "Product attribute values", description = "Values attached to products, facets and filtering"),
        (name = "Categories", description = "Product category hierarchy"),
        (name = "Products", description = "Catalog products"),
        (name = "Product variants", description = "Sellable variants of a product"),
        (name = "Stores", description = "Seller stores and their approval"),
        (name = "Users", description = "User administration"),
        (name = "Roles", description = "Role administration"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
