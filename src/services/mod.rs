pub mod attribute_service;
pub mod attribute_set_service;
pub mod attribute_value_service;
pub mod category_service;
pub mod product_attribute_value_service;
pub mod product_service;
pub mod product_variant_service;
pub mod role_service;
pub mod store_service;
pub mod user_service;
pub mod user_validation;

pub use attribute_service::AttributesService;
pub use attribute_set_service::AttributeSetsService;
pub use attribute_value_service::AttributeValuesService;
pub use category_service::CategoriesService;
pub use product_attribute_value_service::ProductAttributeValuesService;
pub use product_service::ProductsService;
pub use product_variant_service::ProductVariantsService;
pub use role_service::RolesService;
pub use store_service::StoresService;
pub use user_service::UsersService;
