use crate::{
    config::AppConfig,
    repository::Repositories,
    services::{
        AttributeSetsService, AttributeValuesService, AttributesService, CategoriesService,
        ProductAttributeValuesService, ProductVariantsService, ProductsService, RolesService,
        StoresService, UsersService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub attributes: AttributesService,
    pub attribute_sets: AttributeSetsService,
    pub attribute_values: AttributeValuesService,
    pub product_attribute_values: ProductAttributeValuesService,
    pub categories: CategoriesService,
    pub products: ProductsService,
    pub variants: ProductVariantsService,
    pub stores: StoresService,
    pub users: UsersService,
    pub roles: RolesService,
}

impl AppState {
    pub fn new(repos: Repositories, config: &AppConfig) -> Self {
        Self {
            attributes: AttributesService::new(&repos),
            attribute_sets: AttributeSetsService::new(&repos),
            attribute_values: AttributeValuesService::new(&repos),
            product_attribute_values: ProductAttributeValuesService::new(&repos),
            categories: CategoriesService::new(&repos),
            products: ProductsService::new(&repos),
            variants: ProductVariantsService::new(&repos),
            stores: StoresService::new(&repos, config),
            users: UsersService::new(&repos, config),
            roles: RolesService::new(&repos),
        }
    }
}
