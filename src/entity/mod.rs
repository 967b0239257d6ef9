pub mod attribute_set_assignments;
pub mod attribute_sets;
pub mod attribute_values;
pub mod attributes;
pub mod categories;
pub mod product_attribute_values;
pub mod product_categories;
pub mod product_variant_attribute_values;
pub mod product_variants;
pub mod products;
pub mod roles;
pub mod stores;
pub mod user_roles;
pub mod users;

pub use attribute_set_assignments::Entity as AttributeSetAssignments;
pub use attribute_sets::Entity as AttributeSets;
pub use attribute_values::Entity as AttributeValues;
pub use attributes::Entity as Attributes;
pub use categories::Entity as Categories;
pub use product_attribute_values::Entity as ProductAttributeValues;
pub use product_categories::Entity as ProductCategories;
pub use product_variant_attribute_values::Entity as ProductVariantAttributeValues;
pub use product_variants::Entity as ProductVariants;
pub use products::Entity as Products;
pub use roles::Entity as Roles;
pub use stores::Entity as Stores;
pub use user_roles::Entity as UserRoles;
pub use users::Entity as Users;
