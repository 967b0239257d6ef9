pub mod account;
pub mod attribute;
pub mod category;
pub mod product;
pub mod store;

pub use account::{PublicUser, Role, User, UserPatch, UserProfile};
pub use attribute::{
    Attribute, AttributePatch, AttributeSet, AttributeSetAssignment, AttributeValue, DataType,
    InputType,
};
pub use category::{Category, CategoryNode, CategoryOption};
pub use product::{
    AttributeFilter, AttributeScalar, FacetValue, Product, ProductAttributeValue,
    ProductAttributeValuePatch, ProductDetails, ProductPatch, ProductStatus, ProductType,
    ProductFilter, ProductSortBy, ProductVariant, ProductVariantAttributeValue, SortOrder,
    VariantPatch, VariantStatus,
};
pub use store::{PublicStore, Store, StorePatch, StoreStats, StoreStatus};
