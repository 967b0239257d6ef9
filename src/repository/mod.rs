//! Persistence seams. Services depend on these traits only; `postgres`
//! backs them with sea-orm/sqlx and `memory` with locked in-process maps.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    db::{DbPool, OrmConn},
    error::AppResult,
    models::{
        Attribute, AttributeFilter, AttributeSet, AttributeSetAssignment, AttributeValue, Category,
        FacetValue, Product, ProductAttributeValue, ProductFilter, ProductVariant, Role, Store,
        StoreStatus, User,
    },
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait AttributeRepository: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<Attribute>>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Attribute>>;
    /// Batched lookup; missing ids are skipped, order is unspecified.
    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Attribute>>;
    async fn find_by_code(&self, code: &str) -> AppResult<Option<Attribute>>;
    async fn create(&self, attribute: Attribute) -> AppResult<Attribute>;
    async fn update(&self, attribute: Attribute) -> AppResult<Attribute>;
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait AttributeValueRepository: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<AttributeValue>>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<AttributeValue>>;
    /// Ordered by sort order, then id.
    async fn find_by_attribute_id(&self, attribute_id: i64) -> AppResult<Vec<AttributeValue>>;
    async fn find_by_attribute_and_code(
        &self,
        attribute_id: i64,
        value_code: &str,
    ) -> AppResult<Option<AttributeValue>>;
    async fn create(&self, value: AttributeValue) -> AppResult<AttributeValue>;
    async fn update(&self, value: AttributeValue) -> AppResult<AttributeValue>;
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait AttributeSetRepository: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<AttributeSet>>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<AttributeSet>>;
    async fn find_by_name(&self, name: &str) -> AppResult<Option<AttributeSet>>;
    async fn create(&self, set: AttributeSet) -> AppResult<AttributeSet>;
    async fn update(&self, set: AttributeSet) -> AppResult<AttributeSet>;
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait AttributeSetAssignmentRepository: Send + Sync {
    /// Ordered by sort order, then id.
    async fn find_by_attribute_set_id(&self, set_id: i64)
    -> AppResult<Vec<AttributeSetAssignment>>;
    async fn find_by_attribute_set_ids(
        &self,
        set_ids: &[i64],
    ) -> AppResult<Vec<AttributeSetAssignment>>;
    async fn find_by_set_and_attribute(
        &self,
        set_id: i64,
        attribute_id: i64,
    ) -> AppResult<Option<AttributeSetAssignment>>;
    async fn create(&self, assignment: AttributeSetAssignment)
    -> AppResult<AttributeSetAssignment>;
    async fn delete_by_set_and_attribute(&self, set_id: i64, attribute_id: i64) -> AppResult<bool>;
    async fn delete_by_attribute_set_id(&self, set_id: i64) -> AppResult<u64>;
}

#[async_trait]
pub trait ProductAttributeValueRepository: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<ProductAttributeValue>>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<ProductAttributeValue>>;
    async fn find_by_product_id(&self, product_id: i64) -> AppResult<Vec<ProductAttributeValue>>;
    async fn find_by_attribute_id(&self, attribute_id: i64)
    -> AppResult<Vec<ProductAttributeValue>>;
    async fn find_by_product_and_attribute(
        &self,
        product_id: i64,
        attribute_id: i64,
    ) -> AppResult<Vec<ProductAttributeValue>>;
    async fn create(&self, value: ProductAttributeValue) -> AppResult<ProductAttributeValue>;
    async fn update(&self, value: ProductAttributeValue) -> AppResult<ProductAttributeValue>;
    async fn delete(&self, id: i64) -> AppResult<bool>;
    async fn delete_by_product_id(&self, product_id: i64) -> AppResult<u64>;
    async fn delete_by_product_and_attribute(
        &self,
        product_id: i64,
        attribute_id: i64,
    ) -> AppResult<u64>;

    /// Values of one attribute with their distinct product counts. Values
    /// nobody uses are omitted; ordered by count desc, then label.
    async fn faceted_search(&self, attribute_id: i64) -> AppResult<Vec<FacetValue>>;
    async fn multi_attribute_faceted_search(
        &self,
        attribute_ids: &[i64],
    ) -> AppResult<BTreeMap<i64, Vec<FacetValue>>>;
    /// Products satisfying every filter (any value within one filter), ascending.
    async fn filter_products(&self, filters: &[AttributeFilter]) -> AppResult<Vec<i64>>;
    /// Distinct products having any of the values, ascending.
    async fn find_products_by_attribute_values(&self, value_ids: &[i64]) -> AppResult<Vec<i64>>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Ordered by name; `search` is a case-insensitive substring of the name.
    async fn find_all(&self, search: Option<&str>) -> AppResult<Vec<Category>>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Category>>;
    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Category>>;
    /// Names are unique ignoring case.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>>;
    async fn create(&self, category: Category) -> AppResult<Category>;
    async fn update(&self, category: Category) -> AppResult<Category>;
    /// Children are detached and product links dropped.
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// One page of matching products and the total match count.
    async fn list(&self, filter: &ProductFilter) -> AppResult<(Vec<Product>, i64)>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>>;
    async fn find_by_sku(&self, sku: &str) -> AppResult<Option<Product>>;
    async fn create(&self, product: Product) -> AppResult<Product>;
    async fn update(&self, product: Product) -> AppResult<Product>;
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

/// Variants are stored together with their attribute value links.
#[async_trait]
pub trait ProductVariantRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<ProductVariant>>;
    async fn find_by_product_id(&self, product_id: i64) -> AppResult<Vec<ProductVariant>>;
    async fn find_by_sku(&self, sku: &str) -> AppResult<Option<ProductVariant>>;
    async fn create(&self, variant: ProductVariant) -> AppResult<ProductVariant>;
    async fn update(&self, variant: ProductVariant) -> AppResult<ProductVariant>;
    async fn delete(&self, id: i64) -> AppResult<bool>;
    async fn delete_by_product_id(&self, product_id: i64) -> AppResult<u64>;
}

#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Store>>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Store>>;
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Store>>;
    async fn find_by_user_id(&self, user_id: i64) -> AppResult<Vec<Store>>;
    async fn find_by_status(&self, status: StoreStatus) -> AppResult<Vec<Store>>;
    async fn count_by_status(&self) -> AppResult<Vec<(StoreStatus, i64)>>;
    async fn create(&self, store: Store) -> AppResult<Store>;
    async fn update(&self, store: Store) -> AppResult<Store>;
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Case-insensitive match on email, first and last name when `search` is set.
    async fn list(&self, search: Option<&str>) -> AppResult<Vec<User>>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn create(&self, user: User) -> AppResult<User>;
    async fn update(&self, user: User) -> AppResult<User>;
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Role>>;
    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Role>>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Role>>;
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;
    async fn create(&self, role: Role) -> AppResult<Role>;
    async fn update(&self, role: Role) -> AppResult<Role>;
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub action: String,
    pub resource: Option<String>,
    pub metadata: Option<Value>,
}

#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn record(&self, entry: AuditEntry) -> AppResult<()>;
}

/// Every repository handle the services need, backed by one store.
#[derive(Clone)]
pub struct Repositories {
    pub attributes: Arc<dyn AttributeRepository>,
    pub attribute_values: Arc<dyn AttributeValueRepository>,
    pub attribute_sets: Arc<dyn AttributeSetRepository>,
    pub assignments: Arc<dyn AttributeSetAssignmentRepository>,
    pub product_attribute_values: Arc<dyn ProductAttributeValueRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub variants: Arc<dyn ProductVariantRepository>,
    pub stores: Arc<dyn StoreRepository>,
    pub users: Arc<dyn UserRepository>,
    pub roles: Arc<dyn RoleRepository>,
    pub audit: Arc<dyn AuditRepository>,
}

impl Repositories {
    /// Shares one backing store across every repository handle.
    pub fn new<S>(store: S) -> Self
    where
        S: AttributeRepository
            + AttributeValueRepository
            + AttributeSetRepository
            + AttributeSetAssignmentRepository
            + ProductAttributeValueRepository
            + CategoryRepository
            + ProductRepository
            + ProductVariantRepository
            + StoreRepository
            + UserRepository
            + RoleRepository
            + AuditRepository
            + 'static,
    {
        let store = Arc::new(store);
        Self {
            attributes: store.clone(),
            attribute_values: store.clone(),
            attribute_sets: store.clone(),
            assignments: store.clone(),
            product_attribute_values: store.clone(),
            categories: store.clone(),
            products: store.clone(),
            variants: store.clone(),
            stores: store.clone(),
            users: store.clone(),
            roles: store.clone(),
            audit: store,
        }
    }

    pub fn postgres(orm: OrmConn, pool: DbPool) -> Self {
        Self::new(PgStore::new(orm, pool))
    }

    pub fn in_memory() -> Self {
        Self::new(InMemoryStore::default())
    }
}
