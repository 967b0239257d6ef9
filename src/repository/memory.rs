use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    AttributeRepository, AttributeSetAssignmentRepository, AttributeSetRepository,
    AttributeValueRepository, AuditEntry, AuditRepository, CategoryRepository,
    ProductAttributeValueRepository,
    ProductRepository, ProductVariantRepository, RoleRepository, StoreRepository, UserRepository,
};
use crate::{
    error::{AppError, AppResult},
    models::{
        Attribute, AttributeFilter, AttributeSet, AttributeSetAssignment, AttributeValue, Category,
        FacetValue, Product, ProductAttributeValue, ProductFilter, ProductSortBy, ProductVariant,
        Role, SortOrder, Store, StoreStatus, User,
    },
};

#[derive(Default)]
struct Tables {
    last_id: i64,
    attributes: BTreeMap<i64, Attribute>,
    attribute_values: BTreeMap<i64, AttributeValue>,
    attribute_sets: BTreeMap<i64, AttributeSet>,
    assignments: BTreeMap<i64, AttributeSetAssignment>,
    product_attribute_values: BTreeMap<i64, ProductAttributeValue>,
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, Product>,
    variants: BTreeMap<i64, ProductVariant>,
    stores: BTreeMap<i64, Store>,
    users: BTreeMap<i64, User>,
    roles: BTreeMap<i64, Role>,
    audit: Vec<AuditEntry>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn remove_attribute_value_links(&mut self, value_id: i64) {
        for pav in self.product_attribute_values.values_mut() {
            if pav.attribute_value_id == Some(value_id) {
                pav.attribute_value_id = None;
            }
        }
        for variant in self.variants.values_mut() {
            variant.attributes.retain(|link| link.attribute_value_id != value_id);
        }
    }
}

/// Process-local backing store with the same uniqueness and cascade rules
/// as the Postgres schema. Cloning shares the tables.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn audit_entries(&self) -> Vec<AuditEntry> {
        self.tables.read().await.audit.clone()
    }
}

fn ensure_unique(taken: bool, message: &str) -> AppResult<()> {
    if taken {
        Err(AppError::Conflict(message.to_string()))
    } else {
        Ok(())
    }
}

fn missing(what: &str, id: i64) -> AppError {
    AppError::NotFound(format!("{what} with ID {id} not found"))
}

fn sorted_unique(ids: impl IntoIterator<Item = i64>) -> Vec<i64> {
    ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

#[async_trait]
impl AttributeRepository for InMemoryStore {
    async fn find_all(&self) -> AppResult<Vec<Attribute>> {
        Ok(self.tables.read().await.attributes.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Attribute>> {
        Ok(self.tables.read().await.attributes.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Attribute>> {
        let tables = self.tables.read().await;
        Ok(sorted_unique(ids.iter().copied())
            .into_iter()
            .filter_map(|id| tables.attributes.get(&id).cloned())
            .collect())
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Attribute>> {
        let tables = self.tables.read().await;
        Ok(tables.attributes.values().find(|a| a.code == code).cloned())
    }

    async fn create(&self, attribute: Attribute) -> AppResult<Attribute> {
        let mut tables = self.tables.write().await;
        ensure_unique(
            tables.attributes.values().any(|a| a.code == attribute.code),
            "Attribute code already exists",
        )?;
        let attribute = Attribute {
            id: tables.next_id(),
            ..attribute
        };
        tables.attributes.insert(attribute.id, attribute.clone());
        Ok(attribute)
    }

    async fn update(&self, attribute: Attribute) -> AppResult<Attribute> {
        let mut tables = self.tables.write().await;
        if !tables.attributes.contains_key(&attribute.id) {
            return Err(missing("Attribute", attribute.id));
        }
        ensure_unique(
            tables
                .attributes
                .values()
                .any(|a| a.code == attribute.code && a.id != attribute.id),
            "Attribute code already exists",
        )?;
        tables.attributes.insert(attribute.id, attribute.clone());
        Ok(attribute)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.attributes.remove(&id).is_none() {
            return Ok(false);
        }
        let value_ids: Vec<i64> = tables
            .attribute_values
            .values()
            .filter(|v| v.attribute_id == id)
            .map(|v| v.id)
            .collect();
        for value_id in value_ids {
            tables.attribute_values.remove(&value_id);
        }
        tables.assignments.retain(|_, a| a.attribute_id != id);
        tables
            .product_attribute_values
            .retain(|_, pav| pav.attribute_id != id);
        for variant in tables.variants.values_mut() {
            variant.attributes.retain(|link| link.attribute_id != id);
        }
        Ok(true)
    }
}

#[async_trait]
impl AttributeValueRepository for InMemoryStore {
    async fn find_all(&self) -> AppResult<Vec<AttributeValue>> {
        Ok(self
            .tables
            .read()
            .await
            .attribute_values
            .values()
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<AttributeValue>> {
        Ok(self.tables.read().await.attribute_values.get(&id).cloned())
    }

    async fn find_by_attribute_id(&self, attribute_id: i64) -> AppResult<Vec<AttributeValue>> {
        let tables = self.tables.read().await;
        let mut values: Vec<AttributeValue> = tables
            .attribute_values
            .values()
            .filter(|v| v.attribute_id == attribute_id)
            .cloned()
            .collect();
        values.sort_by_key(|v| (v.sort_order, v.id));
        Ok(values)
    }

    async fn find_by_attribute_and_code(
        &self,
        attribute_id: i64,
        value_code: &str,
    ) -> AppResult<Option<AttributeValue>> {
        let tables = self.tables.read().await;
        Ok(tables
            .attribute_values
            .values()
            .find(|v| v.attribute_id == attribute_id && v.value_code == value_code)
            .cloned())
    }

    async fn create(&self, value: AttributeValue) -> AppResult<AttributeValue> {
        let mut tables = self.tables.write().await;
        ensure_unique(
            tables
                .attribute_values
                .values()
                .any(|v| v.attribute_id == value.attribute_id && v.value_code == value.value_code),
            "Attribute value code already exists for this attribute",
        )?;
        let value = AttributeValue {
            id: tables.next_id(),
            ..value
        };
        tables.attribute_values.insert(value.id, value.clone());
        Ok(value)
    }

    async fn update(&self, value: AttributeValue) -> AppResult<AttributeValue> {
        let mut tables = self.tables.write().await;
        if !tables.attribute_values.contains_key(&value.id) {
            return Err(missing("Attribute value", value.id));
        }
        ensure_unique(
            tables.attribute_values.values().any(|v| {
                v.attribute_id == value.attribute_id
                    && v.value_code == value.value_code
                    && v.id != value.id
            }),
            "Attribute value code already exists for this attribute",
        )?;
        tables.attribute_values.insert(value.id, value.clone());
        Ok(value)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.attribute_values.remove(&id).is_none() {
            return Ok(false);
        }
        tables.remove_attribute_value_links(id);
        Ok(true)
    }
}

#[async_trait]
impl AttributeSetRepository for InMemoryStore {
    async fn find_all(&self) -> AppResult<Vec<AttributeSet>> {
        let tables = self.tables.read().await;
        let mut sets: Vec<AttributeSet> = tables.attribute_sets.values().cloned().collect();
        sets.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.name.cmp(&b.name)));
        Ok(sets)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<AttributeSet>> {
        Ok(self.tables.read().await.attribute_sets.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<AttributeSet>> {
        let tables = self.tables.read().await;
        Ok(tables
            .attribute_sets
            .values()
            .find(|s| s.name == name)
            .cloned())
    }

    async fn create(&self, set: AttributeSet) -> AppResult<AttributeSet> {
        let mut tables = self.tables.write().await;
        ensure_unique(
            tables.attribute_sets.values().any(|s| s.name == set.name),
            "Attribute set name already exists",
        )?;
        let set = AttributeSet {
            id: tables.next_id(),
            attributes: Vec::new(),
            ..set
        };
        tables.attribute_sets.insert(set.id, set.clone());
        Ok(set)
    }

    async fn update(&self, set: AttributeSet) -> AppResult<AttributeSet> {
        let mut tables = self.tables.write().await;
        if !tables.attribute_sets.contains_key(&set.id) {
            return Err(missing("Attribute set", set.id));
        }
        ensure_unique(
            tables
                .attribute_sets
                .values()
                .any(|s| s.name == set.name && s.id != set.id),
            "Attribute set name already exists",
        )?;
        let stored = AttributeSet {
            attributes: Vec::new(),
            ..set.clone()
        };
        tables.attribute_sets.insert(set.id, stored);
        Ok(set)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.attribute_sets.remove(&id).is_none() {
            return Ok(false);
        }
        tables.assignments.retain(|_, a| a.attribute_set_id != id);
        Ok(true)
    }
}

#[async_trait]
impl AttributeSetAssignmentRepository for InMemoryStore {
    async fn find_by_attribute_set_id(
        &self,
        set_id: i64,
    ) -> AppResult<Vec<AttributeSetAssignment>> {
        self.find_by_attribute_set_ids(&[set_id]).await
    }

    async fn find_by_attribute_set_ids(
        &self,
        set_ids: &[i64],
    ) -> AppResult<Vec<AttributeSetAssignment>> {
        let tables = self.tables.read().await;
        let mut assignments: Vec<AttributeSetAssignment> = tables
            .assignments
            .values()
            .filter(|a| set_ids.contains(&a.attribute_set_id))
            .cloned()
            .collect();
        assignments.sort_by_key(|a| (a.sort_order, a.id));
        Ok(assignments)
    }

    async fn find_by_set_and_attribute(
        &self,
        set_id: i64,
        attribute_id: i64,
    ) -> AppResult<Option<AttributeSetAssignment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .assignments
            .values()
            .find(|a| a.attribute_set_id == set_id && a.attribute_id == attribute_id)
            .cloned())
    }

    async fn create(
        &self,
        assignment: AttributeSetAssignment,
    ) -> AppResult<AttributeSetAssignment> {
        let mut tables = self.tables.write().await;
        ensure_unique(
            tables.assignments.values().any(|a| {
                a.attribute_set_id == assignment.attribute_set_id
                    && a.attribute_id == assignment.attribute_id
            }),
            "Attribute is already assigned to this set",
        )?;
        let assignment = AttributeSetAssignment {
            id: tables.next_id(),
            ..assignment
        };
        tables.assignments.insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    async fn delete_by_set_and_attribute(&self, set_id: i64, attribute_id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.assignments.len();
        tables
            .assignments
            .retain(|_, a| !(a.attribute_set_id == set_id && a.attribute_id == attribute_id));
        Ok(tables.assignments.len() < before)
    }

    async fn delete_by_attribute_set_id(&self, set_id: i64) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.assignments.len();
        tables.assignments.retain(|_, a| a.attribute_set_id != set_id);
        Ok((before - tables.assignments.len()) as u64)
    }
}

#[async_trait]
impl ProductAttributeValueRepository for InMemoryStore {
    async fn find_all(&self) -> AppResult<Vec<ProductAttributeValue>> {
        Ok(self
            .tables
            .read()
            .await
            .product_attribute_values
            .values()
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<ProductAttributeValue>> {
        Ok(self
            .tables
            .read()
            .await
            .product_attribute_values
            .get(&id)
            .cloned())
    }

    async fn find_by_product_id(&self, product_id: i64) -> AppResult<Vec<ProductAttributeValue>> {
        let tables = self.tables.read().await;
        Ok(tables
            .product_attribute_values
            .values()
            .filter(|pav| pav.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn find_by_attribute_id(
        &self,
        attribute_id: i64,
    ) -> AppResult<Vec<ProductAttributeValue>> {
        let tables = self.tables.read().await;
        Ok(tables
            .product_attribute_values
            .values()
            .filter(|pav| pav.attribute_id == attribute_id)
            .cloned()
            .collect())
    }

    async fn find_by_product_and_attribute(
        &self,
        product_id: i64,
        attribute_id: i64,
    ) -> AppResult<Vec<ProductAttributeValue>> {
        let tables = self.tables.read().await;
        Ok(tables
            .product_attribute_values
            .values()
            .filter(|pav| pav.product_id == product_id && pav.attribute_id == attribute_id)
            .cloned()
            .collect())
    }

    async fn create(&self, value: ProductAttributeValue) -> AppResult<ProductAttributeValue> {
        let mut tables = self.tables.write().await;
        let value = ProductAttributeValue {
            id: tables.next_id(),
            ..value
        };
        tables.product_attribute_values.insert(value.id, value.clone());
        Ok(value)
    }

    async fn update(&self, value: ProductAttributeValue) -> AppResult<ProductAttributeValue> {
        let mut tables = self.tables.write().await;
        if !tables.product_attribute_values.contains_key(&value.id) {
            return Err(missing("Product attribute value", value.id));
        }
        tables.product_attribute_values.insert(value.id, value.clone());
        Ok(value)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.product_attribute_values.remove(&id).is_some())
    }

    async fn delete_by_product_id(&self, product_id: i64) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.product_attribute_values.len();
        tables
            .product_attribute_values
            .retain(|_, pav| pav.product_id != product_id);
        Ok((before - tables.product_attribute_values.len()) as u64)
    }

    async fn delete_by_product_and_attribute(
        &self,
        product_id: i64,
        attribute_id: i64,
    ) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.product_attribute_values.len();
        tables
            .product_attribute_values
            .retain(|_, pav| !(pav.product_id == product_id && pav.attribute_id == attribute_id));
        Ok((before - tables.product_attribute_values.len()) as u64)
    }

    async fn faceted_search(&self, attribute_id: i64) -> AppResult<Vec<FacetValue>> {
        let tables = self.tables.read().await;
        Ok(facets_for(&tables, attribute_id))
    }

    async fn multi_attribute_faceted_search(
        &self,
        attribute_ids: &[i64],
    ) -> AppResult<BTreeMap<i64, Vec<FacetValue>>> {
        let tables = self.tables.read().await;
        Ok(attribute_ids
            .iter()
            .map(|id| (*id, facets_for(&tables, *id)))
            .collect())
    }

    async fn filter_products(&self, filters: &[AttributeFilter]) -> AppResult<Vec<i64>> {
        let tables = self.tables.read().await;
        let mut matched: Option<BTreeSet<i64>> = None;
        for filter in filters.iter().filter(|f| !f.attribute_value_ids.is_empty()) {
            let products: BTreeSet<i64> = tables
                .product_attribute_values
                .values()
                .filter(|pav| {
                    pav.attribute_id == filter.attribute_id
                        && pav
                            .attribute_value_id
                            .is_some_and(|v| filter.attribute_value_ids.contains(&v))
                })
                .map(|pav| pav.product_id)
                .collect();
            matched = Some(match matched {
                Some(acc) => acc.intersection(&products).copied().collect(),
                None => products,
            });
        }
        Ok(matched.map(|ids| ids.into_iter().collect()).unwrap_or_default())
    }

    async fn find_products_by_attribute_values(&self, value_ids: &[i64]) -> AppResult<Vec<i64>> {
        let tables = self.tables.read().await;
        Ok(sorted_unique(
            tables
                .product_attribute_values
                .values()
                .filter(|pav| pav.attribute_value_id.is_some_and(|v| value_ids.contains(&v)))
                .map(|pav| pav.product_id),
        ))
    }
}

fn facets_for(tables: &Tables, attribute_id: i64) -> Vec<FacetValue> {
    let mut facets: Vec<FacetValue> = tables
        .attribute_values
        .values()
        .filter(|v| v.attribute_id == attribute_id)
        .filter_map(|value| {
            let products: BTreeSet<i64> = tables
                .product_attribute_values
                .values()
                .filter(|pav| {
                    pav.attribute_id == attribute_id && pav.attribute_value_id == Some(value.id)
                })
                .map(|pav| pav.product_id)
                .collect();
            (!products.is_empty()).then(|| FacetValue {
                attribute_value_id: value.id,
                label: value.label.clone(),
                product_count: products.len() as i64,
            })
        })
        .collect();
    facets.sort_by(|a, b| {
        b.product_count
            .cmp(&a.product_count)
            .then_with(|| a.label.cmp(&b.label))
    });
    facets
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn find_all(&self, search: Option<&str>) -> AppResult<Vec<Category>> {
        let tables = self.tables.read().await;
        let needle = search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        let mut categories: Vec<Category> = tables
            .categories
            .values()
            .filter(|c| {
                needle
                    .as_deref()
                    .is_none_or(|n| c.name.to_lowercase().contains(n))
            })
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Category>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Category>> {
        let tables = self.tables.read().await;
        Ok(sorted_unique(ids.iter().copied())
            .into_iter()
            .filter_map(|id| tables.categories.get(&id).cloned())
            .collect())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let tables = self.tables.read().await;
        let name = name.to_lowercase();
        Ok(tables
            .categories
            .values()
            .find(|c| c.name.to_lowercase() == name)
            .cloned())
    }

    async fn create(&self, category: Category) -> AppResult<Category> {
        let mut tables = self.tables.write().await;
        let name = category.name.to_lowercase();
        ensure_unique(
            tables
                .categories
                .values()
                .any(|c| c.name.to_lowercase() == name),
            "Category name already exists",
        )?;
        let category = Category {
            id: tables.next_id(),
            ..category
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> AppResult<Category> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&category.id) {
            return Err(missing("Category", category.id));
        }
        let name = category.name.to_lowercase();
        ensure_unique(
            tables
                .categories
                .values()
                .any(|c| c.name.to_lowercase() == name && c.id != category.id),
            "Category name already exists",
        )?;
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.categories.remove(&id).is_none() {
            return Ok(false);
        }
        for child in tables.categories.values_mut() {
            if child.parent_id == Some(id) {
                child.parent_id = None;
            }
        }
        for product in tables.products.values_mut() {
            product.categories.retain(|category_id| *category_id != id);
        }
        Ok(true)
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn list(&self, filter: &ProductFilter) -> AppResult<(Vec<Product>, i64)> {
        let tables = self.tables.read().await;
        let mut products: Vec<Product> = tables
            .products
            .values()
            .filter(|p| filter.matches(p))
            .filter(|p| {
                filter.attribute_value_ids.is_empty()
                    || tables.product_attribute_values.values().any(|pav| {
                        pav.product_id == p.id
                            && pav
                                .attribute_value_id
                                .is_some_and(|v| filter.attribute_value_ids.contains(&v))
                    })
            })
            .cloned()
            .collect();
        products.sort_by(|a, b| {
            let ordering = match filter.sort_by {
                ProductSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
                ProductSortBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                ProductSortBy::Price => a.price_cents.cmp(&b.price_cents),
                ProductSortBy::Name => a.name.cmp(&b.name),
            }
            .then(a.id.cmp(&b.id));
            match filter.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        let total = products.len() as i64;
        let page = products
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn find_by_sku(&self, sku: &str) -> AppResult<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables.products.values().find(|p| p.sku == sku).cloned())
    }

    async fn create(&self, product: Product) -> AppResult<Product> {
        let mut tables = self.tables.write().await;
        ensure_unique(
            tables.products.values().any(|p| p.sku == product.sku),
            "Product SKU already exists",
        )?;
        let product = Product {
            id: tables.next_id(),
            ..product
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, product: Product) -> AppResult<Product> {
        let mut tables = self.tables.write().await;
        if !tables.products.contains_key(&product.id) {
            return Err(missing("Product", product.id));
        }
        ensure_unique(
            tables
                .products
                .values()
                .any(|p| p.sku == product.sku && p.id != product.id),
            "Product SKU already exists",
        )?;
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.products.remove(&id).is_none() {
            return Ok(false);
        }
        tables
            .product_attribute_values
            .retain(|_, pav| pav.product_id != id);
        tables.variants.retain(|_, v| v.product_id != id);
        Ok(true)
    }
}

#[async_trait]
impl ProductVariantRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<ProductVariant>> {
        Ok(self.tables.read().await.variants.get(&id).cloned())
    }

    async fn find_by_product_id(&self, product_id: i64) -> AppResult<Vec<ProductVariant>> {
        let tables = self.tables.read().await;
        Ok(tables
            .variants
            .values()
            .filter(|v| v.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn find_by_sku(&self, sku: &str) -> AppResult<Option<ProductVariant>> {
        let tables = self.tables.read().await;
        Ok(tables.variants.values().find(|v| v.sku == sku).cloned())
    }

    async fn create(&self, variant: ProductVariant) -> AppResult<ProductVariant> {
        let mut tables = self.tables.write().await;
        ensure_unique(
            tables.variants.values().any(|v| v.sku == variant.sku),
            "Variant SKU already exists",
        )?;
        let id = tables.next_id();
        let mut links = variant.attributes;
        for link in links.iter_mut() {
            link.id = tables.next_id();
            link.variant_id = id;
        }
        let variant = ProductVariant {
            id,
            attributes: links,
            ..variant
        };
        tables.variants.insert(id, variant.clone());
        Ok(variant)
    }

    async fn update(&self, variant: ProductVariant) -> AppResult<ProductVariant> {
        let mut tables = self.tables.write().await;
        if !tables.variants.contains_key(&variant.id) {
            return Err(missing("Product variant", variant.id));
        }
        ensure_unique(
            tables
                .variants
                .values()
                .any(|v| v.sku == variant.sku && v.id != variant.id),
            "Variant SKU already exists",
        )?;
        let mut links = variant.attributes;
        for link in links.iter_mut().filter(|link| link.id == 0) {
            link.id = tables.next_id();
            link.variant_id = variant.id;
        }
        let variant = ProductVariant {
            attributes: links,
            ..variant
        };
        tables.variants.insert(variant.id, variant.clone());
        Ok(variant)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.tables.write().await.variants.remove(&id).is_some())
    }

    async fn delete_by_product_id(&self, product_id: i64) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.variants.len();
        tables.variants.retain(|_, v| v.product_id != product_id);
        Ok((before - tables.variants.len()) as u64)
    }
}

#[async_trait]
impl StoreRepository for InMemoryStore {
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Store>> {
        let tables = self.tables.read().await;
        let mut stores: Vec<Store> = tables.stores.values().cloned().collect();
        stores.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(stores
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Store>> {
        Ok(self.tables.read().await.stores.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Store>> {
        let tables = self.tables.read().await;
        Ok(tables.stores.values().find(|s| s.slug == slug).cloned())
    }

    async fn find_by_user_id(&self, user_id: i64) -> AppResult<Vec<Store>> {
        let tables = self.tables.read().await;
        Ok(tables
            .stores
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_status(&self, status: StoreStatus) -> AppResult<Vec<Store>> {
        let tables = self.tables.read().await;
        Ok(tables
            .stores
            .values()
            .filter(|s| s.status == status)
            .cloned()
            .collect())
    }

    async fn count_by_status(&self) -> AppResult<Vec<(StoreStatus, i64)>> {
        let tables = self.tables.read().await;
        Ok([
            StoreStatus::Pending,
            StoreStatus::Approved,
            StoreStatus::Suspended,
            StoreStatus::Rejected,
        ]
        .into_iter()
        .map(|status| {
            let count = tables.stores.values().filter(|s| s.status == status).count();
            (status, count as i64)
        })
        .filter(|(_, count)| *count > 0)
        .collect())
    }

    async fn create(&self, store: Store) -> AppResult<Store> {
        let mut tables = self.tables.write().await;
        ensure_unique(
            tables.stores.values().any(|s| s.slug == store.slug),
            "Store slug already exists",
        )?;
        ensure_unique(
            tables.stores.values().any(|s| s.user_id == store.user_id),
            "User already has a store",
        )?;
        let store = Store {
            id: tables.next_id(),
            ..store
        };
        tables.stores.insert(store.id, store.clone());
        Ok(store)
    }

    async fn update(&self, store: Store) -> AppResult<Store> {
        let mut tables = self.tables.write().await;
        if !tables.stores.contains_key(&store.id) {
            return Err(missing("Store", store.id));
        }
        ensure_unique(
            tables
                .stores
                .values()
                .any(|s| s.slug == store.slug && s.id != store.id),
            "Store slug already exists",
        )?;
        tables.stores.insert(store.id, store.clone());
        Ok(store)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.tables.write().await.stores.remove(&id).is_some())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn list(&self, search: Option<&str>) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        let needle = search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        Ok(tables
            .users
            .values()
            .filter(|user| match &needle {
                None => true,
                Some(needle) => {
                    user.email.to_lowercase().contains(needle)
                        || user.profile.first_name.to_lowercase().contains(needle)
                        || user
                            .profile
                            .last_name
                            .as_deref()
                            .is_some_and(|l| l.to_lowercase().contains(needle))
                }
            })
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: User) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        ensure_unique(
            tables.users.values().any(|u| u.email == user.email),
            "Email already exists",
        )?;
        let user = User {
            id: tables.next_id(),
            ..user
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(missing("User", user.id));
        }
        ensure_unique(
            tables
                .users
                .values()
                .any(|u| u.email == user.email && u.id != user.id),
            "Email already exists",
        )?;
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.stores.retain(|_, s| s.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl RoleRepository for InMemoryStore {
    async fn list(&self) -> AppResult<Vec<Role>> {
        let tables = self.tables.read().await;
        let mut roles: Vec<Role> = tables.roles.values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Role>> {
        let tables = self.tables.read().await;
        Ok(sorted_unique(ids.iter().copied())
            .into_iter()
            .filter_map(|id| tables.roles.get(&id).cloned())
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Role>> {
        Ok(self.tables.read().await.roles.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let tables = self.tables.read().await;
        Ok(tables.roles.values().find(|r| r.name == name).cloned())
    }

    async fn create(&self, role: Role) -> AppResult<Role> {
        let mut tables = self.tables.write().await;
        ensure_unique(
            tables.roles.values().any(|r| r.name == role.name),
            "Role name already exists",
        )?;
        let role = Role {
            id: tables.next_id(),
            ..role
        };
        tables.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn update(&self, role: Role) -> AppResult<Role> {
        let mut tables = self.tables.write().await;
        if !tables.roles.contains_key(&role.id) {
            return Err(missing("Role", role.id));
        }
        ensure_unique(
            tables
                .roles
                .values()
                .any(|r| r.name == role.name && r.id != role.id),
            "Role name already exists",
        )?;
        tables.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.roles.remove(&id).is_none() {
            return Ok(false);
        }
        for user in tables.users.values_mut() {
            user.roles.retain(|role_id| *role_id != id);
        }
        Ok(true)
    }
}

#[async_trait]
impl AuditRepository for InMemoryStore {
    async fn record(&self, entry: AuditEntry) -> AppResult<()> {
        self.tables.write().await.audit.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataType, InputType};

    async fn attribute(store: &InMemoryStore, code: &str) -> Attribute {
        AttributeRepository::create(
            store,
            Attribute::create(
                code.into(),
                code.to_uppercase(),
                InputType::Select,
                DataType::String,
                None,
            ),
        )
        .await
        .unwrap()
    }

    async fn value(store: &InMemoryStore, attribute_id: i64, code: &str) -> AttributeValue {
        AttributeValueRepository::create(
            store,
            AttributeValue::create(attribute_id, code.into(), code.to_uppercase(), 0),
        )
        .await
        .unwrap()
    }

    async fn link(store: &InMemoryStore, product_id: i64, attribute_id: i64, value_id: i64) {
        ProductAttributeValueRepository::create(
            store,
            ProductAttributeValue::create(product_id, attribute_id, Some(value_id), None, None, None),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn duplicate_code_is_a_conflict() {
        let store = InMemoryStore::new();
        attribute(&store, "color").await;
        let err = AttributeRepository::create(
            &store,
            Attribute::create(
                "color".into(),
                "Colour".into(),
                InputType::Text,
                DataType::String,
                None,
            ),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn facets_count_distinct_products_and_skip_unused_values() {
        let store = InMemoryStore::new();
        let color = attribute(&store, "color").await;
        let red = value(&store, color.id, "red").await;
        let blue = value(&store, color.id, "blue").await;
        let _green = value(&store, color.id, "green").await;
        link(&store, 100, color.id, red.id).await;
        link(&store, 100, color.id, red.id).await;
        link(&store, 101, color.id, blue.id).await;
        link(&store, 102, color.id, blue.id).await;

        let facets = store.faceted_search(color.id).await.unwrap();
        let summary: Vec<(String, i64)> = facets
            .into_iter()
            .map(|f| (f.label, f.product_count))
            .collect();
        assert_eq!(summary, vec![("BLUE".to_string(), 2), ("RED".to_string(), 1)]);
    }

    #[tokio::test]
    async fn filter_intersects_attributes_and_ignores_empty_filters() {
        let store = InMemoryStore::new();
        let color = attribute(&store, "color").await;
        let size = attribute(&store, "size").await;
        let red = value(&store, color.id, "red").await;
        let blue = value(&store, color.id, "blue").await;
        let large = value(&store, size.id, "l").await;
        link(&store, 1, color.id, red.id).await;
        link(&store, 1, size.id, large.id).await;
        link(&store, 2, color.id, blue.id).await;
        link(&store, 2, size.id, large.id).await;
        link(&store, 3, color.id, red.id).await;

        let filters = vec![
            AttributeFilter {
                attribute_id: color.id,
                attribute_value_ids: vec![red.id, blue.id],
            },
            AttributeFilter {
                attribute_id: size.id,
                attribute_value_ids: vec![large.id],
            },
            AttributeFilter {
                attribute_id: 999,
                attribute_value_ids: vec![],
            },
        ];
        assert_eq!(store.filter_products(&filters).await.unwrap(), vec![1, 2]);
        assert!(store.filter_products(&filters[2..]).await.unwrap().is_empty());
        assert_eq!(
            store
                .find_products_by_attribute_values(&[red.id])
                .await
                .unwrap(),
            vec![1, 3]
        );
    }

    #[tokio::test]
    async fn deleting_a_value_detaches_product_links() {
        let store = InMemoryStore::new();
        let color = attribute(&store, "color").await;
        let red = value(&store, color.id, "red").await;
        link(&store, 1, color.id, red.id).await;
        assert!(AttributeValueRepository::delete(&store, red.id).await.unwrap());
        let links = ProductAttributeValueRepository::find_by_product_id(&store, 1)
            .await
            .unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].attribute_value_id, None);
    }

    #[tokio::test]
    async fn deleting_a_category_detaches_children_and_products() {
        let store = InMemoryStore::new();
        let parent = CategoryRepository::create(&store, Category::create("Clothing".into(), None))
            .await
            .unwrap();
        let child = CategoryRepository::create(
            &store,
            Category::create("Shoes".into(), Some(parent.id)),
        )
        .await
        .unwrap();
        let product = ProductRepository::create(
            &store,
            Product {
                categories: vec![parent.id, child.id],
                ..Product::create("SKU-1".into(), "Sneaker".into(), 1000, "USD".into())
            },
        )
        .await
        .unwrap();

        let dup = CategoryRepository::create(&store, Category::create("clothing".into(), None))
            .await
            .unwrap_err();
        assert!(matches!(dup, AppError::Conflict(_)));

        assert!(CategoryRepository::delete(&store, parent.id).await.unwrap());
        let child = CategoryRepository::find_by_id(&store, child.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(child.parent_id, None);
        let product = ProductRepository::find_by_id(&store, product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.categories, vec![child.id]);
    }
}
