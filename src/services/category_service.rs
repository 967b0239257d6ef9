use std::{collections::HashMap, sync::Arc};

use serde_json::json;

use crate::{
    audit,
    dto::categories::{
        CategoryListing, CategoryView, CreateCategoryRequest, UpdateCategoryRequest,
    },
    error::{AppError, AppResult},
    models::{
        Category,
        category::{build_tree, hierarchy_options, would_create_cycle},
    },
    repository::{AuditRepository, CategoryRepository, Repositories},
    response::{ApiResponse, Meta},
    validation::single_field_error,
};

const NAME_MAX_CHARS: usize = 255;

#[derive(Clone)]
pub struct CategoriesService {
    categories: Arc<dyn CategoryRepository>,
    audit: Arc<dyn AuditRepository>,
}

impl CategoriesService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            categories: repos.categories.clone(),
            audit: repos.audit.clone(),
        }
    }

    /// Flat rows with parent names, plus the tree and picker options built
    /// from the same matching rows.
    pub async fn list(&self, search: Option<&str>) -> AppResult<ApiResponse<CategoryListing>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let matching = self.categories.find_all(search).await?;
        let names: HashMap<i64, String> = match search {
            None => matching.iter().map(|c| (c.id, c.name.clone())).collect(),
            Some(_) => self
                .categories
                .find_all(None)
                .await?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect(),
        };

        let views = matching
            .iter()
            .map(|c| CategoryView {
                id: c.id,
                name: c.name.clone(),
                parent_id: c.parent_id,
                parent_name: c.parent_id.and_then(|p| names.get(&p).cloned()),
            })
            .collect();
        let tree = build_tree(&matching);
        let hierarchy = hierarchy_options(&tree);
        let meta = Meta::total(matching.len());

        Ok(ApiResponse::success(
            "Categories",
            CategoryListing {
                categories: views,
                tree,
                hierarchy,
            },
            Some(meta),
        ))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<ApiResponse<Category>> {
        let category = self.get(id).await?;
        Ok(ApiResponse::success("Category", category, None))
    }

    pub async fn create(&self, payload: CreateCategoryRequest) -> AppResult<ApiResponse<Category>> {
        let name = checked_name(payload.name.as_deref())?;
        self.ensure_name_free(&name, None).await?;
        if let Some(parent_id) = payload.parent_id {
            self.ensure_parent_exists(parent_id).await?;
        }

        let category = self
            .categories
            .create(Category::create(name, payload.parent_id))
            .await?;
        tracing::info!(
            category_id = category.id,
            name = %category.name,
            parent_id = ?category.parent_id,
            "category created"
        );

        audit::record(
            self.audit.as_ref(),
            "category_create",
            "categories",
            json!({ "category_id": category.id, "name": category.name }),
        )
        .await;

        Ok(ApiResponse::success(
            "Category created",
            category,
            Some(Meta::empty()),
        ))
    }

    /// An absent `parentId` keeps the parent; `null` detaches it.
    pub async fn update(
        &self,
        id: i64,
        payload: UpdateCategoryRequest,
    ) -> AppResult<ApiResponse<Category>> {
        let existing = self.get(id).await?;
        let name = match payload.name.as_deref() {
            Some(raw) => {
                let name = checked_name(Some(raw))?;
                self.ensure_name_free(&name, Some(id)).await?;
                Some(name)
            }
            None => None,
        };
        if let Some(Some(parent_id)) = payload.parent_id {
            self.ensure_valid_parent(id, parent_id).await?;
        }

        let category = self
            .categories
            .update(existing.update(name, payload.parent_id))
            .await?;
        tracing::info!(category_id = id, parent_id = ?category.parent_id, "category updated");

        audit::record(
            self.audit.as_ref(),
            "category_update",
            "categories",
            json!({ "category_id": id }),
        )
        .await;

        Ok(ApiResponse::success(
            "Category updated",
            category,
            Some(Meta::empty()),
        ))
    }

    /// Children move to the top level; products lose the link.
    pub async fn remove(&self, id: i64) -> AppResult<ApiResponse<Category>> {
        let existing = self.get(id).await?;
        self.categories.delete(id).await?;
        tracing::info!(category_id = id, "category deleted");

        audit::record(
            self.audit.as_ref(),
            "category_delete",
            "categories",
            json!({ "category_id": id, "name": existing.name }),
        )
        .await;

        Ok(ApiResponse::success(
            "Category deleted",
            existing,
            Some(Meta::empty()),
        ))
    }

    async fn get(&self, id: i64) -> AppResult<Category> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category with ID {id} not found")))
    }

    async fn ensure_name_free(&self, name: &str, own_id: Option<i64>) -> AppResult<()> {
        match self.categories.find_by_name(name).await? {
            Some(other) if Some(other.id) != own_id => Err(single_field_error(
                "name",
                "NAME_EXISTS",
                "Category name already exists",
            )),
            _ => Ok(()),
        }
    }

    async fn ensure_parent_exists(&self, parent_id: i64) -> AppResult<()> {
        if self.categories.find_by_id(parent_id).await?.is_none() {
            return Err(single_field_error(
                "parentId",
                "PARENT_NOT_FOUND",
                "Parent category not found",
            ));
        }
        Ok(())
    }

    async fn ensure_valid_parent(&self, id: i64, parent_id: i64) -> AppResult<()> {
        if parent_id == id {
            return Err(single_field_error(
                "parentId",
                "INVALID_PARENT",
                "Category cannot be its own parent",
            ));
        }
        self.ensure_parent_exists(parent_id).await?;
        let all = self.categories.find_all(None).await?;
        if would_create_cycle(&all, id, parent_id) {
            return Err(single_field_error(
                "parentId",
                "INVALID_PARENT",
                "Cannot set a descendant as parent",
            ));
        }
        Ok(())
    }
}

fn checked_name(raw: Option<&str>) -> AppResult<String> {
    let name = raw.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(single_field_error("name", "NAME_REQUIRED", "Name is required"));
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(single_field_error(
            "name",
            "NAME_MAX",
            "Name must be at most 255 characters",
        ));
    }
    Ok(name.to_string())
}
