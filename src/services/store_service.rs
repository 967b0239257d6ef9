use std::sync::Arc;

use serde_json::json;

use crate::{
    audit,
    config::AppConfig,
    dto::stores::{
        CreateStoreRequest, SlugResponse, StoreList, StoreStatusRequest, UpdateStoreRequest,
    },
    error::{AppError, AppResult},
    models::{Store, StorePatch, StoreStats, StoreStatus, store::slugify},
    repository::{AuditRepository, Repositories, StoreRepository},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
};

/// Base used when a name yields no slug characters.
const FALLBACK_SLUG: &str = "store";

#[derive(Clone)]
pub struct StoresService {
    stores: Arc<dyn StoreRepository>,
    audit: Arc<dyn AuditRepository>,
    default_commission_rate: f64,
}

impl StoresService {
    pub fn new(repos: &Repositories, config: &AppConfig) -> Self {
        Self {
            stores: repos.stores.clone(),
            audit: repos.audit.clone(),
            default_commission_rate: config.default_commission_rate,
        }
    }

    pub async fn create_store(&self, payload: CreateStoreRequest) -> AppResult<ApiResponse<Store>> {
        let slug = match payload.slug.as_deref().map(str::trim) {
            Some(slug) => {
                if self.stores.find_by_slug(slug).await?.is_some() {
                    return Err(AppError::Conflict("Store slug already exists".to_string()));
                }
                slug.to_string()
            }
            None => self.unique_slug(&payload.name).await?,
        };
        if !self.stores.find_by_user_id(payload.user_id).await?.is_empty() {
            return Err(AppError::Conflict("User already has a store".to_string()));
        }

        let store = Store {
            description: clean(payload.description),
            logo_url: clean(payload.logo_url),
            banner_url: clean(payload.banner_url),
            ..Store::create(
                payload.user_id,
                payload.name.trim().to_string(),
                slug,
                payload
                    .commission_rate
                    .unwrap_or(self.default_commission_rate),
            )
        };
        let store = self.stores.create(store).await?;
        tracing::info!(store_id = store.id, user_id = store.user_id, slug = %store.slug, "store created");

        audit::record(
            self.audit.as_ref(),
            "store_create",
            "stores",
            json!({ "store_id": store.id, "user_id": store.user_id, "slug": store.slug }),
        )
        .await;

        Ok(ApiResponse::success(
            "Store created",
            store,
            Some(Meta::empty()),
        ))
    }

    pub async fn find_store_by_id(&self, id: i64) -> AppResult<ApiResponse<Store>> {
        let store = self.get(id).await?;
        Ok(ApiResponse::success("Store", store, None))
    }

    pub async fn find_store_by_slug(&self, slug: &str) -> AppResult<ApiResponse<Store>> {
        let store = self
            .stores
            .find_by_slug(slug.trim())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Store {slug} not found")))?;
        Ok(ApiResponse::success("Store", store, None))
    }

    pub async fn find_stores_by_user_id(&self, user_id: i64) -> AppResult<ApiResponse<StoreList>> {
        let items = self.stores.find_by_user_id(user_id).await?;
        Ok(list(items))
    }

    pub async fn find_all_stores(&self, pagination: Pagination) -> AppResult<ApiResponse<StoreList>> {
        let (page, per_page, offset) = pagination.normalize();
        let items = self.stores.find_all(per_page, offset).await?;
        let total = self
            .stores
            .count_by_status()
            .await?
            .into_iter()
            .map(|(_, count)| count)
            .sum();
        let meta = Meta::new(page, per_page, total);
        Ok(ApiResponse::success("Stores", StoreList { items }, Some(meta)))
    }

    pub async fn find_pending_stores(&self) -> AppResult<ApiResponse<StoreList>> {
        let items = self.stores.find_by_status(StoreStatus::Pending).await?;
        Ok(list(items))
    }

    pub async fn find_approved_stores(&self) -> AppResult<ApiResponse<StoreList>> {
        let items = self.stores.find_by_status(StoreStatus::Approved).await?;
        Ok(list(items))
    }

    pub async fn update_store(
        &self,
        id: i64,
        payload: UpdateStoreRequest,
    ) -> AppResult<ApiResponse<Store>> {
        let existing = self.get(id).await?;

        let slug = payload.slug.map(|s| s.trim().to_string());
        if let Some(slug) = slug.as_deref().filter(|s| *s != existing.slug) {
            if self.stores.find_by_slug(slug).await?.is_some() {
                return Err(AppError::Conflict("Store slug already exists".to_string()));
            }
        }

        let updated = existing.update(StorePatch {
            name: payload.name.map(|n| n.trim().to_string()),
            slug,
            description: payload.description.map(clean),
            logo_url: payload.logo_url.map(clean),
            banner_url: payload.banner_url.map(clean),
            commission_rate: payload.commission_rate,
        });
        let store = self.stores.update(updated).await?;
        tracing::info!(store_id = id, "store updated");

        audit::record(
            self.audit.as_ref(),
            "store_update",
            "stores",
            json!({ "store_id": id }),
        )
        .await;

        Ok(ApiResponse::success(
            "Store updated",
            store,
            Some(Meta::empty()),
        ))
    }

    /// Moves a store along the status table; the current status is a no-op.
    pub async fn approve_store(
        &self,
        id: i64,
        payload: StoreStatusRequest,
    ) -> AppResult<ApiResponse<Store>> {
        let existing = self.get(id).await?;
        let from = existing.status;
        let to = payload.status;
        if from == to {
            return Ok(ApiResponse::success(
                "Store status unchanged",
                existing,
                Some(Meta::empty()),
            ));
        }
        if !from.can_transition_to(to) {
            return Err(AppError::Conflict(format!(
                "Cannot change store status from {from} to {to}"
            )));
        }

        let store = self.stores.update(existing.with_status(to)).await?;
        tracing::info!(store_id = id, %from, %to, "store status changed");

        audit::record(
            self.audit.as_ref(),
            "store_status_change",
            "stores",
            json!({
                "store_id": id,
                "from": from.as_ref(),
                "to": to.as_ref(),
                "reason": payload.reason,
            }),
        )
        .await;

        Ok(ApiResponse::success(
            "Store status updated",
            store,
            Some(Meta::empty()),
        ))
    }

    pub async fn delete_store(&self, id: i64) -> AppResult<ApiResponse<Store>> {
        let existing = self.get(id).await?;
        self.stores.delete(id).await?;
        tracing::info!(store_id = id, "store deleted");

        audit::record(
            self.audit.as_ref(),
            "store_delete",
            "stores",
            json!({ "store_id": id, "slug": existing.slug }),
        )
        .await;

        Ok(ApiResponse::success(
            "Store deleted",
            existing,
            Some(Meta::empty()),
        ))
    }

    pub async fn get_store_stats(&self) -> AppResult<ApiResponse<StoreStats>> {
        let mut stats = StoreStats::default();
        for (status, count) in self.stores.count_by_status().await? {
            stats.record(status, count);
        }
        Ok(ApiResponse::success("Store stats", stats, None))
    }

    pub async fn generate_store_slug(&self, name: &str) -> AppResult<ApiResponse<SlugResponse>> {
        let slug = self.unique_slug(name).await?;
        Ok(ApiResponse::success("Store slug", SlugResponse { slug }, None))
    }

    /// Probes `base`, `base-1`, `base-2`, ... until one is free.
    async fn unique_slug(&self, name: &str) -> AppResult<String> {
        let base = match slugify(name) {
            slug if slug.is_empty() => FALLBACK_SLUG.to_string(),
            slug => slug,
        };
        let mut candidate = base.clone();
        let mut counter = 1;
        while self.stores.find_by_slug(&candidate).await?.is_some() {
            candidate = format!("{base}-{counter}");
            counter += 1;
        }
        Ok(candidate)
    }

    async fn get(&self, id: i64) -> AppResult<Store> {
        self.stores
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Store with ID {id} not found")))
    }
}

fn list(items: Vec<Store>) -> ApiResponse<StoreList> {
    let meta = Meta::total(items.len());
    ApiResponse::success("Stores", StoreList { items }, Some(meta))
}

fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
