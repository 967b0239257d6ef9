use std::sync::Arc;

use serde_json::json;

use crate::{
    audit,
    dto::users::{CreateRoleRequest, RoleList, UpdateRoleRequest},
    error::{AppError, AppResult},
    models::Role,
    repository::{AuditRepository, Repositories, RoleRepository},
    response::{ApiResponse, Meta},
    validation::single_field_error,
};

#[derive(Clone)]
pub struct RolesService {
    roles: Arc<dyn RoleRepository>,
    audit: Arc<dyn AuditRepository>,
}

impl RolesService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            roles: repos.roles.clone(),
            audit: repos.audit.clone(),
        }
    }

    pub async fn list(&self) -> AppResult<ApiResponse<RoleList>> {
        let items = self.roles.list().await?;
        let meta = Meta::total(items.len());
        Ok(ApiResponse::success("Roles", RoleList { items }, Some(meta)))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<ApiResponse<Role>> {
        let role = self.get(id).await?;
        Ok(ApiResponse::success("Role", role, None))
    }

    pub async fn create(&self, payload: CreateRoleRequest) -> AppResult<ApiResponse<Role>> {
        let name = checked_name(payload.name.as_deref())?;
        self.ensure_name_free(&name, None).await?;

        let role = self.roles.create(Role::create(name, payload.permissions)).await?;
        tracing::info!(role_id = role.id, name = %role.name, "role created");

        audit::record(
            self.audit.as_ref(),
            "role_create",
            "roles",
            json!({ "role_id": role.id, "name": role.name }),
        )
        .await;

        Ok(ApiResponse::success("Role created", role, Some(Meta::empty())))
    }

    pub async fn update(&self, id: i64, payload: UpdateRoleRequest) -> AppResult<ApiResponse<Role>> {
        let existing = self.get(id).await?;
        let name = match payload.name.as_deref() {
            Some(raw) => {
                let name = checked_name(Some(raw))?;
                if existing.is_system() && name != existing.name {
                    return Err(AppError::Conflict(format!(
                        "System role {} cannot be renamed",
                        existing.name
                    )));
                }
                self.ensure_name_free(&name, Some(id)).await?;
                Some(name)
            }
            None => None,
        };

        let role = self
            .roles
            .update(existing.update(name, payload.permissions))
            .await?;
        tracing::info!(role_id = id, "role updated");

        audit::record(
            self.audit.as_ref(),
            "role_update",
            "roles",
            json!({ "role_id": id }),
        )
        .await;

        Ok(ApiResponse::success("Role updated", role, Some(Meta::empty())))
    }

    /// `Administrator` and `User` cannot be removed or renamed.
    pub async fn remove(&self, id: i64) -> AppResult<ApiResponse<Role>> {
        let existing = self.get(id).await?;
        if existing.is_system() {
            return Err(AppError::Conflict(format!(
                "System role {} cannot be deleted",
                existing.name
            )));
        }
        self.roles.delete(id).await?;
        tracing::info!(role_id = id, "role deleted");

        audit::record(
            self.audit.as_ref(),
            "role_delete",
            "roles",
            json!({ "role_id": id, "name": existing.name }),
        )
        .await;

        Ok(ApiResponse::success("Role deleted", existing, Some(Meta::empty())))
    }

    async fn get(&self, id: i64) -> AppResult<Role> {
        self.roles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Role with ID {id} not found")))
    }

    async fn ensure_name_free(&self, name: &str, own_id: Option<i64>) -> AppResult<()> {
        match self.roles.find_by_name(name).await? {
            Some(other) if Some(other.id) != own_id => Err(single_field_error(
                "name",
                "NAME_EXISTS",
                "Role name already exists",
            )),
            _ => Ok(()),
        }
    }
}

fn checked_name(raw: Option<&str>) -> AppResult<String> {
    let name = raw.map(str::trim).unwrap_or_default();
    if name.chars().count() < 2 {
        return Err(single_field_error(
            "name",
            "NAME_MIN",
            "Name is required (min 2 characters)",
        ));
    }
    Ok(name.to_string())
}
