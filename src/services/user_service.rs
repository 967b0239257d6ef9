use std::sync::Arc;

use serde_json::json;

use crate::{
    audit,
    config::AppConfig,
    dto::users::{CreateUserRequest, UpdateUserRequest, UserList},
    error::{AppError, AppResult},
    models::{PublicUser, User, UserPatch, UserProfile},
    password::hash_password,
    repository::{AuditRepository, Repositories, UserRepository},
    response::{ApiResponse, Meta},
    services::user_validation::{UserUpdateValidation, UserValidation},
    validation::{parse_date, validation_exception},
};

#[derive(Clone)]
pub struct UsersService {
    users: Arc<dyn UserRepository>,
    audit: Arc<dyn AuditRepository>,
    create_validation: UserValidation,
    update_validation: UserUpdateValidation,
    default_password: String,
    require_password_reset: bool,
}

impl UsersService {
    pub fn new(repos: &Repositories, config: &AppConfig) -> Self {
        Self {
            users: repos.users.clone(),
            audit: repos.audit.clone(),
            create_validation: UserValidation::new(repos.users.clone(), repos.roles.clone()),
            update_validation: UserUpdateValidation::new(repos.users.clone(), repos.roles.clone()),
            default_password: config.default_user_password.clone(),
            require_password_reset: config.require_forced_password_reset,
        }
    }

    pub async fn list(&self, search: Option<&str>) -> AppResult<ApiResponse<UserList>> {
        let items: Vec<PublicUser> = self
            .users
            .list(search)
            .await?
            .iter()
            .map(User::to_public)
            .collect();
        let meta = Meta::total(items.len());
        Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<ApiResponse<PublicUser>> {
        let user = self.get(id).await?;
        Ok(ApiResponse::success("User", user.to_public(), None))
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<ApiResponse<PublicUser>> {
        let user = self
            .users
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {email} not found")))?;
        Ok(ApiResponse::success("User", user.to_public(), None))
    }

    /// New users start with the shared default password, hashed.
    pub async fn create(&self, payload: CreateUserRequest) -> AppResult<ApiResponse<PublicUser>> {
        let errors = self.create_validation.validate(&payload).await?;
        if !errors.is_empty() {
            return Err(validation_exception(errors));
        }

        let password_hash = hash_password(&self.default_password)?;
        let mut roles = payload.roles.unwrap_or_default();
        roles.sort_unstable();
        roles.dedup();
        let profile = UserProfile {
            first_name: trimmed(payload.first_name).unwrap_or_default(),
            last_name: trimmed(payload.last_name),
            date_of_birth: payload.date_of_birth.as_deref().and_then(parse_date),
            picture_url: trimmed(payload.picture_url),
        };
        let user = User::create(
            normalize_email(payload.email.as_deref().unwrap_or_default()),
            roles,
            password_hash,
            self.require_password_reset,
            profile,
        );
        let user = self.users.create(user).await?;
        tracing::info!(user_id = user.id, "user created");

        audit::record(
            self.audit.as_ref(),
            "user_create",
            "users",
            json!({ "user_id": user.id, "email": user.email }),
        )
        .await;

        Ok(ApiResponse::success(
            "User created",
            user.to_public(),
            Some(Meta::empty()),
        ))
    }

    /// Applies only the fields present in `payload`.
    pub async fn update(
        &self,
        id: i64,
        payload: UpdateUserRequest,
    ) -> AppResult<ApiResponse<PublicUser>> {
        let existing = self.get(id).await?;
        let errors = self.update_validation.validate(&payload, id).await?;
        if !errors.is_empty() {
            return Err(validation_exception(errors));
        }

        let password_hash = match payload.password.as_deref() {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };
        let roles = payload.roles.map(|mut roles| {
            roles.sort_unstable();
            roles.dedup();
            roles
        });
        let password_changed = password_hash.is_some();
        let updated = existing.update(UserPatch {
            email: payload.email.as_deref().map(normalize_email),
            roles,
            password_hash,
            first_name: trimmed(payload.first_name),
            last_name: payload.last_name.map(|l| trimmed(Some(l))),
            date_of_birth: payload
                .date_of_birth
                .map(|raw| parse_date(&raw)),
            picture_url: payload.picture_url.map(|p| trimmed(Some(p))),
        });
        let user = self.users.update(updated).await?;
        tracing::info!(user_id = id, password_changed, "user updated");

        audit::record(
            self.audit.as_ref(),
            "user_update",
            "users",
            json!({ "user_id": id, "password_changed": password_changed }),
        )
        .await;

        Ok(ApiResponse::success(
            "User updated",
            user.to_public(),
            Some(Meta::empty()),
        ))
    }

    pub async fn remove(&self, id: i64) -> AppResult<ApiResponse<PublicUser>> {
        let existing = self.get(id).await?;
        self.users.delete(id).await?;
        tracing::info!(user_id = id, "user deleted");

        audit::record(
            self.audit.as_ref(),
            "user_delete",
            "users",
            json!({ "user_id": id, "email": existing.email }),
        )
        .await;

        Ok(ApiResponse::success(
            "User deleted",
            existing.to_public(),
            Some(Meta::empty()),
        ))
    }

    async fn get(&self, id: i64) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with ID {id} not found")))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
