//! Field rules for account payloads that need repository lookups
//! (email uniqueness, role existence).

use std::{collections::HashSet, sync::Arc};

use crate::{
    dto::users::{CreateUserRequest, UpdateUserRequest},
    error::AppResult,
    repository::{RoleRepository, UserRepository},
    validation::{
        FieldErrorDetail, FieldErrors, validate_date, validate_email, validate_optional_string,
        validate_password, validate_required_string, validate_url,
    },
};

fn email_taken() -> FieldErrorDetail {
    FieldErrorDetail::new("EMAIL_EXISTS", "Email is already in use")
}

fn roles_invalid() -> FieldErrorDetail {
    FieldErrorDetail::new("ROLES_INVALID", "Invalid roles selected")
}

/// `Some` when any listed role id is unknown.
async fn check_roles(roles: &dyn RoleRepository, ids: &[i64]) -> AppResult<Option<FieldErrorDetail>> {
    if ids.is_empty() {
        return Ok(None);
    }
    let found: HashSet<i64> = roles.find_by_ids(ids).await?.into_iter().map(|r| r.id).collect();
    Ok(ids.iter().any(|id| !found.contains(id)).then(roles_invalid))
}

fn insert(errors: &mut FieldErrors, field: &str, detail: Option<FieldErrorDetail>) {
    if let Some(detail) = detail {
        errors.insert(field.to_string(), detail);
    }
}

#[derive(Clone)]
pub struct UserValidation {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
}

impl UserValidation {
    pub fn new(users: Arc<dyn UserRepository>, roles: Arc<dyn RoleRepository>) -> Self {
        Self { users, roles }
    }

    /// Every failing field of a create payload; empty when valid.
    pub async fn validate(&self, data: &CreateUserRequest) -> AppResult<FieldErrors> {
        let mut errors = FieldErrors::new();
        insert(
            &mut errors,
            "firstName",
            validate_required_string(data.first_name.as_deref(), "firstName", 2),
        );
        insert(
            &mut errors,
            "lastName",
            validate_required_string(data.last_name.as_deref(), "lastName", 2),
        );

        match validate_email(data.email.as_deref()) {
            Some(detail) => insert(&mut errors, "email", Some(detail)),
            None => {
                let email = data.email.as_deref().unwrap_or_default().trim().to_lowercase();
                if self.users.find_by_email(&email).await?.is_some() {
                    insert(&mut errors, "email", Some(email_taken()));
                }
            }
        }

        if let Some(roles) = &data.roles {
            insert(&mut errors, "roles", check_roles(self.roles.as_ref(), roles).await?);
        }
        insert(
            &mut errors,
            "dateOfBirth",
            validate_date(data.date_of_birth.as_deref(), "dateOfBirth"),
        );
        insert(
            &mut errors,
            "pictureUrl",
            validate_url(data.picture_url.as_deref(), "pictureUrl"),
        );
        Ok(errors)
    }
}

#[derive(Clone)]
pub struct UserUpdateValidation {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
}

impl UserUpdateValidation {
    pub fn new(users: Arc<dyn UserRepository>, roles: Arc<dyn RoleRepository>) -> Self {
        Self { users, roles }
    }

    /// Validates only the fields present; email uniqueness ignores `user_id`.
    pub async fn validate(&self, data: &UpdateUserRequest, user_id: i64) -> AppResult<FieldErrors> {
        let mut errors = FieldErrors::new();

        if let Some(email) = data.email.as_deref() {
            match validate_email(Some(email)) {
                Some(detail) => insert(&mut errors, "email", Some(detail)),
                None => {
                    let email = email.trim().to_lowercase();
                    let taken = self
                        .users
                        .find_by_email(&email)
                        .await?
                        .is_some_and(|other| other.id != user_id);
                    if taken {
                        insert(&mut errors, "email", Some(email_taken()));
                    }
                }
            }
        }
        if let Some(roles) = &data.roles {
            insert(&mut errors, "roles", check_roles(self.roles.as_ref(), roles).await?);
        }
        if let Some(password) = data.password.as_deref() {
            insert(&mut errors, "password", validate_password(Some(password)));
        }
        if let Some(first_name) = data.first_name.as_deref() {
            insert(
                &mut errors,
                "firstName",
                validate_required_string(Some(first_name), "firstName", 2),
            );
        }
        if data.last_name.is_some() {
            insert(
                &mut errors,
                "lastName",
                validate_optional_string(data.last_name.as_deref(), "lastName", 2),
            );
        }
        if data.date_of_birth.is_some() {
            insert(
                &mut errors,
                "dateOfBirth",
                validate_date(data.date_of_birth.as_deref(), "dateOfBirth"),
            );
        }
        if data.picture_url.is_some() {
            insert(
                &mut errors,
                "pictureUrl",
                validate_url(data.picture_url.as_deref(), "pictureUrl"),
            );
        }
        Ok(errors)
    }
}
