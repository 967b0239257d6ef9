use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const ADMINISTRATOR_ROLE: &str = "Administrator";
pub const USER_ROLE: &str = "User";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub picture_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Role ids.
    pub roles: Vec<i64>,
    pub password_hash: String,
    pub must_change_password: bool,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub roles: Option<Vec<i64>>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<Option<String>>,
    pub date_of_birth: Option<Option<NaiveDate>>,
    pub picture_url: Option<Option<String>>,
}

impl User {
    pub fn create(
        email: String,
        roles: Vec<i64>,
        password_hash: String,
        must_change_password: bool,
        profile: UserProfile,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            email,
            roles,
            password_hash,
            must_change_password,
            profile,
            created_at: now,
            updated_at: now,
        }
    }

    /// A replaced password hash clears `must_change_password`.
    pub fn update(self, patch: UserPatch) -> Self {
        let must_change_password = self.must_change_password && patch.password_hash.is_none();
        let profile = UserProfile {
            first_name: patch.first_name.unwrap_or(self.profile.first_name),
            last_name: patch.last_name.unwrap_or(self.profile.last_name),
            date_of_birth: patch.date_of_birth.unwrap_or(self.profile.date_of_birth),
            picture_url: patch.picture_url.unwrap_or(self.profile.picture_url),
        };
        Self {
            email: patch.email.unwrap_or(self.email),
            roles: patch.roles.unwrap_or(self.roles),
            password_hash: patch.password_hash.unwrap_or(self.password_hash),
            must_change_password,
            profile,
            updated_at: Utc::now(),
            ..self
        }
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            roles: self.roles.clone(),
            must_change_password: self.must_change_password,
            profile: self.profile.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Outward view of a user; the password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub roles: Vec<i64>,
    pub must_change_password: bool,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn create(name: String, permissions: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name,
            permissions,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update(self, name: Option<String>, permissions: Option<Vec<String>>) -> Self {
        Self {
            name: name.unwrap_or(self.name),
            permissions: permissions.unwrap_or(self.permissions),
            updated_at: Utc::now(),
            ..self
        }
    }

    pub fn is_system(&self) -> bool {
        self.name == ADMINISTRATOR_ROLE || self.name == USER_ROLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::create(
            "ada@example.com".into(),
            vec![1],
            "$argon2id$hash".into(),
            true,
            UserProfile {
                first_name: "Ada".into(),
                last_name: Some("Lovelace".into()),
                date_of_birth: None,
                picture_url: None,
            },
        )
    }

    #[test]
    fn public_view_has_no_password_hash() {
        let json = serde_json::to_value(user().to_public()).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["profile"]["firstName"], "Ada");
    }

    #[test]
    fn partial_update_preserves_untouched_fields() {
        let original = user();
        let updated = original.clone().update(UserPatch {
            last_name: Some(Some("Byron".into())),
            ..Default::default()
        });
        assert_eq!(updated.profile.last_name.as_deref(), Some("Byron"));
        assert_eq!(updated.email, original.email);
        assert_eq!(updated.roles, original.roles);
        assert_eq!(updated.password_hash, original.password_hash);
        assert!(updated.must_change_password);

        let rehashed = updated.update(UserPatch {
            password_hash: Some("$argon2id$other".into()),
            ..Default::default()
        });
        assert!(!rehashed.must_change_password);
    }

    #[test]
    fn system_roles_are_recognised_by_name() {
        assert!(Role::create(ADMINISTRATOR_ROLE.into(), vec![]).is_system());
        assert!(!Role::create("Editor".into(), vec![]).is_system());
    }
}
