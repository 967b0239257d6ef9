use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StoreStatus {
    #[default]
    Pending,
    Approved,
    Suspended,
    Rejected,
}

impl StoreStatus {
    /// Allowed moves between distinct statuses.
    pub fn can_transition_to(self, next: StoreStatus) -> bool {
        use StoreStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Suspended) | (Suspended, Approved)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub status: StoreStatus,
    pub commission_rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct StorePatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
    pub logo_url: Option<Option<String>>,
    pub banner_url: Option<Option<String>>,
    pub commission_rate: Option<f64>,
}

impl Store {
    pub fn create(user_id: i64, name: String, slug: String, commission_rate: f64) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            user_id,
            name,
            slug,
            description: None,
            logo_url: None,
            banner_url: None,
            status: StoreStatus::Pending,
            commission_rate,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update(self, patch: StorePatch) -> Self {
        Self {
            name: patch.name.unwrap_or(self.name),
            slug: patch.slug.unwrap_or(self.slug),
            description: patch.description.unwrap_or(self.description),
            logo_url: patch.logo_url.unwrap_or(self.logo_url),
            banner_url: patch.banner_url.unwrap_or(self.banner_url),
            commission_rate: patch.commission_rate.unwrap_or(self.commission_rate),
            updated_at: Utc::now(),
            ..self
        }
    }

    pub fn with_status(self, status: StoreStatus) -> Self {
        Self {
            status,
            updated_at: Utc::now(),
            ..self
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == StoreStatus::Pending
    }

    pub fn is_approved(&self) -> bool {
        self.status == StoreStatus::Approved
    }

    pub fn is_suspended(&self) -> bool {
        self.status == StoreStatus::Suspended
    }

    pub fn can_sell(&self) -> bool {
        self.is_approved()
    }

    pub fn to_public(&self) -> PublicStore {
        PublicStore {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            description: self.description.clone(),
            logo_url: self.logo_url.clone(),
            banner_url: self.banner_url.clone(),
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// Storefront view of a store, without owner or commission details.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicStore {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub status: StoreStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub suspended: i64,
    pub rejected: i64,
}

impl StoreStats {
    pub fn record(&mut self, status: StoreStatus, count: i64) {
        self.total += count;
        match status {
            StoreStatus::Pending => self.pending += count,
            StoreStatus::Approved => self.approved += count,
            StoreStatus::Suspended => self.suspended += count,
            StoreStatus::Rejected => self.rejected += count,
        }
    }
}

/// Base slug for a store name; may be empty when nothing usable remains.
///
/// Separators only join words, so the slug never starts or ends with `-`:
/// `" My Shop "` gives `my-shop`, not `-my-shop-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_strips_and_collapses() {
        assert_eq!(slugify("My Shop!"), "my-shop");
        assert_eq!(slugify("  Tea --  & Coffee  "), "tea-coffee");
        assert_eq!(slugify("Ünïcode Store"), "ncode-store");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(" My Shop "), "my-shop");
        assert_eq!(slugify("-edge-"), "edge");
    }

    #[test]
    fn transition_table() {
        use StoreStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Approved.can_transition_to(Suspended));
        assert!(Suspended.can_transition_to(Approved));
        assert!(!Rejected.can_transition_to(Approved));
        assert!(!Approved.can_transition_to(Pending));
        assert!(!Suspended.can_transition_to(Rejected));
    }

    #[test]
    fn public_view_and_predicates() {
        let store = Store::create(9, "Shop".into(), "shop".into(), 10.0);
        assert!(store.is_pending());
        assert!(!store.can_sell());
        let store = store.with_status(StoreStatus::Approved);
        assert!(store.can_sell());
        let json = serde_json::to_value(store.to_public()).unwrap();
        assert!(json.get("userId").is_none());
        assert!(json.get("commissionRate").is_none());
        assert_eq!(json["slug"], "shop");
    }
}
