use serde_json::Value;

use crate::{
    error::AppResult,
    repository::{AuditEntry, AuditRepository},
};

async fn log_audit(
    audit: &dyn AuditRepository,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    audit
        .record(AuditEntry {
            action: action.to_string(),
            resource: resource.map(str::to_string),
            metadata,
        })
        .await
}

/// Records an audit entry; a failure is logged and otherwise ignored.
pub async fn record(audit: &dyn AuditRepository, action: &str, resource: &str, metadata: Value) {
    if let Err(err) = log_audit(audit, action, Some(resource), Some(metadata)).await {
        tracing::warn!(error = %err, action, "audit log failed");
    }
}
