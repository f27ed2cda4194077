//! Audit trail DTOs

use chrono::{DateTime, Utc};
use parkflow_core::models::AuditEntry;
use serde::{Deserialize, Serialize};

/// Audit trail query parameters; every filter is optional
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuditQueryParams {
    /// Match the changed row's id exactly
    pub entity_id: Option<i64>,

    /// Substring match on the entity name
    pub table_name: Option<String>,

    /// Match the kind of change ("Added", "Modified", "Deleted")
    pub entity_state: Option<String>,

    /// Entries created at or after this instant (ISO 8601)
    pub start_date: Option<String>,

    /// Entries created at or before this instant (ISO 8601)
    pub end_date: Option<String>,
}

/// One audit trail entry
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntryResponse {
    /// Entry id
    pub id: i64,

    /// Id of the changed row
    pub entity_id: i64,

    /// Entity the change belongs to
    pub table_name: String,

    /// JSON snapshot before the change
    pub old_values: Option<String>,

    /// JSON snapshot after the change
    pub new_values: Option<String>,

    /// Kind of change
    pub entity_state: String,

    /// When the change was recorded
    pub created_at: DateTime<Utc>,
}

impl From<AuditEntry> for AuditEntryResponse {
    fn from(entry: AuditEntry) -> Self {
        Self {
            id: entry.lifecycle.id,
            entity_id: entry.entity_id,
            table_name: entry.table_name,
            old_values: entry.old_values,
            new_values: entry.new_values,
            entity_state: entry.entity_state.to_string(),
            created_at: entry.lifecycle.created_at,
        }
    }
}
