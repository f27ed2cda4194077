//! Audit trail and application log models
//!
//! Every entity change can be recorded as an [`AuditEntry`]; services also
//! append [`LogEntry`] rows for operational visibility. Both tables are
//! append-only from the application's point of view.

use super::lifecycle::{Lifecycle, SYSTEM_ACTOR_ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to the audited entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityState {
    Added,
    Modified,
    Deleted,
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityState::Added => write!(f, "Added"),
            EntityState::Modified => write!(f, "Modified"),
            EntityState::Deleted => write!(f, "Deleted"),
        }
    }
}

impl EntityState {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "added" => Some(EntityState::Added),
            "modified" => Some(EntityState::Modified),
            "deleted" => Some(EntityState::Deleted),
            _ => None,
        }
    }
}

/// One recorded entity change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Shared lifecycle columns
    #[serde(flatten)]
    pub lifecycle: Lifecycle,

    /// Id of the changed row
    pub entity_id: i64,

    /// Entity name the row belongs to, e.g. "Vehicle"
    pub table_name: String,

    /// JSON snapshot before the change, when the flow had one in hand
    pub old_values: Option<String>,

    /// JSON snapshot after the change
    pub new_values: Option<String>,

    /// Kind of change
    pub entity_state: EntityState,
}

impl AuditEntry {
    pub fn added(table_name: &str, entity_id: i64, new_values: Option<String>) -> Self {
        Self {
            lifecycle: Lifecycle::new(SYSTEM_ACTOR_ID),
            entity_id,
            table_name: table_name.to_string(),
            old_values: None,
            new_values,
            entity_state: EntityState::Added,
        }
    }

    pub fn modified(
        table_name: &str,
        entity_id: i64,
        old_values: Option<String>,
        new_values: Option<String>,
    ) -> Self {
        Self {
            lifecycle: Lifecycle::new(SYSTEM_ACTOR_ID),
            entity_id,
            table_name: table_name.to_string(),
            old_values,
            new_values,
            entity_state: EntityState::Modified,
        }
    }

    pub fn deleted(table_name: &str, entity_id: i64) -> Self {
        Self {
            lifecycle: Lifecycle::new(SYSTEM_ACTOR_ID),
            entity_id,
            table_name: table_name.to_string(),
            old_values: None,
            new_values: None,
            entity_state: EntityState::Deleted,
        }
    }
}

/// Filter for audit trail queries; every field is optional and they combine with AND
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Match the changed row's id exactly
    pub entity_id: Option<i64>,

    /// Substring match on the entity name
    pub table_name: Option<String>,

    /// Match the kind of change
    pub entity_state: Option<EntityState>,

    /// Entries created at or after this instant
    pub start_created: Option<DateTime<Utc>>,

    /// Entries created at or before this instant
    pub end_created: Option<DateTime<Utc>>,
}

/// Application log severity, stored as an integer code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Information,
    Warning,
    Error,
}

impl LogLevel {
    /// Numeric code persisted in the logs table
    pub fn code(&self) -> i32 {
        match self {
            LogLevel::Debug => 10,
            LogLevel::Information => 20,
            LogLevel::Warning => 30,
            LogLevel::Error => 40,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            10 => Some(LogLevel::Debug),
            20 => Some(LogLevel::Information),
            30 => Some(LogLevel::Warning),
            40 => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Information => write!(f, "information"),
            LogLevel::Warning => write!(f, "warning"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// One application log row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Shared lifecycle columns
    #[serde(flatten)]
    pub lifecycle: Lifecycle,

    /// Severity
    pub level: LogLevel,

    /// One-line summary, typically "component | operation"
    pub short_message: String,

    /// Free-form detail
    pub full_message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, short_message: &str, full_message: &str) -> Self {
        Self {
            lifecycle: Lifecycle::new(SYSTEM_ACTOR_ID),
            level,
            short_message: short_message.to_string(),
            full_message: full_message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_state_round_trip() {
        assert_eq!(EntityState::from_str("added"), Some(EntityState::Added));
        assert_eq!(EntityState::from_str("Modified"), Some(EntityState::Modified));
        assert_eq!(EntityState::from_str("DELETED"), Some(EntityState::Deleted));
        assert_eq!(EntityState::from_str("upserted"), None);
        assert_eq!(EntityState::Added.to_string(), "Added");
    }

    #[test]
    fn test_log_level_codes() {
        assert_eq!(LogLevel::Debug.code(), 10);
        assert_eq!(LogLevel::Information.code(), 20);
        assert_eq!(LogLevel::Warning.code(), 30);
        assert_eq!(LogLevel::Error.code(), 40);

        assert_eq!(LogLevel::from_code(20), Some(LogLevel::Information));
        assert_eq!(LogLevel::from_code(15), None);
    }

    #[test]
    fn test_audit_entry_constructors() {
        let added = AuditEntry::added("Vehicle", 7, Some("{}".to_string()));
        assert_eq!(added.entity_state, EntityState::Added);
        assert!(added.old_values.is_none());

        let deleted = AuditEntry::deleted("ParkingSpot", 3);
        assert_eq!(deleted.entity_state, EntityState::Deleted);
        assert!(deleted.old_values.is_none());
        assert!(deleted.new_values.is_none());
        assert_eq!(deleted.table_name, "ParkingSpot");
    }
}
