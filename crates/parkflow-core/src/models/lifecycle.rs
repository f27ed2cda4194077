//! Shared lifecycle fields carried by every persisted entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Actor id recorded for mutations the system performs on its own behalf,
/// e.g. closing a vehicle during settlement.
pub const SYSTEM_ACTOR_ID: i64 = 1;

/// Identity, soft-delete state, and audit stamps shared by all entities.
///
/// Embedded (flattened) into each entity rather than inherited; rows are
/// soft-deleted by flag, never physically removed. Current-state queries
/// exclude anything inactive or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lifecycle {
    /// Store-assigned identifier (0 until persisted)
    pub id: i64,

    /// True while the row participates in current state
    pub is_active: bool,

    /// Soft-delete flag; terminal once set
    pub is_deleted: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Actor that created the row
    pub created_by: i64,

    /// Last modification timestamp
    pub updated_at: Option<DateTime<Utc>>,

    /// Actor of the last modification
    pub updated_by: Option<i64>,

    /// Soft-delete timestamp
    pub deleted_at: Option<DateTime<Utc>>,

    /// Actor that performed the soft delete
    pub deleted_by: Option<i64>,
}

impl Lifecycle {
    /// Fresh active row on behalf of the given actor
    pub fn new(actor: i64) -> Self {
        Self {
            id: 0,
            is_active: true,
            is_deleted: false,
            created_at: Utc::now(),
            created_by: actor,
            updated_at: None,
            updated_by: None,
            deleted_at: None,
            deleted_by: None,
        }
    }

    /// True when the row belongs to current state
    pub fn is_current(&self) -> bool {
        self.is_active && !self.is_deleted
    }

    /// Stamp a modification
    pub fn mark_updated(&mut self, actor: i64) {
        self.updated_at = Some(Utc::now());
        self.updated_by = Some(actor);
    }

    /// Soft-delete the row; clears the active flag
    pub fn mark_deleted(&mut self, actor: i64) {
        self.is_active = false;
        self.is_deleted = true;
        self.deleted_at = Some(Utc::now());
        self.deleted_by = Some(actor);
        self.updated_at = Some(Utc::now());
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new(SYSTEM_ACTOR_ID)
    }
}
