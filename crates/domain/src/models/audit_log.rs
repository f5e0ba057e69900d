//! Audit log domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Actions recorded in the audit trail. Append-only; entries are never
/// mutated or deleted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Toggle,
}

impl AuditAction {
    /// Converts to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Toggle => "toggle",
        }
    }

    /// Parses from database string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "create" => Some(AuditAction::Create),
            "update" => Some(AuditAction::Update),
            "toggle" => Some(AuditAction::Toggle),
            _ => None,
        }
    }
}

/// An audit trail entry for a flag mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: i64,
    pub action: AuditAction,
    pub entity: String,
    pub entity_id: i64,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}
