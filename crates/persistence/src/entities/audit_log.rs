//! Audit log entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{AuditAction, AuditLog};

/// Database row mapping for the audit_logs table.
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogEntity {
    pub id: i64,
    pub action: String,
    pub entity: String,
    pub entity_id: i64,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AuditLogEntity> for AuditLog {
    fn from(entity: AuditLogEntity) -> Self {
        Self {
            id: entity.id,
            // The action column is only ever written from AuditAction::as_str.
            action: AuditAction::parse(&entity.action).unwrap_or(AuditAction::Update),
            entity: entity.entity,
            entity_id: entity.entity_id,
            details: entity.details,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_converts_to_domain_model() {
        let entity = AuditLogEntity {
            id: 1,
            action: "toggle".to_string(),
            entity: "flag".to_string(),
            entity_id: 42,
            details: Some("Toggled flag beta to true".to_string()),
            created_at: Utc::now(),
        };

        let log: AuditLog = entity.into();
        assert_eq!(log.action, AuditAction::Toggle);
        assert_eq!(log.entity_id, 42);
        assert_eq!(log.details.as_deref(), Some("Toggled flag beta to true"));
    }
}
