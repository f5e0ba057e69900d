//! Flag entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::Flag;

/// Database row mapping for the flags table.
#[derive(Debug, Clone, FromRow)]
pub struct FlagEntity {
    pub id: i64,
    pub name: String,
    pub key: String,
    pub enabled: bool,
    pub rollout_percentage: i32,
    pub target_user_ids: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FlagEntity> for Flag {
    fn from(entity: FlagEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            key: entity.key,
            enabled: entity.enabled,
            rollout_percentage: entity.rollout_percentage,
            target_user_ids: entity.target_user_ids,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
