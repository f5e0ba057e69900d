//! Flag repository for database operations.
//!
//! Every mutation writes the flag row and its audit entry in one
//! transaction, so no flag change is ever visible without its audit record.

use domain::models::AuditAction;
use sqlx::PgPool;
use tracing::debug;

use crate::entities::FlagEntity;
use crate::repositories::audit_log;

const FLAG_COLUMNS: &str =
    "id, name, key, enabled, rollout_percentage, target_user_ids, created_at, updated_at";

/// Repository for flag CRUD operations.
#[derive(Clone)]
pub struct FlagRepository {
    pool: PgPool,
}

impl FlagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists all flags, ordered by id (store default order).
    pub async fn list(&self) -> Result<Vec<FlagEntity>, sqlx::Error> {
        sqlx::query_as::<_, FlagEntity>(&format!(
            r#"
            SELECT {FLAG_COLUMNS}
            FROM flags
            ORDER BY id
            "#,
        ))
        .fetch_all(&self.pool)
        .await
    }

    /// Finds a flag by its numeric id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<FlagEntity>, sqlx::Error> {
        sqlx::query_as::<_, FlagEntity>(&format!(
            r#"
            SELECT {FLAG_COLUMNS}
            FROM flags
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Finds a flag by its evaluation key.
    pub async fn find_by_key(&self, key: &str) -> Result<Option<FlagEntity>, sqlx::Error> {
        sqlx::query_as::<_, FlagEntity>(&format!(
            r#"
            SELECT {FLAG_COLUMNS}
            FROM flags
            WHERE key = $1
            "#,
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await
    }

    /// Inserts a new flag and its `create` audit entry.
    ///
    /// The unique index on `key` rejects a second flag with the same derived
    /// key; the violation surfaces as a database error (code 23505).
    pub async fn create(
        &self,
        name: &str,
        key: &str,
        enabled: bool,
        rollout_percentage: i32,
        target_user_ids: Option<&str>,
    ) -> Result<FlagEntity, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let entity = sqlx::query_as::<_, FlagEntity>(&format!(
            r#"
            INSERT INTO flags (name, key, enabled, rollout_percentage, target_user_ids)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {FLAG_COLUMNS}
            "#,
        ))
        .bind(name)
        .bind(key)
        .bind(enabled)
        .bind(rollout_percentage)
        .bind(target_user_ids)
        .fetch_one(&mut *tx)
        .await?;

        audit_log::append(
            &mut tx,
            AuditAction::Create,
            entity.id,
            &format!("Created flag {}", entity.key),
        )
        .await?;

        tx.commit().await?;
        debug!(flag_id = entity.id, key = %entity.key, "Flag row inserted");

        Ok(entity)
    }

    /// Applies a partial update and appends the `update` audit entry.
    ///
    /// Absent fields keep their prior value; `key` is never touched.
    /// Returns `None` when no flag has the given id.
    pub async fn update(
        &self,
        id: i64,
        name: Option<&str>,
        rollout_percentage: Option<i32>,
        enabled: Option<bool>,
        target_user_ids: Option<&str>,
    ) -> Result<Option<FlagEntity>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let entity = sqlx::query_as::<_, FlagEntity>(&format!(
            r#"
            UPDATE flags
            SET
                name = COALESCE($2, name),
                rollout_percentage = COALESCE($3, rollout_percentage),
                enabled = COALESCE($4, enabled),
                target_user_ids = COALESCE($5, target_user_ids),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {FLAG_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(name)
        .bind(rollout_percentage)
        .bind(enabled)
        .bind(target_user_ids)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(entity) = entity else {
            return Ok(None);
        };

        audit_log::append(
            &mut tx,
            AuditAction::Update,
            entity.id,
            &format!("Updated flag {}", entity.key),
        )
        .await?;

        tx.commit().await?;

        Ok(Some(entity))
    }

    /// Flips the enabled bit and appends the `toggle` audit entry.
    ///
    /// Returns `None` when no flag has the given id.
    pub async fn toggle(&self, id: i64) -> Result<Option<FlagEntity>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let entity = sqlx::query_as::<_, FlagEntity>(&format!(
            r#"
            UPDATE flags
            SET enabled = NOT enabled, updated_at = NOW()
            WHERE id = $1
            RETURNING {FLAG_COLUMNS}
            "#,
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(entity) = entity else {
            return Ok(None);
        };

        audit_log::append(
            &mut tx,
            AuditAction::Toggle,
            entity.id,
            &format!("Toggled flag {} to {}", entity.key, entity.enabled),
        )
        .await?;

        tx.commit().await?;

        Ok(Some(entity))
    }
}
