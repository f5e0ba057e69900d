//! Audit log persistence operations.
//!
//! The audit trail is append-only: no update or delete operation exists.

use domain::models::AuditAction;
use sqlx::PgConnection;

/// Appends an audit entry for a flag mutation.
///
/// Runs on the caller's connection so flag write and audit append commit in
/// the same transaction.
pub async fn append(
    conn: &mut PgConnection,
    action: AuditAction,
    entity_id: i64,
    details: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (action, entity, entity_id, details)
        VALUES ($1, 'flag', $2, $3)
        "#,
    )
    .bind(action.as_str())
    .bind(entity_id)
    .bind(details)
    .execute(conn)
    .await?;

    Ok(())
}
