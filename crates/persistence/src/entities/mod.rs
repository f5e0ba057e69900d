//! Entity definitions (database row mappings).

pub mod audit_log;
pub mod flag;

pub use audit_log::AuditLogEntity;
pub use flag::FlagEntity;
