//! Domain model definitions.

pub mod audit_log;
pub mod evaluation;
pub mod flag;

pub use audit_log::{AuditAction, AuditLog};
pub use evaluation::{EvaluationReason, EvaluationResult};
pub use flag::{CreateFlagRequest, Flag, FlagResponse, ListFlagsResponse, UpdateFlagRequest};
