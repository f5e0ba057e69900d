//! Repository implementations for database operations.

pub mod audit_log;
pub mod flag;

pub use flag::FlagRepository;
