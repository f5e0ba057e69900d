//! Domain layer for the feature flag service.
//!
//! This crate contains:
//! - Domain models (Flag, AuditLog, EvaluationResult)
//! - The pure evaluation policy (slug derivation, rollout hashing, targeting)

pub mod models;
pub mod services;
