//! HTTP route handlers.

pub mod flags;
pub mod health;
