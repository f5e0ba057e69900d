//! Domain services (pure business logic).

pub mod evaluation;
