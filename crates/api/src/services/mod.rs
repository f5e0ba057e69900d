//! Application services.

pub mod flag_cache;
pub mod flags;

pub use flag_cache::FlagCache;
pub use flags::FlagService;
