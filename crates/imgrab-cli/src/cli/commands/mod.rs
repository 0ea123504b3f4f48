//! CLI command handlers.

mod harvest;

pub use harvest::run_harvest;
