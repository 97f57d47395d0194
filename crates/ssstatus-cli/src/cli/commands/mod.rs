//! CLI command handlers.

pub mod scroll;
pub mod setup;
pub mod status;
