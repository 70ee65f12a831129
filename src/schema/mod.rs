//! Schema module - Rule tables and configuration types.

mod config;
mod presets;
mod rule;

pub use config::*;
pub use presets::*;
pub use rule::*;
