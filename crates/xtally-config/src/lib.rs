//! Configuration loading and CLI definitions.
//!
//! A config file is optional: every section has defaults, and the most
//! common settings can also come from flags or environment variables
//! (see [`CliOverrides`]).

mod cli;
mod defaults;
mod loader;
mod types;
mod validate;

pub use cli::{CliOverrides, apply_overrides};
pub use loader::{ConfigError, ConfigFormat, load_config, load_or_default, parse_config};
pub use types::*;
pub use validate::validate_config;

#[cfg(test)]
mod tests;
