//! Layered configuration for the `select` and `validate` commands.
//!
//! Values are resolved in order of precedence: command-line flags, then
//! `-S key=value` settings, then the TOML config file, then built-in
//! defaults.

mod builder;
mod defaults;
mod file;

pub use builder::{CliOverrides, build_config};
