//! Layered run configuration: built-in defaults, then an optional TOML file, then
//! `-S key=value` overrides, then dedicated command-line flags.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;
