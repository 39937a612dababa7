//! Configuration file support for inifold.
//!
//! This module provides:
//! - Loading settings from `inifold.toml`
//! - Config file discovery (search upward from current directory)
//! - Merging CLI args, config file, and defaults
//! - Template generation with `inifold init`

mod file;
mod init;
mod merge;
mod toml_schema;

pub use file::{find_config_file, find_file_upward, load_config, ConfigError, CONFIG_FILE_NAME};
pub use init::{generate_init_file, generate_init_file_in, INIFOLD_TOML_TEMPLATE};
pub use merge::{merge_settings, CliSettings};
pub use toml_schema::{FormatSection, InifoldToml, ResolveSection};
