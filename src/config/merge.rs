//! Configuration merging logic
//!
//! Priority: CLI args > inifold.toml > defaults

use crate::store::CaseMode;
use crate::write::{CommentMarker, Separator, WriteOptions};
use crate::Settings;

use super::toml_schema::InifoldToml;

/// CLI options that can override config file settings.
///
/// Uses `Option<T>` to distinguish "not specified" from "explicitly set".
#[derive(Debug, Default)]
pub struct CliSettings {
    pub comment: Option<CommentMarker>,
    pub separator: Option<Separator>,
    pub pre_space: Option<bool>,
    pub post_space: Option<bool>,
    pub header: Option<String>,
    /// If Some(true), fold names to lower case
    pub case_insensitive: Option<bool>,
    pub max_depth: Option<usize>,
}

/// Merge configurations from CLI, TOML, and defaults.
pub fn merge_settings(cli: &CliSettings, toml: Option<&InifoldToml>) -> Settings {
    let defaults = Settings::default();
    let format = toml.map(|t| &t.format);
    let resolve = toml.map(|t| &t.resolve);

    let case_insensitive = cli
        .case_insensitive
        .or_else(|| resolve.and_then(|r| r.case_insensitive))
        .unwrap_or(defaults.case == CaseMode::Insensitive);

    Settings {
        write: WriteOptions {
            comment: cli
                .comment
                .or_else(|| format.and_then(|f| f.comment))
                .unwrap_or(defaults.write.comment),
            separator: cli
                .separator
                .or_else(|| format.and_then(|f| f.separator))
                .unwrap_or(defaults.write.separator),
            pre_space: cli
                .pre_space
                .or_else(|| format.and_then(|f| f.pre_space))
                .unwrap_or(defaults.write.pre_space),
            post_space: cli
                .post_space
                .or_else(|| format.and_then(|f| f.post_space))
                .unwrap_or(defaults.write.post_space),
        },
        header: cli
            .header
            .clone()
            .or_else(|| format.and_then(|f| f.header.clone()))
            .unwrap_or(defaults.header),
        case: if case_insensitive {
            CaseMode::Insensitive
        } else {
            CaseMode::Sensitive
        },
        max_depth: cli
            .max_depth
            .or_else(|| resolve.and_then(|r| r.max_depth))
            .unwrap_or(defaults.max_depth),
    }
}
