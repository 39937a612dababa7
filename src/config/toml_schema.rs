//! TOML schema definitions for inifold.toml

use serde::{Deserialize, Serialize};

use crate::write::{CommentMarker, Separator};

/// Root structure for inifold.toml
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct InifoldToml {
    /// Output punctuation for rewritten files
    #[serde(default)]
    pub format: FormatSection,

    /// Name matching and unfolding limits
    #[serde(default)]
    pub resolve: ResolveSection,
}

/// `[format]` section in inifold.toml
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatSection {
    /// Header comment marker, `"#"` or `";"` (default: `"#"`)
    pub comment: Option<CommentMarker>,

    /// Option separator, `":"` or `"="` (default: `":"`)
    pub separator: Option<Separator>,

    /// Space before the separator (default: false)
    pub pre_space: Option<bool>,

    /// Space after the separator (default: true)
    pub post_space: Option<bool>,

    /// Header comment written at the top of every rewritten file
    pub header: Option<String>,
}

/// `[resolve]` section in inifold.toml
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolveSection {
    /// Lower-case section and option names (default: false)
    pub case_insensitive: Option<bool>,

    /// Maximum unfolding passes per value (default: 200)
    pub max_depth: Option<usize>,
}
