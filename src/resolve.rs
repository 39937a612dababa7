//! Value lookup, `%(name)s` unfolding and typed coercion.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result, ValueKind};
use crate::store::Store;

/// `%(name)s` reference; the name may hold letters, digits, `.`, `_` and `-`.
static VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%\(([a-zA-Z0-9_.\-]+)\)s").unwrap());

/// Words accepted as booleans, compared case-insensitively.
const BOOL_WORDS: &[(&str, bool)] = &[
    ("t", true),
    ("true", true),
    ("y", true),
    ("yes", true),
    ("on", true),
    ("1", true),
    ("f", false),
    ("false", false),
    ("n", false),
    ("no", false),
    ("off", false),
    ("0", false),
];

/// Interpret `value` with the fixed boolean vocabulary.
pub fn parse_bool(value: &str) -> Option<bool> {
    let lower = value.to_lowercase();
    BOOL_WORDS
        .iter()
        .find(|(word, _)| *word == lower)
        .map(|&(_, b)| b)
}

impl Store {
    /// Value of `option` exactly as stored in `section`.
    ///
    /// No unfolding and no fallback to the default section.
    pub fn raw_string(&self, section: &str, option: &str) -> Result<String> {
        let own = self
            .section(&self.key(section))
            .ok_or_else(|| Error::SectionNotFound(section.to_string()))?;
        own.get(&self.case_mode().fold(option))
            .map(str::to_string)
            .ok_or_else(|| Error::OptionNotFound(option.to_string()))
    }

    /// Value of `option` with every `%(name)s` reference unfolded.
    ///
    /// Each pass replaces all copies of the first reference found. Names are
    /// looked up in the default section, overridden by `section`. Gives up
    /// with [`Error::CycleOrDepthExceeded`] after [`Store::max_depth`] passes,
    /// which is how self-referencing values are caught.
    pub fn string(&self, section: &str, option: &str) -> Result<String> {
        let mut value = self.raw_string(section, option)?;
        let own = self.section(&self.key(section));

        for _ in 0..self.max_depth() {
            let Some(caps) = VAR_PATTERN.captures(&value) else {
                return Ok(value);
            };
            let token = caps[0].to_string();
            let name = &caps[1];
            let key = self.case_mode().fold(name);

            let replacement = own
                .and_then(|s| s.get(&key))
                .or_else(|| self.default_values().get(&key))
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::OptionNotFound(name.to_string()))?;

            value = value.replace(&token, replacement);
        }

        Err(Error::CycleOrDepthExceeded(self.max_depth()))
    }

    /// [`Store::string`] interpreted as a boolean.
    ///
    /// Accepts `t`, `true`, `y`, `yes`, `on`, `1` and `f`, `false`, `n`, `no`,
    /// `off`, `0`, in any case.
    pub fn bool(&self, section: &str, option: &str) -> Result<bool> {
        let value = self.string(section, option)?;
        parse_bool(&value).ok_or(Error::ParseValue {
            value,
            kind: ValueKind::Bool,
        })
    }

    pub fn int(&self, section: &str, option: &str) -> Result<i64> {
        let value = self.string(section, option)?;
        value.parse().map_err(|_| Error::ParseValue {
            value,
            kind: ValueKind::Int,
        })
    }

    pub fn float(&self, section: &str, option: &str) -> Result<f64> {
        let value = self.string(section, option)?;
        value.parse().map_err(|_| Error::ParseValue {
            value,
            kind: ValueKind::Float,
        })
    }
}
