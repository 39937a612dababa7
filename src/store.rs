//! Section → option → value store with a distinguished default section.
//!
//! Sections and options keep their insertion order. Overwriting an option
//! keeps its slot; removing and re-adding moves it to the end. The default
//! section is created with the store, so it is always listed first.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of the section whose options are inherited by every other section.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Default cap on interpolation passes in [`Store::string`].
pub const MAX_DEPTH: usize = 200;

/// How section and option names are compared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    /// Names are stored and matched exactly as written
    #[default]
    Sensitive,
    /// Names are lower-cased on every access and stored lower-cased
    Insensitive,
}

impl CaseMode {
    pub fn fold(self, name: &str) -> Cow<'_, str> {
        match self {
            CaseMode::Sensitive => Cow::Borrowed(name),
            CaseMode::Insensitive => Cow::Owned(name.to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Section {
    order: Vec<String>,
    values: HashMap<String, String>,
}

impl Section {
    pub(crate) fn get(&self, option: &str) -> Option<&str> {
        self.values.get(option).map(String::as_str)
    }

    fn contains(&self, option: &str) -> bool {
        self.values.contains_key(option)
    }

    /// Returns true when the option was not present before.
    fn insert(&mut self, option: String, value: String) -> bool {
        match self.values.insert(option.clone(), value) {
            Some(_) => false,
            None => {
                self.order.push(option);
                true
            }
        }
    }

    fn remove(&mut self, option: &str) -> bool {
        if self.values.remove(option).is_none() {
            return false;
        }
        self.order.retain(|name| name != option);
        true
    }

    fn names(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

/// In-memory INI document.
///
/// The empty name `""` refers to the default section in every method.
/// Equality compares section and option content only, ignoring order.
#[derive(Debug, Clone)]
pub struct Store {
    order: Vec<String>,
    sections: HashMap<String, Section>,
    default_key: String,
    case: CaseMode,
    max_depth: usize,
}

impl Store {
    pub fn new(case: CaseMode) -> Self {
        let default_key = case.fold(DEFAULT_SECTION).into_owned();
        let mut sections = HashMap::new();
        sections.insert(default_key.clone(), Section::default());

        Self {
            order: vec![default_key.clone()],
            sections,
            default_key,
            case,
            max_depth: MAX_DEPTH,
        }
    }

    /// Override the interpolation pass limit used by [`Store::string`].
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn case_mode(&self) -> CaseMode {
        self.case
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Name under which the default section is stored and listed.
    pub fn default_section(&self) -> &str {
        &self.default_key
    }

    pub(crate) fn key(&self, name: &str) -> String {
        if name.is_empty() {
            self.default_key.clone()
        } else {
            self.case.fold(name).into_owned()
        }
    }

    pub(crate) fn section(&self, key: &str) -> Option<&Section> {
        self.sections.get(key)
    }

    pub(crate) fn default_values(&self) -> &Section {
        // The default section is created in `new` and never removed.
        &self.sections[&self.default_key]
    }

    /// Add a new section.
    ///
    /// Returns false if it already exists, including the default section.
    pub fn add_section(&mut self, name: &str) -> bool {
        let key = self.key(name);
        if self.sections.contains_key(&key) {
            return false;
        }
        self.sections.insert(key.clone(), Section::default());
        self.order.push(key);
        true
    }

    /// Remove a section with all its options. The default section cannot be
    /// removed.
    pub fn remove_section(&mut self, name: &str) -> bool {
        let key = self.key(name);
        if key == self.default_key || self.sections.remove(&key).is_none() {
            return false;
        }
        self.order.retain(|s| *s != key);
        true
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(&self.key(name))
    }

    /// All section names in insertion order, default section first.
    pub fn sections(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Insert or overwrite an option, creating the section if needed.
    ///
    /// Returns true for a fresh insert and false when a value was replaced.
    pub fn add_option(&mut self, section: &str, option: &str, value: &str) -> bool {
        self.add_section(section);
        let key = self.key(section);
        let option = self.case.fold(option).into_owned();
        self.sections
            .get_mut(&key)
            .is_some_and(|s| s.insert(option, value.to_string()))
    }

    pub fn remove_option(&mut self, section: &str, option: &str) -> bool {
        let key = self.key(section);
        let option = self.case.fold(option);
        self.sections
            .get_mut(&key)
            .is_some_and(|s| s.remove(&option))
    }

    /// Whether `option` is visible from `section`, either defined there or
    /// inherited from the default section. False if the section is missing.
    pub fn has_option(&self, section: &str, option: &str) -> bool {
        let Some(own) = self.sections.get(&self.key(section)) else {
            return false;
        };
        let option = self.case.fold(option);
        own.contains(&option) || self.default_values().contains(&option)
    }

    /// Option names visible from `section`: the default section's names
    /// followed by the section's own names not already listed.
    pub fn options(&self, section: &str) -> Result<Vec<String>> {
        let key = self.key(section);
        let own = self
            .sections
            .get(&key)
            .ok_or_else(|| Error::SectionNotFound(section.to_string()))?;

        let mut names: Vec<String> = self.default_values().names().cloned().collect();
        if key != self.default_key {
            for name in own.names() {
                if !self.default_values().contains(name) {
                    names.push(name.clone());
                }
            }
        }
        Ok(names)
    }

    /// Option names defined directly in `section`, without inheritance.
    pub fn own_options(&self, section: &str) -> Result<Vec<String>> {
        self.sections
            .get(&self.key(section))
            .map(|s| s.names().cloned().collect())
            .ok_or_else(|| Error::SectionNotFound(section.to_string()))
    }

    /// Number of options defined directly in `section` (0 if missing).
    pub fn option_count(&self, section: &str) -> usize {
        self.sections
            .get(&self.key(section))
            .map_or(0, Section::len)
    }

    /// True when no section holds any option.
    pub fn is_empty(&self) -> bool {
        self.sections.values().all(|s| s.len() == 0)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(CaseMode::Sensitive)
    }
}

impl PartialEq for Store {
    fn eq(&self, other: &Self) -> bool {
        self.sections == other.sections
    }
}
