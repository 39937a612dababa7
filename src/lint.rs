//! Whole-document checks and canonical rewriting

use crate::error::Error;
use crate::parse::{is_comment, section_header};
use crate::store::{CaseMode, Store, MAX_DEPTH};
use crate::write::{serialize, unwritable, WriteOptions};

/// How documents are read, resolved and written back
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub write: WriteOptions,
    /// Header comment for rewritten files (empty = none)
    pub header: String,
    pub case: CaseMode,
    pub max_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            write: WriteOptions::default(),
            header: String::new(),
            case: CaseMode::Sensitive,
            max_depth: MAX_DEPTH,
        }
    }
}

impl Settings {
    /// Empty store configured with these settings.
    pub fn new_store(&self) -> Store {
        Store::new(self.case).with_max_depth(self.max_depth)
    }

    /// Parse `content` into a store configured with these settings.
    pub fn parse(&self, content: &str) -> crate::Result<Store> {
        let mut store = self.new_store();
        store.read_from(content.as_bytes())?;
        Ok(store)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProblemKind {
    /// The document does not parse
    Malformed { message: String },
    /// A `%(name)s` reference with no non-empty value behind it
    UnresolvedReference {
        section: String,
        option: String,
        name: String,
    },
    /// Unfolding did not finish within the pass limit
    Cycle {
        section: String,
        option: String,
        limit: usize,
    },
    /// The canonical form would read back differently; `option` is `None`
    /// when the section name itself is the problem
    NotRepresentable {
        section: String,
        option: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    /// 1-based line, when the problem is tied to one
    pub line: Option<usize>,
    pub kind: ProblemKind,
}

#[derive(Debug)]
pub struct LintResult {
    pub original: String,
    /// Canonical form; equal to `original` when the document does not parse
    /// or cannot be rewritten without changing its values
    pub content: String,
    pub problems: Vec<Problem>,
}

impl LintResult {
    pub fn has_changes(&self) -> bool {
        self.original != self.content
    }

    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }

    pub fn is_malformed(&self) -> bool {
        self.problems
            .iter()
            .any(|p| matches!(p.kind, ProblemKind::Malformed { .. }))
    }

    /// Whether the file must be left as it is.
    pub fn blocks_rewrite(&self) -> bool {
        self.problems.iter().any(|p| {
            matches!(
                p.kind,
                ProblemKind::Malformed { .. } | ProblemKind::NotRepresentable { .. }
            )
        })
    }
}

/// Parse `content`, unfold every option and render the canonical form.
pub fn lint_content(content: &str, settings: &Settings) -> LintResult {
    let store = match settings.parse(content) {
        Ok(store) => store,
        Err(e) => {
            let line = match &e {
                Error::MalformedInput { line, .. } => Some(*line),
                _ => None,
            };
            return LintResult {
                original: content.to_string(),
                content: content.to_string(),
                problems: vec![Problem {
                    line,
                    kind: ProblemKind::Malformed {
                        message: e.to_string(),
                    },
                }],
            };
        }
    };

    let mut problems = unresolved_options(&store);
    for problem in &mut problems {
        if let ProblemKind::UnresolvedReference {
            section, option, ..
        }
        | ProblemKind::Cycle {
            section, option, ..
        } = &problem.kind
        {
            problem.line = definition_line(content, &store, section, option);
        }
    }

    let mut canonical = serialize(&store, &settings.header, &settings.write);
    let lost = unwritable(&store, &canonical);
    if !lost.is_empty() {
        canonical = content.to_string();
    }
    for item in lost {
        let line = item
            .option
            .as_deref()
            .and_then(|option| definition_line(content, &store, &item.section, option));
        problems.push(Problem {
            line,
            kind: ProblemKind::NotRepresentable {
                section: item.section,
                option: item.option,
            },
        });
    }

    LintResult {
        original: content.to_string(),
        content: canonical,
        problems,
    }
}

/// 1-based line of the last definition of `option` in `section`.
///
/// `section` and `option` are store keys, already case-folded.
fn definition_line(content: &str, store: &Store, section: &str, option: &str) -> Option<usize> {
    let mut current: Option<String> = None;
    let mut found = None;

    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || is_comment(line) {
            continue;
        }
        if let Some(name) = section_header(line) {
            current = Some(store.key(name));
            continue;
        }
        if current.as_deref() != Some(section) {
            continue;
        }
        if let Some(pos) = line.find(['=', ':']).filter(|&pos| pos > 0) {
            if store.case_mode().fold(line[..pos].trim()) == option {
                found = Some(idx + 1);
            }
        }
    }

    found
}

/// Unfold each option in the section that defines it and collect failures.
pub fn unresolved_options(store: &Store) -> Vec<Problem> {
    let mut problems = vec![];

    for section in store.sections() {
        for option in store.own_options(&section).unwrap_or_default() {
            let kind = match store.string(&section, &option) {
                Ok(_) => continue,
                Err(Error::OptionNotFound(name)) => ProblemKind::UnresolvedReference {
                    section: section.clone(),
                    option,
                    name,
                },
                Err(Error::CycleOrDepthExceeded(limit)) => ProblemKind::Cycle {
                    section: section.clone(),
                    option,
                    limit,
                },
                Err(e) => ProblemKind::Malformed {
                    message: e.to_string(),
                },
            };
            problems.push(Problem { line: None, kind });
        }
    }

    problems
}
