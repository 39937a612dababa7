//! Line-oriented INI parser.
//!
//! Grammar, per trimmed line:
//! - blank lines are skipped
//! - `#`, `;` or a case-insensitive `rem` prefix start a full-line comment
//! - `[name]` opens a section (`[]` selects the default section)
//! - `name = value` or `name: value` defines an option; the first `=` or `:`
//!   splits the line
//! - any other line continues the previous option's value on a new line
//!
//! Inline comments start at a space or tab directly followed by `#` or `;`.

use std::io::BufRead;
use std::str::FromStr;

use crate::error::{Error, Malformed, Result};
use crate::store::{CaseMode, Store};

/// Parse `text` into a new store using the given case policy.
pub fn parse_str(text: &str, case: CaseMode) -> Result<Store> {
    let mut store = Store::new(case);
    store.read_from(text.as_bytes())?;
    Ok(store)
}

impl Store {
    /// Read INI lines from `reader` into this store.
    ///
    /// Stops at the first malformed line; options read before it stay in the
    /// store.
    pub fn read_from<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let mut section: Option<String> = None;
        let mut option: Option<String> = None;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            let line_no = idx + 1;

            if line.is_empty() || is_comment(line) {
                continue;
            }

            if let Some(name) = section_header(line) {
                self.add_section(name);
                section = Some(name.to_string());
                option = None;
                continue;
            }

            let Some(current) = section.as_deref() else {
                return Err(Error::MalformedInput {
                    line: line_no,
                    cause: Malformed::NoSection,
                });
            };

            match line.find(['=', ':']) {
                Some(pos) if pos > 0 => {
                    let name = line[..pos].trim();
                    let value = strip_comment(&line[pos + 1..]).trim();
                    self.add_option(current, name, value);
                    option = Some(name.to_string());
                }
                _ => {
                    let Some(prev_name) = option.as_deref() else {
                        return Err(Error::MalformedInput {
                            line: line_no,
                            cause: Malformed::Unparsable(line.to_string()),
                        });
                    };
                    let prev = self.raw_string(current, prev_name)?;
                    let more = strip_comment(line).trim();
                    self.add_option(current, prev_name, &format!("{prev}\n{more}"));
                }
            }
        }

        Ok(())
    }
}

impl FromStr for Store {
    type Err = Error;

    /// Parse with case-sensitive names.
    fn from_str(s: &str) -> Result<Self> {
        parse_str(s, CaseMode::Sensitive)
    }
}

pub(crate) fn is_comment(line: &str) -> bool {
    line.starts_with('#')
        || line.starts_with(';')
        || line.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("rem"))
}

pub(crate) fn section_header(line: &str) -> Option<&str> {
    line.strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
}

/// Cut `text` at the first space or tab followed by `#` or `;`.
fn strip_comment(text: &str) -> &str {
    let bytes = text.as_bytes();
    let cut = bytes
        .windows(2)
        .position(|w| matches!(w[0], b' ' | b'\t') && matches!(w[1], b'#' | b';'));
    match cut {
        Some(i) => &text[..i],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DEFAULT_SECTION;

    // ===========================================
    // Comments and blank lines
    // ===========================================

    #[test]
    fn test_empty_input() {
        let store: Store = "".parse().unwrap();
        assert_eq!(store.sections(), vec![DEFAULT_SECTION]);
        assert!(store.is_empty());
    }

    #[test]
    fn test_full_line_comments_ignored() {
        let text = "# hash\n; semi\nREM windows\nrem lower\n  # indented\n[s]\na=1\n";
        let store: Store = text.parse().unwrap();
        assert_eq!(store.own_options("s").unwrap(), vec!["a"]);
    }

    #[test]
    fn test_rem_prefix_swallows_option_names() {
        // Any line beginning with "rem" is a comment, even an option line.
        let store: Store = "[s]\nremote = host\nport = 22\n".parse().unwrap();
        assert!(!store.has_option("s", "remote"));
        assert!(store.has_option("s", "port"));
    }

    #[test]
    fn test_inline_comments() {
        let text = "[section-1]\n  option1=value1 ; This is a comment\n option2 : 2#Not a comment\t#Now this is a comment after a TAB\n";
        let store: Store = text.parse().unwrap();
        assert_eq!(store.raw_string("section-1", "option1").unwrap(), "value1");
        assert_eq!(
            store.raw_string("section-1", "option2").unwrap(),
            "2#Not a comment"
        );
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("a ;b"), "a");
        assert_eq!(strip_comment("a\t#b ;c"), "a");
        assert_eq!(strip_comment("a#b;c"), "a#b;c");
        assert_eq!(strip_comment(" #all"), "");
    }

    // ===========================================
    // Sections and options
    // ===========================================

    #[test]
    fn test_section_header_trimmed() {
        let store: Store = "[  spaced name  ]\nk=v\n".parse().unwrap();
        assert!(store.has_section("spaced name"));
    }

    #[test]
    fn test_reopened_section_keeps_options() {
        let store: Store = "[a]\nx=1\n[b]\ny=2\n[a]\nz=3\n".parse().unwrap();
        assert_eq!(store.sections(), vec![DEFAULT_SECTION, "a", "b"]);
        assert_eq!(store.own_options("a").unwrap(), vec!["x", "z"]);
    }

    #[test]
    fn test_first_separator_wins() {
        let store: Store = "[s]\nurl = http://host:80\ntime: a=b\n".parse().unwrap();
        assert_eq!(store.raw_string("s", "url").unwrap(), "http://host:80");
        assert_eq!(store.raw_string("s", "time").unwrap(), "a=b");
    }

    #[test]
    fn test_empty_value() {
        let store: Store = "[s]\nempty =\nalso:   ; nothing\n".parse().unwrap();
        assert_eq!(store.raw_string("s", "empty").unwrap(), "");
        assert_eq!(store.raw_string("s", "also").unwrap(), "");
    }

    #[test]
    fn test_duplicate_option_last_wins() {
        let store: Store = "[s]\nk=1\nk=2\n".parse().unwrap();
        assert_eq!(store.raw_string("s", "k").unwrap(), "2");
    }

    #[test]
    fn test_empty_header_selects_default() {
        let store: Store = "[]\nshared = yes\n[s]\n".parse().unwrap();
        assert!(store.has_option("s", "shared"));
        assert_eq!(store.own_options(DEFAULT_SECTION).unwrap(), vec!["shared"]);
    }

    #[test]
    fn test_crlf_input() {
        let store: Store = "[s]\r\nk = v\r\n".parse().unwrap();
        assert_eq!(store.raw_string("s", "k").unwrap(), "v");
    }

    // ===========================================
    // Multi-line values
    // ===========================================

    #[test]
    fn test_multiline_value() {
        let store: Store = "[s]\nopt= line1\nline2\n\tline3 # c\n".parse().unwrap();
        assert_eq!(store.raw_string("s", "opt").unwrap(), "line1\nline2\nline3");
    }

    #[test]
    fn test_continuation_with_leading_separator() {
        let store: Store = "[s]\nopt = a\n:b\n=c\n".parse().unwrap();
        assert_eq!(store.raw_string("s", "opt").unwrap(), "a\n:b\n=c");
    }

    #[test]
    fn test_blank_lines_inside_multiline_are_dropped() {
        let store: Store = "[s]\nopt = a\n\nb\n".parse().unwrap();
        assert_eq!(store.raw_string("s", "opt").unwrap(), "a\nb");
    }

    // ===========================================
    // Errors
    // ===========================================

    #[test]
    fn test_option_before_section() {
        let err = "a = 1\n".parse::<Store>().unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedInput {
                line: 1,
                cause: Malformed::NoSection
            }
        ));
    }

    #[test]
    fn test_orphan_line_after_header() {
        let err = "# top\n[s]\norphan\n".parse::<Store>().unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedInput { line: 3, cause: Malformed::Unparsable(text) } if text == "orphan"
        ));
    }

    #[test]
    fn test_orphan_line_with_leading_separator() {
        let err = "[s]\n=value\n".parse::<Store>().unwrap_err();
        assert!(matches!(err, Error::MalformedInput { line: 2, .. }));
    }

    #[test]
    fn test_read_from_extends_existing_store() {
        let mut store = Store::default();
        store.add_option("s", "a", "1");
        store.read_from("[s]\nb = 2\n".as_bytes()).unwrap();
        assert_eq!(store.own_options("s").unwrap(), vec!["a", "b"]);
    }

    // ===========================================
    // Whole documents
    // ===========================================

    #[test]
    fn test_tough_document() {
        let text = concat!(
            "[section-1]\n",
            "  option1=value1 ; This is a comment\n",
            " option2 : 2#Not a comment\t#Now this is a comment after a TAB\n",
            "  # Let me put another comment\n",
            "    option3= line1\nline2 \n\tline3 # Comment\n",
            "; Another comment\n",
            "[DEFAULT]\n",
            "variable1=small\n",
            "variable2=a_part_of_a_%(variable1)s_test\n",
            "[secTION-2]\n",
            "IS-flag-TRUE=Yes\n",
            "[section-1]\n",
            "option4=this_is_%(variable2)s.\n",
        );
        let store: Store = text.parse().unwrap();

        assert_eq!(store.sections().len(), 3);
        assert_eq!(store.options("section-1").unwrap().len(), 6);
        assert_eq!(store.string("section-1", "option1").unwrap(), "value1");
        assert_eq!(store.string("section-1", "option2").unwrap(), "2#Not a comment");
        assert_eq!(
            store.string("section-1", "option3").unwrap(),
            "line1\nline2\nline3"
        );
        assert_eq!(
            store.string("section-1", "option4").unwrap(),
            "this_is_a_part_of_a_small_test."
        );
        assert!(store.bool("secTION-2", "IS-flag-TRUE").unwrap());
        assert!(!store.has_section("section-2"));
    }

    #[test]
    fn test_tough_document_case_insensitive() {
        let text = "[secTION-2]\nIS-flag-TRUE=Yes\n[Default]\nX = 1\n";
        let store = parse_str(text, CaseMode::Insensitive).unwrap();
        assert!(store.bool("section-2", "is-flag-true").unwrap());
        assert!(store.has_option("SECTION-2", "x"));
        assert_eq!(store.sections(), vec!["default", "section-2"]);
    }

    #[test]
    fn test_end_to_end_interpolation() {
        let store: Store = "[S]\na=1\nb=%(a)s-2\n".parse().unwrap();
        assert_eq!(store.string("S", "b").unwrap(), "1-2");
    }
}
