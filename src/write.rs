//! Canonical INI output.

use std::fmt::Write as _;
use std::io;

use serde::{Deserialize, Serialize};

use crate::parse::parse_str;
use crate::store::Store;

/// Marker written in front of header comment lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentMarker {
    /// `# `
    #[default]
    #[serde(rename = "#")]
    Hash,
    /// `; `
    #[serde(rename = ";")]
    Semicolon,
}

impl CommentMarker {
    pub fn as_str(self) -> &'static str {
        match self {
            CommentMarker::Hash => "# ",
            CommentMarker::Semicolon => "; ",
        }
    }
}

/// Character between an option name and its value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Separator {
    #[default]
    #[serde(rename = ":")]
    Colon,
    #[serde(rename = "=")]
    Equals,
}

impl Separator {
    pub fn as_char(self) -> char {
        match self {
            Separator::Colon => ':',
            Separator::Equals => '=',
        }
    }
}

/// Punctuation used by [`serialize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub comment: CommentMarker,
    pub separator: Separator,
    /// Space before the separator
    pub pre_space: bool,
    /// Space after the separator
    pub post_space: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            comment: CommentMarker::Hash,
            separator: Separator::Colon,
            pre_space: false,
            post_space: true,
        }
    }
}

impl WriteOptions {
    /// The separator with its surrounding spaces, e.g. `" = "`.
    pub fn separator_str(&self) -> String {
        let mut sep = String::new();
        if self.pre_space {
            sep.push(' ');
        }
        sep.push(self.separator.as_char());
        if self.post_space {
            sep.push(' ');
        }
        sep
    }
}

/// Render `store` as INI text.
///
/// A non-empty `header` is written first as comment lines. The default
/// section is skipped when it holds no options. Continuation lines of
/// multi-line values are indented with a tab.
pub fn serialize(store: &Store, header: &str, options: &WriteOptions) -> String {
    let sep = options.separator_str();
    let mut blocks: Vec<String> = vec![];

    if !header.is_empty() {
        let mut block = String::new();
        for text in header.lines() {
            let line = format!("{}{text}", options.comment.as_str());
            let _ = writeln!(block, "{}", line.trim_end());
        }
        blocks.push(block);
    }

    for section in store.sections() {
        if section == store.default_section() && store.option_count(&section) == 0 {
            continue;
        }

        let mut block = format!("[{section}]\n");
        // Names come from `sections()`, so both lookups succeed.
        for option in store.own_options(&section).unwrap_or_default() {
            let value = store.raw_string(&section, &option).unwrap_or_default();
            let mut lines = value.split('\n');
            let first = format!("{option}{sep}{}", lines.next().unwrap_or_default());
            let _ = writeln!(block, "{}", first.trim_end_matches(' '));
            for more in lines {
                let _ = writeln!(block, "\t{more}");
            }
        }
        blocks.push(block);
    }

    blocks.join("\n")
}

/// A section or option that does not read back from serialized text as
/// stored, e.g. an option line that looks like a `[section]` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unwritable {
    pub section: String,
    /// `None` when the section itself is lost
    pub option: Option<String>,
}

/// Compare `store` with `text` parsed back under the same case policy.
///
/// `text` is normally [`serialize`] output for `store`. Returns every
/// section missing from the re-read store and every option whose value
/// differs or is gone. Text that fails to parse loses everything.
pub fn unwritable(store: &Store, text: &str) -> Vec<Unwritable> {
    let case = store.case_mode();
    let reparsed = parse_str(text, case).unwrap_or_else(|_| Store::new(case));
    let mut lost = vec![];

    for section in store.sections() {
        if !reparsed.has_section(&section) {
            lost.push(Unwritable {
                section: section.clone(),
                option: None,
            });
        }
        for option in store.own_options(&section).unwrap_or_default() {
            if reparsed.raw_string(&section, &option).ok()
                != store.raw_string(&section, &option).ok()
            {
                lost.push(Unwritable {
                    section: section.clone(),
                    option: Some(option),
                });
            }
        }
    }

    lost
}

impl Store {
    /// Write [`serialize`] output to `writer`.
    pub fn write_to<W: io::Write>(
        &self,
        mut writer: W,
        header: &str,
        options: &WriteOptions,
    ) -> io::Result<()> {
        writer.write_all(serialize(self, header, options).as_bytes())?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CaseMode, DEFAULT_SECTION};

    fn sample() -> Store {
        let mut store = Store::default();
        store.add_option("First-Section", "option1", "value option1");
        store.add_option("First-Section", "option2", "2");
        store.add_option(DEFAULT_SECTION, "host", "www.example.com");
        store.add_option("Another-Section", "useHTTPS", "y");
        store
    }

    #[test]
    fn test_default_format() {
        let text = serialize(&sample(), "", &WriteOptions::default());
        assert_eq!(
            text,
            "[DEFAULT]\nhost: www.example.com\n\n[First-Section]\noption1: value option1\noption2: 2\n\n[Another-Section]\nuseHTTPS: y\n"
        );
    }

    #[test]
    fn test_skips_empty_default_section() {
        let mut store = Store::default();
        store.add_option("s", "k", "v");
        assert_eq!(serialize(&store, "", &WriteOptions::default()), "[s]\nk: v\n");
    }

    #[test]
    fn test_empty_store() {
        assert_eq!(serialize(&Store::default(), "", &WriteOptions::default()), "");
    }

    #[test]
    fn test_empty_section_still_written() {
        let mut store = Store::default();
        store.add_section("empty");
        assert_eq!(serialize(&store, "", &WriteOptions::default()), "[empty]\n");
    }

    #[test]
    fn test_header_lines_are_commented() {
        let mut store = Store::default();
        store.add_option("s", "k", "v");
        let options = WriteOptions {
            comment: CommentMarker::Semicolon,
            ..Default::default()
        };
        let text = serialize(&store, "Generated file\n\nDo not edit", &options);
        assert_eq!(text, "; Generated file\n;\n; Do not edit\n\n[s]\nk: v\n");
    }

    #[test]
    fn test_separator_spacing() {
        let mut store = Store::default();
        store.add_option("s", "k", "v");

        let cases = [
            (Separator::Equals, true, true, "k = v"),
            (Separator::Equals, false, false, "k=v"),
            (Separator::Colon, true, false, "k :v"),
            (Separator::Colon, false, true, "k: v"),
        ];
        for (separator, pre_space, post_space, expected) in cases {
            let options = WriteOptions {
                separator,
                pre_space,
                post_space,
                ..Default::default()
            };
            assert_eq!(serialize(&store, "", &options), format!("[s]\n{expected}\n"));
        }
    }

    #[test]
    fn test_empty_value_has_no_trailing_space() {
        let mut store = Store::default();
        store.add_option("s", "k", "");
        assert_eq!(serialize(&store, "", &WriteOptions::default()), "[s]\nk:\n");
    }

    #[test]
    fn test_multiline_value_indented() {
        let mut store = Store::default();
        store.add_option("s", "opt", "line1\nline2");
        assert_eq!(
            serialize(&store, "", &WriteOptions::default()),
            "[s]\nopt: line1\n\tline2\n"
        );
    }

    #[test]
    fn test_write_to() {
        let mut buf = Vec::new();
        sample()
            .write_to(&mut buf, "hdr", &WriteOptions::default())
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("# hdr\n\n[DEFAULT]\n"));
    }

    // ===========================================
    // Round trip
    // ===========================================

    #[test]
    fn test_round_trip_sample() {
        let store = sample();
        for options in [
            WriteOptions::default(),
            WriteOptions {
                separator: Separator::Equals,
                pre_space: true,
                ..Default::default()
            },
        ] {
            let text = serialize(&store, "Test file", &options);
            let back = parse_str(&text, CaseMode::Sensitive).unwrap();
            assert_eq!(back, store);
        }
    }

    #[test]
    fn test_round_trip_parsed_document() {
        let text = concat!(
            "; leading comment\n",
            "[net]\n",
            "url = http://%(host)s:8080/x ; inline\n",
            "multi = first\n",
            "  second\n",
            "  :third\n",
            "empty =\n",
            "[DEFAULT]\n",
            "host: example.org\n",
        );
        let parsed = parse_str(text, CaseMode::Sensitive).unwrap();
        let written = serialize(&parsed, "", &WriteOptions::default());
        let reparsed = parse_str(&written, CaseMode::Sensitive).unwrap();

        assert_eq!(reparsed, parsed);
        assert_eq!(
            reparsed.string("net", "url").unwrap(),
            "http://example.org:8080/x"
        );
        assert_eq!(reparsed.raw_string("net", "multi").unwrap(), "first\nsecond\n:third");
    }

    #[test]
    fn test_empty_first_line_has_no_trailing_space() {
        let mut store = Store::default();
        store.add_option("s", "k", "\nmore");
        assert_eq!(
            serialize(&store, "", &WriteOptions::default()),
            "[s]\nk:\n\tmore\n"
        );
    }

    // ===========================================
    // Round trip of parser edge cases
    // ===========================================

    const ROUND_TRIP_INPUTS: &[&str] = &[
        "[s]\n[k = v\n",
        "[s]\nk = [x]\n",
        "[s]\nk] = v\n",
        "[s]\nk = v]\n",
        "[s]\nk = =x\n",
        "[s]\nk = a\n:x\n=y\n",
        "[s]\nk = a\n  [b\n  c]\n",
        "[s]\nk =\n  more\n",
        "[s]\nk = ; only a comment\n  next\n",
        "[s]\nurl = http://h:80/x\ntime: a=b\n",
        "[]\nshared = 1\n[s]\nk = %(shared)s\n",
        "[Default]\nx = 1\n[DEFAULT]\ny = 2\n",
        "[ spaced ]\nk = v\n[empty]\n",
        "[a]]\nk = v\n",
    ];

    #[test]
    fn test_round_trip_edge_inputs() {
        let formats = [
            WriteOptions::default(),
            WriteOptions {
                separator: Separator::Equals,
                pre_space: true,
                ..Default::default()
            },
            WriteOptions {
                separator: Separator::Equals,
                post_space: false,
                ..Default::default()
            },
        ];

        for case in [CaseMode::Sensitive, CaseMode::Insensitive] {
            for input in ROUND_TRIP_INPUTS {
                let parsed = parse_str(input, case).unwrap();
                for options in &formats {
                    let written = serialize(&parsed, "header", options);
                    let reparsed = parse_str(&written, case).unwrap();
                    assert_eq!(reparsed, parsed, "{case:?} {input:?} -> {written:?}");
                    assert!(unwritable(&parsed, &written).is_empty(), "{input:?}");
                }
            }
        }
    }

    #[test]
    fn test_option_line_shaped_like_header_is_unwritable() {
        for case in [CaseMode::Sensitive, CaseMode::Insensitive] {
            let parsed = parse_str("[s]\n[a = x] ;c\n", case).unwrap();
            assert_eq!(parsed.raw_string("s", "[a").unwrap(), "x]");

            let written = serialize(&parsed, "", &WriteOptions::default());
            assert_eq!(written, "[s]\n[a: x]\n");
            assert_ne!(parse_str(&written, case).unwrap(), parsed);
            assert_eq!(
                unwritable(&parsed, &written),
                vec![Unwritable {
                    section: "s".into(),
                    option: Some("[a".into()),
                }]
            );
        }
    }

    #[test]
    fn test_continuation_shaped_like_header_is_unwritable() {
        for case in [CaseMode::Sensitive, CaseMode::Insensitive] {
            let parsed = parse_str("[s]\nservers = a\n  [b] ;note\n", case).unwrap();
            assert_eq!(parsed.raw_string("s", "servers").unwrap(), "a\n[b]");

            let written = serialize(&parsed, "", &WriteOptions::default());
            assert_ne!(parse_str(&written, case).unwrap(), parsed);
            assert_eq!(
                unwritable(&parsed, &written),
                vec![Unwritable {
                    section: "s".into(),
                    option: Some("servers".into()),
                }]
            );
        }
    }

    #[test]
    fn test_unwritable_names_from_edits() {
        let mut store = Store::default();
        store.add_option("s", "remote", "x");
        store.add_option("s", "k", " padded");
        store.add_option(" t", "k", "v");
        let written = serialize(&store, "", &WriteOptions::default());

        let lost = unwritable(&store, &written);
        assert!(lost.contains(&Unwritable {
            section: "s".into(),
            option: Some("remote".into()),
        }));
        assert!(lost.contains(&Unwritable {
            section: "s".into(),
            option: Some("k".into()),
        }));
        assert!(lost.contains(&Unwritable {
            section: " t".into(),
            option: None,
        }));
    }

    #[test]
    fn test_unwritable_when_text_does_not_parse() {
        let mut store = Store::default();
        store.add_option("s", "k", "v");
        assert_eq!(
            unwritable(&store, "junk\n"),
            vec![
                Unwritable {
                    section: "s".into(),
                    option: None,
                },
                Unwritable {
                    section: "s".into(),
                    option: Some("k".into()),
                },
            ]
        );
    }
}
