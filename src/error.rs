//! Error type shared by the store, parser, resolver and file helpers

use std::fmt;
use std::io;

/// Target type of a failed value coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Bool => f.write_str("bool"),
            ValueKind::Int => f.write_str("int"),
            ValueKind::Float => f.write_str("float"),
        }
    }
}

/// Why a line was rejected by the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Malformed {
    /// An option line appeared before any `[section]` header
    NoSection,
    /// The line is neither a header, an option, nor a continuation
    Unparsable(String),
}

#[derive(Debug)]
pub enum Error {
    SectionNotFound(String),
    /// Missing option, or an interpolation name that resolves to nothing
    OptionNotFound(String),
    /// Interpolation still had references after this many passes
    CycleOrDepthExceeded(usize),
    ParseValue {
        value: String,
        kind: ValueKind,
    },
    /// Syntax error at a 1-based line number
    MalformedInput {
        line: usize,
        cause: Malformed,
    },
    Io(io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SectionNotFound(name) => write!(f, "section not found: {name}"),
            Error::OptionNotFound(name) => write!(f, "option not found: {name}"),
            Error::CycleOrDepthExceeded(limit) => write!(
                f,
                "possible cycle while unfolding variables: max depth of {limit} reached"
            ),
            Error::ParseValue { value, kind } => {
                write!(f, "could not parse {kind} value: {value}")
            }
            Error::MalformedInput { line, cause } => match cause {
                Malformed::NoSection => {
                    write!(f, "line {line}: no section defined yet")
                }
                Malformed::Unparsable(text) => {
                    write!(f, "line {line}: could not parse line: {text}")
                }
            },
            Error::Io(e) => write!(f, "i/o error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            Error::SectionNotFound("web".into()).to_string(),
            "section not found: web"
        );
        assert_eq!(
            Error::OptionNotFound("host".into()).to_string(),
            "option not found: host"
        );
        assert!(Error::CycleOrDepthExceeded(200)
            .to_string()
            .contains("cycle"));
        assert_eq!(
            Error::ParseValue {
                value: "maybe".into(),
                kind: ValueKind::Bool
            }
            .to_string(),
            "could not parse bool value: maybe"
        );
    }

    #[test]
    fn test_malformed_messages_carry_line_number() {
        let err = Error::MalformedInput {
            line: 3,
            cause: Malformed::NoSection,
        };
        assert_eq!(err.to_string(), "line 3: no section defined yet");

        let err = Error::MalformedInput {
            line: 7,
            cause: Malformed::Unparsable("garbage".into()),
        };
        assert_eq!(err.to_string(), "line 7: could not parse line: garbage");
    }

    #[test]
    fn test_io_source() {
        let err = Error::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(err.source().is_some());
        assert!(Error::OptionNotFound("x".into()).source().is_none());
    }
}
