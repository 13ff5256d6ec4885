use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::value::ScalarType;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A malformed line, or a value whose type conflicts with the key's declared type.
    ///
    /// `line` is the 0-based line index and `text` the line with trailing whitespace removed.
    #[error("error in line {line}: {text:?}")]
    Parse { line: usize, text: String },

    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error("key {key:?} is declared as {expected} but its default is {found}")]
    Type {
        key: String,
        expected: ScalarType,
        found: ScalarType,
    },

    #[error("key not found: {key:?}")]
    KeyNotFound { key: String },

    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn parse(line: usize, text: &str) -> Self {
        Self::Parse {
            line,
            text: text.to_owned(),
        }
    }

    pub(crate) fn key_not_found(key: &str) -> Self {
        Self::KeyNotFound {
            key: key.to_owned(),
        }
    }
}

/// Misuse of a [`Document`](crate::Document): each instance reads and parses exactly one source.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("other file is already read: {path:?}")]
    AlreadyRead { path: PathBuf },

    #[error("already parsed")]
    AlreadyParsed,
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn parse_error_message_carries_line_and_text() {
        let error = Error::parse(3, "k = 1 3");

        assert_eq!(error.to_string(), r#"error in line 3: "k = 1 3""#);
    }

    #[test]
    fn usage_error_is_transparent() {
        let error = Error::from(UsageError::AlreadyParsed);

        assert_eq!(error.to_string(), "already parsed");
        assert!(matches!(error, Error::Usage(UsageError::AlreadyParsed)));
    }

    #[test]
    fn io_error_exposes_source() {
        let error = Error::Io {
            path: PathBuf::from("missing.ini"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };

        assert!(error.source().is_some());
    }
}
