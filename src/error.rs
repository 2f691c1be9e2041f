//! Error types for the validation and tally pipeline.
//!
//! Three kinds of failure exist and each is handled at a different level:
//!
//! | Type | Raised by | Handling |
//! |------|-----------|----------|
//! | [`ShapeError`] | the line validator | line is skipped with a warning |
//! | [`ContractError`] | decode / split / ingest misuse | fatal to the call |
//! | [`SourceError`] | opening or reading an input file | ends that source only |

use std::path::PathBuf;

use thiserror::Error;

/// Why the validator rejected a line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// The tokenizer failed: bad syntax, truncated input, trailing data,
    /// or a top-level value that is not an object.
    #[error("malformed JSON: {0}")]
    Malformed(String),

    #[error("duplicate key `{0}`")]
    DuplicateKey(String),

    #[error("unknown key `{0}`")]
    UnknownKey(String),

    /// A number appeared under a key that expects a string.
    #[error("key `{key}` does not take a number")]
    UnexpectedNumber { key: String },

    /// A number key carried a fractional or out-of-range literal.
    #[error("key `{key}` needs a whole 64-bit number, got `{literal}`")]
    NotWholeNumber { key: String, literal: String },

    #[error("disposition must be 1, 2 or 3, got `{0}`")]
    InvalidDisposition(String),

    /// A string appeared under a key that expects a number.
    #[error("key `{key}` does not take a string")]
    UnexpectedString { key: String },

    #[error("key `{key}` needs a UUID, got `{value}`")]
    InvalidUuid { key: String, value: String },

    #[error("invalid file name `{0}`")]
    InvalidFileName(String),

    /// A string value whose escapes do not decode, e.g. a lone surrogate.
    #[error("key `{key}` has a string with an invalid escape")]
    BadEscape { key: String },

    #[error("key `{key}` has a blank value")]
    BlankValue { key: String },

    /// Null, boolean, array or nested object in value position.
    #[error("unexpected {token} for key `{key}`")]
    UnexpectedToken { key: String, token: &'static str },

    #[error("missing keys: {}", .0.join(", "))]
    MissingKeys(Vec<&'static str>),
}

/// A core operation was called on input it does not accept.
#[derive(Error, Debug)]
pub enum ContractError {
    #[error("invalid file name `{0}`: expected `<head>.<tail>`")]
    InvalidFileName(String),

    /// [`decode_line`](crate::decode::decode_line) was given a line the
    /// validator would reject.
    #[error("line cannot be decoded into a file record: {0}")]
    Undecodable(#[from] serde_json::Error),

    #[error("timestamp {0} is outside the representable calendar range")]
    TimestampOutOfRange(i64),
}

/// An input source could not be opened or read.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("unable to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to read {label} at line {line}: {source}")]
    Read {
        label: String,
        line: u64,
        #[source]
        source: std::io::Error,
    },
}

/// Why the driver skipped a line.
#[derive(Error, Debug)]
pub enum LineError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Contract(#[from] ContractError),
}
