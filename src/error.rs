//! Library error types.

use std::fmt;

/// A `sexp-core` [`Result`], normally returning a `sexp-core` [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error produced while parsing, decoding, or querying a serialized
/// S-expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Malformed textual input: unterminated list/string, an empty token,
    /// trailing garbage after a complete expression, or a bad escape.
    Input(String),
    /// A configured resource limit was exceeded: nesting depth, symbol
    /// count, list length, or string length.
    Limit(String),
    /// The binary buffer failed to decode: bad version, invalid tag bits,
    /// an unknown SEntry type, or a truncated buffer.
    Corrupted(String),
    /// An operation required one type (usually a list) but found another.
    Type(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Input(msg) => write!(f, "invalid input: {}", msg),
            Error::Limit(msg) => write!(f, "program limit exceeded: {}", msg),
            Error::Corrupted(msg) => write!(f, "data corrupted: {}", msg),
            Error::Type(msg) => write!(f, "type mismatch: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
