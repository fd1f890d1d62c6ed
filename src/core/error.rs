//! Error types for stream pipelines.
//!
//! Running out of data is not an error: pull operations report exhaustion
//! with `Option::None`. The variants here cover misuse of an operation and
//! failures coming from the tabular boundary.

use std::sync::Arc;

/// The main error type for stream pipelines.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// `reduce` was called without an initial value on an empty sequence
    #[error("reduce of an empty sequence with no initial value")]
    EmptyReduce,

    /// A sequence reporting an unbounded length was asked to materialise
    #[error("cannot materialise an endless sequence")]
    Endless,

    /// An operation received an argument outside its domain
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// The backing resource of a tabular source or sink failed
    #[error("I/O error: {0}")]
    Io(Arc<std::io::Error>),

    /// Delimited text could not be parsed or written
    #[error("CSV error: {0}")]
    Csv(Arc<csv::Error>),

    /// A column coercion rejected a cell
    #[error("row {row}, column {column}: cannot coerce {value:?}: {source}")]
    Coerce {
        row: u64,
        column: usize,
        value: String,
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// A custom error with a message
    #[error("{0}")]
    Custom(String),
}

// Convenience constructors
impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(name: &'static str, reason: S) -> Self {
        Error::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Create a coercion error for the cell at `row`/`column`
    pub fn coerce<E>(row: u64, column: usize, value: &str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Coerce {
            row,
            column,
            value: value.to_string(),
            source: Arc::from(source.into()),
        }
    }

    /// Create a custom error with a message
    pub fn custom<S: Into<String>>(message: S) -> Self {
        Error::Custom(message.into())
    }

    /// Whether this error reports misuse of an operation rather than a
    /// failure of an external resource.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            Error::EmptyReduce | Error::Endless | Error::InvalidArgument { .. }
        )
    }
}

// Common conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(Arc::new(e))
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Csv(Arc::new(e))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Custom(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Custom(s.to_string())
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn misuse_is_distinguished_from_resource_failures() {
        assert!(Error::EmptyReduce.is_misuse());
        assert!(Error::invalid_argument("count", "must be positive").is_misuse());

        let io: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(!io.is_misuse());
    }

    #[test]
    fn coerce_error_keeps_its_source() {
        let parse = "x".parse::<i64>().unwrap_err();
        let err = Error::coerce(3, 1, "x", parse);
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(
            err.to_string(),
            "row 3, column 1: cannot coerce \"x\": invalid digit found in string"
        );
    }
}
