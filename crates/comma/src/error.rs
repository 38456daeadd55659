//! Error types for the comma crate.

use thiserror::Error;

/// Errors that can occur when declaring configurations or rendering tables.
#[derive(Debug, Error)]
pub enum CommaError {
    /// No configuration was declared for the type (or any ancestor), or the
    /// requested named style is missing.
    #[error("no column configuration for {type_name} with style '{style}'")]
    ConfigurationNotFound { type_name: String, style: String },

    /// A named accessor does not exist on the record being rendered.
    #[error("unknown accessor '{accessor}' on {type_name}")]
    UnknownAccessor { type_name: String, accessor: String },

    /// A column was declared with more than one evaluation rule.
    #[error("column declared on {type_name} has more than one evaluation rule: {rules}")]
    MalformedColumn { type_name: String, rules: String },

    /// A computed block was declared for a record type the instance cannot
    /// be viewed as.
    #[error("computed column expects {expected}, got {actual}")]
    IncompatibleRecord {
        expected: &'static str,
        actual: &'static str,
    },

    /// Render or writer options could not be read.
    #[error("invalid options: {0}")]
    Options(String),

    /// CSV encoding failed.
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoded output was not valid UTF-8.
    #[error("output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<serde_json::Error> for CommaError {
    fn from(err: serde_json::Error) -> Self {
        CommaError::Options(err.to_string())
    }
}

impl From<csv::IntoInnerError<csv::Writer<Vec<u8>>>> for CommaError {
    fn from(err: csv::IntoInnerError<csv::Writer<Vec<u8>>>) -> Self {
        CommaError::Io(err.into_error())
    }
}

/// Result type for comma operations.
pub type Result<T> = std::result::Result<T, CommaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CommaError::ConfigurationNotFound {
            type_name: "User".to_string(),
            style: "shortened".to_string(),
        };
        assert!(err.to_string().contains("User"));
        assert!(err.to_string().contains("shortened"));

        let err = CommaError::UnknownAccessor {
            type_name: "User".to_string(),
            accessor: "age".to_string(),
        };
        assert_eq!(err.to_string(), "unknown accessor 'age' on User");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: CommaError = io_err.into();
        assert!(matches!(err, CommaError::Io(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<bool>("nope").unwrap_err();
        let err: CommaError = json_err.into();
        assert!(matches!(err, CommaError::Options(_)));
    }
}
