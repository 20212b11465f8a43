//! Errors raised while loading a command [crate::Script]. The trie itself
//! never fails.

use thiserror::Error;

/// Result type alias for script operations.
pub type Result<T> = std::result::Result<T, ScriptError>;

/// Errors that can occur while reading or parsing a command script.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Expectation {index} is not a boolean: {found:?}")]
    InvalidExpectation { index: usize, found: String },

    #[error("No expectation left for query {index}")]
    MissingExpectation { index: usize },

    #[error("Unterminated quote starting at column {column}")]
    UnterminatedQuote { column: usize },
}

#[cfg(test)]
mod tests {
    use super::ScriptError;

    #[test]
    fn test_error_display() {
        let err = ScriptError::InvalidExpectation {
            index: 2,
            found: "maybe".to_string(),
        };
        assert_eq!(err.to_string(), "Expectation 2 is not a boolean: \"maybe\"");

        let err = ScriptError::MissingExpectation { index: 0 };
        assert_eq!(err.to_string(), "No expectation left for query 0");

        let err = ScriptError::UnterminatedQuote { column: 7 };
        assert_eq!(err.to_string(), "Unterminated quote starting at column 7");
    }
}
