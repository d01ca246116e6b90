//! Error types for the core crate.
//!
//! The converters themselves never fail; these errors only come from the
//! JSON helpers on the record types.

use thiserror::Error;

/// Errors produced by calbridge-core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A record could not be read from or written to JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_error_display() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CoreError::from(err);
        assert!(err.to_string().starts_with("invalid JSON:"));
    }
}
