//! Error types for map symbology.

use thiserror::Error;

/// Result type alias using SymbologyError.
pub type SymbologyResult<T> = Result<T, SymbologyError>;

/// Primary error type for symbology operations.
#[derive(Debug, Error)]
pub enum SymbologyError {
    // === Unsupported Types ===
    #[error("Unsupported renderer type: {0}")]
    UnsupportedRenderer(String),

    #[error("Unsupported symbol type: {0}")]
    UnsupportedSymbol(String),

    // === Resource Errors ===
    #[error("Failed to fetch image '{url}': {message}")]
    ImageFetch { url: String, message: String },

    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    #[error("Failed to fetch legend: {0}")]
    LegendFetch(String),

    #[error("Service returned error {code}: {message}")]
    ServiceError { code: i64, message: String },

    // === Caller Errors ===
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Coarse classification of a [`SymbologyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Renderer or symbol kind outside the known table. Never fatal.
    UnsupportedType,
    /// Remote image, legend or payload fetch failed.
    ResourceFetch,
    /// The caller broke the input contract.
    MalformedInput,
    Internal,
}

impl SymbologyError {
    /// Get the taxonomy bucket for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            SymbologyError::UnsupportedRenderer(_) | SymbologyError::UnsupportedSymbol(_) => {
                ErrorCategory::UnsupportedType
            }

            SymbologyError::ImageFetch { .. }
            | SymbologyError::ImageDecode(_)
            | SymbologyError::LegendFetch(_)
            | SymbologyError::ServiceError { .. } => ErrorCategory::ResourceFetch,

            SymbologyError::MalformedInput(_) => ErrorCategory::MalformedInput,

            _ => ErrorCategory::Internal,
        }
    }

    /// Whether callers generating icons should fall back to a blank icon.
    pub fn degrades_to_blank(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::UnsupportedType | ErrorCategory::ResourceFetch
        )
    }
}

impl From<serde_json::Error> for SymbologyError {
    fn from(err: serde_json::Error) -> Self {
        SymbologyError::MalformedInput(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_mapping() {
        assert_eq!(
            SymbologyError::UnsupportedSymbol("esriTS".into()).category(),
            ErrorCategory::UnsupportedType
        );
        assert_eq!(
            SymbologyError::ServiceError {
                code: 400,
                message: "Invalid URL".into()
            }
            .category(),
            ErrorCategory::ResourceFetch
        );
        assert_eq!(
            SymbologyError::MalformedInput("missing field".into()).category(),
            ErrorCategory::MalformedInput
        );
    }

    #[test]
    fn test_malformed_input_does_not_degrade() {
        assert!(!SymbologyError::MalformedInput("x".into()).degrades_to_blank());
        assert!(SymbologyError::ImageDecode("bad png".into()).degrades_to_blank());
    }

    #[test]
    fn test_json_error_is_malformed_input() {
        let err: SymbologyError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.category(), ErrorCategory::MalformedInput);
    }
}
