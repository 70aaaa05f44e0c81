//! Error types for runtime operations.

/// The main error type for runtime operations.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// No factory is registered for the requested content type
    #[error("No factory registered for content type: {0}")]
    NoFactoryForContentType(String),

    /// A content type was required but none was given
    #[error("Content type must not be empty")]
    EmptyContentType,

    /// Payload parsing errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Payload writing errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// JSON handling errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors
    #[error("Error: {0}")]
    Other(String),
}

impl WireError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

impl From<String> for WireError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for WireError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}
