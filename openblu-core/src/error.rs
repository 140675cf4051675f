//! Error types for the OpenBlu client

use thiserror::Error;

/// Core error type for OpenBlu operations
#[derive(Error, Debug)]
pub enum OpenBluError {
    /// Bad flag combination or unknown filter/order field
    #[error("Usage error: {0}")]
    Usage(String),

    /// Missing or rejected API key
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Transport failure (DNS, connect, TLS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Malformed API response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unknown server identifier
    #[error("Server not found: {0}")]
    NotFound(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The API answered with an error we have no dedicated kind for
    #[error("API error {code}: {message}")]
    Api { code: u16, message: String },
}

impl OpenBluError {
    /// Process exit status associated with this error kind.
    ///
    /// `2` matches the status clap uses for argument errors, so every usage
    /// problem exits the same way.
    pub fn exit_code(&self) -> i32 {
        match self {
            OpenBluError::Usage(_) => 2,
            OpenBluError::Auth(_) => 3,
            OpenBluError::Network(_) => 4,
            OpenBluError::Parse(_) => 5,
            OpenBluError::NotFound(_) => 6,
            OpenBluError::Io(_) => 7,
            OpenBluError::Api { .. } => 8,
        }
    }
}

/// Result type alias for OpenBlu operations
pub type Result<T> = std::result::Result<T, OpenBluError>;

impl From<serde_json::Error> for OpenBluError {
    fn from(err: serde_json::Error) -> Self {
        OpenBluError::Parse(err.to_string())
    }
}
