use thiserror::Error;

/// CRM Analytics client error types
#[derive(Error, Debug)]
pub enum CrmaError {
    /// Connection, timeout or body-read failure before a status was obtained
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not match the expected model shape
    #[error("Response validation failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("URL parsing failed: {0}")]
    Url(#[from] url::ParseError),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("API error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Query response has no lineage metadata: {0}")]
    MissingMetadata(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for CRM Analytics operations
pub type CrmaResult<T> = Result<T, CrmaError>;

impl CrmaError {
    /// Create a status error from a status code and response body
    pub fn status_error(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Create an authentication error
    pub fn auth_error(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Create an invalid parameter error
    pub fn invalid_param(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}
