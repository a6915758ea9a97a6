use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status { status: u16, message: Option<String> },

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Short description for the log; the UI never shows it.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "network",
            ApiError::Status { .. } => "status",
            ApiError::Decode(_) => "decode",
            ApiError::InvalidUrl(_) => "url",
            ApiError::Io(_) => "io",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
