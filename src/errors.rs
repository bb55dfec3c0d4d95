use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend responded with status {status}")]
    Status { status: u16, message: Option<String> },
    #[error("backend rejected the request")]
    Rejected { message: Option<String> },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("{0}")]
    Validation(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DashboardError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn invalid_response(err: impl std::fmt::Display) -> Self {
        Self::InvalidResponse(err.to_string())
    }

    /// Error text supplied by the backend, if it sent any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } | Self::Rejected { message } => message.as_deref(),
            _ => None,
        }
    }
}
