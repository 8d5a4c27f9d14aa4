use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    FetchError { status: u16, url: String },

    #[error("Genre '{0}' not found in genre mapping")]
    GenreNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ScanError {
    /// True when the storefront could not be reached or answered with a
    /// non-200 status.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::TransportError(_) | Self::FetchError { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::FetchError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
