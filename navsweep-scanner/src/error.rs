use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Navigation to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("No page loaded in this browsing context")]
    NoPageLoaded,

    #[error("Other error: {0}")]
    Other(String),
}

impl ScanError {
    /// Navigation failures are recoverable per item; everything else is structural.
    pub fn is_navigation_error(&self) -> bool {
        matches!(self, ScanError::HttpError(_) | ScanError::Timeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
