use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What a browsing context reports after loading a URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationOutcome {
    pub requested_url: String,
    /// The URL after redirects.
    pub final_url: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub response_time: Duration,
}

impl NavigationOutcome {
    pub fn new(requested_url: String) -> Self {
        Self {
            final_url: requested_url.clone(),
            requested_url,
            status_code: 0,
            content_type: None,
            response_time: Duration::from_secs(0),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status_code)
    }
}
