/// Errors that can occur while talking to IsThereAnyDeal.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ITAD API error (HTTP {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Not authenticated. Run 'itad-import login' first.")]
    Unauthenticated,

    #[error("Sync not linked. Run 'itad-import link' first.")]
    SyncNotLinked,

    #[error("Nothing to commit: the selection is empty")]
    NothingToCommit,

    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse response: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status of an upstream failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Upstream { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
