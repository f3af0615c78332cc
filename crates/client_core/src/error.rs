use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no session token; sign in first")]
    MissingSession,
    #[error("catalog request failed with HTTP {status}: {source}")]
    Status {
        status: u16,
        #[source]
        source: ApiError,
    },
    #[error("catalog transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed catalog response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid catalog api base '{base}': {reason}")]
    InvalidBase { base: String, reason: String },
}

impl CatalogError {
    /// Whether the backend rejected the session token.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            CatalogError::MissingSession => true,
            CatalogError::Status { source, .. } => {
                matches!(source.code, ErrorCode::Unauthorized | ErrorCode::Forbidden)
            }
            _ => false,
        }
    }

    /// Message suitable for a notification, preferring the backend's text.
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Status { source, .. } => source.message.clone(),
            other => other.to_string(),
        }
    }
}
