use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::FailureBody;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    RateLimited,
    Internal,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            404 => ErrorCode::NotFound,
            400 | 422 => ErrorCode::Validation,
            429 => ErrorCode::RateLimited,
            _ => ErrorCode::Internal,
        }
    }
}

/// Failure reported by the catalog backend, decoded from a non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code:?}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Builds an error from a response status and its raw body.
    ///
    /// The backend answers failures with `{ success: false, message }`, where
    /// `message` is either a string or a list of strings. Bodies that do not
    /// follow that shape are kept verbatim.
    pub fn from_response(status: u16, body: &str) -> Self {
        let code = ErrorCode::from_status(status);
        let message = match serde_json::from_str::<FailureBody>(body) {
            Ok(FailureBody {
                message: Some(text),
            }) => text.to_string(),
            _ if body.trim().is_empty() => format!("HTTP {status}"),
            _ => body.trim().to_string(),
        };
        Self { code, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_single_message_failure_body() {
        let err = ApiError::from_response(401, r#"{"success":false,"message":"token expired"}"#);
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(err.message, "token expired");
    }

    #[test]
    fn joins_validation_message_list() {
        let err = ApiError::from_response(
            400,
            r#"{"success":false,"message":["title is required","unit is required"]}"#,
        );
        assert_eq!(err.code, ErrorCode::Validation);
        assert_eq!(err.message, "title is required; unit is required");
    }

    #[test]
    fn keeps_unstructured_body_and_falls_back_to_status() {
        assert_eq!(
            ApiError::from_response(502, "bad gateway").message,
            "bad gateway"
        );
        assert_eq!(ApiError::from_response(500, "  ").message, "HTTP 500");
    }
}
