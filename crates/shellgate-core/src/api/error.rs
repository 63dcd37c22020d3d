use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Http failure response ({status}): {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The HTTP client itself could not be constructed; nothing was sent
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        ApiError::Status {
            status,
            body: Self::truncate_body(body),
        }
    }

    /// HTTP status of the failure, if a response was received
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_keeps_status() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "nope");
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(!err.is_network());
        assert_eq!(err.to_string(), "Http failure response (401 Unauthorized): nope");
    }

    #[test]
    fn test_truncate_long_body() {
        let body = "x".repeat(MAX_ERROR_BODY_LENGTH + 10);
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        match err {
            ApiError::Status { body, .. } => {
                assert!(body.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
                assert!(body.ends_with("(truncated, 510 total bytes)"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        let body = "é".repeat(MAX_ERROR_BODY_LENGTH);
        // Must not panic on a split multi-byte char
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.contains("truncated"));
    }

    #[test]
    fn test_client_build_is_not_network() {
        let source = reqwest::Client::new().get("not a url").build().unwrap_err();
        let err = ApiError::ClientBuild(source);
        assert!(!err.is_network());
        assert_eq!(err.status(), None);
        assert!(err.to_string().starts_with("Failed to build HTTP client"));
    }

    #[test]
    fn test_invalid_response_has_no_status() {
        let err = ApiError::InvalidResponse("missing accessToken".to_string());
        assert_eq!(err.status(), None);
    }
}
