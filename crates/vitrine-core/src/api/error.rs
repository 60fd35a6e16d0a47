use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-2xx response carrying a human-readable message; the message is shown verbatim.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Unauthorized - credential missing or expired")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Stored credential cannot be sent as a header")]
    InvalidCredential,
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error payload shapes the backend uses; any of the keys may be present
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    erro: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    /// First non-blank message, `erro` taking precedence
    fn into_message(self) -> Option<String> {
        [self.erro, self.message, self.error]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty())
    }
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Extract the human-readable message from a JSON error body
    fn message_from_body(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(ErrorBody::into_message)
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        if let Some(message) = Self::message_from_body(body) {
            return ApiError::Rejected { status, message };
        }

        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// HTTP status of the failed response, when there was one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            ApiError::AccessDenied(_) => Some(StatusCode::FORBIDDEN),
            ApiError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            ApiError::RateLimited => Some(StatusCode::TOO_MANY_REQUESTS),
            ApiError::NetworkError(e) => e.status(),
            _ => None,
        }
    }

    /// Whether the server refused the credential (401/403 class)
    pub fn is_auth_rejection(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }
}
