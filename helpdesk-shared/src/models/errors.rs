use serde::{Deserialize, Serialize};

/// Error body the helpdesk server returns alongside 4xx/5xx statuses.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human readable error message
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new error response.
    ///
    /// # Arguments
    /// * `error` - The error message
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// Best-effort extraction of the server's message from a raw response body.
    ///
    /// # Returns
    /// The `error` field when the body is an [`ErrorResponse`], otherwise the
    /// trimmed body itself, or `None` when the body is blank.
    #[must_use]
    pub fn message_from_body(body: &str) -> Option<String> {
        if let Ok(parsed) = serde_json::from_str::<Self>(body) {
            return Some(parsed.error);
        }
        let trimmed = body.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for ErrorResponse {}
