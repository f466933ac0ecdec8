use serde::{Deserialize, Serialize};

/// Response envelope used by every `/api` endpoint.
///
/// Success and handled errors alike are `{"message": ..., "data": ...}`;
/// `data` is `null` on errors.  The one deliberate exception is the rate
/// limiter, which answers `{"error": ...}` on 429.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn with_data(message: &str, data: T) -> Self {
        Self {
            message: message.to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<serde_json::Value> {
    /// An envelope with `data: null` — the shape of every handled error.
    pub fn message_only(message: &str) -> Self {
        Self {
            message: message.to_string(),
            data: None,
        }
    }
}
