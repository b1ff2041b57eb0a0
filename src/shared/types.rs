use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Uniform response envelope returned by every villa endpoint.
///
/// `result` and `error_messages` are mutually exclusive in practice: a
/// successful response carries a payload and no messages, a failed one
/// carries messages and no payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub is_success: bool,
    pub result: Option<T>,
    pub error_messages: Vec<String>,
}

impl<T> Default for ApiResponse<T> {
    fn default() -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            is_success: true,
            result: None,
            error_messages: Vec::new(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(status: StatusCode, result: Option<T>) -> Self {
        Self {
            status_code: status.as_u16(),
            result,
            ..Self::default()
        }
    }

    pub fn error(status: StatusCode, errors: Vec<String>) -> ApiResponse<()> {
        ApiResponse {
            status_code: status.as_u16(),
            is_success: false,
            result: None,
            error_messages: errors,
        }
    }

    /// Marks the envelope as failed and records the message.
    ///
    /// The status code is left untouched.
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.is_success = false;
        self.result = None;
        self.error_messages.push(message.into());
    }
}
