//! Success response envelope
//!
//! Every successful endpoint answers with the same
//! `{success: true, message, data}` shape; failures are rendered by
//! [`crate::error::ApiError`] with the matching `{success: false, message}`.

use serde::Serialize;

/// JSON envelope for successful responses
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap `data` in a success envelope
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}
