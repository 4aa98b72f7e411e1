//! Outward result envelope for the presentation layer.

use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Serializable success/failure envelope surfaced to callers.
///
/// Exactly one of `value` and `error` is populated: a success carries the
/// value and no error, a failure carries the message and no value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub value: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Creates a success envelope.
    pub fn ok(value: T) -> Self {
        Self {
            success: true,
            value: Some(value),
            error: None,
        }
    }

    /// Creates a failure envelope.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            value: None,
            error: Some(message.into()),
        }
    }
}

impl<T> From<AppResult<T>> for ApiResponse<T> {
    fn from(result: AppResult<T>) -> Self {
        match result {
            Ok(value) => ApiResponse::ok(value),
            Err(error) => ApiResponse::err(error.to_string()),
        }
    }
}
