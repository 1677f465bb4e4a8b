//! Common Types Module
//!
//! 모든 엔드포인트가 공유하는 응답 envelope
//!
//! ```json
//! { "success": true, "message": "Investment successful!", "investment": { ... } }
//! { "success": false, "message": "Insufficient USDT balance" }
//! ```

use serde::Serialize;

/// API 응답 래퍼
///
/// payload의 필드는 최상위로 펼쳐진다 (`#[serde(flatten)]`).
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub payload: T,
}

/// payload가 없는 응답
#[derive(Debug, Default, Serialize)]
pub struct Empty {}

impl<T> ApiResponse<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            message: None,
            payload,
        }
    }

    pub fn with_message(message: impl Into<String>, payload: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            payload,
        }
    }
}

impl ApiResponse<Empty> {
    pub fn message(message: impl Into<String>) -> Self {
        Self::with_message(message, Empty {})
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            payload: Empty {},
        }
    }
}
