//! Error Handling Module
//!
//! 모든 실패는 같은 envelope(`{ success: false, message }`)로 응답한다.
//! 모바일 클라이언트는 HTTP 상태 코드를 보지 않고 body의 `success`만
//! 확인하므로 상태 코드는 항상 200이다.
//! 내부 에러(DB 등)의 상세 내용은 로그에만 남기고 클라이언트에는 일반 메시지를 준다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::db::StoreError;
use crate::services::ServiceError;
use crate::types::ApiResponse;

/// API 에러 타입
#[derive(Debug, Error)]
pub enum ApiError {
    /// 입력 누락, 범위 위반 등
    #[error("{0}")]
    BadRequest(String),

    /// 로그인 실패
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// 중복, 이미 처리된 요청, 잔액 부족
    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    InternalError,
}

impl ApiError {
    /// 클라이언트에 보여줄 메시지
    fn public_message(&self) -> String {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => msg.clone(),
            ApiError::DatabaseError(_) => "Database error occurred".to_string(),
            ApiError::InternalError => "An internal error occurred".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::DatabaseError(_) | ApiError::InternalError => {
                tracing::error!("Request failed: {:?}", self);
            }
            _ => {
                tracing::debug!("Request rejected: {}", self);
            }
        }

        let body = ApiResponse::failure(self.public_message());
        (StatusCode::OK, Json(body)).into_response()
    }
}

/// SQLx 에러를 ApiError로 변환
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("SQLx error: {:?}", err);
        ApiError::DatabaseError(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(field) => ApiError::Conflict(format!("{} already exists", field)),
            StoreError::Database(e) => e.into(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => ApiError::BadRequest(msg),
            ServiceError::InvalidPlan => ApiError::BadRequest(err.to_string()),
            ServiceError::InvalidCredentials(_) => ApiError::Unauthorized(err.to_string()),
            ServiceError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ServiceError::InsufficientBalance(_)
            | ServiceError::AlreadyProcessed(_)
            | ServiceError::Conflict(_) => ApiError::Conflict(err.to_string()),
            ServiceError::Hashing(e) => {
                tracing::error!("Password hashing failed: {:?}", e);
                ApiError::InternalError
            }
            ServiceError::Store(e) => e.into(),
        }
    }
}
