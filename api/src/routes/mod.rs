//! API Routes Module
//!
//! 모든 HTTP 엔드포인트 정의
//!
//! # Routes
//! - `/health` - 헬스 체크
//! - `/api/test`, `/api/plans` - 서버 정보, 투자 플랜
//! - `/api/register`, `/api/login`, `/api/profile/update` - 계정
//! - `/api/dashboard/:user_id`, `/api/commissions/:user_id` - 대시보드
//! - `/api/invest`, `/api/investments/:user_id` - 투자
//! - `/api/withdraw`, `/api/deposit`, ... - 입출금
//! - `/api/admin/*` - 관리자

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod invest;
pub mod wallet;

use axum::{
    extract::rejection::JsonRejection,
    routing::{get, post},
    Json, Router,
};

use crate::error::ApiError;
use crate::AppState;

/// 라우터 생성 (미들웨어는 main에서 붙인다)
///
/// # Route Structure
///
/// ```text
/// GET  /health
/// GET  /api/test
/// GET  /api/plans
/// POST /api/register
/// POST /api/login
/// POST /api/profile/update
/// GET  /api/dashboard/:user_id
/// POST /api/invest
/// GET  /api/investments/:user_id
/// POST /api/withdraw
/// GET  /api/withdrawals/:user_id
/// POST /api/deposit
/// GET  /api/deposits/:user_id
/// GET  /api/commissions/:user_id
///
/// POST /api/admin/login
/// GET  /api/admin/dashboard
/// GET  /api/admin/analytics
/// GET  /api/admin/users
/// GET  /api/admin/users/:user_id
/// POST /api/admin/users/update-status
/// GET  /api/admin/investments
/// GET  /api/admin/withdrawals/pending
/// POST /api/admin/withdrawals/update
/// GET  /api/admin/deposits/pending
/// POST /api/admin/deposits/update
/// GET  /api/admin/commissions
/// POST /api/admin/profits/add
/// ```
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health_check))
        .route("/api/test", get(health::server_info))

        // Accounts
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/profile/update", post(auth::update_profile))

        // Dashboard
        .route("/api/dashboard/:user_id", get(dashboard::get_dashboard))
        .route("/api/commissions/:user_id", get(dashboard::list_commissions))

        // Investment
        .route("/api/plans", get(invest::list_plans))
        .route("/api/invest", post(invest::invest))
        .route("/api/investments/:user_id", get(invest::list_investments))

        // Wallet
        .route("/api/withdraw", post(wallet::withdraw))
        .route("/api/withdrawals/:user_id", get(wallet::list_withdrawals))
        .route("/api/deposit", post(wallet::deposit))
        .route("/api/deposits/:user_id", get(wallet::list_deposits))

        // Admin
        .route("/api/admin/login", post(admin::login))
        .route("/api/admin/dashboard", get(admin::dashboard))
        .route("/api/admin/analytics", get(admin::analytics))
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/update-status", post(admin::update_user_status))
        .route("/api/admin/users/:user_id", get(admin::user_detail))
        .route("/api/admin/investments", get(admin::list_investments))
        .route("/api/admin/withdrawals/pending", get(admin::pending_withdrawals))
        .route("/api/admin/withdrawals/update", post(admin::update_withdrawal))
        .route("/api/admin/deposits/pending", get(admin::pending_deposits))
        .route("/api/admin/deposits/update", post(admin::update_deposit))
        .route("/api/admin/commissions", get(admin::list_commissions))
        .route("/api/admin/profits/add", post(admin::add_profit))

        .with_state(state)
}

// ============ Helpers ============

/// JSON 파싱 실패도 envelope로 응답
pub(crate) fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(inner)| inner).map_err(|rejection| {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::BadRequest("Invalid request body".to_string())
    })
}

/// 경로의 id 파싱
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {}", what)))
}

/// 필수 필드 확인
pub(crate) fn require<T>(value: Option<T>, message: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::BadRequest(message.to_string()))
}

#[cfg(test)]
pub(crate) mod testing {
    //! 라우터 테스트 공용 도구: MockRepository 위에 전체 라우터를 띄운다

    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::db::mock::MockRepository;
    use crate::AppState;

    pub fn test_app() -> (Arc<MockRepository>, Router) {
        let repo = Arc::new(MockRepository::new());
        let state = AppState {
            db: repo.clone(),
            config: Arc::new(Config::for_tests()),
        };
        (repo, super::router(state))
    }

    async fn send(app: &Router, request: Request<Body>) -> Value {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    pub async fn get(app: &Router, uri: &str) -> Value {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        send(app, request).await
    }

    pub async fn post(app: &Router, uri: &str, json: Value) -> Value {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap();
        send(app, request).await
    }

    pub async fn post_raw(app: &Router, uri: &str, raw: &'static str) -> Value {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw))
            .unwrap();
        send(app, request).await
    }
}
