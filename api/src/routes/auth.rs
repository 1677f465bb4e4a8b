//! Account Endpoints
//!
//! 회원가입, 로그인, 프로필 수정. 인증 토큰은 발급하지 않으며
//! 클라이언트는 로그인 응답의 user id를 이후 요청에 그대로 사용한다.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use super::body;
use crate::db::{ProfileUpdate, User};
use crate::error::ApiError;
use crate::services::accounts::{self, Registration};
use crate::types::{ApiResponse, Empty};
use crate::AppState;

// ============ Request/Response Types ============

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub referral_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub id: i64,
    pub username: String,
    pub referral_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: RegisteredUser,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub phone: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileRequest {
    pub user_id: Option<i64>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub bkash_number: Option<String>,
}

// ============ Handlers ============

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<RegisterResponse>>, ApiError> {
    let req = body(payload)?;

    let user = accounts::register(
        state.db.as_ref(),
        &state.config,
        Registration {
            username: req.username.unwrap_or_default(),
            phone: req.phone.unwrap_or_default(),
            password: req.password.unwrap_or_default(),
            full_name: req.full_name,
            email: req.email,
            referral_code: req.referral_code,
        },
    )
    .await?;

    Ok(Json(ApiResponse::with_message(
        "Registration successful!",
        RegisterResponse {
            user: RegisteredUser {
                id: user.id,
                username: user.username,
                referral_code: user.referral_code,
            },
        },
    )))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let req = body(payload)?;

    let user = accounts::login(
        state.db.as_ref(),
        req.phone.as_deref().unwrap_or_default(),
        req.password.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok(Json(ApiResponse::with_message(
        "Login successful!",
        LoginResponse { user },
    )))
}

/// POST /api/profile/update
pub async fn update_profile(
    State(state): State<AppState>,
    payload: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let req = body(payload)?;

    accounts::update_profile(
        state.db.as_ref(),
        req.user_id,
        ProfileUpdate {
            full_name: req.full_name,
            email: req.email,
            bkash_number: req.bkash_number,
        },
    )
    .await?;

    Ok(Json(ApiResponse::message("Profile updated successfully")))
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::{post, post_raw, test_app};
    use serde_json::json;

    #[tokio::test]
    async fn test_register_then_login() {
        let (_, app) = test_app();

        let body = post(
            &app,
            "/api/register",
            json!({ "username": "alice", "phone": "01711111111", "password": "pw" }),
        )
        .await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Registration successful!");
        assert_eq!(body["user"]["username"], "alice");
        assert_eq!(body["user"]["referral_code"].as_str().unwrap().len(), 6);

        let body = post(
            &app,
            "/api/login",
            json!({ "phone": "01711111111", "password": "pw" }),
        )
        .await;
        assert_eq!(body["success"], true);
        assert_eq!(body["user"]["username"], "alice");
        assert!(body["user"].get("password_hash").is_none());
        assert_eq!(body["user"]["balance_usd"], 0.0);
    }

    #[tokio::test]
    async fn test_register_with_referral_code() {
        let (repo, app) = test_app();
        let parent = repo.seed_user("parent", Default::default(), Default::default(), None);

        let body = post(
            &app,
            "/api/register",
            json!({
                "username": "child",
                "phone": "01722222222",
                "password": "pw",
                "referral_code": "REF001"
            }),
        )
        .await;

        let child = body["user"]["id"].as_i64().unwrap();
        assert_eq!(repo.user(child).referred_by, Some(parent));
    }

    #[tokio::test]
    async fn test_login_failures_use_envelope() {
        let (_, app) = test_app();

        let body = post(&app, "/api/login", json!({ "phone": "017" })).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Phone and password required");

        let body = post(&app, "/api/login", json!({ "phone": "017", "password": "x" })).await;
        assert_eq!(body["message"], "Invalid phone or password");

        let body = post_raw(&app, "/api/login", "{not json").await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_profile_update() {
        let (repo, app) = test_app();
        let id = repo.seed_user("alice", Default::default(), Default::default(), None);

        let body = post(
            &app,
            "/api/profile/update",
            json!({ "user_id": id, "bkash_number": "01799999999" }),
        )
        .await;
        assert_eq!(body["success"], true);
        assert_eq!(repo.user(id).bkash_number.as_deref(), Some("01799999999"));

        let body = post(&app, "/api/profile/update", json!({ "email": "x@y.z" })).await;
        assert_eq!(body["message"], "User ID required");
    }
}
