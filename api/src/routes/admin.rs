//! Admin Endpoints
//!
//! 관리자 로그인, 플랫폼 통계, 사용자 관리, 출금/입금 검토, 수익 지급.
//! 세션 토큰은 없다. 관리자 화면은 로그인 응답의 역할/권한으로 메뉴만 제어한다.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{body, parse_id, require};
use crate::db::{
    Analytics, CommissionLedgerEntry, DepositView, Investment, InvestmentView, PlatformStats,
    User, Withdrawal, WithdrawalView,
};
use crate::error::ApiError;
use crate::services::accounts::{self, AdminSession};
use crate::services::{deposit, profit, withdrawal};
use crate::types::{ApiResponse, Empty};
use crate::AppState;

/// 분석 집계 기간
const ANALYTICS_WINDOW_DAYS: i64 = 7;

// ============ Request Types ============

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdminLoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserStatusRequest {
    pub user_id: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WithdrawalReviewRequest {
    pub withdrawal_id: Option<i64>,
    pub status: Option<String>,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DepositReviewRequest {
    pub deposit_id: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddProfitRequest {
    pub user_id: Option<i64>,
    pub investment_id: Option<i64>,
    pub amount_bdt: Option<Decimal>,
    pub profit_date: Option<NaiveDate>,
}

// ============ Response Types ============

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub admin: AdminSession,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: PlatformStats,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub analytics: Analytics,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct UserDetailResponse {
    pub user: User,
    pub investments: Vec<Investment>,
    pub withdrawals: Vec<Withdrawal>,
}

#[derive(Debug, Serialize)]
pub struct InvestmentsResponse {
    pub investments: Vec<InvestmentView>,
}

#[derive(Debug, Serialize)]
pub struct PendingWithdrawalsResponse {
    pub withdrawals: Vec<WithdrawalView>,
}

#[derive(Debug, Serialize)]
pub struct PendingDepositsResponse {
    pub deposits: Vec<DepositView>,
}

#[derive(Debug, Serialize)]
pub struct CommissionsResponse {
    pub commissions: Vec<CommissionLedgerEntry>,
}

// ============ Handlers ============

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<AdminLoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AdminLoginResponse>>, ApiError> {
    let req = body(payload)?;

    let admin = accounts::admin_login(
        state.db.as_ref(),
        req.username.as_deref().unwrap_or_default(),
        req.password.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok(Json(ApiResponse::with_message(
        "Admin login successful!",
        AdminLoginResponse { admin },
    )))
}

/// GET /api/admin/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StatsResponse>>, ApiError> {
    let stats = state.db.platform_stats(Utc::now().date_naive()).await?;
    Ok(Json(ApiResponse::ok(StatsResponse { stats })))
}

/// GET /api/admin/analytics
///
/// 7일 전 날짜부터 오늘까지의 가입자 수, 투자액, 지급 수익, 승인된 출금액
pub async fn analytics(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AnalyticsResponse>>, ApiError> {
    let since = Utc::now().date_naive() - Duration::days(ANALYTICS_WINDOW_DAYS);
    let analytics = state.db.analytics(since).await?;
    Ok(Json(ApiResponse::ok(AnalyticsResponse { analytics })))
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UsersResponse>>, ApiError> {
    let users = state.db.list_users().await?;
    Ok(Json(ApiResponse::ok(UsersResponse { users })))
}

/// GET /api/admin/users/:user_id
pub async fn user_detail(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<UserDetailResponse>>, ApiError> {
    let user_id = parse_id(&user_id, "user ID")?;

    let user = state
        .db
        .find_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    let investments = state.db.investments_for_user(user_id).await?;
    let withdrawals = state.db.withdrawals_for_user(user_id).await?;

    Ok(Json(ApiResponse::ok(UserDetailResponse {
        user,
        investments,
        withdrawals,
    })))
}

/// POST /api/admin/users/update-status
pub async fn update_user_status(
    State(state): State<AppState>,
    payload: Result<Json<UserStatusRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let req = body(payload)?;
    let required = "User ID and status required";
    let user_id = require(req.user_id, required)?;
    let status = require(req.status, required)?;

    accounts::set_status(state.db.as_ref(), user_id, &status).await?;

    Ok(Json(ApiResponse::message(format!("User {} successfully", status))))
}

/// GET /api/admin/investments
pub async fn list_investments(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<InvestmentsResponse>>, ApiError> {
    let investments = state.db.all_investments().await?;
    Ok(Json(ApiResponse::ok(InvestmentsResponse { investments })))
}

/// GET /api/admin/withdrawals/pending
pub async fn pending_withdrawals(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PendingWithdrawalsResponse>>, ApiError> {
    let withdrawals = state.db.pending_withdrawals().await?;
    Ok(Json(ApiResponse::ok(PendingWithdrawalsResponse { withdrawals })))
}

/// POST /api/admin/withdrawals/update
pub async fn update_withdrawal(
    State(state): State<AppState>,
    payload: Result<Json<WithdrawalReviewRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let req = body(payload)?;
    let required = "Withdrawal ID and status required";
    let withdrawal_id = require(req.withdrawal_id, required)?;
    let status = require(req.status, required)?;

    let reviewed = withdrawal::review_withdrawal(
        state.db.as_ref(),
        withdrawal_id,
        &status,
        req.admin_notes.as_deref(),
    )
    .await?;

    Ok(Json(ApiResponse::message(format!(
        "Withdrawal {} successfully",
        reviewed.status
    ))))
}

/// GET /api/admin/deposits/pending
pub async fn pending_deposits(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PendingDepositsResponse>>, ApiError> {
    let deposits = state.db.pending_deposits().await?;
    Ok(Json(ApiResponse::ok(PendingDepositsResponse { deposits })))
}

/// POST /api/admin/deposits/update
pub async fn update_deposit(
    State(state): State<AppState>,
    payload: Result<Json<DepositReviewRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let req = body(payload)?;
    let required = "Deposit ID and status required";
    let deposit_id = require(req.deposit_id, required)?;
    let status = require(req.status, required)?;

    let reviewed = deposit::review_deposit(state.db.as_ref(), deposit_id, &status).await?;

    Ok(Json(ApiResponse::message(format!(
        "Deposit {} successfully",
        reviewed.status
    ))))
}

/// GET /api/admin/commissions
pub async fn list_commissions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CommissionsResponse>>, ApiError> {
    let commissions = state.db.commission_ledger().await?;
    Ok(Json(ApiResponse::ok(CommissionsResponse { commissions })))
}

/// POST /api/admin/profits/add
pub async fn add_profit(
    State(state): State<AppState>,
    payload: Result<Json<AddProfitRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let req = body(payload)?;
    let required = "User ID, investment ID and amount required";
    let user_id = require(req.user_id, required)?;
    let investment_id = require(req.investment_id, required)?;
    let amount_bdt = require(req.amount_bdt, required)?;

    profit::credit_profit(
        state.db.as_ref(),
        user_id,
        investment_id,
        amount_bdt,
        req.profit_date,
    )
    .await?;

    Ok(Json(ApiResponse::message("Profit added successfully")))
}
