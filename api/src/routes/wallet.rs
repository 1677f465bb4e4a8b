//! Wallet Endpoints
//!
//! BDT 출금 요청과 USDT 입금 신고, 그리고 각각의 사용자별 내역.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{body, parse_id, require};
use crate::db::{Deposit, Withdrawal};
use crate::error::ApiError;
use crate::services::deposit::request_deposit;
use crate::services::withdrawal::request_withdrawal;
use crate::types::ApiResponse;
use crate::AppState;

const ALL_FIELDS_REQUIRED: &str = "All fields required";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WithdrawRequest {
    pub user_id: Option<i64>,
    pub amount_bdt: Option<Decimal>,
    pub method: Option<String>,
    pub account_number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WithdrawResponse {
    pub withdrawal: Withdrawal,
}

#[derive(Debug, Serialize)]
pub struct WithdrawalsResponse {
    pub withdrawals: Vec<Withdrawal>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DepositRequest {
    pub user_id: Option<i64>,
    pub amount_usd: Option<Decimal>,
    pub transaction_hash: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DepositResponse {
    pub deposit: Deposit,
}

#[derive(Debug, Serialize)]
pub struct DepositsResponse {
    pub deposits: Vec<Deposit>,
}

/// POST /api/withdraw
pub async fn withdraw(
    State(state): State<AppState>,
    payload: Result<Json<WithdrawRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<WithdrawResponse>>, ApiError> {
    let req = body(payload)?;
    let user_id = require(req.user_id, ALL_FIELDS_REQUIRED)?;
    let amount_bdt = require(req.amount_bdt, ALL_FIELDS_REQUIRED)?;
    let method = require(req.method.filter(|m| !m.trim().is_empty()), ALL_FIELDS_REQUIRED)?;
    let account_number = require(
        req.account_number.filter(|a| !a.trim().is_empty()),
        ALL_FIELDS_REQUIRED,
    )?;

    let withdrawal = request_withdrawal(
        state.db.as_ref(),
        user_id,
        amount_bdt,
        &method,
        &account_number,
    )
    .await?;

    Ok(Json(ApiResponse::with_message(
        "Withdrawal request submitted!",
        WithdrawResponse { withdrawal },
    )))
}

/// GET /api/withdrawals/:user_id
pub async fn list_withdrawals(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<WithdrawalsResponse>>, ApiError> {
    let user_id = parse_id(&user_id, "user ID")?;
    let withdrawals = state.db.withdrawals_for_user(user_id).await?;

    Ok(Json(ApiResponse::ok(WithdrawalsResponse { withdrawals })))
}

/// POST /api/deposit
pub async fn deposit(
    State(state): State<AppState>,
    payload: Result<Json<DepositRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<DepositResponse>>, ApiError> {
    let req = body(payload)?;
    let user_id = require(req.user_id, ALL_FIELDS_REQUIRED)?;
    let amount_usd = require(req.amount_usd, ALL_FIELDS_REQUIRED)?;
    let transaction_hash = require(req.transaction_hash, ALL_FIELDS_REQUIRED)?;

    let deposit =
        request_deposit(state.db.as_ref(), user_id, amount_usd, &transaction_hash).await?;

    Ok(Json(ApiResponse::with_message(
        "Deposit request submitted!",
        DepositResponse { deposit },
    )))
}

/// GET /api/deposits/:user_id
pub async fn list_deposits(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<DepositsResponse>>, ApiError> {
    let user_id = parse_id(&user_id, "user ID")?;
    let deposits = state.db.deposits_for_user(user_id).await?;

    Ok(Json(ApiResponse::ok(DepositsResponse { deposits })))
}
