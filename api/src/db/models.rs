//! Database Models
//!
//! Row types for the investment platform tables plus the joined views and
//! aggregate rows used by the dashboards. Status columns are kept as text;
//! the typed enums below are used when writing them.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// 사용자
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub phone: String,

    /// bcrypt 해시, 응답에는 절대 포함하지 않음
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub referral_code: Option<String>,

    /// 추천인 (1단계)
    pub referred_by: Option<i64>,

    pub full_name: Option<String>,
    pub email: Option<String>,
    pub bep20_address: Option<String>,
    pub bkash_number: Option<String>,

    /// USDT 잔액 (투자용)
    pub balance_usd: Decimal,
    /// BDT 잔액 (수익, 커미션, 출금)
    pub balance_bdt: Decimal,
    pub total_invested_usd: Decimal,
    pub total_earned_bdt: Decimal,

    /// active | inactive
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// 회원가입 입력
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub phone: String,
    pub password_hash: String,
    pub referral_code: String,
    pub referred_by: Option<i64>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub bep20_address: String,
}

/// 프로필 수정 (None인 필드는 유지)
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub bkash_number: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Investment {
    pub id: i64,
    pub user_id: i64,
    pub investment_usd: Decimal,
    pub daily_profit_bdt: Decimal,
    /// active | completed
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// 관리자 목록용 (투자자 정보 포함)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InvestmentView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub investment: Investment,
    pub username: String,
    pub phone: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profit {
    pub id: i64,
    pub user_id: i64,
    pub investment_id: i64,
    pub amount_bdt: Decimal,
    pub profit_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProfit {
    pub user_id: i64,
    pub investment_id: i64,
    pub amount_bdt: Decimal,
    pub profit_date: NaiveDate,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Withdrawal {
    pub id: i64,
    pub user_id: i64,
    pub amount_bdt: Decimal,
    /// bkash | bep20
    pub method: String,
    pub account_number: String,
    /// pending | approved | rejected
    pub status: String,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewWithdrawal {
    pub user_id: i64,
    pub amount_bdt: Decimal,
    pub method: PayoutMethod,
    pub account_number: String,
}

/// 대기 중 출금 목록용
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WithdrawalView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub withdrawal: Withdrawal,
    pub username: String,
    pub phone: String,
    pub bkash_number: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Deposit {
    pub id: i64,
    pub user_id: i64,
    pub amount_usd: Decimal,
    pub transaction_hash: String,
    /// pending | confirmed | rejected
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewDeposit {
    pub user_id: i64,
    pub amount_usd: Decimal,
    pub transaction_hash: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DepositView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub deposit: Deposit,
    pub username: String,
    pub phone: String,
}

/// 추천 커미션 지급 기록
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Commission {
    pub id: i64,
    /// 수령자 (추천인)
    pub user_id: i64,
    /// 투자자
    pub from_user_id: i64,
    pub investment_id: i64,
    /// 1 또는 2
    pub level: i32,
    pub amount_bdt: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// 커미션 지급 요청 (잔액 증가 + 감사 로그)
#[derive(Debug, Clone)]
pub struct CommissionCredit {
    pub receiver_id: i64,
    pub investor_id: i64,
    pub investment_id: i64,
    pub level: i32,
    pub amount_bdt: Decimal,
}

/// 사용자 커미션 내역
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommissionView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub commission: Commission,
    pub from_username: String,
    pub investment_usd: Decimal,
}

/// 관리자 커미션 원장
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommissionLedgerEntry {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub commission: Commission,
    pub receiver: String,
    pub from_user: String,
    pub investment_usd: Decimal,
}

#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    /// super_admin | admin
    pub role: String,
    pub permissions: Json<Vec<String>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// 사용자 대시보드 통계
#[derive(Debug, Clone, Default, FromRow, Serialize, PartialEq)]
pub struct UserStats {
    pub active_investments: i64,
    pub active_investment_usd: Decimal,
    pub pending_withdrawals: Decimal,
    pub today_profit: Decimal,
    pub total_commission: Decimal,
}

/// 관리자 대시보드 통계
#[derive(Debug, Clone, Default, FromRow, Serialize, PartialEq)]
pub struct PlatformStats {
    pub total_users: i64,
    pub new_users_today: i64,
    pub active_investments: i64,
    pub total_investment_usd: Decimal,
    pub pending_withdrawals: Decimal,
    pub today_profits: Decimal,
    pub total_commissions: Decimal,
}

/// 최근 7일 집계
#[derive(Debug, Clone, Default, FromRow, Serialize, PartialEq)]
pub struct Analytics {
    pub users_7days: i64,
    pub investment_7days: Decimal,
    pub profits_7days: Decimal,
    pub withdrawals_7days: Decimal,
}

// ============ Status Enums ============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "active" => Some(AccountStatus::Active),
            "inactive" => Some(AccountStatus::Inactive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoutMethod {
    Bkash,
    Bep20,
}

impl PayoutMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutMethod::Bkash => "bkash",
            PayoutMethod::Bep20 => "bep20",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "bkash" => Some(PayoutMethod::Bkash),
            "bep20" => Some(PayoutMethod::Bep20),
            _ => None,
        }
    }
}

/// 관리자 검토 결과 (출금)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalDecision {
    Approved,
    Rejected,
}

impl WithdrawalDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawalDecision::Approved => "approved",
            WithdrawalDecision::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "approved" => Some(WithdrawalDecision::Approved),
            "rejected" => Some(WithdrawalDecision::Rejected),
            _ => None,
        }
    }
}

/// 관리자 검토 결과 (입금)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositDecision {
    Confirmed,
    Rejected,
}

impl DepositDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepositDecision::Confirmed => "confirmed",
            DepositDecision::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "confirmed" => Some(DepositDecision::Confirmed),
            "rejected" => Some(DepositDecision::Rejected),
            _ => None,
        }
    }
}

pub const STATUS_PENDING: &str = "pending";
