//! Repository Pattern Implementation
//!
//! 서비스 레이어는 `Repository` trait object만 본다.
//! PostgreSQL 구현은 `Database` (users.rs / ledger.rs / admin.rs),
//! 테스트용 in-memory 구현은 아래 `mock` 모듈.
//!
//! ```text
//! routes ──▶ services ──▶ Arc<dyn Repository>
//!                              ├── Database        (PostgreSQL)
//!                              └── MockRepository  (tests)
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;

use super::models::*;
use super::StoreResult;

/// 사용자 계정
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user(&self, id: i64) -> StoreResult<Option<User>>;

    async fn find_user_by_phone(&self, phone: &str) -> StoreResult<Option<User>>;

    async fn find_user_id_by_referral_code(&self, code: &str) -> StoreResult<Option<i64>>;

    /// username / phone / referral_code 중복 시 `StoreError::Duplicate`
    async fn insert_user(&self, user: &NewUser) -> StoreResult<User>;

    /// 변경된 행이 없으면 false
    async fn update_profile(&self, id: i64, profile: &ProfileUpdate) -> StoreResult<bool>;

    async fn set_user_status(&self, id: i64, status: AccountStatus) -> StoreResult<bool>;

    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn user_stats(&self, id: i64, today: NaiveDate) -> StoreResult<UserStats>;
}

/// 잔액이 움직이는 모든 기록 (투자, 커미션, 출금, 입금, 수익)
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// 트랜잭션: balance_usd 차감 + total_invested_usd 증가 + investments INSERT
    async fn open_investment(
        &self,
        user_id: i64,
        investment_usd: rust_decimal::Decimal,
        daily_profit_bdt: rust_decimal::Decimal,
    ) -> StoreResult<Investment>;

    async fn find_investment(&self, id: i64) -> StoreResult<Option<Investment>>;

    async fn investments_for_user(&self, user_id: i64) -> StoreResult<Vec<Investment>>;

    /// 수령자 balance_bdt 증가 + commissions INSERT
    async fn credit_commission(&self, credit: &CommissionCredit) -> StoreResult<Commission>;

    async fn commissions_for_user(&self, user_id: i64) -> StoreResult<Vec<CommissionView>>;

    /// 트랜잭션: balance_bdt 차감 + withdrawals INSERT (pending)
    async fn open_withdrawal(&self, request: &NewWithdrawal) -> StoreResult<Withdrawal>;

    async fn find_withdrawal(&self, id: i64) -> StoreResult<Option<Withdrawal>>;

    /// pending 상태인 출금만 처리, 거절이면 같은 트랜잭션에서 환불.
    /// pending이 아니거나 없으면 None
    async fn settle_withdrawal(
        &self,
        id: i64,
        decision: WithdrawalDecision,
        admin_notes: Option<&str>,
    ) -> StoreResult<Option<Withdrawal>>;

    async fn withdrawals_for_user(&self, user_id: i64) -> StoreResult<Vec<Withdrawal>>;

    async fn insert_deposit(&self, request: &NewDeposit) -> StoreResult<Deposit>;

    async fn find_deposit(&self, id: i64) -> StoreResult<Option<Deposit>>;

    /// pending 상태인 입금만 처리, 확인이면 같은 트랜잭션에서 balance_usd 증가
    async fn settle_deposit(
        &self,
        id: i64,
        decision: DepositDecision,
    ) -> StoreResult<Option<Deposit>>;

    async fn deposits_for_user(&self, user_id: i64) -> StoreResult<Vec<Deposit>>;

    /// 트랜잭션: profits INSERT + balance_bdt / total_earned_bdt 증가
    async fn credit_profit(&self, profit: &NewProfit) -> StoreResult<Profit>;
}

/// 관리자 화면 전용 조회
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn find_admin_by_username(&self, username: &str) -> StoreResult<Option<AdminUser>>;

    /// 같은 username이 있으면 아무것도 하지 않음. 새로 만들었으면 true
    async fn ensure_admin(
        &self,
        username: &str,
        password_hash: &str,
        role: &str,
        permissions: &[String],
    ) -> StoreResult<bool>;

    async fn platform_stats(&self, today: NaiveDate) -> StoreResult<PlatformStats>;

    /// `since` 이후(포함) 집계
    async fn analytics(&self, since: NaiveDate) -> StoreResult<Analytics>;

    async fn all_investments(&self) -> StoreResult<Vec<InvestmentView>>;

    async fn pending_withdrawals(&self) -> StoreResult<Vec<WithdrawalView>>;

    async fn pending_deposits(&self) -> StoreResult<Vec<DepositView>>;

    async fn commission_ledger(&self) -> StoreResult<Vec<CommissionLedgerEntry>>;
}

/// 애플리케이션이 사용하는 전체 저장소
#[async_trait]
pub trait Repository: UserRepository + LedgerRepository + AdminRepository {
    async fn health_check(&self) -> StoreResult<()>;
}
