//! Services Module
//!
//! 비즈니스 로직을 담당하는 서비스 레이어
//!
//! # Services
//! - `plans`: 고정 투자 플랜 / 커미션 테이블
//! - `accounts`: 회원가입, 로그인, 프로필, 관리자 계정
//! - `investment`: 투자 + 2단계 추천 커미션
//! - `withdrawal`: 출금 요청 / 관리자 승인·거절
//! - `deposit`: 입금 요청 / 관리자 확인
//! - `profit`: 일일 수익 지급

pub mod accounts;
pub mod deposit;
pub mod investment;
pub mod plans;
pub mod profit;
pub mod withdrawal;

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::db::StoreError;

pub use investment::{distribute_commissions, place_investment, PlacedInvestment};
pub use plans::{CommissionRate, Plan};

/// 잔액 통화
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    /// 투자/입금용 (USDT)
    Usd,
    /// 수익/커미션/출금용 (taka)
    Bdt,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Usd => write!(f, "USDT"),
            Currency::Bdt => write!(f, "BDT"),
        }
    }
}

/// 서비스 에러. 메시지는 그대로 클라이언트에 전달된다.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid plan")]
    InvalidPlan,

    #[error("{0}")]
    InvalidCredentials(String),

    /// 리소스 이름 ("User", "Withdrawal", ...)
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Insufficient {0} balance")]
    InsufficientBalance(Currency),

    #[error("{0} already processed")]
    AlreadyProcessed(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ServiceError::Validation(msg.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// 저장 가능한 최대 소수 자릿수 (NUMERIC(15,2))
pub const MONEY_SCALE: u32 = 2;

/// 요청 금액 정밀도 검사. 반올림하지 않고 거절한다.
pub fn exact_money(amount: Decimal) -> ServiceResult<Decimal> {
    let amount = amount.normalize();
    if amount.scale() > MONEY_SCALE {
        return Err(ServiceError::validation(
            "Amount must have at most 2 decimal places",
        ));
    }
    Ok(amount)
}
