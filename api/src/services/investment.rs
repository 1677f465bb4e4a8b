//! Investment + Referral Commission Workflow
//!
//! # Flow
//!
//! ```text
//! place_investment(user, plan)
//!   1. plan 조회 (1..=8)
//!   2. 사용자 조회, balance_usd >= 플랜 금액 확인
//!   3. [TX] balance_usd 차감 + investments INSERT  ── 실패 시 롤백
//!   4. tokio::spawn(distribute_commissions)         ── 기다리지 않음
//!        ├─ level 1: 직접 추천인 +level1 BDT
//!        └─ level 2: 추천인의 추천인 +level2 BDT
//! ```
//!
//! 커미션 지급은 투자 트랜잭션 밖에서 독립적으로 실행된다. 실패해도 투자는
//! 롤백되지 않고 호출자에게도 전달되지 않으며, 로그로만 남는다.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::task::JoinHandle;

use super::plans::{self, Plan};
use super::{Currency, ServiceError, ServiceResult};
use crate::db::{Commission, CommissionCredit, Investment, Repository};

/// 투자 결과
pub struct PlacedInvestment {
    pub investment: Investment,
    pub plan: Plan,
    /// 커미션 지급 task. 핸들러는 기다리지 않고 버린다 (detach)
    pub commissions: JoinHandle<Vec<Commission>>,
}

/// 투자 실행
pub async fn place_investment(
    repo: Arc<dyn Repository>,
    user_id: i64,
    plan_id: i64,
) -> ServiceResult<PlacedInvestment> {
    let plan = plans::find(plan_id).ok_or(ServiceError::InvalidPlan)?;

    let user = repo
        .find_user(user_id)
        .await?
        .ok_or(ServiceError::NotFound("User"))?;

    if user.balance_usd < plan.investment_usd {
        return Err(ServiceError::InsufficientBalance(Currency::Usd));
    }

    let investment = repo
        .open_investment(user_id, plan.investment_usd, plan.daily_profit_bdt)
        .await?;

    tracing::info!(
        user_id,
        investment_id = investment.id,
        amount_usd = %plan.investment_usd,
        "Investment opened"
    );

    let commissions = tokio::spawn(distribute_commissions(
        repo,
        user_id,
        user.referred_by,
        investment.id,
        plan.investment_usd,
    ));

    Ok(PlacedInvestment {
        investment,
        plan,
        commissions,
    })
}

/// 2단계 추천 커미션 지급
///
/// 각 단계는 독립적으로 시도된다 (1단계가 실패해도 2단계는 시도).
/// 성공한 지급 기록만 반환한다.
pub async fn distribute_commissions(
    repo: Arc<dyn Repository>,
    investor_id: i64,
    referrer_id: Option<i64>,
    investment_id: i64,
    tier_usd: Decimal,
) -> Vec<Commission> {
    let mut paid = Vec::new();

    let Some(referrer_id) = referrer_id else {
        return paid;
    };
    let Some(rate) = plans::commission_for(tier_usd) else {
        tracing::warn!(%tier_usd, "No commission rate for tier");
        return paid;
    };

    let level1 = CommissionCredit {
        receiver_id: referrer_id,
        investor_id,
        investment_id,
        level: 1,
        amount_bdt: rate.level1,
    };
    if let Some(commission) = credit(repo.as_ref(), &level1).await {
        paid.push(commission);
    }

    let upline = match repo.find_user(referrer_id).await {
        Ok(referrer) => referrer.and_then(|r| r.referred_by),
        Err(e) => {
            tracing::warn!(referrer_id, error = %e, "Level 2 referrer lookup failed");
            None
        }
    };

    if let Some(level2_id) = upline {
        let level2 = CommissionCredit {
            receiver_id: level2_id,
            investor_id,
            investment_id,
            level: 2,
            amount_bdt: rate.level2,
        };
        if let Some(commission) = credit(repo.as_ref(), &level2).await {
            paid.push(commission);
        }
    }

    paid
}

async fn credit(repo: &dyn Repository, credit: &CommissionCredit) -> Option<Commission> {
    match repo.credit_commission(credit).await {
        Ok(commission) => {
            tracing::info!(
                receiver_id = credit.receiver_id,
                level = credit.level,
                amount_bdt = %credit.amount_bdt,
                "Commission credited"
            );
            Some(commission)
        }
        Err(e) => {
            tracing::warn!(
                receiver_id = credit.receiver_id,
                investment_id = credit.investment_id,
                level = credit.level,
                error = %e,
                "Commission credit failed"
            );
            None
        }
    }
}
