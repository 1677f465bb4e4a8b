//! Investment Plans
//!
//! 고정 플랜 테이블. 투자는 USD(USDT), 일일 수익과 추천 커미션은 BDT.
//! 플랜 id는 테이블 순서 기준 1부터 시작한다.

use rust_decimal::Decimal;
use serde::Serialize;

/// (investment_usd, daily_profit_bdt)
const PLAN_TABLE: [(u32, u32); 8] = [
    (10, 70),
    (50, 200),
    (100, 400),
    (200, 800),
    (500, 2000),
    (1000, 4000),
    (2000, 8000),
    (5000, 20000),
];

/// tier(USD) → (level1_bdt, level2_bdt)
const COMMISSION_TABLE: [(u32, u32, u32); 8] = [
    (10, 100, 50),
    (50, 200, 100),
    (100, 400, 200),
    (200, 800, 400),
    (500, 2000, 1000),
    (1000, 4000, 2000),
    (2000, 8000, 4000),
    (5000, 20000, 10000),
];

/// 투자 플랜
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub id: u32,
    pub name: String,
    pub investment_usd: Decimal,
    pub daily_profit_bdt: Decimal,
    pub description: String,
}

/// 추천 커미션 (BDT)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissionRate {
    pub level1: Decimal,
    pub level2: Decimal,
}

fn build(index: usize, (usd, profit): (u32, u32)) -> Plan {
    Plan {
        id: index as u32 + 1,
        name: format!("${} Plan", usd),
        investment_usd: Decimal::from(usd),
        daily_profit_bdt: Decimal::from(profit),
        description: format!("Invest ${} USDT, earn ৳{} daily", usd, profit),
    }
}

/// 전체 플랜 목록
pub fn all() -> Vec<Plan> {
    PLAN_TABLE
        .iter()
        .enumerate()
        .map(|(i, row)| build(i, *row))
        .collect()
}

/// 플랜 id(1부터)로 조회
pub fn find(plan_id: i64) -> Option<Plan> {
    let index = usize::try_from(plan_id.checked_sub(1)?).ok()?;
    PLAN_TABLE.get(index).map(|row| build(index, *row))
}

/// tier(USD 금액)별 커미션. 테이블에 없는 금액이면 None
pub fn commission_for(tier_usd: Decimal) -> Option<CommissionRate> {
    COMMISSION_TABLE
        .iter()
        .find(|(usd, _, _)| Decimal::from(*usd) == tier_usd)
        .map(|(_, level1, level2)| CommissionRate {
            level1: Decimal::from(*level1),
            level2: Decimal::from(*level2),
        })
}
