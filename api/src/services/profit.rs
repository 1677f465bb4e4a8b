//! Profit Crediting
//!
//! 관리자가 투자 건별 수익을 지급한다. 지급액은 balance_bdt와
//! total_earned_bdt에 함께 더해진다.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use super::{exact_money, ServiceError, ServiceResult};
use crate::db::{NewProfit, Profit, Repository};

/// 수익 지급. 날짜가 없으면 오늘(UTC)
pub async fn credit_profit(
    repo: &dyn Repository,
    user_id: i64,
    investment_id: i64,
    amount_bdt: Decimal,
    profit_date: Option<NaiveDate>,
) -> ServiceResult<Profit> {
    if amount_bdt <= Decimal::ZERO {
        return Err(ServiceError::validation("Profit amount must be positive"));
    }
    let amount_bdt = exact_money(amount_bdt)?;

    let investment = repo
        .find_investment(investment_id)
        .await?
        .ok_or(ServiceError::NotFound("Investment"))?;

    if investment.user_id != user_id {
        return Err(ServiceError::validation("Investment does not belong to user"));
    }

    let profit = repo
        .credit_profit(&NewProfit {
            user_id,
            investment_id,
            amount_bdt,
            profit_date: profit_date.unwrap_or_else(|| Utc::now().date_naive()),
        })
        .await?;

    tracing::info!(
        user_id,
        investment_id,
        profit_id = profit.id,
        amount_bdt = %amount_bdt,
        "Profit credited"
    );
    Ok(profit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::mock::MockRepository;
    use crate::db::LedgerRepository;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_profit_updates_balance_and_earnings() {
        let repo = MockRepository::new();
        let user = repo.seed_user("user", dec!(0), dec!(10), None);
        let investment = repo.open_investment(user, dec!(100), dec!(400)).await.unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let profit = credit_profit(&repo, user, investment.id, dec!(400), Some(date))
            .await
            .unwrap();

        assert_eq!(profit.profit_date, date);
        assert_eq!(profit.status, "credited");
        let row = repo.user(user);
        assert_eq!(row.balance_bdt, dec!(410));
        assert_eq!(row.total_earned_bdt, dec!(400));
    }

    #[tokio::test]
    async fn test_defaults_to_today() {
        let repo = MockRepository::new();
        let user = repo.seed_user("user", dec!(0), dec!(0), None);
        let investment = repo.open_investment(user, dec!(10), dec!(70)).await.unwrap();

        let profit = credit_profit(&repo, user, investment.id, dec!(70), None).await.unwrap();

        assert_eq!(profit.profit_date, Utc::now().date_naive());
    }

    #[tokio::test]
    async fn test_rejects_foreign_or_missing_investment() {
        let repo = MockRepository::new();
        let owner = repo.seed_user("owner", dec!(0), dec!(0), None);
        let other = repo.seed_user("other", dec!(0), dec!(0), None);
        let investment = repo.open_investment(owner, dec!(10), dec!(70)).await.unwrap();

        let err = credit_profit(&repo, other, investment.id, dec!(70), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = credit_profit(&repo, owner, 9999, dec!(70), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound("Investment")));

        let err = credit_profit(&repo, owner, investment.id, dec!(0), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = credit_profit(&repo, owner, investment.id, dec!(70.001), None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Amount must have at most 2 decimal places");
        assert_eq!(repo.user(owner).balance_bdt, dec!(0));
        assert_eq!(repo.user(other).balance_bdt, dec!(0));
    }
}
