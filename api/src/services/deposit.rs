//! Deposits
//!
//! 사용자가 BEP20 전송 해시와 함께 USDT 입금을 신고하면 pending으로 저장되고,
//! 관리자가 확인(confirmed)하면 balance_usd에 반영된다.

use rust_decimal::Decimal;

use super::{exact_money, ServiceError, ServiceResult};
use crate::db::{Deposit, DepositDecision, NewDeposit, Repository};

/// 입금 신고
pub async fn request_deposit(
    repo: &dyn Repository,
    user_id: i64,
    amount_usd: Decimal,
    transaction_hash: &str,
) -> ServiceResult<Deposit> {
    if amount_usd <= Decimal::ZERO {
        return Err(ServiceError::validation("Deposit amount must be positive"));
    }
    let amount_usd = exact_money(amount_usd)?;

    let transaction_hash = transaction_hash.trim();
    if transaction_hash.is_empty() {
        return Err(ServiceError::validation("All fields required"));
    }

    if repo.find_user(user_id).await?.is_none() {
        return Err(ServiceError::NotFound("User"));
    }

    let deposit = repo
        .insert_deposit(&NewDeposit {
            user_id,
            amount_usd,
            transaction_hash: transaction_hash.to_string(),
        })
        .await?;

    tracing::info!(user_id, deposit_id = deposit.id, amount_usd = %amount_usd, "Deposit submitted");
    Ok(deposit)
}

/// 관리자 확인/거절
pub async fn review_deposit(
    repo: &dyn Repository,
    deposit_id: i64,
    status: &str,
) -> ServiceResult<Deposit> {
    let decision = DepositDecision::parse(status)
        .ok_or_else(|| ServiceError::validation("Status must be confirmed or rejected"))?;

    match repo.settle_deposit(deposit_id, decision).await? {
        Some(deposit) => {
            tracing::info!(
                deposit_id,
                user_id = deposit.user_id,
                status = decision.as_str(),
                "Deposit reviewed"
            );
            Ok(deposit)
        }
        None => match repo.find_deposit(deposit_id).await? {
            Some(_) => Err(ServiceError::AlreadyProcessed("Deposit")),
            None => Err(ServiceError::NotFound("Deposit")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::mock::MockRepository;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_confirmation_credits_usd_balance() {
        let repo = MockRepository::new();
        let user = repo.seed_user("user", dec!(5), dec!(0), None);

        let deposit = request_deposit(&repo, user, dec!(100), "0xdeadbeef").await.unwrap();
        assert_eq!(deposit.status, "pending");
        assert_eq!(repo.user(user).balance_usd, dec!(5));

        let confirmed = review_deposit(&repo, deposit.id, "confirmed").await.unwrap();
        assert_eq!(confirmed.status, "confirmed");
        assert_eq!(repo.user(user).balance_usd, dec!(105));

        let err = review_deposit(&repo, deposit.id, "confirmed").await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyProcessed("Deposit")));
        assert_eq!(repo.user(user).balance_usd, dec!(105));
    }

    #[tokio::test]
    async fn test_rejection_leaves_balance() {
        let repo = MockRepository::new();
        let user = repo.seed_user("user", dec!(0), dec!(0), None);
        let deposit = request_deposit(&repo, user, dec!(50), "0x01").await.unwrap();

        review_deposit(&repo, deposit.id, "rejected").await.unwrap();

        assert_eq!(repo.user(user).balance_usd, dec!(0));
    }

    #[tokio::test]
    async fn test_invalid_requests() {
        let repo = MockRepository::new();
        let user = repo.seed_user("user", dec!(0), dec!(0), None);

        assert!(request_deposit(&repo, user, dec!(0), "0x01").await.is_err());
        assert!(request_deposit(&repo, user, dec!(10), "   ").await.is_err());
        let err = request_deposit(&repo, user, dec!(10.005), "0x01").await.unwrap_err();
        assert_eq!(err.to_string(), "Amount must have at most 2 decimal places");
        assert!(repo.deposits().is_empty());
        let err = request_deposit(&repo, 404, dec!(10), "0x01").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound("User")));
    }
}
