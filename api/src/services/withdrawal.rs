//! Withdrawal Requests
//!
//! 사용자는 BDT 잔액에서 출금을 요청하고 (요청 시점에 잔액 차감),
//! 관리자가 승인 또는 거절한다. 거절된 출금은 잔액으로 환불된다.

use rust_decimal::Decimal;

use super::{exact_money, Currency, ServiceError, ServiceResult};
use crate::db::{NewWithdrawal, PayoutMethod, Repository, Withdrawal, WithdrawalDecision};

/// 최소 출금액 (BDT, 포함)
pub const MIN_WITHDRAWAL_BDT: Decimal = Decimal::from_parts(500, 0, 0, false, 0);
/// 최대 출금액 (BDT, 포함)
pub const MAX_WITHDRAWAL_BDT: Decimal = Decimal::from_parts(25_000, 0, 0, false, 0);

/// 출금 금액 범위 검사
pub fn check_amount(amount_bdt: Decimal) -> ServiceResult<()> {
    if amount_bdt < MIN_WITHDRAWAL_BDT {
        return Err(ServiceError::validation("Minimum withdrawal 500 BDT"));
    }
    if amount_bdt > MAX_WITHDRAWAL_BDT {
        return Err(ServiceError::validation("Maximum withdrawal 25,000 BDT"));
    }
    Ok(())
}

/// 출금 요청
pub async fn request_withdrawal(
    repo: &dyn Repository,
    user_id: i64,
    amount_bdt: Decimal,
    method: &str,
    account_number: &str,
) -> ServiceResult<Withdrawal> {
    check_amount(amount_bdt)?;
    let amount_bdt = exact_money(amount_bdt)?;

    let method = PayoutMethod::parse(method)
        .ok_or_else(|| ServiceError::validation("Invalid withdrawal method"))?;

    let user = repo
        .find_user(user_id)
        .await?
        .ok_or(ServiceError::NotFound("User"))?;

    if user.balance_bdt < amount_bdt {
        return Err(ServiceError::InsufficientBalance(Currency::Bdt));
    }

    let withdrawal = repo
        .open_withdrawal(&NewWithdrawal {
            user_id,
            amount_bdt,
            method,
            account_number: account_number.trim().to_string(),
        })
        .await?;

    tracing::info!(
        user_id,
        withdrawal_id = withdrawal.id,
        amount_bdt = %amount_bdt,
        method = method.as_str(),
        "Withdrawal requested"
    );

    Ok(withdrawal)
}

/// 관리자 승인/거절
///
/// pending 상태에서만 처리 가능. 거절 시 환불은 상태 변경과 같은 트랜잭션.
pub async fn review_withdrawal(
    repo: &dyn Repository,
    withdrawal_id: i64,
    status: &str,
    admin_notes: Option<&str>,
) -> ServiceResult<Withdrawal> {
    let decision = WithdrawalDecision::parse(status)
        .ok_or_else(|| ServiceError::validation("Status must be approved or rejected"))?;

    match repo.settle_withdrawal(withdrawal_id, decision, admin_notes).await? {
        Some(withdrawal) => {
            tracing::info!(
                withdrawal_id,
                user_id = withdrawal.user_id,
                status = decision.as_str(),
                "Withdrawal reviewed"
            );
            Ok(withdrawal)
        }
        None => match repo.find_withdrawal(withdrawal_id).await? {
            Some(_) => Err(ServiceError::AlreadyProcessed("Withdrawal")),
            None => Err(ServiceError::NotFound("Withdrawal")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::mock::MockRepository;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_bounds() {
        assert!(check_amount(dec!(499.99)).is_err());
        assert!(check_amount(dec!(500)).is_ok());
        assert!(check_amount(dec!(25000)).is_ok());
        assert!(check_amount(dec!(25000.01)).is_err());
        assert!(check_amount(dec!(-1)).is_err());
    }

    #[tokio::test]
    async fn test_out_of_range_is_rejected_before_lookup() {
        let repo = MockRepository::new();
        let user = repo.seed_user("rich", dec!(0), dec!(100000), None);

        let err = request_withdrawal(&repo, user, dec!(100), "bkash", "017").await.unwrap_err();
        assert_eq!(err.to_string(), "Minimum withdrawal 500 BDT");

        let err = request_withdrawal(&repo, user, dec!(30000), "bkash", "017").await.unwrap_err();
        assert_eq!(err.to_string(), "Maximum withdrawal 25,000 BDT");

        assert_eq!(repo.user(user).balance_bdt, dec!(100000));
        assert!(repo.withdrawals().is_empty());
    }

    #[tokio::test]
    async fn test_sub_cent_amounts_near_bounds_are_rejected() {
        let repo = MockRepository::new();
        let user = repo.seed_user("rich", dec!(0), dec!(100000), None);

        let err = request_withdrawal(&repo, user, dec!(499.995), "bkash", "017")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Minimum withdrawal 500 BDT");

        let err = request_withdrawal(&repo, user, dec!(25000.004), "bkash", "017")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Maximum withdrawal 25,000 BDT");

        let err = request_withdrawal(&repo, user, dec!(600.005), "bkash", "017")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        assert_eq!(repo.user(user).balance_bdt, dec!(100000));
        assert!(repo.withdrawals().is_empty());
    }

    #[tokio::test]
    async fn test_request_debits_balance() {
        let repo = MockRepository::new();
        let user = repo.seed_user("user", dec!(0), dec!(1200), None);

        let withdrawal = request_withdrawal(&repo, user, dec!(500), "bKash", " 01711111111 ")
            .await
            .unwrap();

        assert_eq!(withdrawal.status, "pending");
        assert_eq!(withdrawal.method, "bkash");
        assert_eq!(withdrawal.account_number, "01711111111");
        assert_eq!(repo.user(user).balance_bdt, dec!(700));
    }

    #[tokio::test]
    async fn test_insufficient_bdt_and_bad_method() {
        let repo = MockRepository::new();
        let user = repo.seed_user("user", dec!(1000), dec!(499), None);

        let err = request_withdrawal(&repo, user, dec!(500), "bep20", "0xabc").await.unwrap_err();
        assert!(matches!(err, ServiceError::InsufficientBalance(Currency::Bdt)));

        let err = request_withdrawal(&repo, user, dec!(500), "paypal", "x").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid withdrawal method");
    }

    #[tokio::test]
    async fn test_rejection_refunds_once() {
        let repo = MockRepository::new();
        let user = repo.seed_user("user", dec!(0), dec!(2000), None);
        let withdrawal = request_withdrawal(&repo, user, dec!(1500), "bkash", "017")
            .await
            .unwrap();
        assert_eq!(repo.user(user).balance_bdt, dec!(500));

        let reviewed = review_withdrawal(&repo, withdrawal.id, "rejected", Some("wrong number"))
            .await
            .unwrap();
        assert_eq!(reviewed.status, "rejected");
        assert_eq!(reviewed.admin_notes.as_deref(), Some("wrong number"));
        assert_eq!(repo.user(user).balance_bdt, dec!(2000));

        let err = review_withdrawal(&repo, withdrawal.id, "rejected", None).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyProcessed(_)));
        assert_eq!(repo.user(user).balance_bdt, dec!(2000));
    }

    #[tokio::test]
    async fn test_approval_does_not_refund() {
        let repo = MockRepository::new();
        let user = repo.seed_user("user", dec!(0), dec!(800), None);
        let withdrawal = request_withdrawal(&repo, user, dec!(800), "bkash", "017")
            .await
            .unwrap();

        review_withdrawal(&repo, withdrawal.id, "approved", None).await.unwrap();

        assert_eq!(repo.user(user).balance_bdt, dec!(0));
    }

    #[tokio::test]
    async fn test_review_validation() {
        let repo = MockRepository::new();

        let err = review_withdrawal(&repo, 1, "pending", None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = review_withdrawal(&repo, 77, "approved", None).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound("Withdrawal")));
    }
}
