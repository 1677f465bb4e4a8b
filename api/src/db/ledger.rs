//! `LedgerRepository` for PostgreSQL
//!
//! Balance-moving writes. Each multi-statement write runs in its own
//! transaction; there is no row locking beyond what the UPDATEs take.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::models::*;
use super::{Database, LedgerRepository, StoreResult};

const INVESTMENT_COLUMNS: &str = "id, user_id, investment_usd, daily_profit_bdt, status, created_at";

const WITHDRAWAL_COLUMNS: &str =
    "id, user_id, amount_bdt, method, account_number, status, admin_notes, created_at, reviewed_at";

const DEPOSIT_COLUMNS: &str =
    "id, user_id, amount_usd, transaction_hash, status, created_at, reviewed_at";

const COMMISSION_COLUMNS: &str =
    "id, user_id, from_user_id, investment_id, level, amount_bdt, status, created_at";

#[async_trait]
impl LedgerRepository for Database {
    async fn open_investment(
        &self,
        user_id: i64,
        investment_usd: Decimal,
        daily_profit_bdt: Decimal,
    ) -> StoreResult<Investment> {
        let mut tx = self.pool.begin().await?;

        let debited = sqlx::query(
            r#"
            UPDATE users
            SET balance_usd = balance_usd - $1,
                total_invested_usd = total_invested_usd + $1
            WHERE id = $2
            "#
        )
        .bind(investment_usd)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if debited.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound.into());
        }

        let investment = sqlx::query_as::<_, Investment>(&format!(
            r#"
            INSERT INTO investments (user_id, investment_usd, daily_profit_bdt)
            VALUES ($1, $2, $3)
            RETURNING {INVESTMENT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(investment_usd)
        .bind(daily_profit_bdt)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(investment)
    }

    async fn find_investment(&self, id: i64) -> StoreResult<Option<Investment>> {
        let investment = sqlx::query_as::<_, Investment>(&format!(
            "SELECT {INVESTMENT_COLUMNS} FROM investments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(investment)
    }

    async fn investments_for_user(&self, user_id: i64) -> StoreResult<Vec<Investment>> {
        let investments = sqlx::query_as::<_, Investment>(&format!(
            "SELECT {INVESTMENT_COLUMNS} FROM investments WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(investments)
    }

    async fn credit_commission(&self, credit: &CommissionCredit) -> StoreResult<Commission> {
        let mut tx = self.pool.begin().await?;

        let credited = sqlx::query("UPDATE users SET balance_bdt = balance_bdt + $1 WHERE id = $2")
            .bind(credit.amount_bdt)
            .bind(credit.receiver_id)
            .execute(&mut *tx)
            .await?;

        if credited.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound.into());
        }

        let commission = sqlx::query_as::<_, Commission>(&format!(
            r#"
            INSERT INTO commissions (user_id, from_user_id, investment_id, level, amount_bdt)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COMMISSION_COLUMNS}
            "#
        ))
        .bind(credit.receiver_id)
        .bind(credit.investor_id)
        .bind(credit.investment_id)
        .bind(credit.level)
        .bind(credit.amount_bdt)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(commission)
    }

    async fn commissions_for_user(&self, user_id: i64) -> StoreResult<Vec<CommissionView>> {
        let commissions = sqlx::query_as::<_, CommissionView>(
            r#"
            SELECT
                c.id, c.user_id, c.from_user_id, c.investment_id, c.level,
                c.amount_bdt, c.status, c.created_at,
                u.username AS from_username,
                i.investment_usd
            FROM commissions c
            JOIN users u ON c.from_user_id = u.id
            JOIN investments i ON c.investment_id = i.id
            WHERE c.user_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(commissions)
    }

    async fn open_withdrawal(&self, request: &NewWithdrawal) -> StoreResult<Withdrawal> {
        let mut tx = self.pool.begin().await?;

        let debited = sqlx::query("UPDATE users SET balance_bdt = balance_bdt - $1 WHERE id = $2")
            .bind(request.amount_bdt)
            .bind(request.user_id)
            .execute(&mut *tx)
            .await?;

        if debited.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound.into());
        }

        let withdrawal = sqlx::query_as::<_, Withdrawal>(&format!(
            r#"
            INSERT INTO withdrawals (user_id, amount_bdt, method, account_number)
            VALUES ($1, $2, $3, $4)
            RETURNING {WITHDRAWAL_COLUMNS}
            "#
        ))
        .bind(request.user_id)
        .bind(request.amount_bdt)
        .bind(request.method.as_str())
        .bind(&request.account_number)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(withdrawal)
    }

    async fn find_withdrawal(&self, id: i64) -> StoreResult<Option<Withdrawal>> {
        let withdrawal = sqlx::query_as::<_, Withdrawal>(&format!(
            "SELECT {WITHDRAWAL_COLUMNS} FROM withdrawals WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(withdrawal)
    }

    async fn settle_withdrawal(
        &self,
        id: i64,
        decision: WithdrawalDecision,
        admin_notes: Option<&str>,
    ) -> StoreResult<Option<Withdrawal>> {
        let mut tx = self.pool.begin().await?;

        let settled = sqlx::query_as::<_, Withdrawal>(&format!(
            r#"
            UPDATE withdrawals
            SET status = $1, admin_notes = $2, reviewed_at = NOW()
            WHERE id = $3 AND status = 'pending'
            RETURNING {WITHDRAWAL_COLUMNS}
            "#
        ))
        .bind(decision.as_str())
        .bind(admin_notes)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(withdrawal) = settled else {
            return Ok(None);
        };

        if decision == WithdrawalDecision::Rejected {
            sqlx::query("UPDATE users SET balance_bdt = balance_bdt + $1 WHERE id = $2")
                .bind(withdrawal.amount_bdt)
                .bind(withdrawal.user_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(Some(withdrawal))
    }

    async fn withdrawals_for_user(&self, user_id: i64) -> StoreResult<Vec<Withdrawal>> {
        let withdrawals = sqlx::query_as::<_, Withdrawal>(&format!(
            "SELECT {WITHDRAWAL_COLUMNS} FROM withdrawals WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(withdrawals)
    }

    async fn insert_deposit(&self, request: &NewDeposit) -> StoreResult<Deposit> {
        let deposit = sqlx::query_as::<_, Deposit>(&format!(
            r#"
            INSERT INTO deposits (user_id, amount_usd, transaction_hash)
            VALUES ($1, $2, $3)
            RETURNING {DEPOSIT_COLUMNS}
            "#
        ))
        .bind(request.user_id)
        .bind(request.amount_usd)
        .bind(&request.transaction_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(deposit)
    }

    async fn find_deposit(&self, id: i64) -> StoreResult<Option<Deposit>> {
        let deposit = sqlx::query_as::<_, Deposit>(&format!(
            "SELECT {DEPOSIT_COLUMNS} FROM deposits WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deposit)
    }

    async fn settle_deposit(
        &self,
        id: i64,
        decision: DepositDecision,
    ) -> StoreResult<Option<Deposit>> {
        let mut tx = self.pool.begin().await?;

        let settled = sqlx::query_as::<_, Deposit>(&format!(
            r#"
            UPDATE deposits
            SET status = $1, reviewed_at = NOW()
            WHERE id = $2 AND status = 'pending'
            RETURNING {DEPOSIT_COLUMNS}
            "#
        ))
        .bind(decision.as_str())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(deposit) = settled else {
            return Ok(None);
        };

        if decision == DepositDecision::Confirmed {
            sqlx::query("UPDATE users SET balance_usd = balance_usd + $1 WHERE id = $2")
                .bind(deposit.amount_usd)
                .bind(deposit.user_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(Some(deposit))
    }

    async fn deposits_for_user(&self, user_id: i64) -> StoreResult<Vec<Deposit>> {
        let deposits = sqlx::query_as::<_, Deposit>(&format!(
            "SELECT {DEPOSIT_COLUMNS} FROM deposits WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(deposits)
    }

    async fn credit_profit(&self, profit: &NewProfit) -> StoreResult<Profit> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, Profit>(
            r#"
            INSERT INTO profits (user_id, investment_id, amount_bdt, profit_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, investment_id, amount_bdt, profit_date, status, created_at
            "#
        )
        .bind(profit.user_id)
        .bind(profit.investment_id)
        .bind(profit.amount_bdt)
        .bind(profit.profit_date)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE users
            SET balance_bdt = balance_bdt + $1,
                total_earned_bdt = total_earned_bdt + $1
            WHERE id = $2
            "#
        )
        .bind(profit.amount_bdt)
        .bind(profit.user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }
}
