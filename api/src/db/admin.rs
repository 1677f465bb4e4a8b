//! `AdminRepository` for PostgreSQL

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::types::Json;

use super::models::*;
use super::{AdminRepository, Database, StoreResult};

#[async_trait]
impl AdminRepository for Database {
    async fn find_admin_by_username(&self, username: &str) -> StoreResult<Option<AdminUser>> {
        let admin = sqlx::query_as::<_, AdminUser>(
            r#"
            SELECT id, username, password_hash, role, permissions, status, created_at
            FROM admin_users
            WHERE username = $1
            "#
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn ensure_admin(
        &self,
        username: &str,
        password_hash: &str,
        role: &str,
        permissions: &[String],
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO admin_users (username, password_hash, role, permissions)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (username) DO NOTHING
            "#
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .bind(Json(permissions))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn platform_stats(&self, today: NaiveDate) -> StoreResult<PlatformStats> {
        let stats = sqlx::query_as::<_, PlatformStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM users
                    WHERE (created_at AT TIME ZONE 'UTC')::date = $1) AS new_users_today,
                (SELECT COUNT(*) FROM investments WHERE status = 'active') AS active_investments,
                (SELECT COALESCE(SUM(investment_usd), 0) FROM investments) AS total_investment_usd,
                (SELECT COALESCE(SUM(amount_bdt), 0) FROM withdrawals
                    WHERE status = 'pending') AS pending_withdrawals,
                (SELECT COALESCE(SUM(amount_bdt), 0) FROM profits
                    WHERE profit_date = $1) AS today_profits,
                (SELECT COALESCE(SUM(amount_bdt), 0) FROM commissions) AS total_commissions
            "#
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    async fn analytics(&self, since: NaiveDate) -> StoreResult<Analytics> {
        let analytics = sqlx::query_as::<_, Analytics>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users
                    WHERE (created_at AT TIME ZONE 'UTC')::date >= $1) AS users_7days,
                (SELECT COALESCE(SUM(investment_usd), 0) FROM investments
                    WHERE (created_at AT TIME ZONE 'UTC')::date >= $1) AS investment_7days,
                (SELECT COALESCE(SUM(amount_bdt), 0) FROM profits
                    WHERE profit_date >= $1) AS profits_7days,
                (SELECT COALESCE(SUM(amount_bdt), 0) FROM withdrawals
                    WHERE status = 'approved'
                      AND (created_at AT TIME ZONE 'UTC')::date >= $1) AS withdrawals_7days
            "#
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(analytics)
    }

    async fn all_investments(&self) -> StoreResult<Vec<InvestmentView>> {
        let investments = sqlx::query_as::<_, InvestmentView>(
            r#"
            SELECT
                i.id, i.user_id, i.investment_usd, i.daily_profit_bdt, i.status, i.created_at,
                u.username, u.phone
            FROM investments i
            JOIN users u ON i.user_id = u.id
            ORDER BY i.created_at DESC, i.id DESC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(investments)
    }

    async fn pending_withdrawals(&self) -> StoreResult<Vec<WithdrawalView>> {
        let withdrawals = sqlx::query_as::<_, WithdrawalView>(
            r#"
            SELECT
                w.id, w.user_id, w.amount_bdt, w.method, w.account_number, w.status,
                w.admin_notes, w.created_at, w.reviewed_at,
                u.username, u.phone, u.bkash_number
            FROM withdrawals w
            JOIN users u ON w.user_id = u.id
            WHERE w.status = 'pending'
            ORDER BY w.created_at DESC, w.id DESC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(withdrawals)
    }

    async fn pending_deposits(&self) -> StoreResult<Vec<DepositView>> {
        let deposits = sqlx::query_as::<_, DepositView>(
            r#"
            SELECT
                d.id, d.user_id, d.amount_usd, d.transaction_hash, d.status,
                d.created_at, d.reviewed_at,
                u.username, u.phone
            FROM deposits d
            JOIN users u ON d.user_id = u.id
            WHERE d.status = 'pending'
            ORDER BY d.created_at DESC, d.id DESC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(deposits)
    }

    async fn commission_ledger(&self) -> StoreResult<Vec<CommissionLedgerEntry>> {
        let entries = sqlx::query_as::<_, CommissionLedgerEntry>(
            r#"
            SELECT
                c.id, c.user_id, c.from_user_id, c.investment_id, c.level,
                c.amount_bdt, c.status, c.created_at,
                u.username AS receiver,
                u2.username AS from_user,
                i.investment_usd
            FROM commissions c
            JOIN users u ON c.user_id = u.id
            JOIN users u2 ON c.from_user_id = u2.id
            JOIN investments i ON c.investment_id = i.id
            ORDER BY c.created_at DESC, c.id DESC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
