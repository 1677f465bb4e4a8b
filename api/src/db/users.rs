//! `UserRepository` for PostgreSQL

use async_trait::async_trait;
use chrono::NaiveDate;

use super::models::{AccountStatus, NewUser, ProfileUpdate, User, UserStats};
use super::{Database, StoreError, StoreResult, UserRepository};

pub(super) const USER_COLUMNS: &str = r#"
    id, username, phone, password_hash, referral_code, referred_by,
    full_name, email, bep20_address, bkash_number,
    balance_usd, balance_bdt, total_invested_usd, total_earned_bdt,
    status, created_at
"#;

#[async_trait]
impl UserRepository for Database {
    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_phone(&self, phone: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE phone = $1"
        ))
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_id_by_referral_code(&self, code: &str) -> StoreResult<Option<i64>> {
        let id: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE referral_code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(id.map(|(id,)| id))
    }

    async fn insert_user(&self, user: &NewUser) -> StoreResult<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (
                username, phone, password_hash, referral_code, referred_by,
                full_name, email, bep20_address
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.username)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(&user.referral_code)
        .bind(user.referred_by)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.bep20_address)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::classify)
    }

    async fn update_profile(&self, id: i64, profile: &ProfileUpdate) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET full_name = COALESCE($1, full_name),
                email = COALESCE($2, email),
                bkash_number = COALESCE($3, bkash_number)
            WHERE id = $4
            "#
        )
        .bind(&profile.full_name)
        .bind(&profile.email)
        .bind(&profile.bkash_number)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_user_status(&self, id: i64, status: AccountStatus) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE users SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn user_stats(&self, id: i64, today: NaiveDate) -> StoreResult<UserStats> {
        let stats = sqlx::query_as::<_, UserStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM investments
                    WHERE user_id = $1 AND status = 'active') AS active_investments,
                (SELECT COALESCE(SUM(investment_usd), 0) FROM investments
                    WHERE user_id = $1 AND status = 'active') AS active_investment_usd,
                (SELECT COALESCE(SUM(amount_bdt), 0) FROM withdrawals
                    WHERE user_id = $1 AND status = 'pending') AS pending_withdrawals,
                (SELECT COALESCE(SUM(amount_bdt), 0) FROM profits
                    WHERE user_id = $1 AND profit_date = $2) AS today_profit,
                (SELECT COALESCE(SUM(amount_bdt), 0) FROM commissions
                    WHERE user_id = $1) AS total_commission
            "#
        )
        .bind(id)
        .bind(today)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}
