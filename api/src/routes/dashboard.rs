//! User Dashboard Endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use super::parse_id;
use crate::db::{CommissionView, User, UserStats};
use crate::error::ApiError;
use crate::types::ApiResponse;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub user: User,
    pub stats: UserStats,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub data: DashboardData,
}

#[derive(Debug, Serialize)]
pub struct CommissionsResponse {
    pub commissions: Vec<CommissionView>,
}

/// GET /api/dashboard/:user_id
///
/// 잔액 요약 + 활성 투자, 대기 출금, 오늘 수익, 누적 커미션
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<DashboardResponse>>, ApiError> {
    let user_id = parse_id(&user_id, "user ID")?;

    let user = state
        .db
        .find_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let stats = state.db.user_stats(user_id, Utc::now().date_naive()).await?;

    Ok(Json(ApiResponse::ok(DashboardResponse {
        data: DashboardData { user, stats },
    })))
}

/// GET /api/commissions/:user_id
pub async fn list_commissions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<CommissionsResponse>>, ApiError> {
    let user_id = parse_id(&user_id, "user ID")?;
    let commissions = state.db.commissions_for_user(user_id).await?;

    Ok(Json(ApiResponse::ok(CommissionsResponse { commissions })))
}

#[cfg(test)]
mod tests {
    use crate::db::CommissionCredit;
    use crate::db::LedgerRepository;
    use crate::routes::testing::{get, test_app};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_dashboard_stats() {
        let (repo, app) = test_app();
        let parent = repo.seed_user("parent", dec!(0), dec!(0), None);
        let user = repo.seed_user("user", dec!(100), dec!(2000), Some(parent));
        repo.open_investment(user, dec!(50), dec!(200)).await.unwrap();

        let body = get(&app, &format!("/api/dashboard/{}", user)).await;

        assert_eq!(body["success"], true);
        let data = &body["data"];
        assert_eq!(data["user"]["username"], "user");
        assert_eq!(data["user"]["balance_usd"], 50.0);
        assert_eq!(data["stats"]["active_investments"], 1);
        assert_eq!(data["stats"]["active_investment_usd"], 50.0);
        assert_eq!(data["stats"]["pending_withdrawals"], 0.0);
    }

    #[tokio::test]
    async fn test_dashboard_bad_ids() {
        let (_, app) = test_app();

        let body = get(&app, "/api/dashboard/abc").await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid user ID");

        let body = get(&app, "/api/dashboard/42").await;
        assert_eq!(body["message"], "User not found");
    }

    #[tokio::test]
    async fn test_commissions_include_investor() {
        let (repo, app) = test_app();
        let parent = repo.seed_user("parent", dec!(0), dec!(0), None);
        let child = repo.seed_user("child", dec!(10), dec!(0), Some(parent));
        let investment = repo.open_investment(child, dec!(10), dec!(70)).await.unwrap();
        repo.credit_commission(&CommissionCredit {
            receiver_id: parent,
            investor_id: child,
            investment_id: investment.id,
            level: 1,
            amount_bdt: dec!(100),
        })
        .await
        .unwrap();

        let body = get(&app, &format!("/api/commissions/{}", parent)).await;

        let commissions = body["commissions"].as_array().unwrap();
        assert_eq!(commissions.len(), 1);
        assert_eq!(commissions[0]["from_username"], "child");
        assert_eq!(commissions[0]["investment_usd"], 10.0);
        assert_eq!(commissions[0]["level"], 1);
    }
}
