//! Investment Endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{body, parse_id, require};
use crate::db::Investment;
use crate::error::ApiError;
use crate::services::{self, plans, Plan};
use crate::types::ApiResponse;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct PlansResponse {
    pub plans: Vec<Plan>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InvestRequest {
    pub user_id: Option<i64>,
    pub plan_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct InvestResponse {
    pub investment: Investment,
}

#[derive(Debug, Serialize)]
pub struct InvestmentsResponse {
    pub investments: Vec<Investment>,
}

/// GET /api/plans
pub async fn list_plans() -> Json<ApiResponse<PlansResponse>> {
    Json(ApiResponse::ok(PlansResponse { plans: plans::all() }))
}

/// POST /api/invest
///
/// 투자가 커밋되면 바로 응답한다. 추천 커미션은 백그라운드 task에서 지급되며
/// 그 결과는 응답에 영향을 주지 않는다.
pub async fn invest(
    State(state): State<AppState>,
    payload: Result<Json<InvestRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<InvestResponse>>, ApiError> {
    let req = body(payload)?;
    let required = "User ID and Plan ID required";
    let user_id = require(req.user_id, required)?;
    let plan_id = require(req.plan_id, required)?;

    let placed = services::place_investment(state.db.clone(), user_id, plan_id).await?;
    // detach
    drop(placed.commissions);

    Ok(Json(ApiResponse::with_message(
        "Investment successful!",
        InvestResponse {
            investment: placed.investment,
        },
    )))
}

/// GET /api/investments/:user_id
pub async fn list_investments(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<InvestmentsResponse>>, ApiError> {
    let user_id = parse_id(&user_id, "user ID")?;
    let investments = state.db.investments_for_user(user_id).await?;

    Ok(Json(ApiResponse::ok(InvestmentsResponse { investments })))
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::{get, post, test_app};
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[tokio::test]
    async fn test_plans_listing() {
        let (_, app) = test_app();

        let body = get(&app, "/api/plans").await;

        let plans = body["plans"].as_array().unwrap();
        assert_eq!(plans.len(), 8);
        assert_eq!(plans[0]["id"], 1);
        assert_eq!(plans[0]["investment_usd"], 10.0);
        assert_eq!(plans[7]["daily_profit_bdt"], 20000.0);
    }

    #[tokio::test]
    async fn test_invest_debits_and_lists() {
        let (repo, app) = test_app();
        let user = repo.seed_user("investor", dec!(60), dec!(0), None);

        let body = post(&app, "/api/invest", json!({ "user_id": user, "plan_id": 2 })).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Investment successful!");
        assert_eq!(body["investment"]["investment_usd"], 50.0);
        assert_eq!(body["investment"]["daily_profit_bdt"], 200.0);
        assert_eq!(repo.user(user).balance_usd, dec!(10));

        let body = get(&app, &format!("/api/investments/{}", user)).await;
        assert_eq!(body["investments"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invest_failures() {
        let (repo, app) = test_app();
        let user = repo.seed_user("investor", dec!(5), dec!(0), None);

        let body = post(&app, "/api/invest", json!({ "user_id": user })).await;
        assert_eq!(body["message"], "User ID and Plan ID required");

        let body = post(&app, "/api/invest", json!({ "user_id": user, "plan_id": 12 })).await;
        assert_eq!(body["message"], "Invalid plan");

        let body = post(&app, "/api/invest", json!({ "user_id": user, "plan_id": 1 })).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Insufficient USDT balance");
        assert_eq!(repo.user(user).balance_usd, dec!(5));
    }
}
