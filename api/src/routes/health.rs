//! Health Check Endpoints
//!
//! - `GET /health`: 깊은 헬스체크 (DB 왕복 포함). 로드밸런서/모니터링용
//! - `GET /api/test`: 모바일 앱이 서버 도달 여부와 입금 주소를 확인하는 용도

use axum::{extract::State, Json};
use chrono::SecondsFormat;
use serde::Serialize;

use crate::types::ApiResponse;
use crate::AppState;

/// Health check 응답
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: DatabaseStatus,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct DatabaseStatus {
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

/// `/api/test` payload
#[derive(Serialize)]
pub struct ServerInfo {
    pub bep20_address: String,
    pub timestamp: String,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_start = std::time::Instant::now();
    let db_status = match state.db.health_check().await {
        Ok(_) => DatabaseStatus {
            connected: true,
            latency_ms: Some(db_start.elapsed().as_millis() as u64),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            DatabaseStatus {
                connected: false,
                latency_ms: None,
            }
        }
    };

    Json(HealthResponse {
        status: if db_status.connected { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /api/test
pub async fn server_info(State(state): State<AppState>) -> Json<ApiResponse<ServerInfo>> {
    Json(ApiResponse::with_message(
        "🚀 HelpUs Investment Server Running!",
        ServerInfo {
            bep20_address: state.config.bep20_address.clone(),
            timestamp: chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        },
    ))
}
