//! HelpUs Investment API Library
//!
//! # Overview
//!
//! 모바일 투자 앱(HelpUs)의 REST 백엔드. 사용자는 USDT로 고정 플랜에 투자하고,
//! 일일 수익과 2단계 추천 커미션을 BDT로 받아 bKash/BEP20으로 출금한다.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                         API                          │
//! │                                                      │
//! │  ┌─────────┐    ┌──────────┐    ┌────────────────┐   │
//! │  │ Routes  │───▶│ Services │───▶│ dyn Repository │   │
//! │  └─────────┘    └──────────┘    └───────┬────────┘   │
//! │                                         │            │
//! └─────────────────────────────────────────┼────────────┘
//!                                           ▼
//!                                  ┌────────────────┐
//!                                  │   PostgreSQL   │
//!                                  └────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: 환경 설정 관리
//! - `error`: API 에러와 응답 envelope 변환
//! - `routes`: HTTP 엔드포인트 핸들러
//! - `services`: 비즈니스 로직 (투자, 커미션, 출금, 입금, 수익, 계정)
//! - `db`: 저장소 trait과 PostgreSQL 구현
//! - `types`: 공통 응답 타입
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use helpus_api::{config::Config, db::Database, routes, AppState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let db = Database::connect(&config.database_url, config.database_max_connections).await?;
//!     let app = routes::router(AppState {
//!         db: Arc::new(db),
//!         config: Arc::new(config),
//!     });
//!     // ... 서버 시작
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod services;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use db::{Database, Repository};
pub use error::ApiError;

/// 애플리케이션 전역 상태
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Repository>,
    pub config: Arc<Config>,
}
