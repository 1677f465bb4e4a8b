//! Database Module
//!
//! PostgreSQL (SQLx) 기반 저장소.
//!
//! - `models`: 테이블 row 타입과 조회용 view
//! - `repository`: 서비스가 의존하는 trait (+ 테스트용 mock)
//! - `users` / `ledger` / `admin`: `Database`의 trait 구현
//!
//! 잔액이 함께 움직이는 쓰기(투자, 출금, 입금 확인, 수익 지급)는
//! 하나의 `sqlx::Transaction` 안에서 처리한다. 중간에 에러가 나면
//! 커밋되지 않은 트랜잭션이 drop되면서 롤백된다.

mod admin;
mod ledger;
mod models;
mod repository;
mod users;

pub use models::*;
pub use repository::{AdminRepository, LedgerRepository, Repository, UserRepository};

#[cfg(test)]
pub use repository::mock;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

/// 저장소 에러
#[derive(Debug, Error)]
pub enum StoreError {
    /// UNIQUE 제약 위반 (필드명)
    #[error("duplicate value for {0}")]
    Duplicate(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// UNIQUE 위반은 제약 이름에서 필드명을 뽑아 `Duplicate`로 변환
    ///
    /// PostgreSQL 기본 제약 이름: `<table>_<column>_key`
    pub(crate) fn classify(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.kind() == sqlx::error::ErrorKind::UniqueViolation {
                let field = db_err
                    .constraint()
                    .map(constraint_field)
                    .unwrap_or("unknown")
                    .to_string();
                return StoreError::Duplicate(field);
            }
        }
        StoreError::Database(err)
    }
}

fn constraint_field(constraint: &str) -> &str {
    constraint
        .strip_suffix("_key")
        .and_then(|rest| rest.split_once('_'))
        .map(|(_, field)| field)
        .unwrap_or(constraint)
}

/// 데이터베이스 연결 및 쿼리 담당
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// 데이터베이스 연결
    ///
    /// # Connection Pool Settings
    ///
    /// - max_connections: 설정값 (기본 10)
    /// - min_connections: 1
    /// - acquire_timeout: 3초
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .acquire_timeout(std::time::Duration::from_secs(3))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// 마이그레이션 실행
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Repository for Database {
    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
