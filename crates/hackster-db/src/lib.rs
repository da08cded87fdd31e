//! # hackster-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `hackster-core`. It handles:
//!
//! - Connection pool management and embedded migrations
//! - Database models with SQLx `FromRow` derives
//! - Model -> entity mappers
//! - Repository implementations, including the transactional transition store
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hackster_db::pool::{create_pool, DatabaseConfig};
//! use hackster_db::repositories::PgRecordRepository;
//! use hackster_core::traits::RecordRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     hackster_db::run_migrations(&pool).await?;
//!     let records = PgRecordRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod migrate;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use migrate::{run_migrations, MIGRATOR};
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::{
    PgDeadLetterRepository, PgEventLogRepository, PgEventQueueRepository, PgRecordRepository,
    PgReportRepository, PgTransitionStore,
};
