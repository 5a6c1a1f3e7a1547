//! # codeboard-db
//!
//! Storage layer implementing the `CodeRegistry` and `QuotaLedger` traits.
//!
//! ## Overview
//!
//! Two backends share the rule checks from `codeboard-core`:
//!
//! - [`MemoryBoardStore`]: one mutex around codes and ledger, lost on restart
//! - [`PgBoardStore`]: PostgreSQL via SQLx, one transaction per write
//!
//! ## Usage
//!
//! ```rust,ignore
//! use codeboard_db::{create_pool, PgBoardStore, PoolConfig};
//!
//! async fn example(url: &str) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::new(url)).await?;
//!     let store = PgBoardStore::new(pool);
//!     store.ensure_schema().await?;
//!
//!     // Hand the store to the service layer as both registry and ledger...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, PgPool, PoolConfig};
pub use repositories::{MemoryBoardStore, PgBoardStore};
