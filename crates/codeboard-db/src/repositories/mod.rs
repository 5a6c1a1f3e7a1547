//! Board store implementations
//!
//! Each store implements both `CodeRegistry` and `QuotaLedger` from
//! codeboard-core, since a post or claim touches codes and ledger together.

mod error;
mod memory;
mod postgres;

pub use memory::MemoryBoardStore;
pub use postgres::PgBoardStore;
