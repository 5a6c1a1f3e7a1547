//! Database models - SQLx-compatible structs for PostgreSQL tables

mod code;

pub use code::CodeModel;
