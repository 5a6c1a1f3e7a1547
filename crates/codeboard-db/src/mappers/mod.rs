//! Entity to model mappers
//!
//! - `From<CodeModel> for Code`: convert database rows to domain objects
//! - `CodeInsert`: prepare a code for insertion

mod code;

pub use code::CodeInsert;
