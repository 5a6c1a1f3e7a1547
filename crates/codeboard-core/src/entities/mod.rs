//! Domain entities - core business objects

mod code;
mod quota;

pub use code::{Code, NewCode};
pub use quota::DailyQuota;
