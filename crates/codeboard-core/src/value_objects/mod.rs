//! Value objects - immutable types that represent domain concepts

mod calendar_day;
mod code_id;
mod user_token;

pub use calendar_day::{CalendarDay, DayBoundary, DayBoundaryParseError};
pub use code_id::{CodeId, CodeIdParseError};
pub use user_token::{UserToken, UserTokenError};
