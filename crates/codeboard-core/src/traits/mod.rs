//! Ports the infrastructure layer implements

mod clock;
mod repositories;

pub use clock::{Clock, ManualClock, SystemClock};
pub use repositories::{ActionStamp, CodeRegistry, QuotaLedger, RepoResult};
