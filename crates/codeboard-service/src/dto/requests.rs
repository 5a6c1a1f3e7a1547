//! Request DTOs for API endpoints
//!
//! Content rules (length, code pattern) belong to the domain and are checked
//! there, so `CreateCodeRequest` carries no validator attributes.

use serde::Deserialize;
use validator::Validate;

/// Post a code
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCodeRequest {
    pub content: String,
}

/// Query string of the listing endpoint
///
/// The upper bound is the configured list cap, checked by the service.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListCodesQuery {
    #[validate(range(min = 1, message = "limit must be at least 1"))]
    pub limit: Option<usize>,
}
