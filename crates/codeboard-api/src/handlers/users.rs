//! User handlers
//!
//! Per-caller quota statistics.

use axum::{extract::State, Json};
use codeboard_service::{QuotaService, StatsResponse};

use crate::extractors::UserIdentity;
use crate::response::ApiResult;
use crate::state::AppState;

/// Today's post and claim counts for the caller
///
/// GET /api/user/stats
pub async fn get_stats(
    State(state): State<AppState>,
    identity: UserIdentity,
) -> ApiResult<Json<StatsResponse>> {
    let service = QuotaService::new(state.service_context());
    let stats = service.get_stats(identity.token()).await?;
    Ok(Json(stats))
}
