//! Code handlers
//!
//! Listing, posting and claiming codes.

use axum::{extract::State, Json};
use codeboard_service::{CodeResponse, CodeService, CreateCodeRequest, ListCodesQuery};

use crate::extractors::{ApiJson, CodeIdPath, UserIdentity, ValidatedQuery};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// List active codes, flagged for the caller
///
/// GET /api/codes?limit=N
pub async fn list_codes(
    State(state): State<AppState>,
    identity: UserIdentity,
    ValidatedQuery(query): ValidatedQuery<ListCodesQuery>,
) -> ApiResult<Json<Vec<CodeResponse>>> {
    let service = CodeService::new(state.service_context());
    let codes = service.list_codes(identity.token(), &query).await?;
    Ok(Json(codes))
}

/// Post a new code
///
/// POST /api/codes
pub async fn post_code(
    State(state): State<AppState>,
    identity: UserIdentity,
    ApiJson(request): ApiJson<CreateCodeRequest>,
) -> ApiResult<Created<Json<CodeResponse>>> {
    let service = CodeService::new(state.service_context());
    let code = service.post_code(identity.token(), request).await?;
    Ok(Created(Json(code)))
}

/// Claim one use of a code
///
/// POST /api/codes/{code_id}/claim
pub async fn claim_code(
    State(state): State<AppState>,
    identity: UserIdentity,
    CodeIdPath(code_id): CodeIdPath,
) -> ApiResult<Json<CodeResponse>> {
    let service = CodeService::new(state.service_context());
    let code = service.claim_code(identity.token(), code_id).await?;
    Ok(Json(code))
}
