//! Path parameter extractors
//!
//! Type-safe extraction of code ids from path parameters.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use codeboard_core::CodeId;
use serde::Deserialize;

use crate::response::ApiError;

/// Raw path parameters of the per-code routes
#[derive(Debug, Deserialize)]
struct CodeIdParams {
    code_id: String,
}

/// The `:code_id` segment, parsed
#[derive(Debug, Clone, Copy)]
pub struct CodeIdPath(pub CodeId);

#[async_trait]
impl<S> FromRequestParts<S> for CodeIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<CodeIdParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        let id = CodeId::parse(&params.code_id)
            .map_err(|_| ApiError::invalid_path("Invalid code_id format"))?;
        Ok(Self(id))
    }
}
