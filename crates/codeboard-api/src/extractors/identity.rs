//! Caller identity extractor
//!
//! The board has no accounts: every request names its caller in the
//! `X-User-Id` header and the token is taken at face value.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderName, HeaderValue},
};
use axum_extra::{
    headers::{self, Header},
    typed_header::TypedHeaderRejectionReason,
    TypedHeader,
};
use codeboard_common::AppError;
use codeboard_core::{DomainError, UserToken, UserTokenError};

use crate::response::ApiError;

/// Name of the identity header
pub static X_USER_ID: HeaderName = HeaderName::from_static("x-user-id");

/// Raw `X-User-Id` header value
#[derive(Debug, Clone)]
pub struct XUserId(pub String);

impl Header for XUserId {
    fn name() -> &'static HeaderName {
        &X_USER_ID
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        let value = values.next().ok_or_else(headers::Error::invalid)?;
        let raw = std::str::from_utf8(value.as_bytes()).map_err(|_| headers::Error::invalid())?;
        Ok(Self(raw.to_string()))
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        if let Ok(value) = HeaderValue::from_str(&self.0) {
            values.extend(std::iter::once(value));
        }
    }
}

/// Caller identity taken from `X-User-Id`
///
/// Missing header is a 401; a header that is present but not a usable
/// token is a 400.
#[derive(Debug, Clone)]
pub struct UserIdentity(pub UserToken);

impl UserIdentity {
    pub fn token(&self) -> &UserToken {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for UserIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(XUserId(raw)) = TypedHeader::<XUserId>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| match rejection.reason() {
                TypedHeaderRejectionReason::Missing => ApiError::from(AppError::MissingUserId),
                _ => ApiError::from(DomainError::InvalidUserToken(
                    UserTokenError::InvalidCharacter,
                )),
            })?;

        let token = UserToken::parse(&raw).map_err(DomainError::from)?;
        Ok(Self(token))
    }
}
