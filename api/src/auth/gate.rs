use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use super::{token::TokenIssuer, AuthError};
use crate::{error::AppError, AppState};

const BEARER_PREFIX: &str = "Bearer ";

/// Resolve an `Authorization` header value to the caller's user id.
pub fn authorize(raw_header: Option<&str>, tokens: &TokenIssuer) -> Result<i64, AuthError> {
    let header = match raw_header {
        Some(value) if !value.trim().is_empty() => value,
        _ => return Err(AuthError::MissingToken),
    };

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MalformedToken)?;

    let claims = tokens.verify(token)?;
    Ok(claims.user_id)
}

/// Extractor for protected routes. `user_id` comes from verified claims and
/// is the only caller identity handlers may use.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let raw_header = match parts.headers.get(header::AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| AuthError::MalformedToken)?),
            None => None,
        };

        let user_id = authorize(raw_header, &state.tokens)?;
        Ok(AuthUser { user_id })
    }
}
