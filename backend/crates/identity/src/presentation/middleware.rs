//! Bearer Token Middleware
//!
//! Validates the `Authorization: Bearer <token>` header on protected
//! routes and exposes the verified claims to handlers via a request
//! extension.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header::AUTHORIZATION};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::token::{Claims, TokenIssuer};
use crate::error::IdentityError;

/// Middleware state
#[derive(Clone)]
pub struct TokenAuthState {
    pub issuer: Arc<TokenIssuer>,
}

/// Verified identity of the caller, inserted by [`require_bearer`]
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub claims: Claims,
}

impl AuthenticatedAccount {
    /// Account identifier from the token subject
    pub fn account_id(&self) -> &str {
        &self.claims.sub
    }
}

/// Middleware that requires a valid bearer token
pub async fn require_bearer(
    State(state): State<TokenAuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let header_value = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| IdentityError::TokenInvalid.into_response())?;

    let token =
        bearer_token_from_header(header_value).ok_or_else(|| IdentityError::TokenInvalid.into_response())?;

    let claims = state
        .issuer
        .validate(token)
        .map_err(|e| e.into_response())?;

    req.extensions_mut().insert(AuthenticatedAccount { claims });

    Ok(next.run(req).await)
}

/// Extract a Bearer token from an Authorization header value.
fn bearer_token_from_header(header_value: &str) -> Option<&str> {
    let mut parts = header_value.split_whitespace();
    let scheme = parts.next()?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = parts.next()?;
    if token.is_empty() || parts.next().is_some() {
        return None;
    }

    Some(token)
}
