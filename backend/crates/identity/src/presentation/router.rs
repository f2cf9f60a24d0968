//! Identity Router
//!
//! Assembles the HTTP surface. Router construction builds the token
//! issuer and the decoy digest up front, so a misconfiguration fails
//! at startup instead of on the first request.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::IdentityConfig;
use crate::application::token::TokenIssuer;
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::PasswordDigest;
use crate::error::IdentityResult;
use crate::infra::postgres::PgCredentialStore;
use crate::presentation::handlers::{self, IdentityAppState};
use crate::presentation::middleware::{TokenAuthState, require_bearer};

/// Create the identity router with the PostgreSQL store
pub fn identity_router(store: PgCredentialStore, config: IdentityConfig) -> IdentityResult<Router> {
    identity_router_generic(store, config)
}

/// Create a generic identity router for any store implementation
pub fn identity_router_generic<S>(store: S, config: IdentityConfig) -> IdentityResult<Router>
where
    S: CredentialStore + Clone + Send + Sync + 'static,
{
    let issuer = Arc::new(TokenIssuer::new(&config));
    let decoy_digest = Arc::new(PasswordDigest::decoy(config.hash_params)?);

    let auth_state = TokenAuthState {
        issuer: issuer.clone(),
    };

    let state = IdentityAppState {
        store: Arc::new(store),
        config: Arc::new(config),
        issuer,
        decoy_digest,
    };

    Ok(Router::new()
        .route("/register", post(handlers::register::<S>))
        .route("/login", post(handlers::login::<S>))
        .route(
            "/me",
            get(handlers::current_account::<S>)
                .layer(from_fn_with_state(auth_state, require_bearer)),
        )
        .route("/", get(handlers::list_accounts::<S>))
        .route(
            "/{id}",
            get(handlers::get_account::<S>)
                .put(handlers::update_account::<S>)
                .delete(handlers::delete_account::<S>),
        )
        .with_state(state))
}
