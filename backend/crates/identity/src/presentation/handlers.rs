//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::config::IdentityConfig;
use crate::application::token::TokenIssuer;
use crate::application::{LoginInput, LoginUseCase, RegisterInput, RegisterUseCase};
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::{AccountId, Email, PasswordDigest};
use crate::error::{FieldError, IdentityError, IdentityResult};
use crate::presentation::dto::{
    AccountResponse, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    UpdateAccountRequest,
};
use crate::presentation::middleware::AuthenticatedAccount;

/// Shared state for identity handlers
#[derive(Clone)]
pub struct IdentityAppState<S>
where
    S: CredentialStore + Clone + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub config: Arc<IdentityConfig>,
    pub issuer: Arc<TokenIssuer>,
    pub decoy_digest: Arc<PasswordDigest>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /register
pub async fn register<S>(
    State(state): State<IdentityAppState<S>>,
    Json(req): Json<RegisterRequest>,
) -> IdentityResult<Json<MessageResponse>>
where
    S: CredentialStore + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.store.clone(), state.config.clone());

    let input = RegisterInput {
        name: req.name,
        username: req.username,
        email: req.email,
        password: req.password,
    };

    use_case.execute(input).await?;

    Ok(Json(MessageResponse {
        message: "Account registered successfully".to_string(),
    }))
}

// ============================================================================
// Login
// ============================================================================

/// POST /login
pub async fn login<S>(
    State(state): State<IdentityAppState<S>>,
    Json(req): Json<LoginRequest>,
) -> IdentityResult<Json<LoginResponse>>
where
    S: CredentialStore + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.store.clone(),
        state.issuer.clone(),
        state.decoy_digest.clone(),
    );

    let input = LoginInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(LoginResponse {
        token: output.token,
    }))
}

// ============================================================================
// Current Account (bearer-protected)
// ============================================================================

/// GET /me
pub async fn current_account<S>(
    State(state): State<IdentityAppState<S>>,
    Extension(auth): Extension<AuthenticatedAccount>,
) -> IdentityResult<Json<MessageResponse>>
where
    S: CredentialStore + Clone + Send + Sync + 'static,
{
    let account_id = parse_account_id(auth.account_id())?;

    let account = state
        .store
        .find_by_id(&account_id)
        .await?
        .ok_or(IdentityError::AccountNotFound)?;

    Ok(Json(MessageResponse {
        message: format!("You are authenticated as {}", account.username),
    }))
}

// ============================================================================
// Account CRUD
// ============================================================================

/// GET /
pub async fn list_accounts<S>(
    State(state): State<IdentityAppState<S>>,
) -> IdentityResult<Json<Vec<AccountResponse>>>
where
    S: CredentialStore + Clone + Send + Sync + 'static,
{
    let accounts = state.store.list().await?;
    Ok(Json(accounts.iter().map(AccountResponse::from).collect()))
}

/// GET /{id}
pub async fn get_account<S>(
    State(state): State<IdentityAppState<S>>,
    Path(id): Path<String>,
) -> IdentityResult<Json<AccountResponse>>
where
    S: CredentialStore + Clone + Send + Sync + 'static,
{
    let account_id = parse_account_id(&id)?;

    let account = state
        .store
        .find_by_id(&account_id)
        .await?
        .ok_or(IdentityError::AccountNotFound)?;

    Ok(Json(AccountResponse::from(&account)))
}

/// PUT /{id}
pub async fn update_account<S>(
    State(state): State<IdentityAppState<S>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAccountRequest>,
) -> IdentityResult<impl IntoResponse>
where
    S: CredentialStore + Clone + Send + Sync + 'static,
{
    if id != req.id {
        return Err(IdentityError::IdMismatch);
    }

    let account_id = parse_account_id(&id)?;

    let email = Email::new(&req.email).map_err(|e| {
        IdentityError::Validation(vec![FieldError::new("email", e.to_string())])
    })?;

    let mut account = state
        .store
        .find_by_id(&account_id)
        .await?
        .ok_or(IdentityError::AccountNotFound)?;

    account.apply_update(req.name, req.username, email);

    match state.store.update(&account).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err(IdentityError::AccountNotFound),
        // Changing to an email another account already owns
        Err(IdentityError::Database(e))
            if kernel::error::conversions::is_unique_violation(&e) =>
        {
            Err(IdentityError::DuplicateEmail)
        }
        Err(e) => Err(e),
    }
}

/// DELETE /{id}
pub async fn delete_account<S>(
    State(state): State<IdentityAppState<S>>,
    Path(id): Path<String>,
) -> IdentityResult<impl IntoResponse>
where
    S: CredentialStore + Clone + Send + Sync + 'static,
{
    let account_id = parse_account_id(&id)?;

    if state.store.delete(&account_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(IdentityError::AccountNotFound)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse a path/claim identifier. An unparseable ID cannot name any
/// account, so it reads as "not found" rather than a validation error.
fn parse_account_id(raw: &str) -> IdentityResult<AccountId> {
    raw.parse().map_err(|_| IdentityError::AccountNotFound)
}
