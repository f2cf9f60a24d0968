//! Register Use Case
//!
//! Validates input, enforces email uniqueness, hashes the password,
//! and persists a new account. Exactly one row is created on success;
//! none on any failure path.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::IdentityConfig;
use crate::domain::entity::Account;
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::{Email, PasswordDigest, PasswordPolicy};
use crate::error::{FieldError, IdentityError, IdentityResult};

/// Register input
pub struct RegisterInput {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Register output
pub struct RegisterOutput {
    pub account_id: String,
}

/// Validate registration input eagerly, collecting every failing field
/// in input order rather than stopping at the first.
pub fn validate_registration(input: &RegisterInput, policy: &PasswordPolicy) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Err(e) = Email::new(&input.email) {
        errors.push(FieldError::new("email", e.to_string()));
    }

    if input.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    } else {
        let clear = ClearTextPassword::new(input.password.clone());
        if let Err(message) = policy.check(&clear) {
            errors.push(FieldError::new("password", message));
        }
    }

    errors
}

/// Register use case
pub struct RegisterUseCase<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    config: Arc<IdentityConfig>,
}

impl<S> RegisterUseCase<S>
where
    S: CredentialStore,
{
    pub fn new(store: Arc<S>, config: Arc<IdentityConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> IdentityResult<RegisterOutput> {
        let errors = validate_registration(&input, &self.config.password_policy);
        if !errors.is_empty() {
            return Err(IdentityError::Validation(errors));
        }

        let email = Email::new(&input.email)
            .map_err(|e| IdentityError::Validation(vec![FieldError::new("email", e.to_string())]))?;

        // Friendly pre-check. The insert below is still the authority:
        // a concurrent registration can slip past this lookup.
        if self.store.exists_by_email(&email).await? {
            return Err(IdentityError::DuplicateEmail);
        }

        // Hashing is CPU-bound; keep it off the async worker threads
        let clear = ClearTextPassword::new(input.password);
        let params = self.config.hash_params;
        let digest = tokio::task::spawn_blocking(move || {
            PasswordDigest::from_clear_text(&clear, params)
        })
        .await
        .map_err(|e| IdentityError::Internal(format!("Hashing task failed: {e}")))??;

        let account = Account::new(input.name, input.username, email, digest);

        match self.store.create(&account).await {
            Ok(()) => {}
            // Lost the race against a concurrent registration with the
            // same email: the store's uniqueness constraint fired
            Err(IdentityError::Database(e))
                if kernel::error::conversions::is_unique_violation(&e) =>
            {
                return Err(IdentityError::DuplicateEmail);
            }
            Err(e) => return Err(e),
        }

        tracing::info!(
            account_id = %account.account_id,
            email = %account.email,
            "Account registered"
        );

        Ok(RegisterOutput {
            account_id: account.account_id.to_string(),
        })
    }
}
