//! Login Use Case
//!
//! Verifies credentials and issues a signed token. Absent account and
//! wrong password produce the same error and cost the same amount of
//! hashing work, so callers cannot enumerate registered emails through
//! error shape or response latency.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::token::TokenIssuer;
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::{Email, PasswordDigest};
use crate::error::{IdentityError, IdentityResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
pub struct LoginOutput {
    /// Signed bearer token
    pub token: String,
}

/// Login use case
pub struct LoginUseCase<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    issuer: Arc<TokenIssuer>,
    decoy_digest: Arc<PasswordDigest>,
}

impl<S> LoginUseCase<S>
where
    S: CredentialStore,
{
    pub fn new(store: Arc<S>, issuer: Arc<TokenIssuer>, decoy_digest: Arc<PasswordDigest>) -> Self {
        Self {
            store,
            issuer,
            decoy_digest,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> IdentityResult<LoginOutput> {
        // A syntactically invalid email cannot belong to any account;
        // treat it as an absent account rather than a validation error
        let account = match Email::new(&input.email) {
            Ok(email) => self.store.find_by_email(&email).await?,
            Err(_) => None,
        };

        let clear = ClearTextPassword::new(input.password);

        let verified = match &account {
            Some(account) => {
                let digest = account.password_digest.clone();
                spawn_verify(digest, clear).await?
            }
            None => {
                // Burn the same hashing work against a decoy digest so
                // this path is not measurably faster
                let decoy = Arc::clone(&self.decoy_digest);
                spawn_verify((*decoy).clone(), clear).await?;
                false
            }
        };

        let account = match (account, verified) {
            (Some(account), true) => account,
            _ => return Err(IdentityError::InvalidCredentials),
        };

        let token = self.issuer.issue(&account.account_id)?;

        tracing::info!(
            account_id = %account.account_id,
            "Account signed in"
        );

        Ok(LoginOutput { token })
    }
}

/// Run constant-time digest verification off the async worker threads.
async fn spawn_verify(digest: PasswordDigest, clear: ClearTextPassword) -> IdentityResult<bool> {
    tokio::task::spawn_blocking(move || digest.verify(&clear))
        .await
        .map_err(|e| IdentityError::Internal(format!("Verification task failed: {e}")))
}
