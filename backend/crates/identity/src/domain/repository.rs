//! Repository Traits
//!
//! Interface for the credential store. Implementations live in the
//! infrastructure layer and carry no business rules; the one thing the
//! store must guarantee is a uniqueness constraint on email, so that a
//! concurrent duplicate insert surfaces as a constraint violation
//! rather than a second row.

use crate::domain::entity::Account;
use crate::domain::value_object::{AccountId, Email};
use crate::error::IdentityResult;

/// Credential store trait
///
/// Lookups for missing rows return `Ok(None)` / `Ok(false)`, never an
/// error.
#[trait_variant::make(CredentialStore: Send)]
pub trait LocalCredentialStore {
    /// Persist a new account. A store-level email uniqueness violation
    /// is reported as an error by the implementation.
    async fn create(&self, account: &Account) -> IdentityResult<()>;

    /// Find account by ID
    async fn find_by_id(&self, account_id: &AccountId) -> IdentityResult<Option<Account>>;

    /// Find account by email (case-insensitive: emails are canonical)
    async fn find_by_email(&self, email: &Email) -> IdentityResult<Option<Account>>;

    /// Check if an email is already registered
    async fn exists_by_email(&self, email: &Email) -> IdentityResult<bool>;

    /// List all accounts
    async fn list(&self) -> IdentityResult<Vec<Account>>;

    /// Update an account; returns false if it does not exist
    async fn update(&self, account: &Account) -> IdentityResult<bool>;

    /// Delete an account; returns false if it does not exist
    async fn delete(&self, account_id: &AccountId) -> IdentityResult<bool>;
}
