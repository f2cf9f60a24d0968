//! In-Memory Credential Store
//!
//! HashMap-backed store for tests and local development. Enforces the
//! same email uniqueness invariant as the PostgreSQL store, so the
//! register use case sees identical duplicate behavior.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::domain::entity::Account;
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::{AccountId, Email};
use crate::error::{IdentityError, IdentityResult};

/// In-memory credential store
#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> IdentityResult<std::sync::RwLockReadGuard<'_, HashMap<Uuid, Account>>> {
        self.accounts
            .read()
            .map_err(|_| IdentityError::Internal("Store lock poisoned".to_string()))
    }

    fn write(&self) -> IdentityResult<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, Account>>> {
        self.accounts
            .write()
            .map_err(|_| IdentityError::Internal("Store lock poisoned".to_string()))
    }
}

impl CredentialStore for InMemoryCredentialStore {
    async fn create(&self, account: &Account) -> IdentityResult<()> {
        let mut accounts = self.write()?;

        // Storage-level uniqueness, checked under the write lock
        if accounts.values().any(|a| a.email == account.email) {
            return Err(IdentityError::DuplicateEmail);
        }

        accounts.insert(*account.account_id.as_uuid(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> IdentityResult<Option<Account>> {
        Ok(self.read()?.get(account_id.as_uuid()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> IdentityResult<Option<Account>> {
        Ok(self
            .read()?
            .values()
            .find(|a| a.email == *email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> IdentityResult<bool> {
        Ok(self.read()?.values().any(|a| a.email == *email))
    }

    async fn list(&self) -> IdentityResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self.read()?.values().cloned().collect();
        accounts.sort_by_key(|a| a.created_at);
        Ok(accounts)
    }

    async fn update(&self, account: &Account) -> IdentityResult<bool> {
        let mut accounts = self.write()?;

        if accounts
            .values()
            .any(|a| a.email == account.email && a.account_id != account.account_id)
        {
            return Err(IdentityError::DuplicateEmail);
        }

        match accounts.get_mut(account.account_id.as_uuid()) {
            Some(existing) => {
                *existing = account.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, account_id: &AccountId) -> IdentityResult<bool> {
        Ok(self.write()?.remove(account_id.as_uuid()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::PasswordDigest;
    use platform::password::{ClearTextPassword, HashParams};

    fn account(email: &str) -> Account {
        let digest = PasswordDigest::from_clear_text(
            &ClearTextPassword::new("abcdef".to_string()),
            HashParams {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
        )
        .unwrap();

        Account::new("Test", "test", Email::new(email).unwrap(), digest)
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let store = InMemoryCredentialStore::new();
        let account = account("a@x.com");
        store.create(&account).await.unwrap();

        let found = store
            .find_by_email(&Email::new("a@x.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.account_id, account.account_id);

        let found = store.find_by_id(&account.account_id).await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = InMemoryCredentialStore::new();
        store.create(&account("a@x.com")).await.unwrap();

        let result = store.create(&account("a@x.com")).await;
        assert!(matches!(result, Err(IdentityError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_missing_rows_are_none_not_errors() {
        let store = InMemoryCredentialStore::new();

        assert!(
            store
                .find_by_email(&Email::new("nope@x.com").unwrap())
                .await
                .unwrap()
                .is_none()
        );
        assert!(!store.delete(&AccountId::new()).await.unwrap());
        assert!(!store.update(&account("b@x.com")).await.unwrap());
    }
}
