//! PostgreSQL Credential Store
//!
//! The `accounts` table carries a UNIQUE constraint on `email`; emails
//! are stored in canonical (lowercased) form, so the constraint is
//! effectively case-insensitive. A concurrent duplicate registration
//! surfaces here as a unique violation, which the register use case
//! maps to its duplicate-email rejection.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::Account;
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::{AccountId, Email, PasswordDigest};
use crate::error::IdentityResult;

/// PostgreSQL-backed credential store
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CredentialStore for PgCredentialStore {
    async fn create(&self, account: &Account) -> IdentityResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                name,
                username,
                email,
                password_digest,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(&account.name)
        .bind(&account.username)
        .bind(account.email.as_str())
        .bind(account.password_digest.as_phc_string())
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> IdentityResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT account_id, name, username, email, password_digest, created_at, updated_at
            FROM accounts
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> IdentityResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT account_id, name, username, email, password_digest, created_at, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> IdentityResult<bool> {
        let exists: Option<(bool,)> =
            sqlx::query_as("SELECT true FROM accounts WHERE email = $1")
                .bind(email.as_str())
                .fetch_optional(&self.pool)
                .await?;

        Ok(exists.is_some())
    }

    async fn list(&self) -> IdentityResult<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT account_id, name, username, email, password_digest, created_at, updated_at
            FROM accounts
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_account()).collect()
    }

    async fn update(&self, account: &Account) -> IdentityResult<bool> {
        let affected = sqlx::query(
            r#"
            UPDATE accounts
            SET name = $2, username = $3, email = $4, updated_at = $5
            WHERE account_id = $1
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(&account.name)
        .bind(&account.username)
        .bind(account.email.as_str())
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    async fn delete(&self, account_id: &AccountId) -> IdentityResult<bool> {
        let affected = sqlx::query("DELETE FROM accounts WHERE account_id = $1")
            .bind(account_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }
}

// ============================================================================
// Row mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    name: String,
    username: String,
    email: String,
    password_digest: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> IdentityResult<Account> {
        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            name: self.name,
            username: self.username,
            email: Email::from_db(self.email),
            password_digest: PasswordDigest::from_phc_string(self.password_digest)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
