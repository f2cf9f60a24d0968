//! Account Entity
//!
//! A registered account: identity data plus the stored password digest.
//! The digest rides along for credential verification but is redacted
//! from `Debug` and never serialized outward.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{AccountId, Email, PasswordDigest};

/// Account entity
#[derive(Debug, Clone)]
pub struct Account {
    /// Opaque unique identifier
    pub account_id: AccountId,
    /// Display name
    pub name: String,
    /// Username (for display; uniqueness is not enforced)
    pub username: String,
    /// Email address (unique, case-insensitive)
    pub email: Email,
    /// Salted password digest
    pub password_digest: PasswordDigest,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        email: Email,
        password_digest: PasswordDigest,
    ) -> Self {
        let now = Utc::now();

        Self {
            account_id: AccountId::new(),
            name: name.into(),
            username: username.into(),
            email,
            password_digest,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a profile update (name, username, email)
    pub fn apply_update(&mut self, name: String, username: String, email: Email) {
        self.name = name;
        self.username = username;
        self.email = email;
        self.updated_at = Utc::now();
    }
}
