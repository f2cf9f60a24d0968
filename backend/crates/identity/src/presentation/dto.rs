//! API DTOs (Data Transfer Objects)
//!
//! Account responses carry identity data only; the password digest has
//! no representation here at all.

use serde::{Deserialize, Serialize};

use crate::domain::entity::Account;

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Confirmation message response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
}

// ============================================================================
// Account CRUD
// ============================================================================

/// Account response (read operations)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.account_id.to_string(),
            name: account.name.clone(),
            username: account.username.clone(),
            email: account.email.to_string(),
            created_at: account.created_at.timestamp_millis(),
            updated_at: account.updated_at.timestamp_millis(),
        }
    }
}

/// Account update request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
}
