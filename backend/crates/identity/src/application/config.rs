//! Application Configuration
//!
//! Configuration for the identity application layer. Loaded once at
//! startup; a missing or weak signing secret is a startup failure, so
//! the service never accepts requests it cannot sign tokens for.

use std::env;
use std::fmt;
use std::time::Duration;

use platform::password::HashParams;
use thiserror::Error;

use crate::domain::value_object::PasswordPolicy;

/// Minimum signing-secret length in bytes (HS256 key entropy floor)
pub const MIN_TOKEN_SECRET_BYTES: usize = 32;

/// Default token time-to-live
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Configuration loading errors (fatal at startup)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),

    #[error("{0} is invalid: {1}")]
    InvalidVar(&'static str, String),

    #[error("TOKEN_SECRET must be at least {MIN_TOKEN_SECRET_BYTES} bytes")]
    WeakSecret,
}

/// Identity application configuration
#[derive(Clone)]
pub struct IdentityConfig {
    /// Symmetric signing secret for tokens (HS256)
    pub token_secret: String,
    /// Expected token issuer
    pub token_issuer: String,
    /// Expected token audience
    pub token_audience: String,
    /// Token time-to-live
    pub token_ttl: Duration,
    /// Password strength policy
    pub password_policy: PasswordPolicy,
    /// Argon2id work-factor parameters
    pub hash_params: HashParams,
}

impl IdentityConfig {
    /// Load configuration from the environment.
    ///
    /// `TOKEN_SECRET` is required and must carry at least
    /// [`MIN_TOKEN_SECRET_BYTES`] bytes; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token_secret =
            env::var("TOKEN_SECRET").map_err(|_| ConfigError::MissingVar("TOKEN_SECRET"))?;
        if token_secret.len() < MIN_TOKEN_SECRET_BYTES {
            return Err(ConfigError::WeakSecret);
        }

        let token_issuer =
            env::var("TOKEN_ISSUER").unwrap_or_else(|_| "user-auth-manager".to_string());
        let token_audience =
            env::var("TOKEN_AUDIENCE").unwrap_or_else(|_| "user-auth-manager-clients".to_string());

        let token_ttl = match env::var("TOKEN_TTL_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse()
                    .map_err(|e: std::num::ParseIntError| {
                        ConfigError::InvalidVar("TOKEN_TTL_SECS", e.to_string())
                    })?,
            ),
            Err(_) => DEFAULT_TOKEN_TTL,
        };

        let password_policy = match env::var("PASSWORD_MIN_LENGTH") {
            Ok(raw) => PasswordPolicy {
                min_length: raw.parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::InvalidVar("PASSWORD_MIN_LENGTH", e.to_string())
                })?,
            },
            Err(_) => PasswordPolicy::default(),
        };

        let defaults = HashParams::default();
        let hash_params = HashParams {
            memory_kib: env_u32("ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            iterations: env_u32("ARGON2_ITERATIONS", defaults.iterations)?,
            parallelism: env_u32("ARGON2_PARALLELISM", defaults.parallelism)?,
        };

        Ok(Self {
            token_secret,
            token_issuer,
            token_audience,
            token_ttl,
            password_policy,
            hash_params,
        })
    }

    /// Token TTL in whole seconds
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl.as_secs() as i64
    }
}

fn env_u32(name: &'static str, default: u32) -> Result<u32, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: std::num::ParseIntError| ConfigError::InvalidVar(name, e.to_string())),
        Err(_) => Ok(default),
    }
}

impl fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("token_secret", &"[REDACTED]")
            .field("token_issuer", &self.token_issuer)
            .field("token_audience", &self.token_audience)
            .field("token_ttl", &self.token_ttl)
            .field("password_policy", &self.password_policy)
            .field("hash_params", &self.hash_params)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let config = IdentityConfig {
            token_secret: "a-very-long-secret-of-sufficient-length!".to_string(),
            token_issuer: "iss".to_string(),
            token_audience: "aud".to_string(),
            token_ttl: DEFAULT_TOKEN_TTL,
            password_policy: PasswordPolicy::default(),
            hash_params: HashParams::default(),
        };

        let debug = format!("{:?}", config);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sufficient-length"));
    }
}
