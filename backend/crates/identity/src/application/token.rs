//! Token Issuer
//!
//! Issues and validates signed, time-bounded bearer tokens (HS256).
//! Tokens are stateless: once issued they are simply valid within
//! their time window or invalid. There is no revocation list; lifetime
//! is bounded solely by expiry.

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind as JwtErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::application::config::IdentityConfig;
use crate::domain::value_object::AccountId;
use crate::error::{IdentityError, IdentityResult};

/// Claims embedded in every issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account identifier
    pub sub: String,
    /// Issued-at (Unix timestamp)
    pub iat: i64,
    /// Expiry (Unix timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

/// Signed-token issuer and validator
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    ttl_secs: i64,
}

impl TokenIssuer {
    /// Build from configuration.
    ///
    /// The secret has already been checked at config load; constructing
    /// the issuer itself cannot fail.
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.token_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.token_secret.as_bytes()),
            issuer: config.token_issuer.clone(),
            audience: config.token_audience.clone(),
            ttl_secs: config.token_ttl_secs(),
        }
    }

    /// Issue a token for an account, valid from now until now + TTL.
    pub fn issue(&self, account_id: &AccountId) -> IdentityResult<String> {
        self.issue_at(account_id, Utc::now())
    }

    /// Issue with an explicit issuance time. Test seam for expiry
    /// behavior; `issue` is the production path.
    pub(crate) fn issue_at(
        &self,
        account_id: &AccountId,
        issued_at: DateTime<Utc>,
    ) -> IdentityResult<String> {
        let iat = issued_at.timestamp();
        let claims = Claims {
            sub: account_id.to_string(),
            iat,
            exp: iat + self.ttl_secs,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| IdentityError::Internal(format!("Token signing failed: {e}")))
    }

    /// Validate a token: signature, issuer, audience, and expiry.
    ///
    /// Past expiry yields `TokenExpired`; every other failure -
    /// signature, issuer, audience, structure - is `TokenInvalid`, with
    /// no distinction between tampered and malformed input.
    pub fn validate(&self, token: &str) -> IdentityResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                JwtErrorKind::ExpiredSignature => IdentityError::TokenExpired,
                _ => IdentityError::TokenInvalid,
            }
        })?;

        Ok(data.claims)
    }
}
