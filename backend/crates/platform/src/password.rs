//! Password Hashing and Verification
//!
//! Argon2id password handling with:
//! - Per-call random salt (two hashes of the same plaintext differ)
//! - Tunable work-factor parameters, embedded in the digest itself so
//!   stored digests survive parameter changes
//! - Zeroization of plaintext material
//! - Constant-time comparison
//!
//! Strength policy (minimum length etc.) is deliberately NOT enforced
//! here; that belongs to the domain layer, which owns the policy.

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Error Types
// ============================================================================

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed (entropy failure or invalid parameters)
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Invalid hash format
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Work-factor Parameters
// ============================================================================

/// Argon2id work-factor parameters.
///
/// Defaults follow the OWASP recommendation (m=19456 KiB, t=2, p=1).
/// The parameters are encoded into every digest, so raising them later
/// never invalidates digests already in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of iterations
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl HashParams {
    fn to_argon2(self) -> Result<Argon2<'static>, PasswordHashError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Ensures password data is erased from memory when dropped.
/// Does not implement `Clone`; `Debug` output is redacted.
/// Unicode is normalized with NFKC so visually identical inputs hash
/// identically.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Wrap a plaintext password, applying NFKC normalization.
    pub fn new(raw: String) -> Self {
        let normalized: String = raw.nfkc().collect();
        Self(normalized)
    }

    /// Get the password as bytes for hashing
    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Number of Unicode code points (for length policies)
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Hash the password using Argon2id
    ///
    /// Generates a fresh 128-bit random salt per call, so two hashes of
    /// the same plaintext always differ.
    ///
    /// ## Returns
    /// PHC-formatted hash string wrapped in `HashedPassword`
    pub fn hash(&self, params: HashParams) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(OsRng);
        let argon2 = params.to_argon2()?;

        let hash = argon2
            .hash_password(self.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
///
/// The PHC string includes the algorithm identifier, version, parameters
/// (memory, iterations, parallelism), salt, and hash, so verification
/// never depends on current configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();

        // Validate it's a valid PHC string
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;

        Ok(Self { hash })
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash
    ///
    /// Recomputes the hash with the salt and parameters embedded in the
    /// digest and compares in constant time. A malformed digest verifies
    /// as `false` rather than erroring, so callers cannot distinguish
    /// "no such digest" from "wrong password" by error shape.
    pub fn verify(&self, password: &ClearTextPassword) -> bool {
        let parsed_hash = match PasswordHash::new(&self.hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        // Argon2 uses constant-time comparison internally
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
