//! Password Value Objects
//!
//! Domain wrappers over `platform::password`:
//! - `PasswordPolicy` - the strength rule applied at registration
//! - `PasswordDigest` - the stored, irreversible form of a password
//!
//! The policy is a value, not a constant: callers wanting a stricter
//! rule configure a different minimum length (or swap the policy at the
//! validation seam) without touching the hashing code.

use std::fmt;

use platform::password::{ClearTextPassword, HashParams, HashedPassword, PasswordHashError};

use crate::error::{IdentityError, IdentityResult};

/// Default minimum password length.
///
/// Deliberately weak (length-only, six characters), carried over from
/// the original policy.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

// ============================================================================
// Password Policy
// ============================================================================

/// Minimum-length password policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

impl PasswordPolicy {
    /// Check a plaintext against the policy.
    ///
    /// Returns a user-facing message on violation. Length is counted in
    /// Unicode code points, not bytes.
    pub fn check(&self, password: &ClearTextPassword) -> Result<(), String> {
        if password.char_count() < self.min_length {
            return Err(format!(
                "Password must be at least {} characters",
                self.min_length
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Password Digest (Hashed, for storage)
// ============================================================================

/// Hashed password digest for storage
///
/// PHC-format Argon2id string. Safe to persist; never serialized into
/// API responses or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(HashedPassword);

impl PasswordDigest {
    /// Hash a plaintext into a digest.
    ///
    /// Salted per call: hashing the same plaintext twice yields two
    /// different digests, both of which verify.
    pub fn from_clear_text(
        password: &ClearTextPassword,
        params: HashParams,
    ) -> IdentityResult<Self> {
        let hashed = password.hash(params).map_err(|e| match e {
            PasswordHashError::HashingFailed(msg) => {
                IdentityError::Internal(format!("Password hashing failed: {msg}"))
            }
            PasswordHashError::InvalidHashFormat => {
                IdentityError::Internal("Unexpected error during password hashing".to_string())
            }
        })?;

        Ok(Self(hashed))
    }

    /// Create from PHC string (from database)
    pub fn from_phc_string(phc_string: impl Into<String>) -> IdentityResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc_string)
            .map_err(|_| IdentityError::Internal("Invalid password digest in store".to_string()))?;

        Ok(Self(hashed))
    }

    /// Get PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Verify a plaintext against this digest.
    ///
    /// Constant-time; a malformed digest verifies as `false`.
    pub fn verify(&self, password: &ClearTextPassword) -> bool {
        self.0.verify(password)
    }

    /// A digest of a fixed throwaway plaintext.
    ///
    /// Verified on the absent-account login path so that lookups which
    /// find no account cost the same as a real (failed) verification.
    pub fn decoy(params: HashParams) -> IdentityResult<Self> {
        let decoy = ClearTextPassword::new("decoy-password-for-timing".to_string());
        Self::from_clear_text(&decoy, params)
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordDigest")
            .field("hash", &"[HASH]")
            .finish()
    }
}

impl fmt::Display for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[PASSWORD_DIGEST]")
    }
}

// ============================================================================
// Tests
// ============================================================================
