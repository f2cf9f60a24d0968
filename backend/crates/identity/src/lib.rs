//! Identity Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases, token issuance, configuration
//! - `infra/` - Store implementations (PostgreSQL, in-memory)
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Account registration with email uniqueness and password policy
//! - Login with credential verification and signed-token issuance
//! - Stateless bearer-token validation for protected routes
//! - Account CRUD surface (list, fetch, update, delete)
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, salted per call, tunable work factor
//! - Absent-account and wrong-password logins are indistinguishable
//!   (same error, equalized verification cost)
//! - Tokens are HS256-signed and time-bounded; no server-side revocation

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::IdentityConfig;
pub use application::token::{Claims, TokenIssuer};
pub use error::{IdentityError, IdentityResult};
pub use infra::postgres::PgCredentialStore;
pub use presentation::router::{identity_router, identity_router_generic};
