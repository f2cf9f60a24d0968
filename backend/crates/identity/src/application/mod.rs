//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod login;
pub mod register;
pub mod token;

pub use config::IdentityConfig;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase, validate_registration};
pub use token::{Claims, TokenIssuer};
