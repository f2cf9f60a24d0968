//! Platform - Cryptographic building blocks
//!
//! Domain-independent security primitives. Currently:
//! - `password`: Argon2id password hashing and verification

pub mod password;
