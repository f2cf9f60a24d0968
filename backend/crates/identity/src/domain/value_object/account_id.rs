//! Account ID Value Object
//!
//! Opaque account identifier. UUID v4 under the hood, rendered as a
//! string at every boundary.

use kernel::id::{Id, markers};

/// Typed identifier for an account
pub type AccountId = Id<markers::Account>;
