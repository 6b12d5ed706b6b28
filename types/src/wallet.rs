//! Wallet identifier type, case-insensitive.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A staker's wallet identifier.
///
/// Wallets are compared case-insensitively: votes are keyed by wallet and a
/// replacement vote from `0xAbc` must supersede one from `0xABC`. The
/// constructor canonicalizes to lowercase so equality and hashing are plain
/// string operations everywhere else.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Wallet(String);

impl Wallet {
    /// Create a wallet identifier, canonicalizing to lowercase.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().to_lowercase())
    }

    /// Return the canonical (lowercase) identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this identifier is non-empty.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
    }
}

impl fmt::Display for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Wallet {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Wallet {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
