//! Account identity type with `agr_` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An Agora account identity, always prefixed with `agr_`.
///
/// Used for electorate members, consensus members and the authority
/// identities of the governance and consensus stores alike.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// The standard prefix for all Agora addresses.
    pub const PREFIX: &'static str = "agr_";

    /// Create a new address from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `agr_`.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "address must start with agr_");
        Self(s)
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this address is well-formed.
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(Self::PREFIX) && self.0.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
