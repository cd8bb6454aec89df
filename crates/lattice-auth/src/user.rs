//! Principals produced by a successful authentication

use std::fmt;

/// Name of the principal every valid `API_KEY` request acts as.
pub const LEGACY_API_KEY_USER: &str = "legacyApiKeyUser";

/// An authenticated identity.
///
/// Authorization code only ever needs the name, so that is all the trait
/// asks for. Two users are equal when their names are.
pub trait User: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;
}

impl PartialEq for dyn User {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for dyn User {}

/// The default principal: a user known only by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedUser {
    name: String,
}

impl NamedUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl User for NamedUser {
    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for NamedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
