use std::fmt;

/// Base identity capability.
///
/// Identities are request-scoped and single-owner; implementations are not
/// required to synchronize interior state.
pub trait Identity: Send + Sync + fmt::Debug {
    /// Stable name of the identity (user, service or principal name).
    fn name(&self) -> &str;
}

/// Name-only identity, the equivalent of a plain principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SimplePrincipal {
    name: String,
}

impl SimplePrincipal {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Identity for SimplePrincipal {
    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for SimplePrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
