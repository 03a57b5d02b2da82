use std::fmt;

use crate::identity::Identity;

/// Identity backed by a Kerberos token.
///
/// `T` is the semantic type of the underlying token (a ticket, a GSS
/// credential handle, raw bytes). Token contents are never validated here.
pub trait KerberosIdentity<T>: Identity {
    /// Returns the bound token, or `None` if it was never set or was cleared.
    fn kerberos_token(&self) -> Option<&T>;

    /// Replaces the bound token. `None` clears it.
    fn set_kerberos_token(&mut self, token: Option<T>);
}

/// Default [`KerberosIdentity`]: a principal name plus at most one token.
#[derive(Clone, PartialEq, Eq)]
pub struct KerberosPrincipal<T> {
    name: String,
    token: Option<T>,
}

impl<T> KerberosPrincipal<T> {
    /// Creates an identity with no token bound.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: None,
        }
    }

    #[must_use]
    pub fn with_token(name: impl Into<String>, token: T) -> Self {
        Self {
            name: name.into(),
            token: Some(token),
        }
    }

    /// Removes and returns the bound token, leaving the identity unset.
    pub fn take_kerberos_token(&mut self) -> Option<T> {
        self.token.take()
    }
}

impl<T: Send + Sync> Identity for KerberosPrincipal<T> {
    fn name(&self) -> &str {
        &self.name
    }
}

impl<T: Send + Sync> KerberosIdentity<T> for KerberosPrincipal<T> {
    fn kerberos_token(&self) -> Option<&T> {
        self.token.as_ref()
    }

    fn set_kerberos_token(&mut self, token: Option<T>) {
        self.token = token;
    }
}

// Tokens are credentials: only report whether one is bound.
impl<T> fmt::Debug for KerberosPrincipal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KerberosPrincipal")
            .field("name", &self.name)
            .field("has_token", &self.token.is_some())
            .finish_non_exhaustive()
    }
}
