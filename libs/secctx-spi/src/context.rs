//! The security context contract and the authentication evidence it carries.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use secctx_identity::Identity;
use secrecy::SecretString;

use crate::util::SecurityContextUtil;

/// Opaque credential presented during authentication.
///
/// Nothing in this crate interprets the credential; secrets are wrapped so
/// `Debug` output never contains them.
#[derive(Clone)]
pub enum Credential {
    Password(SecretString),
    Token(SecretString),
    /// Any other credential shape (certificates, Kerberos tickets, ...).
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl Credential {
    #[must_use]
    pub fn password(value: impl Into<String>) -> Self {
        Self::Password(SecretString::from(value.into()))
    }

    #[must_use]
    pub fn token(value: impl Into<String>) -> Self {
        Self::Token(SecretString::from(value.into()))
    }

    #[must_use]
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self::Opaque(Arc::new(value))
    }

    /// Downcasts an opaque credential. Returns `None` for other variants.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Opaque(value) => value.downcast_ref::<T>(),
            Self::Password(_) | Self::Token(_) => None,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password(_) => f.write_str("Credential::Password([REDACTED])"),
            Self::Token(_) => f.write_str("Credential::Token([REDACTED])"),
            Self::Opaque(_) => f.write_str("Credential::Opaque(..)"),
        }
    }
}

/// Authenticated subject: the principals and credentials gathered for it.
#[derive(Debug, Clone, Default)]
pub struct Subject {
    principals: Vec<Arc<dyn Identity>>,
    public_credentials: Vec<Credential>,
    private_credentials: Vec<Credential>,
}

impl Subject {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_principal(mut self, principal: Arc<dyn Identity>) -> Self {
        self.principals.push(principal);
        self
    }

    #[must_use]
    pub fn with_public_credential(mut self, credential: Credential) -> Self {
        self.public_credentials.push(credential);
        self
    }

    #[must_use]
    pub fn with_private_credential(mut self, credential: Credential) -> Self {
        self.private_credentials.push(credential);
        self
    }

    #[must_use]
    pub fn principals(&self) -> &[Arc<dyn Identity>] {
        &self.principals
    }

    #[must_use]
    pub fn public_credentials(&self) -> &[Credential] {
        &self.public_credentials
    }

    #[must_use]
    pub fn private_credentials(&self) -> &[Credential] {
        &self.private_credentials
    }
}

/// Authentication evidence bound into a context by its util.
#[derive(Debug, Clone, Default)]
pub struct SubjectInfo {
    pub principal: Option<Arc<dyn Identity>>,
    pub credential: Option<Credential>,
    pub subject: Option<Subject>,
}

/// Per-domain container for identity, credential and subject state.
///
/// Instances are built by the [`SecurityContextFactory`](crate::SecurityContextFactory)
/// and handed out as `Arc<dyn SecurityContext>`; state changes go through
/// interior mutability. A context lives for one authenticated interaction and
/// is never pooled.
pub trait SecurityContext: Any + Send + Sync + fmt::Debug {
    /// The security domain this context was created for. Never empty.
    fn security_domain(&self) -> &str;

    /// Snapshot of the currently bound subject info.
    fn subject_info(&self) -> Option<SubjectInfo>;

    /// Replaces the bound subject info. `None` clears it.
    fn set_subject_info(&self, info: Option<SubjectInfo>);

    /// The util currently bound to this context, if any.
    fn util(&self) -> Option<Arc<dyn SecurityContextUtil>>;

    /// Binds `util` to this context, replacing any previous binding.
    fn bind_util(&self, util: Arc<dyn SecurityContextUtil>);

    fn as_any(&self) -> &dyn Any;
}

/// Storage for the util bound to a context.
///
/// Implementations embed this and forward [`SecurityContext::util`] and
/// [`SecurityContext::bind_util`] to it.
#[derive(Default)]
pub struct UtilSlot {
    inner: RwLock<Option<Arc<dyn SecurityContextUtil>>>,
}

impl UtilSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self) -> Option<Arc<dyn SecurityContextUtil>> {
        self.inner.read().clone()
    }

    /// Stores `util`, returning the previously bound one.
    pub fn set(&self, util: Arc<dyn SecurityContextUtil>) -> Option<Arc<dyn SecurityContextUtil>> {
        self.inner.write().replace(util)
    }
}

impl fmt::Debug for UtilSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UtilSlot")
            .field("bound", &self.inner.read().is_some())
            .finish_non_exhaustive()
    }
}
