//! The util contract: a helper bound to exactly one security context.

use std::fmt;
use std::sync::Arc;

use secctx_identity::Identity;

use crate::context::{Credential, SecurityContext, Subject};
use crate::error::SecurityContextError;

/// Helper bound 1:1 to a [`SecurityContext`].
///
/// A util holds a back-reference to its context and writes authentication
/// evidence into it. The reference is weak: a util never keeps its context
/// alive, and once the context is dropped every operation reports
/// [`SecurityContextError::ContextReleased`].
pub trait SecurityContextUtil: Send + Sync + fmt::Debug {
    /// The owning context, or `None` once it has been dropped.
    fn security_context(&self) -> Option<Arc<dyn SecurityContext>>;

    /// Binds principal, credential and subject into the owning context.
    ///
    /// Repeated calls overwrite earlier evidence; callers that need
    /// idempotency must check [`SecurityContextUtil::user_principal`] first.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityContextError::ContextReleased`] if the owning context
    /// has been dropped. Implementations may report their own failures as
    /// [`SecurityContextError::ConstructionFailure`].
    fn create_subject_info(
        &self,
        principal: Option<Arc<dyn Identity>>,
        credential: Option<Credential>,
        subject: Option<Subject>,
    ) -> Result<(), SecurityContextError>;

    fn user_principal(&self) -> Option<Arc<dyn Identity>> {
        self.security_context()?.subject_info()?.principal
    }

    /// Name of the bound principal.
    fn user_name(&self) -> Option<String> {
        self.user_principal().map(|p| p.name().to_owned())
    }

    fn credential(&self) -> Option<Credential> {
        self.security_context()?.subject_info()?.credential
    }

    fn subject(&self) -> Option<Subject> {
        self.security_context()?.subject_info()?.subject
    }
}
