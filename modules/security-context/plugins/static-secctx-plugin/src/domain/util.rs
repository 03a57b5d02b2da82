//! Built-in security context util.

use std::sync::{Arc, Weak};

use secctx_identity::Identity;
use secctx_spi::{
    Credential, SecurityContext, SecurityContextError, SecurityContextUtil, Subject, SubjectInfo,
};

/// Util that writes subject info straight into its owning context.
#[derive(Debug)]
pub struct StaticSecurityContextUtil {
    ctx: Weak<dyn SecurityContext>,
}

impl StaticSecurityContextUtil {
    #[must_use]
    pub fn new(ctx: &Arc<dyn SecurityContext>) -> Self {
        Self {
            ctx: Arc::downgrade(ctx),
        }
    }

    /// Removes any subject info bound to the owning context.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityContextError::ContextReleased`] if the context has
    /// been dropped.
    pub fn clear_subject_info(&self) -> Result<(), SecurityContextError> {
        self.owner()?.set_subject_info(None);
        Ok(())
    }

    fn owner(&self) -> Result<Arc<dyn SecurityContext>, SecurityContextError> {
        self.ctx
            .upgrade()
            .ok_or(SecurityContextError::ContextReleased)
    }
}

impl SecurityContextUtil for StaticSecurityContextUtil {
    fn security_context(&self) -> Option<Arc<dyn SecurityContext>> {
        self.ctx.upgrade()
    }

    fn create_subject_info(
        &self,
        principal: Option<Arc<dyn Identity>>,
        credential: Option<Credential>,
        subject: Option<Subject>,
    ) -> Result<(), SecurityContextError> {
        let ctx = self.owner()?;
        tracing::debug!(
            domain = ctx.security_domain(),
            principal = principal.as_ref().map(|p| p.name()),
            has_credential = credential.is_some(),
            "Populating subject info"
        );
        ctx.set_subject_info(Some(SubjectInfo {
            principal,
            credential,
            subject,
        }));
        Ok(())
    }
}
