//! Minimal context and util implementations for unit tests.

use std::any::Any;
use std::convert::Infallible;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use secctx_identity::Identity;

use crate::context::{Credential, SecurityContext, Subject, SubjectInfo, UtilSlot};
use crate::error::SecurityContextError;
use crate::handle::{ContextType, UtilType};
use crate::util::SecurityContextUtil;

#[derive(Debug)]
pub struct PlainContext {
    impl_name: String,
    domain: String,
    info: RwLock<Option<SubjectInfo>>,
    util: UtilSlot,
}

impl PlainContext {
    pub fn new(domain: &str) -> Self {
        Self::named("test.context.plain", domain)
    }

    fn named(impl_name: &str, domain: &str) -> Self {
        Self {
            impl_name: impl_name.to_owned(),
            domain: domain.to_owned(),
            info: RwLock::new(None),
            util: UtilSlot::new(),
        }
    }

    pub fn impl_name(&self) -> &str {
        &self.impl_name
    }
}

impl SecurityContext for PlainContext {
    fn security_domain(&self) -> &str {
        &self.domain
    }

    fn subject_info(&self) -> Option<SubjectInfo> {
        self.info.read().clone()
    }

    fn set_subject_info(&self, info: Option<SubjectInfo>) {
        *self.info.write() = info;
    }

    fn util(&self) -> Option<Arc<dyn SecurityContextUtil>> {
        self.util.get()
    }

    fn bind_util(&self, util: Arc<dyn SecurityContextUtil>) {
        self.util.set(util);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
pub struct PlainUtil {
    ctx: Weak<dyn SecurityContext>,
}

impl PlainUtil {
    pub fn new(ctx: &Arc<dyn SecurityContext>) -> Self {
        Self {
            ctx: Arc::downgrade(ctx),
        }
    }
}

impl SecurityContextUtil for PlainUtil {
    fn security_context(&self) -> Option<Arc<dyn SecurityContext>> {
        self.ctx.upgrade()
    }

    fn create_subject_info(
        &self,
        principal: Option<Arc<dyn Identity>>,
        credential: Option<Credential>,
        subject: Option<Subject>,
    ) -> Result<(), SecurityContextError> {
        let ctx = self
            .security_context()
            .ok_or(SecurityContextError::ContextReleased)?;
        ctx.set_subject_info(Some(SubjectInfo {
            principal,
            credential,
            subject,
        }));
        Ok(())
    }
}

/// Context handle whose instances remember the name they were registered under.
pub fn plain_context_type(name: &'static str) -> ContextType {
    ContextType::new(name, move |domain: &str| {
        Ok::<_, Infallible>(PlainContext::named(name, domain))
    })
}

pub fn plain_util_type(name: &'static str) -> UtilType {
    UtilType::new(name, |ctx: &Arc<dyn SecurityContext>| {
        Ok::<_, Infallible>(PlainUtil::new(ctx))
    })
}
