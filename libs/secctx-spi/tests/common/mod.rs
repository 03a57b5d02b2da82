#![allow(dead_code)]

use std::any::Any;
use std::convert::Infallible;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use secctx_identity::Identity;
use secctx_spi::{
    ContextType, Credential, SecurityContext, SecurityContextError, SecurityContextUtil, Subject,
    SubjectInfo, UtilSlot, UtilType,
};

pub const MEMORY_CONTEXT: &str = "test.context.memory";
pub const RECORDING_UTIL: &str = "test.util.recording";
pub const FAILING_UTIL: &str = "test.util.failing";

#[derive(Debug)]
pub struct MemoryContext {
    domain: String,
    info: RwLock<Option<SubjectInfo>>,
    util: UtilSlot,
}

impl MemoryContext {
    pub fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_owned(),
            info: RwLock::new(None),
            util: UtilSlot::new(),
        }
    }
}

impl SecurityContext for MemoryContext {
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

/// Names recorded by a [`RecordingUtil`] for each `create_subject_info` call.
pub type CallLog = Arc<Mutex<Vec<(Option<String>, bool, usize)>>>;

/// Util double that records every population call and then writes through.
#[derive(Debug)]
pub struct RecordingUtil {
    ctx: Weak<dyn SecurityContext>,
    calls: CallLog,
}

impl SecurityContextUtil for RecordingUtil {
    fn security_context(&self) -> Option<Arc<dyn SecurityContext>> {
        self.ctx.upgrade()
    }

    fn create_subject_info(
        &self,
        principal: Option<Arc<dyn Identity>>,
        credential: Option<Credential>,
        subject: Option<Subject>,
    ) -> Result<(), SecurityContextError> {
        self.calls.lock().push((
            principal.as_ref().map(|p| p.name().to_owned()),
            credential.is_some(),
            subject.as_ref().map_or(0, |s| s.principals().len()),
        ));
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

/// Util double whose population always fails.
#[derive(Debug)]
pub struct FailingUtil {
    ctx: Weak<dyn SecurityContext>,
}

impl SecurityContextUtil for FailingUtil {
    fn security_context(&self) -> Option<Arc<dyn SecurityContext>> {
        self.ctx.upgrade()
    }

    fn create_subject_info(
        &self,
        _principal: Option<Arc<dyn Identity>>,
        _credential: Option<Credential>,
        _subject: Option<Subject>,
    ) -> Result<(), SecurityContextError> {
        Err(SecurityContextError::InvalidArgument(
            "credential rejected by test double".to_owned(),
        ))
    }
}

pub fn memory_context_type() -> ContextType {
    ContextType::new(MEMORY_CONTEXT, |domain: &str| {
        Ok::<_, Infallible>(MemoryContext::new(domain))
    })
}

pub fn recording_util_type(calls: &CallLog) -> UtilType {
    let calls = Arc::clone(calls);
    UtilType::new(RECORDING_UTIL, move |ctx: &Arc<dyn SecurityContext>| {
        Ok::<_, Infallible>(RecordingUtil {
            ctx: Arc::downgrade(ctx),
            calls: Arc::clone(&calls),
        })
    })
}

pub fn failing_util_type() -> UtilType {
    UtilType::new(FAILING_UTIL, |ctx: &Arc<dyn SecurityContext>| {
        Ok::<_, Infallible>(FailingUtil {
            ctx: Arc::downgrade(ctx),
        })
    })
}
