//! Built-in security context.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use secctx_spi::{SecurityContext, SecurityContextUtil, SubjectInfo, UtilSlot};
use uuid::Uuid;

/// Security context holding subject info and a free-form data map.
///
/// Each instance gets a random id, used only to correlate log lines.
#[derive(Debug)]
pub struct StaticSecurityContext {
    id: Uuid,
    domain: String,
    subject_info: RwLock<Option<SubjectInfo>>,
    data: RwLock<HashMap<String, serde_json::Value>>,
    util: UtilSlot,
}

impl StaticSecurityContext {
    #[must_use]
    pub fn new(domain: &str) -> Self {
        let id = Uuid::new_v4();
        tracing::trace!(context_id = %id, domain, "New static security context");
        Self {
            id,
            domain: domain.to_owned(),
            subject_info: RwLock::new(None),
            data: RwLock::new(HashMap::new()),
            util: UtilSlot::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn put_data(
        &self,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> Option<serde_json::Value> {
        self.data.write().insert(key.into(), value)
    }

    #[must_use]
    pub fn data(&self, key: &str) -> Option<serde_json::Value> {
        self.data.read().get(key).cloned()
    }

    pub fn remove_data(&self, key: &str) -> Option<serde_json::Value> {
        self.data.write().remove(key)
    }

    /// Keys currently present in the data map, sorted.
    #[must_use]
    pub fn data_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.data.read().keys().cloned().collect();
        keys.sort_unstable();
        keys
    }
}

impl SecurityContext for StaticSecurityContext {
    fn security_domain(&self) -> &str {
        &self.domain
    }

    fn subject_info(&self) -> Option<SubjectInfo> {
        self.subject_info.read().clone()
    }

    fn set_subject_info(&self, info: Option<SubjectInfo>) {
        *self.subject_info.write() = info;
    }

    fn util(&self) -> Option<Arc<dyn SecurityContextUtil>> {
        self.util.get()
    }

    fn bind_util(&self, util: Arc<dyn SecurityContextUtil>) {
        if self.util.set(util).is_some() {
            tracing::debug!(context_id = %self.id, "Replaced bound security context util");
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::Arc;

    use secctx_identity::SimplePrincipal;
    use serde_json::json;

    use super::*;

    #[test]
    fn new_context_is_empty() {
        let ctx = StaticSecurityContext::new("web-console");
        assert_eq!(ctx.security_domain(), "web-console");
        assert!(ctx.subject_info().is_none());
        assert!(ctx.util().is_none());
        assert!(ctx.data_keys().is_empty());
    }

    #[test]
    fn contexts_get_distinct_ids() {
        let a = StaticSecurityContext::new("web");
        let b = StaticSecurityContext::new("web");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn subject_info_set_and_clear() {
        let ctx = StaticSecurityContext::new("web");
        ctx.set_subject_info(Some(SubjectInfo {
            principal: Some(Arc::new(SimplePrincipal::new("alice"))),
            ..SubjectInfo::default()
        }));
        assert_eq!(
            ctx.subject_info().unwrap().principal.unwrap().name(),
            "alice"
        );

        ctx.set_subject_info(None);
        assert!(ctx.subject_info().is_none());
    }

    #[test]
    fn data_map_put_get_remove() {
        let ctx = StaticSecurityContext::new("web");
        assert!(ctx.put_data("roles", json!(["admin"])).is_none());
        assert_eq!(
            ctx.put_data("roles", json!(["admin", "auditor"])),
            Some(json!(["admin"]))
        );
        ctx.put_data("run_as", json!("batch-operator"));

        assert_eq!(ctx.data("roles"), Some(json!(["admin", "auditor"])));
        assert_eq!(ctx.data_keys(), ["roles", "run_as"]);

        assert_eq!(ctx.remove_data("run_as"), Some(json!("batch-operator")));
        assert!(ctx.data("run_as").is_none());
    }

    #[test]
    fn downcast_through_trait_object() {
        let ctx: Arc<dyn SecurityContext> = Arc::new(StaticSecurityContext::new("web"));
        let concrete = ctx
            .as_any()
            .downcast_ref::<StaticSecurityContext>()
            .unwrap();
        assert_eq!(concrete.security_domain(), "web");
    }
}
