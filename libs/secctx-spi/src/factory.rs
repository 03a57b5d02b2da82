//! The security context factory: implementation registry, default-resolution
//! cache and constructor dispatch.

use std::fmt;
use std::sync::Arc;

use secctx_identity::Identity;
use tracing::{debug, info, warn};

use crate::config::SecurityContextFactoryConfig;
use crate::context::{Credential, SecurityContext, Subject};
use crate::error::{ImplKind, SecurityContextError};
use crate::handle::{ContextType, UtilType};
use crate::registry::{ImplRegistration, ImplRegistry};
use crate::selector::ImplSelector;
use crate::util::SecurityContextUtil;

/// Resolves security context and util implementations and constructs them.
///
/// The factory owns two registries (contexts and utils), keyed by registered
/// name, and one cached default per family. Resolving a default is a registry
/// lookup performed once and then served from a lock-free slot until the
/// default is changed with [`set_default_context_type`](Self::set_default_context_type)
/// or [`set_default_util_type`](Self::set_default_util_type).
///
/// Share it as `Arc<SecurityContextFactory>`; every operation takes `&self`.
pub struct SecurityContextFactory {
    contexts: ImplRegistry<str, dyn SecurityContext>,
    utils: ImplRegistry<Arc<dyn SecurityContext>, dyn SecurityContextUtil>,
    default_context: ImplSelector<ContextType>,
    default_util: ImplSelector<UtilType>,
    promote_named_resolution: bool,
}

impl SecurityContextFactory {
    /// Creates a factory with empty registries.
    ///
    /// No eager resolution happens here; see [`SecurityContextFactory::builder`].
    #[must_use]
    pub fn new(cfg: &SecurityContextFactoryConfig) -> Self {
        Self {
            contexts: ImplRegistry::new(ImplKind::Context),
            utils: ImplRegistry::new(ImplKind::Util),
            default_context: ImplSelector::new(cfg.default_context_impl.as_str()),
            default_util: ImplSelector::new(cfg.default_util_impl.as_str()),
            promote_named_resolution: cfg.promote_named_resolution,
        }
    }

    #[must_use]
    pub fn builder() -> SecurityContextFactoryBuilder {
        SecurityContextFactoryBuilder::default()
    }

    // --- registry ---

    /// Registers a security context implementation under its handle's name.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityContextError::AlreadyRegistered`] if the name is taken.
    pub fn register_context(&self, handle: ContextType) -> Result<(), SecurityContextError> {
        let name = handle.shared_name();
        self.contexts.insert(handle)?;
        info!(impl_name = %name, "Registered security context implementation");
        Ok(())
    }

    /// Registers a util implementation under its handle's name.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityContextError::AlreadyRegistered`] if the name is taken.
    pub fn register_util(&self, handle: UtilType) -> Result<(), SecurityContextError> {
        let name = handle.shared_name();
        self.utils.insert(handle)?;
        info!(impl_name = %name, "Registered security context util implementation");
        Ok(())
    }

    /// Looks up the context handle registered under `name`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `name` is blank
    /// - `ResolutionFailure` if nothing is registered under `name`
    pub fn context_type(&self, name: &str) -> Result<ContextType, SecurityContextError> {
        validate_impl_name(name)?;
        self.contexts.resolve(name)
    }

    /// Looks up the util handle registered under `name`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `name` is blank
    /// - `ResolutionFailure` if nothing is registered under `name`
    pub fn util_type(&self, name: &str) -> Result<UtilType, SecurityContextError> {
        validate_impl_name(name)?;
        self.utils.resolve(name)
    }

    /// Names of all registered context implementations, sorted.
    #[must_use]
    pub fn context_types(&self) -> Vec<String> {
        self.contexts.names()
    }

    /// Names of all registered util implementations, sorted.
    #[must_use]
    pub fn util_types(&self) -> Vec<String> {
        self.utils.names()
    }

    // --- defaults ---

    /// Currently configured default context implementation name.
    #[must_use]
    pub fn default_context_type(&self) -> Arc<str> {
        self.default_context.name()
    }

    /// Currently configured default util implementation name.
    #[must_use]
    pub fn default_util_type(&self) -> Arc<str> {
        self.default_util.name()
    }

    /// Changes the default context implementation and drops the cached
    /// handle; the next [`create_context`](Self::create_context) resolves
    /// `name` again.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `name` is blank.
    pub fn set_default_context_type(&self, name: &str) -> Result<(), SecurityContextError> {
        validate_impl_name(name)?;
        let was_cached = self.default_context.reset(name);
        info!(impl_name = name, was_cached, "Default security context implementation changed");
        Ok(())
    }

    /// Changes the default util implementation and drops the cached handle.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `name` is blank.
    pub fn set_default_util_type(&self, name: &str) -> Result<(), SecurityContextError> {
        validate_impl_name(name)?;
        let was_cached = self.default_util.reset(name);
        info!(impl_name = name, was_cached, "Default security context util implementation changed");
        Ok(())
    }

    /// Best-effort resolution of both defaults.
    ///
    /// Failures only leave the slot empty; it is resolved again on first use.
    pub fn warm_up(&self) {
        if let Err(e) = self.resolve_default_context() {
            warn!(error = %e, "Eager security context resolution failed, deferring to first use");
        }
        if let Err(e) = self.resolve_default_util() {
            warn!(error = %e, "Eager security context util resolution failed, deferring to first use");
        }
    }

    // --- contexts ---

    /// Creates a context for `domain` using the default implementation.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `domain` is blank
    /// - `ResolutionFailure` if the default implementation is not registered
    /// - `ConstructionFailure` if the implementation fails to construct
    pub fn create_context(
        &self,
        domain: &str,
    ) -> Result<Arc<dyn SecurityContext>, SecurityContextError> {
        validate_domain(domain)?;
        let handle = self.resolve_default_context()?;
        self.create_context_of(domain, &handle)
    }

    /// Creates a context for `domain` using the implementation registered as
    /// `impl_name`.
    ///
    /// With `promote_named_resolution` enabled the resolved implementation
    /// also becomes the default for later [`create_context`](Self::create_context)
    /// calls.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `domain` or `impl_name` is blank
    /// - `ResolutionFailure` if `impl_name` is not registered
    /// - `ConstructionFailure` if the implementation fails to construct
    pub fn create_context_named(
        &self,
        domain: &str,
        impl_name: &str,
    ) -> Result<Arc<dyn SecurityContext>, SecurityContextError> {
        validate_domain(domain)?;
        validate_impl_name(impl_name)?;

        let handle = self.contexts.resolve(impl_name)?;
        if self.promote_named_resolution {
            self.default_context
                .promote(handle.shared_name(), handle.clone());
            debug!(impl_name, "Promoted security context implementation to default");
        }
        self.create_context_of(domain, &handle)
    }

    /// Creates a context for `domain` from an explicit handle. The cached
    /// default is untouched.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `domain` is blank
    /// - `ConstructionFailure` if the constructor fails or builds a context
    ///   for a different domain
    pub fn create_context_of(
        &self,
        domain: &str,
        handle: &ContextType,
    ) -> Result<Arc<dyn SecurityContext>, SecurityContextError> {
        validate_domain(domain)?;

        let ctx = handle.construct(domain)?;
        if ctx.security_domain() != domain {
            return Err(SecurityContextError::ConstructionFailure {
                kind: handle.kind(),
                type_name: handle.name().to_owned(),
                source: format!(
                    "constructed context is bound to '{}', expected '{domain}'",
                    ctx.security_domain()
                )
                .into(),
            });
        }

        debug!(domain, impl_name = handle.name(), "Created security context");
        Ok(ctx)
    }

    /// Creates a context with the default implementation and binds the given
    /// authentication evidence through its util.
    ///
    /// No context is returned if population fails.
    ///
    /// # Errors
    ///
    /// Any error of [`create_context`](Self::create_context),
    /// [`util_for`](Self::util_for) or
    /// [`SecurityContextUtil::create_subject_info`].
    pub fn create_context_with_subject(
        &self,
        principal: Option<Arc<dyn Identity>>,
        credential: Option<Credential>,
        subject: Option<Subject>,
        domain: &str,
    ) -> Result<Arc<dyn SecurityContext>, SecurityContextError> {
        let ctx = self.create_context(domain)?;
        self.populate(&ctx, principal, credential, subject)?;
        Ok(ctx)
    }

    /// Like [`create_context_with_subject`](Self::create_context_with_subject)
    /// with the implementation selected by name.
    ///
    /// # Errors
    ///
    /// Any error of [`create_context_named`](Self::create_context_named),
    /// [`util_for`](Self::util_for) or
    /// [`SecurityContextUtil::create_subject_info`].
    pub fn create_context_with_subject_named(
        &self,
        principal: Option<Arc<dyn Identity>>,
        credential: Option<Credential>,
        subject: Option<Subject>,
        domain: &str,
        impl_name: &str,
    ) -> Result<Arc<dyn SecurityContext>, SecurityContextError> {
        let ctx = self.create_context_named(domain, impl_name)?;
        self.populate(&ctx, principal, credential, subject)?;
        Ok(ctx)
    }

    fn populate(
        &self,
        ctx: &Arc<dyn SecurityContext>,
        principal: Option<Arc<dyn Identity>>,
        credential: Option<Credential>,
        subject: Option<Subject>,
    ) -> Result<(), SecurityContextError> {
        let util = self.util_for(ctx)?;
        util.create_subject_info(principal, credential, subject)
    }

    // --- utils ---

    /// Returns the util bound to `ctx`, creating and binding the default util
    /// on first use.
    ///
    /// # Errors
    ///
    /// Any error of [`create_util`](Self::create_util).
    pub fn util_for(
        &self,
        ctx: &Arc<dyn SecurityContext>,
    ) -> Result<Arc<dyn SecurityContextUtil>, SecurityContextError> {
        if let Some(util) = ctx.util() {
            return Ok(util);
        }
        self.create_util(ctx)
    }

    /// Creates a util with the default implementation and binds it to `ctx`.
    ///
    /// # Errors
    ///
    /// - `ResolutionFailure` if the default util implementation is not registered
    /// - `ConstructionFailure` if the implementation fails to construct
    pub fn create_util(
        &self,
        ctx: &Arc<dyn SecurityContext>,
    ) -> Result<Arc<dyn SecurityContextUtil>, SecurityContextError> {
        let handle = self.resolve_default_util()?;
        self.create_util_of(ctx, &handle)
    }

    /// Creates a util with the implementation registered as `util_name` and
    /// binds it to `ctx`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `util_name` is blank
    /// - `ResolutionFailure` if `util_name` is not registered
    /// - `ConstructionFailure` if the implementation fails to construct
    pub fn create_util_named(
        &self,
        ctx: &Arc<dyn SecurityContext>,
        util_name: &str,
    ) -> Result<Arc<dyn SecurityContextUtil>, SecurityContextError> {
        validate_impl_name(util_name)?;

        let handle = self.utils.resolve(util_name)?;
        if self.promote_named_resolution {
            self.default_util.promote(handle.shared_name(), handle.clone());
            debug!(util_name, "Promoted security context util implementation to default");
        }
        self.create_util_of(ctx, &handle)
    }

    /// Creates a util from an explicit handle and binds it to `ctx`,
    /// replacing any util bound before.
    ///
    /// # Errors
    ///
    /// Returns `ConstructionFailure` if the constructor fails or the util it
    /// builds is not bound to `ctx`.
    pub fn create_util_of(
        &self,
        ctx: &Arc<dyn SecurityContext>,
        handle: &UtilType,
    ) -> Result<Arc<dyn SecurityContextUtil>, SecurityContextError> {
        let util = handle.construct(ctx)?;

        let bound_to_ctx = util
            .security_context()
            .is_some_and(|owner| Arc::ptr_eq(&owner, ctx));
        if !bound_to_ctx {
            return Err(SecurityContextError::ConstructionFailure {
                kind: handle.kind(),
                type_name: handle.name().to_owned(),
                source: "constructed util is not bound to the requesting context".into(),
            });
        }

        ctx.bind_util(Arc::clone(&util));
        debug!(
            domain = ctx.security_domain(),
            impl_name = handle.name(),
            "Bound security context util"
        );
        Ok(util)
    }

    // --- resolution ---

    #[tracing::instrument(level = "debug", skip_all)]
    fn resolve_default_context(&self) -> Result<ContextType, SecurityContextError> {
        self.default_context.get_or_resolve(|name| {
            debug!(impl_name = name, "Resolving default security context implementation");
            self.contexts.resolve(name)
        })
    }

    #[tracing::instrument(level = "debug", skip_all)]
    fn resolve_default_util(&self) -> Result<UtilType, SecurityContextError> {
        self.default_util.get_or_resolve(|name| {
            debug!(impl_name = name, "Resolving default security context util implementation");
            self.utils.resolve(name)
        })
    }
}

impl fmt::Debug for SecurityContextFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityContextFactory")
            .field("contexts", &self.contexts.names())
            .field("utils", &self.utils.names())
            .field("default_context", &self.default_context.name())
            .field("default_util", &self.default_util.name())
            .field("promote_named_resolution", &self.promote_named_resolution)
            .finish_non_exhaustive()
    }
}

fn validate_domain(domain: &str) -> Result<(), SecurityContextError> {
    if domain.trim().is_empty() {
        return Err(SecurityContextError::invalid_argument(
            "security domain must not be empty",
        ));
    }
    Ok(())
}

fn validate_impl_name(name: &str) -> Result<(), SecurityContextError> {
    if name.trim().is_empty() {
        return Err(SecurityContextError::invalid_argument(
            "implementation name must not be empty",
        ));
    }
    Ok(())
}

/// Builder for [`SecurityContextFactory`].
#[derive(Default)]
pub struct SecurityContextFactoryBuilder {
    config: SecurityContextFactoryConfig,
    contexts: Vec<ContextType>,
    utils: Vec<UtilType>,
    discover: bool,
}

impl SecurityContextFactoryBuilder {
    #[must_use]
    pub fn config(mut self, config: SecurityContextFactoryConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn context_type(mut self, handle: ContextType) -> Self {
        self.contexts.push(handle);
        self
    }

    #[must_use]
    pub fn util_type(mut self, handle: UtilType) -> Self {
        self.utils.push(handle);
        self
    }

    /// Also register every implementation submitted as an [`ImplRegistration`].
    #[must_use]
    pub fn with_discovered(mut self) -> Self {
        self.discover = true;
        self
    }

    /// Builds the factory, runs all registrations and, if configured,
    /// resolves the defaults eagerly.
    ///
    /// # Errors
    ///
    /// Returns the first registration error (duplicate names).
    pub fn build(self) -> Result<SecurityContextFactory, SecurityContextError> {
        let factory = SecurityContextFactory::new(&self.config);

        if self.discover {
            for registration in inventory::iter::<ImplRegistration> {
                (registration.register)(&factory)?;
                info!(
                    registration = registration.name,
                    "Applied security context implementation registration"
                );
            }
        }
        for handle in self.contexts {
            factory.register_context(handle)?;
        }
        for handle in self.utils {
            factory.register_util(handle)?;
        }

        if self.config.eager_resolution {
            factory.warm_up();
        }

        Ok(factory)
    }
}
