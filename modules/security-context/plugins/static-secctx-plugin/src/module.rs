//! Registration of the static implementations with a factory.

use std::convert::Infallible;
use std::sync::Arc;

use secctx_spi::{
    ContextType, ImplRegistration, SecurityContext, SecurityContextError, SecurityContextFactory,
    UtilType,
};
use tracing::info;

use crate::config::StaticSecCtxPluginConfig;
use crate::domain::{StaticSecurityContext, StaticSecurityContextUtil};

/// Registers the static context and util under the configured names.
///
/// # Errors
///
/// Returns [`SecurityContextError::AlreadyRegistered`] if either name is taken.
pub fn register(
    factory: &SecurityContextFactory,
    cfg: &StaticSecCtxPluginConfig,
) -> Result<(), SecurityContextError> {
    factory.register_context(ContextType::new(
        cfg.context_impl.as_str(),
        |domain: &str| Ok::<_, Infallible>(StaticSecurityContext::new(domain)),
    ))?;
    factory.register_util(UtilType::new(
        cfg.util_impl.as_str(),
        |ctx: &Arc<dyn SecurityContext>| Ok::<_, Infallible>(StaticSecurityContextUtil::new(ctx)),
    ))?;

    info!(
        context_impl = %cfg.context_impl,
        util_impl = %cfg.util_impl,
        "Static security context plugin registered"
    );
    Ok(())
}

/// Registers the static implementations under the built-in default names.
///
/// # Errors
///
/// Returns [`SecurityContextError::AlreadyRegistered`] if either name is taken.
pub fn register_defaults(factory: &SecurityContextFactory) -> Result<(), SecurityContextError> {
    register(factory, &StaticSecCtxPluginConfig::default())
}

inventory::submit! {
    ImplRegistration {
        name: "static-secctx-plugin",
        register: register_defaults,
    }
}
