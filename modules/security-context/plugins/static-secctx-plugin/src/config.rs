//! Configuration for the static security context plugin.

use std::path::Path;

use figment::Figment;
use figment::providers::{Format, Yaml};
use secctx_spi::{DEFAULT_CONTEXT_IMPL, DEFAULT_UTIL_IMPL};
use serde::Deserialize;

/// Top-level key holding the plugin section in a configuration file.
pub const CONFIG_KEY: &str = "static_secctx_plugin";

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticSecCtxPluginConfig {
    /// Name the context implementation is registered under.
    pub context_impl: String,

    /// Name the util implementation is registered under.
    pub util_impl: String,
}

impl Default for StaticSecCtxPluginConfig {
    fn default() -> Self {
        Self {
            context_impl: DEFAULT_CONTEXT_IMPL.to_owned(),
            util_impl: DEFAULT_UTIL_IMPL.to_owned(),
        }
    }
}

impl StaticSecCtxPluginConfig {
    /// Extracts the `static_secctx_plugin` section of `figment`. A missing
    /// section yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the section has unknown keys or values of the
    /// wrong type.
    pub fn from_figment(figment: &Figment) -> anyhow::Result<Self> {
        Ok(figment.focus(CONFIG_KEY).extract()?)
    }

    /// Reads the `static_secctx_plugin` section of the YAML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or the section is invalid.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let cfg = Self::from_figment(&Figment::from(Yaml::file(path)))?;
        tracing::debug!(
            context_impl = %cfg.context_impl,
            util_impl = %cfg.util_impl,
            "Loaded static security context plugin configuration"
        );
        Ok(cfg)
    }
}
