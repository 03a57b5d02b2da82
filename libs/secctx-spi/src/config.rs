//! Configuration for the security context factory.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_CONTEXT_IMPL, DEFAULT_UTIL_IMPL};

/// Prefix of environment variables overriding the factory configuration,
/// e.g. `SECCTX_DEFAULT_CONTEXT_IMPL`.
pub const ENV_PREFIX: &str = "SECCTX_";

/// Factory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecurityContextFactoryConfig {
    /// Registered name of the default security context implementation.
    pub default_context_impl: String,

    /// Registered name of the default util implementation.
    pub default_util_impl: String,

    /// When `true`, a context or util created by implementation name makes
    /// that implementation the new default.
    pub promote_named_resolution: bool,

    /// Resolve both defaults when the factory is built. Failures are logged
    /// and retried lazily on first use.
    pub eager_resolution: bool,
}

impl Default for SecurityContextFactoryConfig {
    fn default() -> Self {
        Self {
            default_context_impl: DEFAULT_CONTEXT_IMPL.to_owned(),
            default_util_impl: DEFAULT_UTIL_IMPL.to_owned(),
            promote_named_resolution: true,
            eager_resolution: true,
        }
    }
}

impl SecurityContextFactoryConfig {
    /// Extracts the configuration from an existing figment.
    ///
    /// # Errors
    ///
    /// Returns an error if the figment contains unknown keys or values of the
    /// wrong type.
    pub fn from_figment(figment: &Figment) -> anyhow::Result<Self> {
        Ok(figment.extract()?)
    }

    /// Loads the configuration: built-in defaults, then the optional YAML
    /// file, then `SECCTX_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or a value is invalid.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        let cfg = Self::from_figment(&figment)?;
        tracing::debug!(
            default_context_impl = %cfg.default_context_impl,
            default_util_impl = %cfg.default_util_impl,
            "Loaded security context factory configuration"
        );
        Ok(cfg)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn defaults_point_at_builtin_implementations() {
        let cfg = SecurityContextFactoryConfig::default();
        assert_eq!(cfg.default_context_impl, DEFAULT_CONTEXT_IMPL);
        assert_eq!(cfg.default_util_impl, DEFAULT_UTIL_IMPL);
        assert!(cfg.promote_named_resolution);
        assert!(cfg.eager_resolution);
    }

    #[test]
    fn load_without_sources_yields_defaults() {
        Jail::expect_with(|_jail| {
            let cfg = SecurityContextFactoryConfig::load(None).map_err(|e| e.to_string())?;
            assert_eq!(cfg.default_context_impl, DEFAULT_CONTEXT_IMPL);
            Ok(())
        });
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "secctx.yaml",
                "default_context_impl: acme.context.v2\npromote_named_resolution: false\n",
            )?;

            let cfg = SecurityContextFactoryConfig::load(Some(Path::new("secctx.yaml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(cfg.default_context_impl, "acme.context.v2");
            assert_eq!(cfg.default_util_impl, DEFAULT_UTIL_IMPL);
            assert!(!cfg.promote_named_resolution);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_yaml() {
        Jail::expect_with(|jail| {
            jail.create_file("secctx.yaml", "default_util_impl: acme.util.v1\n")?;
            jail.set_env("SECCTX_DEFAULT_UTIL_IMPL", "acme.util.v2");
            jail.set_env("SECCTX_EAGER_RESOLUTION", "false");

            let cfg = SecurityContextFactoryConfig::load(Some(Path::new("secctx.yaml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(cfg.default_util_impl, "acme.util.v2");
            assert!(!cfg.eager_resolution);
            Ok(())
        });
    }

    #[test]
    fn unknown_keys_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("secctx.yaml", "default_ctx: typo\n")?;

            let result = SecurityContextFactoryConfig::load(Some(Path::new("secctx.yaml")));
            assert!(result.is_err());
            Ok(())
        });
    }

    #[test]
    fn deserializes_from_json() {
        let cfg: SecurityContextFactoryConfig =
            serde_json::from_str(r#"{"default_context_impl":"acme.context.v1"}"#).unwrap();
        assert_eq!(cfg.default_context_impl, "acme.context.v1");
        assert!(cfg.eager_resolution);
    }
}
