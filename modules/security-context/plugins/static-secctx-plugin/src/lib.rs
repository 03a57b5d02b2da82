#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Security Context Plugin
//!
//! Built-in implementations registered under the factory's default names:
//!
//! - [`StaticSecurityContext`] as `builtin.security_context.v1`
//! - [`StaticSecurityContextUtil`] as `builtin.security_context_util.v1`
//!
//! Linking this crate is enough for
//! [`SecurityContextFactoryBuilder::with_discovered`](secctx_spi::SecurityContextFactoryBuilder::with_discovered)
//! to pick both up. Registration under other names goes through [`register`].
//!
//! ## Configuration
//!
//! [`StaticSecCtxPluginConfig::load`](config::StaticSecCtxPluginConfig::load)
//! reads the plugin section; pass the result to [`register`].
//!
//! ```yaml
//! static_secctx_plugin:
//!   context_impl: "builtin.security_context.v1"
//!   util_impl: "builtin.security_context_util.v1"
//! ```

pub mod config;
pub mod domain;
pub mod module;

pub use domain::{StaticSecurityContext, StaticSecurityContextUtil};
pub use module::{register, register_defaults};
