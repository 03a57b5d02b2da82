#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Security context SPI.
//!
//! - [`SecurityContext`] - per-domain container for identity, credential and subject state
//! - [`SecurityContextUtil`] - helper bound to exactly one context, populates its subject info
//! - [`SecurityContextFactory`] - registry that resolves implementations by name or handle,
//!   caches the resolved defaults, and constructs contexts and utils
//!
//! ## Usage
//!
//! ```ignore
//! use secctx_spi::SecurityContextFactory;
//!
//! let factory = SecurityContextFactory::builder()
//!     .with_discovered()
//!     .build()?;
//!
//! let ctx = factory.create_context("web-console")?;
//! let util = factory.util_for(&ctx)?;
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod factory;
pub mod handle;
pub mod registry;
pub mod selector;
pub mod util;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod test_support;

pub use config::SecurityContextFactoryConfig;
pub use context::{Credential, SecurityContext, Subject, SubjectInfo, UtilSlot};
pub use error::{ImplKind, SecurityContextError};
pub use factory::{SecurityContextFactory, SecurityContextFactoryBuilder};
pub use handle::{BoxError, ContextType, UtilType};
pub use registry::ImplRegistration;
pub use util::SecurityContextUtil;

/// Registered name of the built-in security context implementation.
pub const DEFAULT_CONTEXT_IMPL: &str = "builtin.security_context.v1";

/// Registered name of the built-in security context util implementation.
pub const DEFAULT_UTIL_IMPL: &str = "builtin.security_context_util.v1";
