#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Identity capabilities composed into security contexts.
//!
//! Every identity exposes a name. The Kerberos flavor additionally carries
//! the underlying Kerberos token, typed by the caller.

pub mod identity;
pub mod kerberos;

pub use identity::{Identity, SimplePrincipal};
pub use kerberos::{KerberosIdentity, KerberosPrincipal};
