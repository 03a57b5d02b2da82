//! Domain layer for the static security context plugin.

pub mod context;
pub mod util;

pub use context::StaticSecurityContext;
pub use util::StaticSecurityContextUtil;
