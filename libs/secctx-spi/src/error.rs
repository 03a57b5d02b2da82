//! Error types for security context resolution and construction.

use std::fmt;

use thiserror::Error;

use crate::handle::BoxError;

/// Which implementation family an operation was resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImplKind {
    Context,
    Util,
}

impl fmt::Display for ImplKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Context => f.write_str("security context"),
            Self::Util => f.write_str("security context util"),
        }
    }
}

/// Errors returned by the security context factory and its collaborators.
#[derive(Debug, Error)]
pub enum SecurityContextError {
    /// Caller error: empty domain, empty implementation name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No implementation is registered under the requested name.
    #[error("no {kind} implementation registered under '{name}'")]
    ResolutionFailure { kind: ImplKind, name: String },

    /// The implementation constructor failed.
    #[error("failed to construct {kind} '{type_name}': {source}")]
    ConstructionFailure {
        kind: ImplKind,
        type_name: String,
        #[source]
        source: BoxError,
    },

    /// Registration error: the name is already taken.
    #[error("{kind} implementation '{name}' is already registered")]
    AlreadyRegistered { kind: ImplKind, name: String },

    /// A util outlived the context it was bound to.
    #[error("the security context bound to this util has been released")]
    ContextReleased,
}

impl SecurityContextError {
    pub(crate) fn invalid_argument(msg: &str) -> Self {
        Self::InvalidArgument(msg.to_owned())
    }
}
