//! Type handles: a registered name paired with a typed constructor.
//!
//! The constructor shape is fixed by the type system when the handle is
//! built: contexts are constructed from the security domain, utils from the
//! context they are bound to.

use std::fmt;
use std::sync::Arc;

use crate::context::SecurityContext;
use crate::error::{ImplKind, SecurityContextError};
use crate::util::SecurityContextUtil;

/// Error type implementation constructors may fail with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

type Ctor<A, T> = dyn Fn(&A) -> Result<Arc<T>, BoxError> + Send + Sync;

/// Handle to a concrete implementation: its registered name and constructor.
///
/// Cloning is cheap; clones share the constructor.
pub struct ImplType<A: ?Sized, T: ?Sized> {
    kind: ImplKind,
    name: Arc<str>,
    ctor: Arc<Ctor<A, T>>,
}

/// Handle to a [`SecurityContext`] implementation.
pub type ContextType = ImplType<str, dyn SecurityContext>;

/// Handle to a [`SecurityContextUtil`] implementation.
pub type UtilType = ImplType<Arc<dyn SecurityContext>, dyn SecurityContextUtil>;

impl<A: ?Sized, T: ?Sized> ImplType<A, T> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> ImplKind {
        self.kind
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// Runs the constructor.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityContextError::ConstructionFailure`] wrapping the
    /// constructor's own error.
    pub fn construct(&self, arg: &A) -> Result<Arc<T>, SecurityContextError> {
        (self.ctor)(arg).map_err(|source| SecurityContextError::ConstructionFailure {
            kind: self.kind,
            type_name: (*self.name).to_owned(),
            source,
        })
    }

    /// Whether both handles refer to the same registered constructor.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.ctor, &other.ctor)
    }
}

impl ContextType {
    /// Builds a context handle from a constructor taking the security domain.
    pub fn new<C, E, F>(name: impl Into<Arc<str>>, ctor: F) -> Self
    where
        C: SecurityContext,
        E: Into<BoxError>,
        F: Fn(&str) -> Result<C, E> + Send + Sync + 'static,
    {
        let ctor = move |domain: &str| -> Result<Arc<dyn SecurityContext>, BoxError> {
            let ctx = ctor(domain).map_err(Into::<BoxError>::into)?;
            Ok(Arc::new(ctx))
        };
        Self {
            kind: ImplKind::Context,
            name: name.into(),
            ctor: Arc::new(ctor),
        }
    }
}

impl UtilType {
    /// Builds a util handle from a constructor taking the owning context.
    pub fn new<U, E, F>(name: impl Into<Arc<str>>, ctor: F) -> Self
    where
        U: SecurityContextUtil + 'static,
        E: Into<BoxError>,
        F: Fn(&Arc<dyn SecurityContext>) -> Result<U, E> + Send + Sync + 'static,
    {
        let ctor = move |ctx: &Arc<dyn SecurityContext>| {
            let util = ctor(ctx).map_err(Into::<BoxError>::into)?;
            Ok::<Arc<dyn SecurityContextUtil>, BoxError>(Arc::new(util))
        };
        Self {
            kind: ImplKind::Util,
            name: name.into(),
            ctor: Arc::new(ctor),
        }
    }
}

impl<A: ?Sized, T: ?Sized> Clone for ImplType<A, T> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            name: Arc::clone(&self.name),
            ctor: Arc::clone(&self.ctor),
        }
    }
}

impl<A: ?Sized, T: ?Sized> fmt::Debug for ImplType<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImplType")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
