//! Name-to-handle registry and implementation self-registration.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::error::{ImplKind, SecurityContextError};
use crate::factory::SecurityContextFactory;
use crate::handle::ImplType;

/// Registered implementations of one family, keyed by name.
pub struct ImplRegistry<A: ?Sized, T: ?Sized> {
    kind: ImplKind,
    entries: DashMap<Arc<str>, ImplType<A, T>>,
}

impl<A: ?Sized, T: ?Sized> ImplRegistry<A, T> {
    #[must_use]
    pub fn new(kind: ImplKind) -> Self {
        Self {
            kind,
            entries: DashMap::new(),
        }
    }

    /// Adds `handle` under its own name.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityContextError::AlreadyRegistered`] if the name is taken.
    pub fn insert(&self, handle: ImplType<A, T>) -> Result<(), SecurityContextError> {
        match self.entries.entry(handle.shared_name()) {
            Entry::Occupied(occupied) => Err(SecurityContextError::AlreadyRegistered {
                kind: self.kind,
                name: occupied.key().to_string(),
            }),
            Entry::Vacant(vacant) => {
                vacant.insert(handle);
                Ok(())
            }
        }
    }

    /// Looks up the handle registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityContextError::ResolutionFailure`] if nothing is
    /// registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<ImplType<A, T>, SecurityContextError> {
        self.entries
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| SecurityContextError::ResolutionFailure {
                kind: self.kind,
                name: name.to_owned(),
            })
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.iter().map(|e| e.key().to_string()).collect();
        names.sort_unstable();
        names
    }
}

/// Self-registration record submitted by implementation crates.
///
/// ```ignore
/// inventory::submit! {
///     secctx_spi::ImplRegistration {
///         name: "my-secctx-plugin",
///         register: my_secctx_plugin::register_defaults,
///     }
/// }
/// ```
///
/// Collected by [`SecurityContextFactoryBuilder::with_discovered`](crate::SecurityContextFactoryBuilder::with_discovered).
pub struct ImplRegistration {
    /// Human-readable name of the submitting crate, used in logs.
    pub name: &'static str,
    pub register: fn(&SecurityContextFactory) -> Result<(), SecurityContextError>,
}

inventory::collect!(ImplRegistration);
