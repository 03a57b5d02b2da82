//! Resettable cache slot for a default implementation.

use std::sync::Arc;

use arc_swap::ArcSwap;

/// Configured default name together with the handle resolved for it.
struct Selection<H> {
    name: Arc<str>,
    resolved: Option<H>,
}

/// Lock-free selector for the default implementation of one family.
///
/// Holds the configured default name and, once resolved, the handle for it.
/// Both live in a single atomically swapped snapshot, so a reader never sees
/// a handle paired with a name it was not resolved from.
///
/// Concurrent callers racing on an empty slot may each run the resolver; the
/// first to publish wins and the others still return their own (equivalent)
/// resolution. A resolution is published only if the name it was resolved
/// from is still the configured default.
pub struct ImplSelector<H> {
    current: ArcSwap<Selection<H>>,
}

impl<H: Clone> ImplSelector<H> {
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            current: ArcSwap::from_pointee(Selection {
                name: name.into(),
                resolved: None,
            }),
        }
    }

    /// The configured default name.
    #[must_use]
    pub fn name(&self) -> Arc<str> {
        Arc::clone(&self.current.load().name)
    }

    /// The cached handle, if the default has been resolved.
    #[must_use]
    pub fn cached(&self) -> Option<H> {
        self.current.load().resolved.clone()
    }

    /// Returns the cached handle, or resolves the configured name with `resolve`.
    ///
    /// # Errors
    ///
    /// Returns `Err(E)` if `resolve` fails; the slot stays unresolved.
    pub fn get_or_resolve<F, E>(&self, resolve: F) -> Result<H, E>
    where
        F: FnOnce(&str) -> Result<H, E>,
    {
        let current = self.current.load_full();
        if let Some(ref handle) = current.resolved {
            return Ok(handle.clone());
        }

        let handle = resolve(&current.name)?;
        let next = Arc::new(Selection {
            name: Arc::clone(&current.name),
            resolved: Some(handle.clone()),
        });

        let prev = self.current.compare_and_swap(&current, next);
        if !Arc::ptr_eq(&prev, &current) {
            tracing::debug!(
                name = %current.name,
                "default changed during resolution, result not cached"
            );
        }

        Ok(handle)
    }

    /// Makes `name` the default with `handle` already resolved.
    pub fn promote(&self, name: Arc<str>, handle: H) {
        self.current.store(Arc::new(Selection {
            name,
            resolved: Some(handle),
        }));
    }

    /// Replaces the default name and clears the cached handle.
    ///
    /// Returns `true` if a handle was cached.
    #[must_use = "returns whether a resolved handle was dropped"]
    pub fn reset(&self, name: impl Into<Arc<str>>) -> bool {
        let prev = self.current.swap(Arc::new(Selection {
            name: name.into(),
            resolved: None,
        }));
        prev.resolved.is_some()
    }
}
