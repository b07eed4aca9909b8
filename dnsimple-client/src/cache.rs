//! Explicitly invalidated cache for list results.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Handle that invalidates a [`Cached`] value from outside its owner.
///
/// Handed to the entities a listing contains, so that deleting a record or a
/// domain through the entity itself still forces the owning listing to
/// refetch.
#[derive(Debug, Clone, Default)]
pub struct Invalidator(Arc<AtomicBool>);

impl Invalidator {
    pub fn invalidate(&self) {
        self.0.store(true, Ordering::Release);
    }

    fn is_pending(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

/// A lazily fetched value with manual invalidation.
///
/// The state is either unfetched (`None`) or fetched (`Some`). There is no
/// expiry: a fetched value is served until [`invalidate`](Self::invalidate)
/// is called (directly or through an [`Invalidator`]), after which the next
/// [`get_or_try_fetch`](Self::get_or_try_fetch) goes back to the API.
#[derive(Debug, Clone)]
pub struct Cached<T> {
    value: Option<T>,
    invalidator: Invalidator,
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self {
            value: None,
            invalidator: Invalidator::default(),
        }
    }
}

impl<T> Cached<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fetched(&self) -> bool {
        self.value.is_some() && !self.invalidator.is_pending()
    }

    /// The cached value, without fetching.
    pub fn get(&self) -> Option<&T> {
        if self.invalidator.is_pending() {
            return None;
        }
        self.value.as_ref()
    }

    pub fn invalidate(&mut self) {
        self.value = None;
    }

    /// A handle sharing this cache's invalidation state.
    pub fn invalidator(&self) -> Invalidator {
        self.invalidator.clone()
    }

    /// Return the cached value, running `fetch` first if there is none.
    ///
    /// A failed fetch leaves the cache unfetched.
    pub async fn get_or_try_fetch<F, Fut, E>(&mut self, fetch: F) -> Result<&mut T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if self.invalidator.take() {
            self.value = None;
        }
        let value = match self.value.take() {
            Some(value) => value,
            None => fetch().await?,
        };
        Ok(self.value.insert(value))
    }

    #[cfg(test)]
    pub(crate) fn fetched(value: T) -> Self {
        Self {
            value: Some(value),
            invalidator: Invalidator::default(),
        }
    }
}
