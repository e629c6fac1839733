//! Three-state lazy cell

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Load state of a lazily computed field.
///
/// `Loaded(empty)` and `Unloaded` are distinct: an empty result that has been
/// fetched is never fetched again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LazyState<T> {
    Unloaded,
    Loaded(T),
}

/// A field computed at most once until explicitly reset.
///
/// The lock is held while the loader runs, so two callers racing on the same
/// cell trigger a single load. Loaders must not touch the cell they fill.
#[derive(Debug)]
pub struct Lazy<T> {
    state: Mutex<LazyState<T>>,
}

impl<T> Default for Lazy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Lazy<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LazyState::Unloaded),
        }
    }

    /// A cell that starts out loaded.
    pub fn loaded(value: T) -> Self {
        Self {
            state: Mutex::new(LazyState::Loaded(value)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LazyState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(*self.lock(), LazyState::Loaded(_))
    }

    /// Drop the loaded value; the next access loads again.
    pub fn reset(&self) {
        *self.lock() = LazyState::Unloaded;
    }
}

impl<T: Clone> Lazy<T> {
    /// The loaded value, if any, without loading.
    pub fn peek(&self) -> Option<T> {
        match &*self.lock() {
            LazyState::Loaded(value) => Some(value.clone()),
            LazyState::Unloaded => None,
        }
    }

    /// Return the cached value, running `load` first if the cell is unloaded.
    ///
    /// A failed load leaves the cell unloaded.
    pub fn get_or_try_load<E>(&self, load: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        let mut state = self.lock();
        if let LazyState::Loaded(value) = &*state {
            return Ok(value.clone());
        }
        let value = load()?;
        *state = LazyState::Loaded(value.clone());
        Ok(value)
    }

    /// Run `load` unconditionally and replace whatever the cell held.
    pub fn reload<E>(&self, load: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        let mut state = self.lock();
        let value = load()?;
        *state = LazyState::Loaded(value.clone());
        Ok(value)
    }
}
