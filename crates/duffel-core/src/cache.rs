//! Lazily-computed cached values
//!
//! `Cached<T>` holds a value that is computed on first access and served
//! from the cache afterwards, until explicitly invalidated.

use std::sync::RwLock;

/// A lazily-computed, invalidatable value slot
///
/// ```rust
/// use duffel_core::Cached;
///
/// let cached: Cached<String> = Cached::new();
/// let value = cached.get_or_compute(|| "expensive".to_string());
/// assert_eq!(value, "expensive");
///
/// // Subsequent accesses reuse the stored value
/// let value = cached.get_or_compute(|| unreachable!());
/// assert_eq!(value, "expensive");
/// ```
#[derive(Debug)]
pub struct Cached<T> {
    slot: RwLock<Option<T>>,
}

impl<T: Clone> Cached<T> {
    /// Create an empty slot
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Return the cached value, computing and storing it on first access
    ///
    /// If two threads race here, the first stored result wins and the
    /// loser's computation is discarded.
    pub fn get_or_compute(&self, compute: impl FnOnce() -> T) -> T {
        if let Some(value) = self.slot.read().unwrap().as_ref() {
            return value.clone();
        }

        let computed = compute();
        let mut slot = self.slot.write().unwrap();
        slot.get_or_insert(computed).clone()
    }

    /// Return the cached value without computing anything
    pub fn peek(&self) -> Option<T> {
        self.slot.read().unwrap().clone()
    }

    /// Drop the cached value, returning it if one was stored
    ///
    /// The next `get_or_compute` recomputes.
    pub fn invalidate(&self) -> Option<T> {
        self.slot.write().unwrap().take()
    }

    /// Whether a value is currently cached
    pub fn is_cached(&self) -> bool {
        self.slot.read().unwrap().is_some()
    }
}

impl<T: Clone> Default for Cached<T> {
    fn default() -> Self {
        Self::new()
    }
}
