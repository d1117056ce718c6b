//! Version-stamped cells for derived state.
//!
//! A [`Versioned`] value bumps its stamp on every write. A [`Derived`] value
//! caches the output of a derivation together with the stamp it was computed
//! from and recomputes only when the caller presents a different stamp.

/// A value paired with a monotonically increasing version stamp.
#[derive(Debug, Clone, Default)]
pub struct Versioned<T> {
    value: T,
    version: u64,
}

impl<T> Versioned<T> {
    /// Wraps `value` at version 0.
    pub fn new(value: T) -> Self {
        Self { value, version: 0 }
    }

    /// Returns the current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Returns the current stamp.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replaces the value and bumps the stamp.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.version = self.version.wrapping_add(1);
    }
}

/// A cached derivation keyed by an arbitrary stamp.
#[derive(Debug, Clone)]
pub struct Derived<K, T> {
    cached: Option<(K, T)>,
}

impl<K, T> Default for Derived<K, T> {
    fn default() -> Self {
        Self { cached: None }
    }
}

impl<K: PartialEq, T> Derived<K, T> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a value was computed for exactly `stamp`.
    pub fn is_fresh(&self, stamp: &K) -> bool {
        matches!(&self.cached, Some((k, _)) if k == stamp)
    }

    /// Returns the cached value, if any, regardless of its stamp.
    pub fn peek(&self) -> Option<&T> {
        self.cached.as_ref().map(|(_, v)| v)
    }

    /// Stores `value` as the derivation for `stamp`.
    pub fn store(&mut self, stamp: K, value: T) {
        self.cached = Some((stamp, value));
    }
}
