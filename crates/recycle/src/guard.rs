//! RAII guard for pooled instances

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::pool::ObjectPool;

/// Instance borrowed from an [`ObjectPool`], released back on drop.
///
/// Use [`detach`](Self::detach) to take ownership without releasing.
pub struct Pooled<'a, T> {
    value: Option<T>,
    pool: &'a ObjectPool<T>,
}

impl<'a, T> Pooled<'a, T> {
    pub(crate) fn new(value: T, pool: &'a ObjectPool<T>) -> Self {
        Self {
            value: Some(value),
            pool,
        }
    }

    /// Take the instance out of the guard; it will not be released.
    #[must_use]
    pub fn detach(mut self) -> T {
        self.value.take().expect("pooled value taken twice")
    }

    /// Pool the instance will be released to
    pub fn pool(&self) -> &'a ObjectPool<T> {
        self.pool
    }
}

impl<T> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.value.as_ref().expect("pooled value used after detach")
    }
}

impl<T> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.value.as_mut().expect("pooled value used after detach")
    }
}

impl<T> AsRef<T> for Pooled<'_, T> {
    fn as_ref(&self) -> &T {
        self
    }
}

impl<T> AsMut<T> for Pooled<'_, T> {
    fn as_mut(&mut self) -> &mut T {
        self
    }
}

impl<T> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            self.pool.release(value);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Pooled<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pooled")
            .field("value", &self.value)
            .field("pool", &self.pool.name())
            .finish()
    }
}
