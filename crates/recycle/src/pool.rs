//! Synchronized free-list object pool
//!
//! The pool keeps released instances on a LIFO free stack guarded by a
//! mutex. Every public operation takes the lock for its own duration only;
//! nothing blocks waiting for another caller to release.
//!
//! A pool is either *typed*, holding a [`Factory`] used to build an
//! instance when the free stack is empty, or *untyped*, acting purely as a
//! cache with no allocation fallback.

use std::fmt;

use parking_lot::Mutex;

use crate::config::{MAX_INITIAL_CAPACITY, PoolConfig};
use crate::error::{BoxError, PoolError, PoolResult};
use crate::factory::{self, Factory, FactoryRegistry};
use crate::guard::Pooled;
use crate::stats::PoolStats;

/// Free-list pool recycling instances of `T`
///
/// # Example
/// ```
/// use recycle::ObjectPool;
///
/// let pool = ObjectPool::new(|| String::with_capacity(256));
///
/// let mut s = pool.acquire().unwrap();
/// s.push_str("hello");
/// pool.release(s);
///
/// // The most recently released instance comes back first.
/// assert_eq!(pool.try_acquire().as_deref(), Some("hello"));
/// assert!(pool.try_acquire().is_none());
/// ```
pub struct ObjectPool<T> {
    free: Mutex<Vec<T>>,
    factory: Option<Factory<T>>,
    config: PoolConfig,
    stats: PoolStats,
}

impl<T: 'static> ObjectPool<T> {
    /// Create a typed pool building `T::default()`
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::with_factory(factory::default_of::<T>())
    }

    /// Create a typed pool building new instances with `factory`
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::from_parts(PoolConfig::default(), Some(factory::infallible(factory)), Vec::new())
    }

    /// Create a typed pool with storage pre-sized for `capacity` free entries
    ///
    /// The hint does not build any instances. Hints above
    /// [`MAX_INITIAL_CAPACITY`] are clamped to it.
    pub fn with_capacity<F>(capacity: usize, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let capacity = capacity.min(MAX_INITIAL_CAPACITY);
        let config = PoolConfig::unbounded(capacity);
        let free = Vec::with_capacity(capacity);
        Self::from_parts(config, Some(factory::infallible(factory)), free)
    }

    /// Create a typed pool whose factory may fail
    ///
    /// Factory errors surface from [`acquire`](Self::acquire) as
    /// [`PoolError::Allocation`] with the factory error as its source.
    pub fn with_fallible_factory<E, F>(factory: F) -> Self
    where
        E: Into<BoxError>,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        Self::from_parts(PoolConfig::default(), Some(factory::fallible(factory)), Vec::new())
    }

    /// Create a typed pool whose factory is resolved by `type_name`
    ///
    /// Fails with [`PoolError::Configuration`] when `registry` holds no
    /// factory for `type_name`, or holds one for a different type.
    pub fn from_registry(registry: &FactoryRegistry, type_name: &str) -> PoolResult<Self> {
        Self::from_registry_with_config(
            registry,
            type_name,
            PoolConfig::default().with_name(type_name),
        )
    }

    /// [`from_registry`](Self::from_registry) with an explicit configuration
    pub fn from_registry_with_config(
        registry: &FactoryRegistry,
        type_name: &str,
        config: PoolConfig,
    ) -> PoolResult<Self> {
        let factory = registry.resolve::<T>(type_name)?;
        Self::with_config(config, Some(factory))
    }
}

impl<T> ObjectPool<T> {
    /// Create a typed pool around an existing [`Factory`]
    pub fn with_factory(factory: Factory<T>) -> Self {
        Self::from_parts(PoolConfig::default(), Some(factory), Vec::new())
    }

    /// Create an untyped pool
    ///
    /// An untyped pool never builds instances: [`acquire`](Self::acquire)
    /// on an empty free stack fails with [`PoolError::Allocation`].
    pub fn untyped() -> Self {
        Self::from_parts(PoolConfig::default(), None, Vec::new())
    }

    /// Create a pool from a configuration and an optional factory
    ///
    /// Validates `config` and builds `config.pre_warm` instances up front.
    /// Pre-warming an untyped pool is a configuration error; a factory
    /// failure while pre-warming is an allocation error. A failed pre-warm
    /// returns no pool, so it is not counted in any [`PoolStats`].
    pub fn with_config(config: PoolConfig, factory: Option<Factory<T>>) -> PoolResult<Self> {
        config.validate()?;

        let mut free = Vec::with_capacity(config.initial_capacity.max(config.pre_warm));
        if config.pre_warm > 0 {
            let Some(factory) = &factory else {
                return Err(PoolError::configuration(format!(
                    "pool '{}' is untyped and cannot pre-warm {} instances",
                    config.name, config.pre_warm
                )));
            };
            for _ in 0..config.pre_warm {
                free.push(factory().map_err(|e| PoolError::factory_failed(&config.name, e))?);
            }
        }

        Ok(Self::from_parts(config, factory, free))
    }

    fn from_parts(config: PoolConfig, factory: Option<Factory<T>>, free: Vec<T>) -> Self {
        tracing::debug!(
            pool = %config.name,
            type_name = std::any::type_name::<T>(),
            untyped = factory.is_none(),
            available = free.len(),
            "Created object pool"
        );

        let stats = PoolStats::default();
        for _ in 0..free.len() {
            stats.record_creation();
        }

        Self {
            free: Mutex::new(free),
            factory,
            config,
            stats,
        }
    }

    /// Take the most recently released instance, if any
    ///
    /// Never builds an instance and never blocks beyond the pool's own lock.
    pub fn try_acquire(&self) -> Option<T> {
        self.stats.record_acquire();

        let mut free = self.free.lock();
        let value = free.pop();
        if value.is_some() {
            self.stats.record_hit();
            tracing::trace!(pool = %self.config.name, available = free.len(), "Pool hit");
        } else {
            self.stats.record_miss();
        }
        value
    }

    /// Take the most recently released instance, building one if none is free
    ///
    /// Fails with [`PoolError::Allocation`] if the pool is untyped or the
    /// factory fails. There is no retry.
    pub fn acquire(&self) -> PoolResult<T> {
        self.stats.record_acquire();

        let mut free = self.free.lock();
        if let Some(value) = free.pop() {
            self.stats.record_hit();
            tracing::trace!(pool = %self.config.name, available = free.len(), "Pool hit");
            return Ok(value);
        }

        self.stats.record_miss();
        // Built under the lock: acquire is a single exclusive step.
        let value = self.create();
        drop(free);
        value
    }

    /// Push `value` onto the free stack
    ///
    /// No check is made that `value` came from this pool or is not already
    /// pooled. If `max_idle` is configured and reached, `value` is dropped.
    pub fn release(&self, value: T) {
        let mut free = self.free.lock();
        if let Some(max_idle) = self.config.max_idle
            && free.len() >= max_idle
        {
            drop(free);
            self.stats.record_discard(1);
            tracing::trace!(pool = %self.config.name, max_idle, "Pool full, discarding instance");
            drop(value);
            return;
        }

        free.push(value);
        self.stats.record_release(free.len());
    }

    /// [`acquire`](Self::acquire) wrapped in a guard that releases on drop
    pub fn acquire_guard(&self) -> PoolResult<Pooled<'_, T>> {
        self.acquire().map(|value| Pooled::new(value, self))
    }

    /// [`try_acquire`](Self::try_acquire) wrapped in a guard that releases on drop
    pub fn try_acquire_guard(&self) -> Option<Pooled<'_, T>> {
        self.try_acquire().map(|value| Pooled::new(value, self))
    }

    /// Build `additional` instances and push them onto the free stack
    ///
    /// Stops early at `max_idle`. Returns how many instances were added.
    /// Instances built before a factory failure stay pooled.
    pub fn reserve(&self, additional: usize) -> PoolResult<usize> {
        let mut free = self.free.lock();
        let room = match self.config.max_idle {
            Some(max_idle) => max_idle.saturating_sub(free.len()).min(additional),
            None => additional,
        };

        free.reserve(room);
        for added in 0..room {
            match self.create() {
                Ok(value) => {
                    free.push(value);
                    self.stats.record_release(free.len());
                }
                Err(err) => {
                    tracing::debug!(pool = %self.config.name, added, "Reserve stopped early");
                    return Err(err);
                }
            }
        }
        Ok(room)
    }

    /// Drop every free instance, returning how many were dropped
    pub fn clear(&self) -> usize {
        let drained: Vec<T> = self.free.lock().drain(..).collect();
        let count = drained.len();
        self.stats.record_discard(count);
        count
    }

    /// Drop the oldest free instances until at most `len` remain
    ///
    /// Returns how many were dropped.
    pub fn shrink_to(&self, len: usize) -> usize {
        let dropped: Vec<T> = {
            let mut free = self.free.lock();
            if free.len() <= len {
                return 0;
            }
            let excess = free.len() - len;
            let dropped: Vec<T> = free.drain(..excess).collect();
            free.shrink_to(len.max(self.config.initial_capacity));
            dropped
        };

        self.stats.record_discard(dropped.len());
        dropped.len()
    }

    /// Number of instances on the free stack
    pub fn available(&self) -> usize {
        self.free.lock().len()
    }

    /// Whether the free stack is empty
    pub fn is_empty(&self) -> bool {
        self.free.lock().is_empty()
    }

    /// Whether this pool has no factory
    pub fn is_untyped(&self) -> bool {
        self.factory.is_none()
    }

    /// Pool name from its configuration
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Pool configuration
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Live statistics
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    fn create(&self) -> PoolResult<T> {
        let Some(factory) = &self.factory else {
            return Err(PoolError::untyped(&self.config.name));
        };

        match factory() {
            Ok(value) => {
                self.stats.record_creation();
                tracing::trace!(pool = %self.config.name, "Pool miss, built new instance");
                Ok(value)
            }
            Err(source) => {
                self.stats.record_factory_failure();
                Err(PoolError::factory_failed(&self.config.name, source))
            }
        }
    }
}

impl<T> Default for ObjectPool<T> {
    fn default() -> Self {
        Self::untyped()
    }
}

impl<T> fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ObjectPool");
        s.field("name", &self.config.name);
        // try_lock: a factory may format its own pool while acquire holds the lock.
        match self.free.try_lock() {
            Some(free) => s.field("available", &free.len()),
            None => s.field("available", &format_args!("<locked>")),
        };
        s.field("untyped", &self.is_untyped()).finish_non_exhaustive()
    }
}
