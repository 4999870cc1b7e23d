//! Instance factories and the name-keyed factory registry
//!
//! A pool builds new instances through a [`Factory`] captured at
//! construction. [`FactoryRegistry`] lets callers resolve a factory from a
//! type name instead, failing with a configuration error when the name is
//! unknown.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{BoxError, PoolError, PoolResult};

/// Shared, fallible constructor for pool instances.
pub type Factory<T> = Arc<dyn Fn() -> Result<T, BoxError> + Send + Sync>;

/// Wrap an infallible closure as a [`Factory`].
pub fn infallible<T, F>(factory: F) -> Factory<T>
where
    T: 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    Arc::new(move || Ok(factory()))
}

/// Wrap a fallible closure as a [`Factory`].
pub fn fallible<T, E, F>(factory: F) -> Factory<T>
where
    T: 'static,
    E: Into<BoxError>,
    F: Fn() -> Result<T, E> + Send + Sync + 'static,
{
    Arc::new(move || factory().map_err(Into::into))
}

/// Factory that builds `T::default()`.
pub fn default_of<T: Default + 'static>() -> Factory<T> {
    Arc::new(|| Ok(T::default()))
}

struct Entry {
    type_name: &'static str,
    factory: Box<dyn Any + Send + Sync>,
}

/// Registry mapping type names to factories
///
/// # Example
/// ```
/// use recycle::{FactoryRegistry, ObjectPool};
///
/// let mut registry = FactoryRegistry::new();
/// registry.register("scratch", || Vec::<u8>::with_capacity(4096));
///
/// let pool: ObjectPool<Vec<u8>> = ObjectPool::from_registry(&registry, "scratch").unwrap();
/// assert!(pool.acquire().unwrap().capacity() >= 4096);
///
/// assert!(ObjectPool::<Vec<u8>>::from_registry(&registry, "missing").is_err());
/// ```
#[derive(Default)]
pub struct FactoryRegistry {
    entries: HashMap<String, Entry>,
}

impl FactoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an infallible factory under `name`, replacing any previous entry.
    pub fn register<T, F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        T: 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.insert(name.into(), infallible(factory))
    }

    /// Register a fallible factory under `name`.
    pub fn register_fallible<T, E, F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        T: 'static,
        E: Into<BoxError>,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        self.insert(name.into(), fallible(factory))
    }

    /// Register `T::default()` under `std::any::type_name::<T>()`.
    pub fn register_default<T: Default + 'static>(&mut self) -> &mut Self {
        self.insert(type_name::<T>().to_string(), default_of::<T>())
    }

    fn insert<T: 'static>(&mut self, name: String, factory: Factory<T>) -> &mut Self {
        tracing::debug!(name = %name, type_name = type_name::<T>(), "Registered pool factory");
        self.entries.insert(
            name,
            Entry {
                type_name: type_name::<T>(),
                factory: Box::new(factory),
            },
        );
        self
    }

    /// Resolve the factory registered under `name`.
    ///
    /// Fails with a configuration error if nothing is registered under
    /// `name`, or if the registered factory builds a type other than `T`.
    pub fn resolve<T: 'static>(&self, name: &str) -> PoolResult<Factory<T>> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| PoolError::configuration(format!("unknown type name '{name}'")))?;

        entry
            .factory
            .downcast_ref::<Factory<T>>()
            .cloned()
            .ok_or_else(|| {
                PoolError::configuration(format!(
                    "type name '{name}' builds {}, not {}",
                    entry.type_name,
                    type_name::<T>()
                ))
            })
    }

    /// Whether a factory is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered factories
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(name, entry)| (name, entry.type_name)))
            .finish()
    }
}
