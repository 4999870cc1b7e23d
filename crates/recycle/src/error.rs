//! Error types for object pools
//!
//! Two failure kinds exist: a pool that cannot be configured, and a pool
//! that cannot produce an instance. Both propagate straight to the caller.

use thiserror::Error;

/// Boxed error returned by fallible factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;

/// Pool errors
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PoolError {
    /// The pool could not be configured (unknown type name, invalid config).
    #[error("Pool configuration error: {message}")]
    Configuration {
        /// What was wrong
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<BoxError>,
    },

    /// The free stack was empty and no new instance could be built.
    #[error("Pool '{pool}' failed to allocate an instance: {reason}")]
    Allocation {
        /// Name of the pool that failed
        pool: String,
        /// Why construction failed
        reason: String,
        /// Factory error, if the factory produced one
        #[source]
        source: Option<BoxError>,
    },
}

impl PoolError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error wrapping an underlying cause
    pub fn configuration_with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Allocation error for a pool that has no factory
    pub fn untyped(pool: &str) -> Self {
        Self::Allocation {
            pool: pool.to_string(),
            reason: "pool is untyped and its free stack is empty".to_string(),
            source: None,
        }
    }

    /// Allocation error wrapping a factory failure
    pub fn factory_failed(pool: &str, source: BoxError) -> Self {
        tracing::debug!(pool, error = %source, "Pool factory failed");

        Self::Allocation {
            pool: pool.to_string(),
            reason: "factory failed to construct an instance".to_string(),
            source: Some(source),
        }
    }

    /// Stable categorisation code
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "POOL:CONFIG",
            Self::Allocation { .. } => "POOL:ALLOC",
        }
    }

    /// Whether this is a configuration error
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Whether this is an allocation error
    #[must_use]
    pub fn is_allocation(&self) -> bool {
        matches!(self, Self::Allocation { .. })
    }
}
