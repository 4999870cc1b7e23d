//! Pool configuration

use crate::error::{PoolError, PoolResult};

/// Upper bound accepted for [`PoolConfig::initial_capacity`].
pub const MAX_INITIAL_CAPACITY: usize = 1 << 20;

/// Default pool name used in logs and errors.
pub const DEFAULT_POOL_NAME: &str = "pool";

/// Configuration for an [`ObjectPool`](crate::ObjectPool)
///
/// The defaults describe an unbounded pool with an empty free stack:
/// every release is kept, nothing is built up front.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoolConfig {
    /// Label used in logs and errors
    pub name: String,

    /// Storage pre-sized for this many free entries (hint only)
    pub initial_capacity: usize,

    /// Maximum free stack depth (`None` keeps every released instance)
    pub max_idle: Option<usize>,

    /// Instances built through the factory when the pool is created
    pub pre_warm: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_POOL_NAME.to_string(),
            initial_capacity: 0,
            max_idle: None,
            pre_warm: 0,
        }
    }
}

impl PoolConfig {
    /// Config whose free stack holds at most `max_idle` instances
    pub fn bounded(max_idle: usize) -> Self {
        Self {
            initial_capacity: max_idle,
            max_idle: Some(max_idle),
            ..Default::default()
        }
    }

    /// Unbounded config with a storage hint
    pub fn unbounded(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..Default::default()
        }
    }

    /// Set the pool name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the storage hint
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Set the free stack bound
    pub fn with_max_idle(mut self, max_idle: Option<usize>) -> Self {
        self.max_idle = max_idle;
        self
    }

    /// Set the number of instances built at construction
    pub fn with_pre_warm(mut self, pre_warm: usize) -> Self {
        self.pre_warm = pre_warm;
        self
    }

    /// Validate the configuration, returning a configuration error if invalid.
    pub fn validate(&self) -> PoolResult<()> {
        if self.name.is_empty() {
            return Err(PoolError::configuration("pool name cannot be empty"));
        }
        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(PoolError::configuration(format!(
                "initial_capacity ({}) exceeds the maximum of {MAX_INITIAL_CAPACITY}",
                self.initial_capacity
            )));
        }
        if let Some(max_idle) = self.max_idle {
            if max_idle == 0 {
                return Err(PoolError::configuration(
                    "max_idle must be greater than 0",
                ));
            }
            if self.pre_warm > max_idle {
                return Err(PoolError::configuration(format!(
                    "pre_warm ({}) must not exceed max_idle ({max_idle})",
                    self.pre_warm
                )));
            }
        }
        Ok(())
    }
}
