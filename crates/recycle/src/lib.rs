//! # recycle
//!
//! A synchronized free-list pool that recycles instances of a single type,
//! avoiding repeated construction cost for short-lived objects.
//!
//! ## Quick Start
//!
//! ```rust
//! use recycle::prelude::*;
//!
//! let pool = ObjectPool::new(|| Vec::<u8>::with_capacity(4096));
//!
//! let mut buf = pool.acquire()?;
//! buf.extend_from_slice(b"payload");
//! buf.clear();
//! pool.release(buf);
//!
//! // Or let a guard release it on drop
//! let buf = pool.acquire_guard()?;
//! assert!(buf.capacity() >= 4096);
//! # Ok::<(), PoolError>(())
//! ```
//!
//! ## Semantics
//!
//! - `acquire` / `try_acquire` pop the most recently released instance
//!   (LIFO). `acquire` falls back to the pool's factory when the free stack
//!   is empty; `try_acquire` never builds.
//! - `release` pushes unconditionally. The pool does not check that an
//!   instance came from it, nor that it is not already pooled.
//! - Every operation holds the pool's lock for its own duration only.
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for [`PoolConfig`] and
//!   [`PoolStatsSnapshot`]

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod factory;
pub mod guard;
pub mod pool;
pub mod stats;

pub use config::PoolConfig;
pub use error::{BoxError, PoolError, PoolResult};
pub use factory::{Factory, FactoryRegistry};
pub use guard::Pooled;
pub use pool::ObjectPool;
pub use stats::{PoolStats, PoolStatsSnapshot};

pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::config::PoolConfig;
    pub use crate::error::{PoolError, PoolResult};
    pub use crate::factory::FactoryRegistry;
    pub use crate::guard::Pooled;
    pub use crate::pool::ObjectPool;
}
