//! Durable snapshot cache.
//!
//! This module provides a small key/value caching mechanism that:
//! - Stores whole lists or single entities as JSON in named slots
//! - Overwrites a slot on every save, never merges
//! - Treats unreadable or undecodable slots as absent

mod layer;
mod storage;
mod traits;

pub use layer::CacheLayer;
pub use storage::{MemoryStorage, NoopStorage, SqliteStorage};
pub use traits::{CacheSource, Cacheable};
