//! Core traits and types for the caching system.

use serde::{de::DeserializeOwned, Serialize};

use crate::news::Article;

/// Trait for entities that can be cached.
pub trait Cacheable: Clone + Serialize + DeserializeOwned {
  /// Unique identifier for this entity
  fn cache_key(&self) -> String;

  /// Entity type name used in log messages (e.g., "article")
  fn entity_type() -> &'static str;
}

impl Cacheable for Article {
  fn cache_key(&self) -> String {
    self.id()
  }

  fn entity_type() -> &'static str {
    "article"
  }
}

/// Indicates where the data currently on screen came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fresh data from network
  Network,
  /// Data restored from the cached snapshot on startup
  Cache,
  /// The latest request failed, still serving earlier data
  Offline,
}
