//! Typed access to cache slots.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use std::sync::Arc;
use tracing::{debug, warn};

use super::storage::CacheStorage;
use super::traits::Cacheable;

/// A cached list of entities.
#[derive(Debug, Clone)]
pub struct CachedList<T> {
  /// The cached entities in order
  pub entities: Vec<T>,
  /// When the list was saved
  pub cached_at: DateTime<Utc>,
}

/// A single cached entity.
#[derive(Debug, Clone)]
pub struct CachedEntity<T> {
  /// The cached entity
  pub entity: T,
  /// When the entity was cached
  pub cached_at: DateTime<Utc>,
}

/// Cache layer that serializes entities into storage slots.
///
/// Reads never fail: a missing slot, a storage error and an undecodable
/// payload all come back as `None`.
#[derive(Clone)]
pub struct CacheLayer {
  storage: Arc<dyn CacheStorage>,
}

impl CacheLayer {
  /// Create a new cache layer with the given storage backend.
  pub fn new(storage: impl CacheStorage + 'static) -> Self {
    Self {
      storage: Arc::new(storage),
    }
  }

  /// Overwrite `slot` with the whole list.
  pub fn save_list<T: Cacheable>(&self, slot: &str, entities: &[T]) -> Result<()> {
    let data = serde_json::to_string(entities)
      .map_err(|e| eyre!("Failed to serialize {} list: {}", T::entity_type(), e))?;
    self.storage.put(slot, &data)?;
    debug!("Cached {} {} entities in {}", entities.len(), T::entity_type(), slot);
    Ok(())
  }

  /// Load the list stored in `slot`.
  pub fn load_list<T: Cacheable>(&self, slot: &str) -> Option<CachedList<T>> {
    let stored = self.read(slot)?;
    match serde_json::from_str::<Vec<T>>(&stored.value) {
      Ok(entities) => {
        debug!("Cache hit for {}: {} entities", slot, entities.len());
        Some(CachedList {
          entities,
          cached_at: stored.saved_at,
        })
      }
      Err(e) => {
        warn!("Ignoring malformed cache slot {}: {}", slot, e);
        None
      }
    }
  }

  /// Overwrite `slot` with a single entity.
  pub fn save_entity<T: Cacheable>(&self, slot: &str, entity: &T) -> Result<()> {
    let data = serde_json::to_string(entity)
      .map_err(|e| eyre!("Failed to serialize {}: {}", T::entity_type(), e))?;
    self.storage.put(slot, &data)?;
    debug!("Cached {} {} in {}", T::entity_type(), entity.cache_key(), slot);
    Ok(())
  }

  /// Load the entity stored in `slot`.
  pub fn load_entity<T: Cacheable>(&self, slot: &str) -> Option<CachedEntity<T>> {
    let stored = self.read(slot)?;
    match serde_json::from_str::<T>(&stored.value) {
      Ok(entity) => Some(CachedEntity {
        entity,
        cached_at: stored.saved_at,
      }),
      Err(e) => {
        warn!("Ignoring malformed cache slot {}: {}", slot, e);
        None
      }
    }
  }

  fn read(&self, slot: &str) -> Option<super::storage::StoredValue> {
    match self.storage.get(slot) {
      Ok(Some(stored)) => Some(stored),
      Ok(None) => {
        debug!("Cache miss for {}", slot);
        None
      }
      Err(e) => {
        warn!("Failed to read cache slot {}: {}", slot, e);
        None
      }
    }
  }
}
