//! Recovering a single article from the cache when no navigation payload is
//! available, e.g. when the program is started directly on a detail view.

use tracing::debug;

use super::repository::{CURRENT_ARTICLE_SLOT, SNAPSHOT_SLOT};
use crate::cache::{CacheLayer, Cacheable};
use crate::news::Article;

/// Maximum number of related articles shown under a detail view
pub const RELATED_LIMIT: usize = 5;

/// Outcome of resolving an article identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  Found {
    article: Article,
    related: Vec<Article>,
  },
  /// Not in the snapshot nor in the current-article slot
  NotFound,
}

/// Look up the article with identifier `id` in the cache.
///
/// The snapshot is searched first, then the current-article slot. Related
/// articles always come from the snapshot.
pub fn resolve(cache: &CacheLayer, id: &str) -> Resolution {
  let snapshot = load_snapshot(cache);

  let article = snapshot
    .iter()
    .find(|a| a.cache_key() == id)
    .cloned()
    .or_else(|| {
      cache
        .load_entity::<Article>(CURRENT_ARTICLE_SLOT)
        .map(|cached| cached.entity)
        .filter(|a| a.cache_key() == id)
    });

  match article {
    Some(article) => {
      let related = related(&snapshot, &article, RELATED_LIMIT)
        .into_iter()
        .cloned()
        .collect();
      Resolution::Found { article, related }
    }
    None => {
      debug!("Article {} not found in cache", id);
      Resolution::NotFound
    }
  }
}

/// Related articles for an article opened from the listing
pub fn related_in_cache(cache: &CacheLayer, article: &Article) -> Vec<Article> {
  let snapshot = load_snapshot(cache);
  related(&snapshot, article, RELATED_LIMIT)
    .into_iter()
    .cloned()
    .collect()
}

fn load_snapshot(cache: &CacheLayer) -> Vec<Article> {
  cache
    .load_list::<Article>(SNAPSHOT_SLOT)
    .map(|cached| cached.entities)
    .unwrap_or_default()
}

/// Up to `limit` other articles sharing a category tag with `article`, in
/// snapshot order. The article itself is excluded by title.
pub fn related<'a>(snapshot: &'a [Article], article: &Article, limit: usize) -> Vec<&'a Article> {
  snapshot
    .iter()
    .filter(|a| a.title != article.title && a.shares_category_with(article))
    .take(limit)
    .collect()
}
