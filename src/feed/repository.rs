//! In-memory working set reconciled with the cached snapshot.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::future::Future;
use tracing::{info, warn};

use super::filter;
use crate::cache::{CacheLayer, CacheSource};
use crate::news::{Article, CategoryFilter, FetchError, FetchPage, FetchRequest};

/// Cache slot holding the last working set
pub const SNAPSHOT_SLOT: &str = "news";

/// Cache slot holding the article most recently opened in a detail view
pub const CURRENT_ARTICLE_SLOT: &str = "current_article";

/// Result of narrowing the working set to a category
#[derive(Debug, PartialEq, Eq)]
pub enum CategoryView<'a> {
  Articles(Vec<&'a Article>),
  /// Nothing in the working set carries the category
  NoResults,
}

/// Working set of articles with write-through to the snapshot slot.
pub struct ArticleRepository {
  cache: CacheLayer,
  working_set: Vec<Article>,
  next_page: Option<String>,
  /// When the working set was last saved or restored
  updated_at: Option<DateTime<Utc>>,
  loaded: bool,
}

impl ArticleRepository {
  pub fn new(cache: CacheLayer) -> Self {
    Self {
      cache,
      working_set: Vec::new(),
      next_page: None,
      updated_at: None,
      loaded: false,
    }
  }

  pub fn cache(&self) -> &CacheLayer {
    &self.cache
  }

  pub fn working_set(&self) -> &[Article] {
    &self.working_set
  }

  /// Continuation token of the last page fetched
  pub fn next_page(&self) -> Option<&str> {
    self.next_page.as_deref()
  }

  pub fn updated_at(&self) -> Option<DateTime<Utc>> {
    self.updated_at
  }

  /// Whether the working set has been populated from cache or network
  pub fn is_loaded(&self) -> bool {
    self.loaded
  }

  /// Adopt the cached snapshot if there is a non-empty one.
  pub fn restore(&mut self) -> bool {
    match self.cache.load_list::<Article>(SNAPSHOT_SLOT) {
      Some(cached) if !cached.entities.is_empty() => {
        info!("Restored {} articles from cache", cached.entities.len());
        self.working_set = dedup_by_title(cached.entities);
        self.updated_at = Some(cached.cached_at);
        self.loaded = true;
        true
      }
      _ => false,
    }
  }

  /// Populate the working set on startup.
  ///
  /// Serves the cached snapshot when present; otherwise fetches the default
  /// (all categories) page and saves it. The fetcher is not called on a
  /// cache hit.
  pub async fn initialize<F, Fut>(&mut self, fetcher: F) -> Result<CacheSource, FetchError>
  where
    F: FnOnce(FetchRequest) -> Fut,
    Fut: Future<Output = Result<FetchPage, FetchError>>,
  {
    if self.restore() {
      return Ok(CacheSource::Cache);
    }

    let page = fetcher(FetchRequest::default()).await?;
    self.accept(page, false);
    Ok(CacheSource::Network)
  }

  /// Narrow the working set to `category`.
  pub fn apply_category(&self, category: CategoryFilter) -> CategoryView<'_> {
    let articles = filter::narrow(&self.working_set, category);
    if articles.is_empty() && category != CategoryFilter::All {
      CategoryView::NoResults
    } else {
      CategoryView::Articles(articles)
    }
  }

  /// Fold new articles into the working set.
  ///
  /// Appending keeps existing articles first; replacing discards them. Either
  /// way the result is deduplicated by title, first occurrence wins.
  pub fn merge(&mut self, new_articles: Vec<Article>, append: bool) {
    let combined = if append {
      let mut combined = std::mem::take(&mut self.working_set);
      combined.extend(new_articles);
      combined
    } else {
      new_articles
    };
    self.working_set = dedup_by_title(combined);
    self.loaded = true;
  }

  /// Merge a fetched page and write the whole working set to the snapshot.
  pub fn accept(&mut self, page: FetchPage, append: bool) {
    self.merge(page.articles, append);
    self.next_page = page.next_page;
    self.updated_at = Some(Utc::now());

    if let Err(e) = self.cache.save_list(SNAPSHOT_SLOT, &self.working_set) {
      warn!("Failed to save article snapshot: {}", e);
    }
  }
}

/// Write `article` to the current-article slot, logging failures.
pub fn remember_current(cache: &CacheLayer, article: &Article) {
  if let Err(e) = cache.save_entity(CURRENT_ARTICLE_SLOT, article) {
    warn!("Failed to save current article: {}", e);
  }
}

/// Drop articles whose title was already seen, keeping first-seen order.
pub fn dedup_by_title(articles: Vec<Article>) -> Vec<Article> {
  let mut seen: HashSet<String> = HashSet::new();
  articles
    .into_iter()
    .filter(|a| seen.insert(a.title.clone()))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::MemoryStorage;
  use crate::news::types::test_support::{article, article_with_id};
  use crate::news::Category;
  use std::cell::Cell;

  fn repository() -> ArticleRepository {
    ArticleRepository::new(CacheLayer::new(MemoryStorage::new()))
  }

  fn titles(articles: &[Article]) -> Vec<&str> {
    articles.iter().map(|a| a.title.as_str()).collect()
  }

  #[test]
  fn test_merge_append_dedups_first_seen() {
    let mut repo = repository();
    let a = article_with_id("1", "A", &["business"]);
    let b = article("B", &["sports"]);
    let a_prime = article_with_id("2", "A", &["health"]);

    repo.merge(vec![a.clone(), b.clone()], false);
    repo.merge(vec![a_prime], true);

    assert_eq!(repo.working_set(), &[a, b]);
  }

  #[test]
  fn test_merge_dedups_within_a_page() {
    let mut repo = repository();
    repo.merge(
      vec![article("A", &[]), article("B", &[]), article("A", &["x"])],
      false,
    );
    assert_eq!(titles(repo.working_set()), vec!["A", "B"]);
  }

  #[test]
  fn test_merge_replace_discards_previous() {
    let mut repo = repository();
    repo.merge(vec![article("Old", &[])], false);
    repo.merge(vec![article("New", &[])], false);
    assert_eq!(titles(repo.working_set()), vec!["New"]);
  }

  #[test]
  fn test_accept_writes_through_and_overwrites() {
    let mut repo = repository();
    repo.accept(
      FetchPage {
        articles: vec![article("One", &[]), article("Two", &[])],
        next_page: Some("tok".to_string()),
      },
      false,
    );
    assert_eq!(repo.next_page(), Some("tok"));

    repo.accept(
      FetchPage {
        articles: vec![article("Three", &[])],
        next_page: None,
      },
      false,
    );
    assert_eq!(repo.next_page(), None);

    let cached = repo.cache().load_list::<Article>(SNAPSHOT_SLOT).unwrap();
    assert_eq!(titles(&cached.entities), vec!["Three"]);
  }

  #[test]
  fn test_apply_category() {
    let mut repo = repository();
    repo.merge(
      vec![article("A", &["business"]), article("B", &["sports"])],
      false,
    );

    assert_eq!(
      repo.apply_category(CategoryFilter::Only(Category::Sports)),
      CategoryView::Articles(vec![&repo.working_set()[1]])
    );
    assert_eq!(
      repo.apply_category(CategoryFilter::Only(Category::Science)),
      CategoryView::NoResults
    );
    match repo.apply_category(CategoryFilter::All) {
      CategoryView::Articles(all) => assert_eq!(all.len(), 2),
      CategoryView::NoResults => panic!("all should restore the working set"),
    }
  }

  #[tokio::test]
  async fn test_cold_start_empty_cache_fetches_and_saves() {
    let mut repo = repository();
    let page = FetchPage {
      articles: (0..10)
        .map(|i| article(&format!("Business story {}", i), &["business"]))
        .collect(),
      next_page: None,
    };

    let source = repo
      .initialize(|request| async move {
        assert_eq!(request, FetchRequest::default());
        Ok(page)
      })
      .await
      .unwrap();

    assert_eq!(source, CacheSource::Network);
    assert_eq!(repo.working_set().len(), 10);

    let cached = repo.cache().load_list::<Article>(SNAPSHOT_SLOT).unwrap();
    assert_eq!(cached.entities, repo.working_set());
  }

  #[tokio::test]
  async fn test_cold_start_with_snapshot_skips_fetch() {
    let cache = CacheLayer::new(MemoryStorage::new());
    let snapshot = vec![article("A", &[]), article("B", &[]), article("C", &[])];
    cache.save_list(SNAPSHOT_SLOT, &snapshot).unwrap();

    let mut repo = ArticleRepository::new(cache);
    let called = Cell::new(false);
    let source = repo
      .initialize(|_| {
        called.set(true);
        async { Ok(FetchPage::default()) }
      })
      .await
      .unwrap();

    assert_eq!(source, CacheSource::Cache);
    assert!(!called.get());
    assert_eq!(repo.working_set(), snapshot.as_slice());
  }

  #[tokio::test]
  async fn test_empty_snapshot_triggers_fetch() {
    let cache = CacheLayer::new(MemoryStorage::new());
    cache.save_list::<Article>(SNAPSHOT_SLOT, &[]).unwrap();

    let mut repo = ArticleRepository::new(cache);
    let source = repo
      .initialize(|_| async {
        Ok(FetchPage {
          articles: vec![article("Fresh", &[])],
          next_page: None,
        })
      })
      .await
      .unwrap();

    assert_eq!(source, CacheSource::Network);
    assert_eq!(titles(repo.working_set()), vec!["Fresh"]);
  }

  #[tokio::test]
  async fn test_initialize_failure_leaves_cache_untouched() {
    let mut repo = repository();
    let result = repo
      .initialize(|_| async { Err(FetchError::RateLimited) })
      .await;

    assert_eq!(result, Err(FetchError::RateLimited));
    assert!(!repo.is_loaded());
    assert!(repo.cache().load_list::<Article>(SNAPSHOT_SLOT).is_none());
  }

  #[test]
  fn test_remember_current() {
    let repo = repository();
    let a = article_with_id("42", "Answer", &[]);
    remember_current(repo.cache(), &a);
    let cached = repo
      .cache()
      .load_entity::<Article>(CURRENT_ARTICLE_SLOT)
      .unwrap();
    assert_eq!(cached.entity, a);
  }
}
