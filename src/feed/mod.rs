//! Listing controller: reconciles fetched pages with the cache and derives
//! what the listing shows.

pub mod detail;
pub mod filter;
pub mod repository;

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::cache::{CacheLayer, CacheSource};
use crate::news::{Article, CategoryFilter, FetchError, FetchPage, FetchRequest, NewsClient};
use crate::query::{Query, QueryState};

pub use repository::{ArticleRepository, CategoryView};

/// Selected category and search text. Derived state, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
  pub category: CategoryFilter,
  pub query: String,
}

/// What the listing is currently showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
  /// Nothing requested yet
  Idle,
  /// A request is pending (including its debounce delay)
  Loading,
  /// At least one article is visible
  Ready,
  /// Loaded, but nothing matches the selection
  Empty,
  /// The latest request failed
  Error(String),
}

/// Controller behind the article listing.
pub struct Feed {
  repository: ArticleRepository,
  query: Query<FetchRequest, FetchPage>,
  selection: Selection,
  debounce: Duration,
  source: Option<CacheSource>,
}

impl Feed {
  /// Create a feed that fetches through `fetcher`.
  pub fn new<F, Fut>(cache: CacheLayer, debounce: Duration, fetcher: F) -> Self
  where
    F: Fn(FetchRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<FetchPage, FetchError>> + Send + 'static,
  {
    let query = Query::new(move |request: FetchRequest| {
      let pending = fetcher(request);
      async move { pending.await.map_err(|e| e.to_string()) }
    });

    Self {
      repository: ArticleRepository::new(cache),
      query,
      selection: Selection::default(),
      debounce,
      source: None,
    }
  }

  /// Create a feed backed by the news API client.
  pub fn with_client(cache: CacheLayer, debounce: Duration, client: NewsClient) -> Self {
    Self::new(cache, debounce, move |request: FetchRequest| {
      let client = client.clone();
      async move { client.fetch(&request).await }
    })
  }

  /// Populate the listing: from the cached snapshot when there is one,
  /// otherwise by fetching `category`.
  pub fn start(&mut self, category: CategoryFilter) {
    self.selection.category = category;
    if self.repository.restore() {
      self.source = Some(CacheSource::Cache);
    } else {
      self.query.fetch(FetchRequest::for_category(category));
    }
  }

  /// Switch category. The listing narrows at once; the replacing request is
  /// sent after the debounce delay unless another switch supersedes it.
  pub fn select_category(&mut self, category: CategoryFilter) {
    self.selection.category = category;
    self
      .query
      .schedule(FetchRequest::for_category(category), self.debounce);
  }

  /// Update the search text. Never fetches.
  pub fn set_search(&mut self, query: &str) {
    self.selection.query = query.to_string();
  }

  /// Request the next page if the provider offered one and nothing is pending.
  pub fn load_more(&mut self) -> bool {
    if self.query.is_loading() {
      return false;
    }
    match self.repository.next_page() {
      Some(token) => {
        let request = FetchRequest::next_page(self.selection.category, token.to_string());
        self.query.fetch(request);
        true
      }
      None => false,
    }
  }

  /// Re-request the current category now.
  pub fn refresh(&mut self) {
    self
      .query
      .refetch(FetchRequest::for_category(self.selection.category));
  }

  /// Apply any response that arrived. Returns `true` if something changed.
  pub fn tick(&mut self) -> bool {
    if !self.query.poll() {
      return false;
    }

    if let Some(page) = self.query.data() {
      let append = self.query.params().is_some_and(FetchRequest::is_append);
      self.repository.accept(page.clone(), append);
      self.source = Some(CacheSource::Network);
    } else if let Some(e) = self.query.error() {
      warn!("Fetch failed: {}", e);
      if self.repository.is_loaded() {
        self.source = Some(CacheSource::Offline);
      }
    }
    true
  }

  pub fn status(&self) -> ViewStatus {
    match self.query.state() {
      QueryState::Loading => ViewStatus::Loading,
      QueryState::Error(e) => ViewStatus::Error(e.clone()),
      QueryState::Idle | QueryState::Success(_) => {
        if !self.repository.is_loaded() {
          ViewStatus::Idle
        } else if self.visible().is_empty() {
          ViewStatus::Empty
        } else {
          ViewStatus::Ready
        }
      }
    }
  }

  /// Articles matching the current selection
  pub fn visible(&self) -> Vec<&Article> {
    filter::visible(
      self.repository.working_set(),
      self.selection.category,
      &self.selection.query,
    )
  }

  /// The current category narrowing, ignoring the search text
  pub fn category_view(&self) -> CategoryView<'_> {
    self.repository.apply_category(self.selection.category)
  }

  pub fn selection(&self) -> &Selection {
    &self.selection
  }

  pub fn repository(&self) -> &ArticleRepository {
    &self.repository
  }

  /// Where the working set came from, once anything has loaded
  pub fn source(&self) -> Option<CacheSource> {
    self.source
  }

  pub fn has_more(&self) -> bool {
    self.repository.next_page().is_some()
  }
}
