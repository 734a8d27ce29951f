//! Async query abstraction for data fetching.
//!
//! Inspired by TanStack Query, this module provides a `Query<P, T>` type that
//! encapsulates async data fetching, loading states, and error handling for a
//! fetcher taking request parameters `P`.
//!
//! Every request is tagged with a generation number. Starting a new request
//! supersedes the previous one: a debounced request that was superseded while
//! waiting is never sent, and a response whose generation is not the latest is
//! dropped when polled.
//!
//! # Example
//!
//! ```ignore
//! let client = news_client.clone();
//! let mut query = Query::new(move |request: FetchRequest| {
//!     let client = client.clone();
//!     async move { client.fetch(&request).await.map_err(|e| e.to_string()) }
//! });
//!
//! // Coalesce rapid category clicks
//! query.schedule(FetchRequest::for_category(category), Duration::from_millis(600));
//!
//! // In event loop tick
//! if query.poll() {
//!     // State changed, trigger re-render
//! }
//! ```

use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// The state of a query
#[derive(Debug, Clone)]
pub enum QueryState<T> {
  /// Query has not been started
  Idle,
  /// Query is waiting for its debounce delay or fetching data
  Loading,
  /// Query completed successfully
  Success(T),
  /// Query failed with an error
  Error(String),
}

impl<T> QueryState<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, QueryState::Loading)
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }
}

/// A factory function that creates futures for fetching data
type FetcherFn<P, T> = Arc<dyn Fn(P) -> BoxFuture<'static, Result<T, String>> + Send + Sync>;

/// A response tagged with the generation of the request that produced it
type Tagged<T> = (u64, Result<T, String>);

/// Async query for data fetching with state management.
///
/// Query<P, T> encapsulates:
/// - The fetching logic (via a closure taking request parameters)
/// - Loading/success/error states
/// - Async result handling via a channel, tagged by generation
/// - Debounced scheduling of superseding requests
pub struct Query<P, T> {
  state: QueryState<T>,
  fetcher: FetcherFn<P, T>,
  tx: mpsc::UnboundedSender<Tagged<T>>,
  rx: mpsc::UnboundedReceiver<Tagged<T>>,
  /// Generation of the most recent request, shared with scheduled tasks
  generation: Arc<AtomicU64>,
  /// Parameters of the most recent request
  params: Option<P>,
}

impl<P, T> Query<P, T>
where
  P: Clone + Send + 'static,
  T: Send + 'static,
{
  /// Create a new query with the given fetcher function.
  ///
  /// The fetcher is a closure that returns a future. It will be called
  /// once per request that is actually issued.
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn(P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      state: QueryState::Idle,
      fetcher: Arc::new(move |params: P| fetcher(params).boxed()),
      tx,
      rx,
      generation: Arc::new(AtomicU64::new(0)),
      params: None,
    }
  }

  /// Get the current state of the query.
  pub fn state(&self) -> &QueryState<T> {
    &self.state
  }

  /// Get the data if the query succeeded.
  pub fn data(&self) -> Option<&T> {
    self.state.data()
  }

  /// Check if the query is currently loading.
  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  /// Get the error message if the query failed.
  pub fn error(&self) -> Option<&str> {
    self.state.error()
  }

  /// Parameters of the most recent request.
  pub fn params(&self) -> Option<&P> {
    self.params.as_ref()
  }

  /// Start fetching if not already loading.
  ///
  /// This is a no-op if a request is already outstanding.
  pub fn fetch(&mut self, params: P) {
    if self.state.is_loading() {
      return;
    }
    self.start(params, None);
  }

  /// Force a new request now, superseding any outstanding one.
  pub fn refetch(&mut self, params: P) {
    self.start(params, None);
  }

  /// Issue a superseding request after `delay`.
  ///
  /// Scheduling again before the delay elapses replaces this request, which
  /// is then never sent.
  pub fn schedule(&mut self, params: P, delay: Duration) {
    self.start(params, Some(delay));
  }

  /// Poll for results from pending requests.
  ///
  /// Returns `true` if the state changed (data arrived or error occurred).
  /// Call this in your event loop tick handler.
  pub fn poll(&mut self) -> bool {
    let latest = self.generation.load(Ordering::SeqCst);
    let mut changed = false;

    // Try to receive without blocking
    while let Ok((generation, result)) = self.rx.try_recv() {
      if generation != latest {
        debug!(
          "Discarding stale response (generation {}, latest {})",
          generation, latest
        );
        continue;
      }

      self.state = match result {
        Ok(data) => QueryState::Success(data),
        Err(error) => QueryState::Error(error),
      };
      changed = true;
    }

    changed
  }

  /// Internal: bump the generation and spawn the request
  fn start(&mut self, params: P, delay: Option<Duration>) {
    let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
    self.state = QueryState::Loading;
    self.params = Some(params.clone());

    let latest = Arc::clone(&self.generation);
    let fetcher = Arc::clone(&self.fetcher);
    let tx = self.tx.clone();

    tokio::spawn(async move {
      if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
        if latest.load(Ordering::SeqCst) != generation {
          // Superseded while waiting
          return;
        }
      }

      let result = fetcher(params).await;
      // Ignore send errors - the query may have been dropped
      let _ = tx.send((generation, result));
    });
  }
}

impl<P: std::fmt::Debug, T: std::fmt::Debug> std::fmt::Debug for Query<P, T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("state", &self.state)
      .field("params", &self.params)
      .field("generation", &self.generation.load(Ordering::SeqCst))
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::AtomicU32;
  use std::sync::Mutex;

  #[tokio::test]
  async fn test_query_success() {
    let mut query = Query::new(|n: u32| async move { Ok::<_, String>(vec![n, n + 1]) });

    assert!(matches!(query.state(), QueryState::Idle));

    query.fetch(1);
    assert!(query.is_loading());
    assert_eq!(query.params(), Some(&1));

    // Wait for the result
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(query.poll());
    assert_eq!(query.data(), Some(&vec![1, 2]));
  }

  #[tokio::test]
  async fn test_query_error() {
    let mut query: Query<(), i32> =
      Query::new(|_| async { Err("Something went wrong".to_string()) });

    query.fetch(());
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(query.poll());
    assert!(query.data().is_none());
    assert_eq!(query.error(), Some("Something went wrong"));
  }

  #[tokio::test]
  async fn test_fetch_while_loading_is_noop() {
    let calls = Arc::new(AtomicU32::new(0));
    let calls_clone = calls.clone();
    let mut query = Query::new(move |_: ()| {
      let calls = calls_clone.clone();
      async move {
        calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok::<_, String>(42)
      }
    });

    query.fetch(());
    assert!(query.is_loading());

    // Second fetch should be no-op
    query.fetch(());
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(query.poll());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_stale_response_is_discarded() {
    // The first request is slow, the second fast: the slow one resolves last
    let mut query = Query::new(|label: &'static str| async move {
      if label == "slow" {
        tokio::time::sleep(Duration::from_millis(60)).await;
      }
      Ok::<_, String>(label)
    });

    query.refetch("slow");
    query.refetch("fast");
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(query.poll());
    assert_eq!(query.data(), Some(&"fast"));

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(!query.poll());
    assert_eq!(query.data(), Some(&"fast"));
  }

  #[tokio::test]
  async fn test_schedule_coalesces_rapid_triggers() {
    let issued = Arc::new(Mutex::new(Vec::new()));
    let issued_clone = issued.clone();
    let mut query = Query::new(move |category: &'static str| {
      let issued = issued_clone.clone();
      async move {
        issued.lock().unwrap().push(category);
        Ok::<_, String>(category)
      }
    });

    let delay = Duration::from_millis(30);
    query.schedule("business", delay);
    query.schedule("health", delay);
    query.schedule("sports", delay);
    assert!(query.is_loading());
    assert_eq!(query.params(), Some(&"sports"));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(query.poll());
    assert_eq!(query.data(), Some(&"sports"));
    assert_eq!(*issued.lock().unwrap(), vec!["sports"]);
  }

  #[tokio::test]
  async fn test_refetch_supersedes_scheduled() {
    let calls = Arc::new(AtomicU32::new(0));
    let calls_clone = calls.clone();
    let mut query = Query::new(move |n: u32| {
      let calls = calls_clone.clone();
      async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok::<_, String>(n)
      }
    });

    query.schedule(1, Duration::from_millis(30));
    query.refetch(2);
    tokio::time::sleep(Duration::from_millis(80)).await;

    query.poll();
    assert_eq!(query.data(), Some(&2));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }
}
