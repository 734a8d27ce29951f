use thiserror::Error;

/// Classified failure of a provider request.
///
/// The `Display` text is what the listing shows to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
  /// Provider signalled quota exhaustion
  #[error("API rate limit exceeded. Please try again later.")]
  RateLimited,

  /// Any other provider-reported failure, including malformed payloads
  #[error("{0}")]
  Provider(String),

  /// Transport failure
  #[error("Network error: {0}")]
  Network(String),
}

impl FetchError {
  /// Provider error with the generic fallback text when the provider sent none
  pub fn provider(message: Option<String>) -> Self {
    match message.filter(|m| !m.trim().is_empty()) {
      Some(m) => FetchError::Provider(m),
      None => FetchError::Provider("Error fetching news".to_string()),
    }
  }
}

impl From<reqwest::Error> for FetchError {
  fn from(e: reqwest::Error) -> Self {
    // The request URL carries the API key
    FetchError::Network(e.without_url().to_string())
  }
}
