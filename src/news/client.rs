use crate::config::{Config, NewsConfig};
use crate::news::api_types::parse_response;
use crate::news::error::FetchError;
use crate::news::types::{CategoryFilter, FetchPage, FetchRequest};
use color_eyre::{eyre::eyre, Result};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// NewsData API client
#[derive(Clone)]
pub struct NewsClient {
  http: reqwest::Client,
  endpoint: Url,
  country: String,
  language: Option<String>,
  api_key: Option<String>,
}

impl NewsClient {
  /// Create a client from the configuration.
  ///
  /// A missing API key is not an error here; requests made without one fail
  /// with a provider error, so sessions served from the cache still work.
  pub fn new(config: &Config, api_key: Option<String>) -> Result<Self> {
    let news: &NewsConfig = &config.news;

    let endpoint =
      Url::parse(&news.url).map_err(|e| eyre!("Invalid news API url {}: {}", news.url, e))?;

    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(news.timeout_secs))
      .user_agent(concat!("newsdeck/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      endpoint,
      country: news.country.clone(),
      language: news.language.clone(),
      api_key,
    })
  }

  /// Build the request URL for a fetch.
  ///
  /// A continuation token replaces every other filter.
  fn request_url(&self, api_key: &str, request: &FetchRequest) -> Url {
    let mut url = self.endpoint.clone();
    {
      let mut pairs = url.query_pairs_mut();
      pairs.append_pair("apikey", api_key);

      if let Some(token) = &request.page {
        pairs.append_pair("page", token);
      } else {
        pairs.append_pair("country", &self.country);
        if let Some(language) = &self.language {
          pairs.append_pair("language", language);
        }
        if let CategoryFilter::Only(category) = request.category {
          pairs.append_pair("category", category.as_str());
        }
      }
    }
    url
  }

  /// Fetch one page of articles
  pub async fn fetch(&self, request: &FetchRequest) -> Result<FetchPage, FetchError> {
    let api_key = self.api_key.as_deref().ok_or_else(|| {
      FetchError::Provider(
        "No API key configured. Set NEWSDECK_API_KEY or NEWSDATA_API_KEY.".to_string(),
      )
    })?;

    let url = self.request_url(api_key, request);
    debug!(
      "Fetching news: category={} page={:?}",
      request.category.label(),
      request.page
    );

    let response = self.http.get(url).send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;

    let page = parse_response(status, &body)?;
    info!(
      "Fetched {} articles (category={}, more={})",
      page.articles.len(),
      request.category.label(),
      page.next_page.is_some()
    );
    Ok(page)
  }
}
