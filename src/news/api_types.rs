//! Serde-deserializable types matching NewsData API responses.
//!
//! These types are separate from domain types so the payload can be validated
//! at the boundary: anything missing a required field is rejected here rather
//! than surfacing as a panic or an empty title further down.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::error::FetchError;
use super::types::{Article, FetchPage};

/// Provider code used when the daily credit quota is exhausted
const RATE_LIMIT_CODE: &str = "RateLimitExceeded";

// ============================================================================
// Response envelope
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiResponse {
  pub status: String,
  #[serde(default)]
  pub results: Value,
  #[serde(rename = "nextPage", default)]
  pub next_page: Option<Value>,
  pub message: Option<String>,
}

/// Error details, sent in place of the results array
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorDetails {
  pub message: Option<String>,
  pub code: Option<String>,
}

// ============================================================================
// Articles
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiArticle {
  pub article_id: Option<String>,
  pub title: Option<String>,
  pub link: Option<String>,
  pub description: Option<String>,
  #[serde(rename = "pubDate")]
  pub pub_date: Option<String>,
  pub image_url: Option<String>,
  #[serde(default)]
  pub category: Option<Vec<String>>,
  pub source_id: Option<String>,
}

impl ApiArticle {
  /// Convert to a domain article; `None` if a required field is missing
  pub fn into_article(self) -> Option<Article> {
    let title = non_empty(self.title)?;
    let link = non_empty(self.link)?;
    let published_at = parse_pub_date(self.pub_date.as_deref()?)?;

    let mut categories: Vec<String> = Vec::new();
    for tag in self.category.unwrap_or_default() {
      let tag = tag.trim().to_lowercase();
      if !tag.is_empty() && !categories.contains(&tag) {
        categories.push(tag);
      }
    }

    Some(Article {
      title,
      description: non_empty(self.description),
      image_url: non_empty(self.image_url),
      published_at,
      link,
      categories,
      provider_id: non_empty(self.article_id),
      source: non_empty(self.source_id),
    })
  }
}

// ============================================================================
// Parsing
// ============================================================================

/// Validate a provider response body and convert it into a page of articles.
///
/// `http_status` is the HTTP status code the body arrived with.
pub fn parse_response(http_status: u16, body: &str) -> Result<FetchPage, FetchError> {
  if http_status == 429 {
    return Err(FetchError::RateLimited);
  }

  let response: ApiResponse = match serde_json::from_str(body) {
    Ok(r) => r,
    Err(e) => {
      if !(200..300).contains(&http_status) {
        return Err(FetchError::Provider(format!(
          "Provider returned HTTP {}",
          http_status
        )));
      }
      return Err(FetchError::Provider(format!(
        "Malformed provider response: {}",
        e
      )));
    }
  };

  if response.status != "success" {
    return Err(classify_error(response));
  }

  let results = match response.results {
    Value::Array(items) => items,
    Value::Null => Vec::new(),
    other => {
      return Err(FetchError::Provider(format!(
        "Malformed provider response: expected results array, got {}",
        json_kind(&other)
      )))
    }
  };

  let total = results.len();
  let articles: Vec<Article> = results
    .into_iter()
    .enumerate()
    .filter_map(|(idx, item)| {
      match serde_json::from_value::<ApiArticle>(item)
        .ok()
        .and_then(ApiArticle::into_article)
      {
        Some(article) => Some(article),
        None => {
          warn!("Skipping malformed article at position {}", idx);
          None
        }
      }
    })
    .collect();

  if articles.len() < total {
    warn!("Kept {} of {} articles", articles.len(), total);
  }

  Ok(FetchPage {
    articles,
    next_page: response.next_page.and_then(token_value),
  })
}

/// Turn an error envelope into the matching `FetchError`
fn classify_error(response: ApiResponse) -> FetchError {
  let details: ApiErrorDetails = serde_json::from_value(response.results).unwrap_or_default();
  let message = details.message.or(response.message);

  let is_rate_limit = details.code.as_deref() == Some(RATE_LIMIT_CODE)
    || message
      .as_deref()
      .is_some_and(|m| m.to_lowercase().contains("rate limit"));

  if is_rate_limit {
    FetchError::RateLimited
  } else {
    FetchError::provider(message)
  }
}

/// The provider sends the continuation token as a string, occasionally a number
fn token_value(value: Value) -> Option<String> {
  match value {
    Value::String(s) if !s.is_empty() => Some(s),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

fn parse_pub_date(s: &str) -> Option<DateTime<Utc>> {
  NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S")
    .map(|dt| dt.and_utc())
    .ok()
    .or_else(|| {
      DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}
