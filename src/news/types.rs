use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// A single news article as fetched from the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
  pub title: String,
  pub description: Option<String>,
  pub image_url: Option<String>,
  pub published_at: DateTime<Utc>,
  pub link: String,
  /// Lowercased category tags, in provider order
  #[serde(default)]
  pub categories: Vec<String>,
  /// Identifier assigned by the provider, if it sent one
  pub provider_id: Option<String>,
  pub source: Option<String>,
}

impl Article {
  /// Stable identity of the article.
  ///
  /// The provider identifier when present, otherwise the first 16 hex digits
  /// of SHA-256 over title and publish time.
  pub fn id(&self) -> String {
    if let Some(id) = self.provider_id.as_deref().filter(|id| !id.is_empty()) {
      return id.to_string();
    }

    let mut hasher = Sha256::new();
    hasher.update(self.title.as_bytes());
    hasher.update(b"\n");
    hasher.update(self.published_at.to_rfc3339().as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..16].to_string()
  }

  /// Whether any of the article's tags is `category`
  pub fn has_category(&self, category: Category) -> bool {
    self.categories.iter().any(|c| c == category.as_str())
  }

  /// Whether the two articles share at least one category tag
  pub fn shares_category_with(&self, other: &Article) -> bool {
    self
      .categories
      .iter()
      .any(|c| other.categories.iter().any(|o| o == c))
  }
}

/// Categories the reader lets the user pick from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
  Business,
  Entertainment,
  Health,
  Science,
  Sports,
  Technology,
}

impl Category {
  pub const ALL: [Category; 6] = [
    Category::Business,
    Category::Entertainment,
    Category::Health,
    Category::Science,
    Category::Sports,
    Category::Technology,
  ];

  /// Provider name of the category
  pub fn as_str(&self) -> &'static str {
    match self {
      Category::Business => "business",
      Category::Entertainment => "entertainment",
      Category::Health => "health",
      Category::Science => "science",
      Category::Sports => "sports",
      Category::Technology => "technology",
    }
  }

  /// Capitalized name for display
  pub fn label(&self) -> &'static str {
    match self {
      Category::Business => "Business",
      Category::Entertainment => "Entertainment",
      Category::Health => "Health",
      Category::Science => "Science",
      Category::Sports => "Sports",
      Category::Technology => "Technology",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Category {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let lower = s.trim().to_lowercase();
    Category::ALL
      .into_iter()
      .find(|c| c.as_str() == lower)
      .ok_or_else(|| format!("unknown category '{}'", s))
  }
}

/// Selected category, or the "all categories" sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
  #[default]
  All,
  Only(Category),
}

impl CategoryFilter {
  /// Position in the tab bar: 0 = All, 1.. = `Category::ALL`
  pub fn index(&self) -> usize {
    match self {
      CategoryFilter::All => 0,
      CategoryFilter::Only(c) => Category::ALL.iter().position(|x| x == c).map_or(0, |i| i + 1),
    }
  }

  /// Inverse of `index`, clamped to All when out of range
  pub fn from_index(index: usize) -> Self {
    match index.checked_sub(1).and_then(|i| Category::ALL.get(i)) {
      Some(c) => CategoryFilter::Only(*c),
      None => CategoryFilter::All,
    }
  }

  pub fn category(&self) -> Option<Category> {
    match self {
      CategoryFilter::All => None,
      CategoryFilter::Only(c) => Some(*c),
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      CategoryFilter::All => "All",
      CategoryFilter::Only(c) => c.label(),
    }
  }
}

impl FromStr for CategoryFilter {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
      Ok(CategoryFilter::All)
    } else {
      trimmed.parse().map(CategoryFilter::Only)
    }
  }
}

/// Parameters of a single provider request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchRequest {
  pub category: CategoryFilter,
  /// Continuation token from a previous page; overrides every other filter
  pub page: Option<String>,
}

impl FetchRequest {
  pub fn for_category(category: CategoryFilter) -> Self {
    Self {
      category,
      page: None,
    }
  }

  pub fn next_page(category: CategoryFilter, token: String) -> Self {
    Self {
      category,
      page: Some(token),
    }
  }

  /// Whether the response to this request extends the current results
  pub fn is_append(&self) -> bool {
    self.page.is_some()
  }
}

/// One page of provider results
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchPage {
  pub articles: Vec<Article>,
  pub next_page: Option<String>,
}

#[cfg(test)]
pub(crate) mod test_support {
  use super::*;
  use chrono::TimeZone;

  /// Build an article with predictable fields for tests
  pub fn article(title: &str, categories: &[&str]) -> Article {
    Article {
      title: title.to_string(),
      description: Some(format!("About {}", title)),
      image_url: None,
      published_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap(),
      link: format!("https://example.com/{}", title.replace(' ', "-")),
      categories: categories.iter().map(|c| c.to_string()).collect(),
      provider_id: None,
      source: None,
    }
  }

  pub fn article_with_id(id: &str, title: &str, categories: &[&str]) -> Article {
    Article {
      provider_id: Some(id.to_string()),
      ..article(title, categories)
    }
  }
}
