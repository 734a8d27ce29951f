//! Pure functions deriving the visible articles from the working set.

use crate::news::{Article, CategoryFilter};

/// Narrow the working set to one category; `All` keeps everything.
pub fn narrow(working_set: &[Article], category: CategoryFilter) -> Vec<&Article> {
  match category {
    CategoryFilter::All => working_set.iter().collect(),
    CategoryFilter::Only(c) => working_set.iter().filter(|a| a.has_category(c)).collect(),
  }
}

/// Case-insensitive title match; an empty query matches everything.
pub fn matches_query(article: &Article, query: &str) -> bool {
  query.is_empty() || article.title.to_lowercase().contains(&query.to_lowercase())
}

/// Articles to display for the given category and search query, in working
/// set order.
pub fn visible<'a>(
  working_set: &'a [Article],
  category: CategoryFilter,
  query: &str,
) -> Vec<&'a Article> {
  narrow(working_set, category)
    .into_iter()
    .filter(|a| matches_query(a, query))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::news::types::test_support::article;
  use crate::news::Category;

  fn working_set() -> Vec<Article> {
    vec![
      article("Stocks Climb Again", &["business", "top"]),
      article("Cup Final Tonight", &["sports"]),
      article("New Vaccine Approved", &["health", "science"]),
      article("Chip stocks slide", &["technology", "business"]),
      article("Untagged story", &[]),
    ]
  }

  fn titles(articles: &[&Article]) -> Vec<String> {
    articles.iter().map(|a| a.title.clone()).collect()
  }

  #[test]
  fn test_all_with_empty_query_is_identity() {
    let ws = working_set();
    let result = visible(&ws, CategoryFilter::All, "");
    let expected: Vec<&Article> = ws.iter().collect();
    assert_eq!(result, expected);
  }

  #[test]
  fn test_category_narrowing() {
    let ws = working_set();
    let result = visible(&ws, CategoryFilter::Only(Category::Business), "");
    assert_eq!(
      titles(&result),
      vec!["Stocks Climb Again", "Chip stocks slide"]
    );
  }

  #[test]
  fn test_absent_category_is_empty() {
    let ws = working_set();
    assert!(visible(&ws, CategoryFilter::Only(Category::Entertainment), "").is_empty());
  }

  #[test]
  fn test_query_is_case_insensitive_substring() {
    let ws = working_set();
    for query in ["stocks", "STOCKS", "ocK", "cup", "vaccine approved", "zzz"] {
      let result = visible(&ws, CategoryFilter::All, query);
      for a in &result {
        assert!(
          a.title.to_lowercase().contains(&query.to_lowercase()),
          "{} should contain {}",
          a.title,
          query
        );
      }
    }
    assert_eq!(visible(&ws, CategoryFilter::All, "STOCKS").len(), 2);
    assert!(visible(&ws, CategoryFilter::All, "zzz").is_empty());
  }

  #[test]
  fn test_category_and_query_compose() {
    let ws = working_set();
    let result = visible(&ws, CategoryFilter::Only(Category::Technology), "stocks");
    assert_eq!(titles(&result), vec!["Chip stocks slide"]);
  }

  #[test]
  fn test_visible_is_idempotent_and_pure() {
    let ws = working_set();
    let before = ws.clone();
    let first = titles(&visible(&ws, CategoryFilter::Only(Category::Business), "s"));
    let second = titles(&visible(&ws, CategoryFilter::Only(Category::Business), "s"));
    assert_eq!(first, second);
    assert_eq!(ws, before);
  }
}
