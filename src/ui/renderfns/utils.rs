use crate::news::{Category, CategoryFilter};
use chrono::{DateTime, Utc};
use ratatui::prelude::Color;

/// Truncate a string to at most `max_len` characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Accent color for a category tab or tag
pub fn category_color(filter: CategoryFilter) -> Color {
  match filter.category() {
    None => Color::Cyan,
    Some(Category::Business) => Color::Green,
    Some(Category::Entertainment) => Color::Magenta,
    Some(Category::Health) => Color::LightRed,
    Some(Category::Science) => Color::Blue,
    Some(Category::Sports) => Color::Yellow,
    Some(Category::Technology) => Color::LightCyan,
  }
}

/// Color for a raw tag as returned by the provider
pub fn tag_color(tag: &str) -> Color {
  match tag.parse::<Category>() {
    Ok(category) => category_color(CategoryFilter::Only(category)),
    Err(_) => Color::DarkGray,
  }
}

/// Coarse "how long ago" label, e.g. "5m ago"
pub fn format_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
  let minutes = (now - then).num_minutes();
  match minutes {
    m if m < 1 => "just now".to_string(),
    m if m < 60 => format!("{}m ago", m),
    m if m < 60 * 24 => format!("{}h ago", m / 60),
    m => format!("{}d ago", m / (60 * 24)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration, TimeZone};

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("Überraschung in München", 10), "Überras...");
    assert_eq!(truncate("東京の天気は晴れ", 5), "東京...");
  }

  #[test]
  fn test_tag_color() {
    assert_eq!(tag_color("sports"), Color::Yellow);
    assert_eq!(tag_color("top"), Color::DarkGray);
  }

  #[test]
  fn test_format_age() {
    let now = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
    assert_eq!(format_age(now, now), "just now");
    assert_eq!(format_age(now + Duration::minutes(3), now), "just now");
    assert_eq!(format_age(now - Duration::minutes(5), now), "5m ago");
    assert_eq!(format_age(now - Duration::hours(3), now), "3h ago");
    assert_eq!(format_age(now - Duration::days(2), now), "2d ago");
  }
}
