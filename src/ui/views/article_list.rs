use crate::cache::CacheSource;
use crate::feed::{CategoryView, Feed, ViewStatus};
use crate::news::Article;
use crate::ui::components::{CategoryBar, CategoryBarEvent, KeyResult, SearchEvent, SearchInput};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{category_color, format_age, tag_color, truncate};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::ArticleDetailView;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use tracing::debug;

/// Root view: the article listing with its category bar and search
pub struct ArticleListView {
  feed: Feed,
  list_state: ListState,
  search: SearchInput,
  categories: CategoryBar,
}

impl ArticleListView {
  pub fn new(feed: Feed) -> Self {
    let selection = feed.selection();
    let search = SearchInput::with_query(&selection.query);
    let categories = CategoryBar::new(selection.category);

    Self {
      feed,
      list_state: ListState::default(),
      search,
      categories,
    }
  }

  fn selected_article(&self) -> Option<&Article> {
    let index = self.list_state.selected()?;
    self.feed.visible().into_iter().nth(index)
  }

  fn reset_selection(&mut self) {
    self.list_state.select(Some(0));
  }

  fn title(&self) -> String {
    let label = self.feed.selection().category.label();
    let count = self.feed.visible().len();
    match self.feed.status() {
      ViewStatus::Loading => format!(" {} ({}) (loading...) ", label, count),
      ViewStatus::Error(e) => format!(" {} ({}) (error: {}) ", label, count, e),
      _ => format!(" {} ({}) ", label, count),
    }
  }

  /// Message shown instead of the list when nothing is visible
  fn empty_message(&self) -> String {
    let query = &self.feed.selection().query;
    match self.feed.status() {
      ViewStatus::Idle => "Nothing loaded yet. Press r to fetch the news.".to_string(),
      ViewStatus::Loading => "Loading news...".to_string(),
      ViewStatus::Error(e) => format!("{}\n\nPress r to retry.", e),
      ViewStatus::Ready | ViewStatus::Empty if !query.is_empty() => {
        format!("No articles match \"{}\".", query)
      }
      ViewStatus::Ready | ViewStatus::Empty => match self.feed.category_view() {
        CategoryView::NoResults => format!(
          "No {} articles. Try another category or press r to refresh.",
          self.feed.selection().category.label()
        ),
        CategoryView::Articles(_) => "No articles.".to_string(),
      },
    }
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.feed.visible().len();
    ensure_valid_selection(&mut self.list_state, len);

    let mut block = Block::default()
      .title(self.title())
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(category_color(self.feed.selection().category)));

    if self.feed.has_more() {
      block = block.title_bottom(Line::from(" n: load more ").right_aligned());
    }

    if len == 0 {
      let style = if matches!(self.feed.status(), ViewStatus::Error(_)) {
        Style::default().fg(Color::Red)
      } else {
        Style::default().fg(Color::DarkGray)
      };
      let paragraph = Paragraph::new(self.empty_message())
        .block(block)
        .wrap(Wrap { trim: true })
        .style(style);
      frame.render_widget(paragraph, area);
      return;
    }

    // Borders, highlight symbol, date column and spacing
    let title_width = (area.width as usize).saturating_sub(2 + 2 + 12 + 2 + 16);

    let items: Vec<ListItem> = self
      .feed
      .visible()
      .into_iter()
      .map(|article| {
        let mut spans = vec![
          Span::styled(
            article.published_at.format("%b %d %H:%M").to_string(),
            Style::default().fg(Color::DarkGray),
          ),
          Span::raw("  "),
          Span::raw(truncate(&article.title, title_width)),
        ];
        if let Some(tag) = article.categories.first() {
          spans.push(Span::raw("  "));
          spans.push(Span::styled(
            truncate(tag, 14),
            Style::default().fg(tag_color(tag)),
          ));
        }
        ListItem::new(Line::from(spans))
      })
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }
}

impl View for ArticleListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    // Let search component try to handle first
    match self.search.handle_key(key) {
      KeyResult::Event(SearchEvent::Changed(query)) => {
        self.feed.set_search(&query);
        self.reset_selection();
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Submitted) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match self.categories.handle_key(key) {
      KeyResult::Event(CategoryBarEvent::Selected(category)) => {
        self.feed.select_category(category);
        self.reset_selection();
        return ViewAction::None;
      }
      KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('g') | KeyCode::Home => self.list_state.select_first(),
      KeyCode::Char('G') | KeyCode::End => self.list_state.select_last(),
      KeyCode::Char('n') => {
        if !self.feed.load_more() {
          debug!("No further page to load");
        }
      }
      KeyCode::Char('r') => self.feed.refresh(),
      KeyCode::Enter => {
        if let Some(article) = self.selected_article().cloned() {
          let cache = self.feed.repository().cache().clone();
          return ViewAction::Push(Box::new(ArticleDetailView::open(cache, article)));
        }
      }
      KeyCode::Esc if !self.search.query().is_empty() => {
        // First Esc drops the search filter
        self.search = SearchInput::new();
        self.feed.set_search("");
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Category tabs
        Constraint::Min(1),    // Articles
      ])
      .split(area);

    self.categories.render(frame, chunks[0]);
    self.render_list(frame, chunks[1]);
    self.search.render_overlay(frame, chunks[1]);
  }

  fn breadcrumb_label(&self) -> String {
    let selection = self.feed.selection();
    if selection.query.is_empty() {
      format!("News [{}]", selection.category.label())
    } else {
      format!("News [{}] /{}", selection.category.label(), selection.query)
    }
  }

  fn context(&self) -> Option<String> {
    let mut parts = Vec::new();
    match self.feed.source() {
      Some(CacheSource::Network) => parts.push("live".to_string()),
      Some(CacheSource::Cache) => parts.push("cached".to_string()),
      Some(CacheSource::Offline) => parts.push("offline".to_string()),
      None => {}
    }
    if let Some(updated) = self.feed.repository().updated_at() {
      parts.push(format!("updated {}", format_age(updated, Utc::now())));
    }
    if parts.is_empty() {
      None
    } else {
      Some(parts.join(" · "))
    }
  }

  fn is_editing(&self) -> bool {
    self.search.is_active()
  }

  fn tick(&mut self) {
    self.feed.tick();
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    let mut shortcuts = vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("/", "search").with_priority(20),
      ShortcutInfo::new("h/l", "category").with_priority(30),
      ShortcutInfo::new("r", "refresh").with_priority(50),
      ShortcutInfo::new("q", "quit").with_priority(90),
    ];
    if self.feed.has_more() {
      shortcuts.push(ShortcutInfo::new("n", "more").with_priority(40));
    }
    shortcuts
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::{CacheLayer, MemoryStorage};
  use crate::feed::repository::{CURRENT_ARTICLE_SLOT, SNAPSHOT_SLOT};
  use crate::news::types::test_support::article;
  use crate::news::{CategoryFilter, FetchError, FetchPage, FetchRequest};
  use crossterm::event::KeyModifiers;
  use ratatui::backend::TestBackend;
  use ratatui::Terminal;
  use std::time::Duration;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn offline(_: &FetchRequest) -> Result<FetchPage, FetchError> {
    Err(FetchError::Network("offline".to_string()))
  }

  /// Listing started from a cached snapshot
  fn cached_view_with(
    respond: fn(&FetchRequest) -> Result<FetchPage, FetchError>,
  ) -> (ArticleListView, CacheLayer) {
    let cache = CacheLayer::new(MemoryStorage::new());
    cache
      .save_list(
        SNAPSHOT_SLOT,
        &[
          article("Markets rally", &["business"]),
          article("Cup final", &["sports"]),
          article("Chip shortage eases", &["technology", "business"]),
        ],
      )
      .unwrap();

    let mut feed = Feed::new(cache.clone(), Duration::from_millis(10), move |request| {
      let result = respond(&request);
      async move { result }
    });
    feed.start(CategoryFilter::All);
    (ArticleListView::new(feed), cache)
  }

  fn cached_view() -> (ArticleListView, CacheLayer) {
    cached_view_with(offline)
  }

  fn screen(view: &mut ArticleListView) -> String {
    let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
    terminal.draw(|frame| view.render(frame, frame.area())).unwrap();
    terminal
      .backend()
      .buffer()
      .content()
      .iter()
      .map(|cell| cell.symbol())
      .collect()
  }

  #[tokio::test]
  async fn test_renders_cached_articles() {
    let (mut view, _) = cached_view();
    let text = screen(&mut view);
    assert!(text.contains("Markets rally"));
    assert!(text.contains("All (3)"));
    assert_eq!(view.context().as_deref().map(|c| c.starts_with("cached")), Some(true));
  }

  #[tokio::test]
  async fn test_search_narrows_and_escape_clears() {
    let (mut view, _) = cached_view();
    view.handle_key(key(KeyCode::Char('/')));
    assert!(view.is_editing());
    for c in "chip".chars() {
      view.handle_key(key(KeyCode::Char(c)));
    }
    view.handle_key(key(KeyCode::Enter));
    assert!(!view.is_editing());
    assert_eq!(view.feed.visible().len(), 1);

    assert!(matches!(view.handle_key(key(KeyCode::Esc)), ViewAction::None));
    assert_eq!(view.feed.visible().len(), 3);
    assert!(matches!(view.handle_key(key(KeyCode::Esc)), ViewAction::Pop));
  }

  #[tokio::test]
  async fn test_category_without_articles_shows_message() {
    let (mut view, _) = cached_view_with(|_| Ok(FetchPage::default()));
    // Health
    view.handle_key(key(KeyCode::Char('3')));
    assert!(view.feed.visible().is_empty());
    assert_eq!(view.breadcrumb_label(), "News [Health]");
    assert_eq!(view.empty_message(), "Loading news...");

    tokio::time::sleep(Duration::from_millis(50)).await;
    view.tick();
    assert_eq!(view.feed.status(), ViewStatus::Empty);
    assert_eq!(
      view.empty_message(),
      "No Health articles. Try another category or press r to refresh."
    );
  }

  #[tokio::test]
  async fn test_failed_refresh_keeps_list() {
    let (mut view, _) = cached_view();
    view.handle_key(key(KeyCode::Char('r')));
    tokio::time::sleep(Duration::from_millis(50)).await;
    view.tick();

    assert!(matches!(view.feed.status(), ViewStatus::Error(_)));
    assert_eq!(view.feed.visible().len(), 3);
    let text = screen(&mut view);
    assert!(text.contains("error: Network error: offline"));
    assert!(text.contains("Cup final"));
  }

  #[tokio::test]
  async fn test_enter_opens_detail_and_remembers_it() {
    let (mut view, cache) = cached_view();
    view.list_state.select(Some(1));

    match view.handle_key(key(KeyCode::Enter)) {
      ViewAction::Push(detail) => assert_eq!(detail.breadcrumb_label(), "Cup final"),
      _ => panic!("expected a detail view"),
    }
    let current = cache.load_entity::<Article>(CURRENT_ARTICLE_SLOT).unwrap();
    assert_eq!(current.entity.title, "Cup final");
  }
}
