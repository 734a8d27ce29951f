use crate::cache::CacheLayer;
use crate::feed::detail::{self, Resolution};
use crate::feed::repository::remember_current;
use crate::news::Article;
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{tag_color, truncate};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

enum DetailState {
  Found {
    article: Article,
    related: Vec<Article>,
  },
  /// Identifier that could not be resolved from the cache
  NotFound(String),
}

/// View for a single article and the related articles below it
pub struct ArticleDetailView {
  cache: CacheLayer,
  state: DetailState,
  related_state: ListState,
}

impl ArticleDetailView {
  /// Open an article picked from a list
  pub fn open(cache: CacheLayer, article: Article) -> Self {
    remember_current(&cache, &article);
    let related = detail::related_in_cache(&cache, &article);
    Self::with_state(cache, DetailState::Found { article, related })
  }

  /// Open an article by identifier, from the cache alone
  pub fn resolve(cache: CacheLayer, id: &str) -> Self {
    let state = match detail::resolve(&cache, id) {
      Resolution::Found { article, related } => {
        remember_current(&cache, &article);
        DetailState::Found { article, related }
      }
      Resolution::NotFound => DetailState::NotFound(id.to_string()),
    };
    Self::with_state(cache, state)
  }

  fn with_state(cache: CacheLayer, state: DetailState) -> Self {
    Self {
      cache,
      state,
      related_state: ListState::default(),
    }
  }

  fn related(&self) -> &[Article] {
    match &self.state {
      DetailState::Found { related, .. } => related,
      DetailState::NotFound(_) => &[],
    }
  }

  fn render_not_found(frame: &mut Frame, area: Rect, id: &str) {
    let block = Block::default()
      .title(" Not found ")
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let text = format!(
      "Article {} is not in the local cache.\n\nIt may have dropped out of the last snapshot. Press q to go back.",
      id
    );
    let paragraph = Paragraph::new(text)
      .block(block)
      .wrap(Wrap { trim: true })
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
  }

  fn render_article(&mut self, frame: &mut Frame, area: Rect) {
    let DetailState::Found { article, related } = &self.state else {
      return;
    };

    let block = Block::default()
      .title(format!(" {} ", truncate(&article.title, area.width.saturating_sub(4) as usize)))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let related_height = if related.is_empty() {
      0
    } else {
      related.len() as u16 + 2
    };

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(3),              // Meta
        Constraint::Min(1),                 // Description
        Constraint::Length(1),              // Link
        Constraint::Length(related_height), // Related
      ])
      .split(inner);

    // Meta
    let mut tags = vec![Span::styled("Category: ", Style::default().fg(Color::DarkGray))];
    if article.categories.is_empty() {
      tags.push(Span::raw("none"));
    }
    for (i, tag) in article.categories.iter().enumerate() {
      if i > 0 {
        tags.push(Span::raw(", "));
      }
      tags.push(Span::styled(tag.clone(), Style::default().fg(tag_color(tag))));
    }

    let meta = vec![
      Line::from(vec![
        Span::styled("Published: ", Style::default().fg(Color::DarkGray)),
        Span::raw(article.published_at.format("%Y-%m-%d %H:%M UTC").to_string()),
        Span::raw("  "),
        Span::styled("Source: ", Style::default().fg(Color::DarkGray)),
        Span::raw(article.source.as_deref().unwrap_or("unknown")),
      ]),
      Line::from(tags),
    ];
    frame.render_widget(Paragraph::new(meta), chunks[0]);

    // Description
    let description = article
      .description
      .as_deref()
      .unwrap_or("No description available.");
    frame.render_widget(
      Paragraph::new(description).wrap(Wrap { trim: true }),
      chunks[1],
    );

    // Link
    let link = Line::from(vec![
      Span::styled("Read full article: ", Style::default().fg(Color::DarkGray)),
      Span::styled(article.link.as_str(), Style::default().fg(Color::Cyan).underlined()),
    ]);
    frame.render_widget(Paragraph::new(link), chunks[2]);

    // Related
    if related.is_empty() {
      return;
    }
    let items: Vec<ListItem> = related
      .iter()
      .map(|a| ListItem::new(truncate(&a.title, chunks[3].width.saturating_sub(4) as usize)))
      .collect();
    let list = List::new(items)
      .block(
        Block::default()
          .title(" Related ")
          .borders(Borders::TOP)
          .border_style(Style::default().fg(Color::DarkGray)),
      )
      .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[3], &mut self.related_state);
  }
}

impl View for ArticleDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if let DetailState::NotFound(_) = self.state {
      return match key.code {
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => ViewAction::Pop,
        _ => ViewAction::None,
      };
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        let len = self.related().len();
        self.related_state.select_next();
        ensure_valid_selection(&mut self.related_state, len);
      }
      KeyCode::Char('k') | KeyCode::Up => {
        let len = self.related().len();
        self.related_state.select_previous();
        ensure_valid_selection(&mut self.related_state, len);
      }
      KeyCode::Enter => {
        let selected = self
          .related_state
          .selected()
          .and_then(|i| self.related().get(i))
          .cloned();
        if let Some(article) = selected {
          return ViewAction::Push(Box::new(Self::open(self.cache.clone(), article)));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    if let DetailState::NotFound(id) = &self.state {
      Self::render_not_found(frame, area, id);
      return;
    }
    self.render_article(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    match &self.state {
      DetailState::Found { article, .. } => truncate(&article.title, 30),
      DetailState::NotFound(_) => "Not found".to_string(),
    }
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    let mut shortcuts = vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("q", "back").with_priority(90),
    ];
    if !self.related().is_empty() {
      shortcuts.push(ShortcutInfo::new("j/k", "related").with_priority(20));
      shortcuts.push(ShortcutInfo::new("Enter", "open").with_priority(30));
    }
    shortcuts
  }
}
