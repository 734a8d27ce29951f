use crate::commands::COMMANDS;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Key bindings listed on the help page
pub const KEY_BINDINGS: &[(&str, &str)] = &[
  ("j / k", "Move down / up"),
  ("g / G", "Jump to first / last article"),
  ("Enter", "Open the selected article"),
  ("h / l, ← / →", "Previous / next category"),
  ("0-6", "Jump to a category (0 = All)"),
  ("/", "Search headlines in the loaded articles"),
  ("n", "Load the next page"),
  ("r", "Refresh the current category"),
  (":", "Open the command palette"),
  ("q / Esc", "Back, or quit from the listing"),
  ("Ctrl-C", "Quit"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoPage {
  About,
  Help,
}

/// Static information page
pub struct InfoPageView {
  page: InfoPage,
  scroll: u16,
}

impl InfoPageView {
  pub fn new(page: InfoPage) -> Self {
    Self { page, scroll: 0 }
  }

  fn title(&self) -> &'static str {
    match self.page {
      InfoPage::About => "About",
      InfoPage::Help => "Help",
    }
  }

  fn lines(&self) -> Vec<Line<'static>> {
    match self.page {
      InfoPage::About => about_lines(),
      InfoPage::Help => help_lines(),
    }
  }
}

fn heading(text: &'static str) -> Line<'static> {
  Line::from(Span::styled(text, Style::default().fg(Color::Cyan).bold()))
}

fn bullet(text: &'static str) -> Line<'static> {
  Line::from(vec![
    Span::styled("  • ", Style::default().fg(Color::DarkGray)),
    Span::raw(text),
  ])
}

fn about_lines() -> Vec<Line<'static>> {
  vec![
    heading("Data source"),
    Line::from("Articles come from the NewsData API, which aggregates live news from many sites."),
    Line::from(""),
    heading("Free tier limits"),
    bullet("About 10 articles per category per request"),
    bullet("Many of them are duplicates under different tags"),
    bullet("200 credits per day"),
    bullet("News is delayed by roughly 12 hours"),
    Line::from(""),
    heading("How the reader copes"),
    bullet("Every fetched page is saved to a local snapshot"),
    bullet("On startup the snapshot is shown without touching the network"),
    bullet("Category switches are debounced so fast tab hopping costs one request"),
    bullet("Duplicate headlines are merged, the first one seen wins"),
    bullet("Search runs over the loaded articles and never spends credits"),
    bullet("When a request fails the last articles stay on screen"),
  ]
}

fn help_lines() -> Vec<Line<'static>> {
  let mut lines = vec![heading("Keys")];
  for (keys, action) in KEY_BINDINGS {
    lines.push(Line::from(vec![
      Span::styled(format!("  {:<16}", keys), Style::default().fg(Color::Yellow)),
      Span::raw(*action),
    ]));
  }

  lines.push(Line::from(""));
  lines.push(heading("Commands"));
  for cmd in COMMANDS {
    lines.push(Line::from(vec![
      Span::styled(format!("  :{:<15}", cmd.name), Style::default().fg(Color::Yellow)),
      Span::raw(cmd.description),
      Span::styled(
        format!("  ({})", cmd.aliases.join(", ")),
        Style::default().fg(Color::DarkGray),
      ),
    ]));
  }
  lines
}

impl View for InfoPageView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
      KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(format!(" {} ", self.title()))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let paragraph = Paragraph::new(self.lines())
      .block(block)
      .wrap(Wrap { trim: false })
      .scroll((self.scroll, 0));
    frame.render_widget(paragraph, area);
  }

  fn breadcrumb_label(&self) -> String {
    self.title().to_string()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("j/k", "scroll").with_priority(20),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn text(lines: &[Line]) -> String {
    lines
      .iter()
      .map(|line| line.to_string())
      .collect::<Vec<_>>()
      .join("\n")
  }

  #[test]
  fn test_help_lists_every_command_and_key() {
    let help = text(&help_lines());
    for cmd in COMMANDS {
      assert!(help.contains(&format!(":{}", cmd.name)), "missing {}", cmd.name);
    }
    for (keys, _) in KEY_BINDINGS {
      assert!(help.contains(keys), "missing {}", keys);
    }
  }

  #[test]
  fn test_about_mentions_limits() {
    let about = text(&about_lines());
    assert!(about.contains("200 credits per day"));
  }

  #[test]
  fn test_scroll_and_back() {
    let mut view = InfoPageView::new(InfoPage::Help);
    view.handle_key(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE));
    assert_eq!(view.scroll, 0);
    view.handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));
    assert_eq!(view.scroll, 1);
    assert_eq!(view.breadcrumb_label(), "Help");
    assert!(matches!(
      view.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
      ViewAction::Pop
    ));
  }
}
