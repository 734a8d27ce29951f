use super::input::{InputResult, TextInput};
use super::overlay::render_prompt;
use super::KeyResult;
use crate::commands::{self, Command};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{List, ListItem, ListState};

/// Suggestions shown below the prompt
const MAX_SUGGESTIONS: usize = 8;

/// Events emitted by command input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEvent {
  /// Command submitted, resolved to a command name when one matched
  Submitted(String),
  Cancelled,
}

/// `:` command palette with autocomplete
#[derive(Debug, Clone, Default)]
pub struct CommandInput {
  input: TextInput,
  active: bool,
  selected_suggestion: usize,
}

impl CommandInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn activate(&mut self) {
    self.active = true;
    self.reset();
  }

  fn reset(&mut self) {
    self.input.clear();
    self.selected_suggestion = 0;
  }

  pub fn suggestions(&self) -> Vec<&'static Command> {
    commands::get_suggestions(self.input.value())
  }

  /// Move the highlighted suggestion by `delta`, wrapping
  fn cycle(&mut self, delta: isize) {
    let count = self.suggestions().len();
    if count > 0 {
      self.selected_suggestion =
        (self.selected_suggestion as isize + delta).rem_euclid(count as isize) as usize;
    }
  }

  /// Handle a key event
  /// Call this regardless of active state - it handles activation too
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<CommandEvent> {
    if !self.active {
      if key.code == KeyCode::Char(':') {
        self.activate();
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc => {
        self.active = false;
        self.reset();
        KeyResult::Event(CommandEvent::Cancelled)
      }
      KeyCode::Enter => {
        self.active = false;
        let cmd = self.resolve_command();
        self.reset();
        KeyResult::Event(CommandEvent::Submitted(cmd))
      }
      KeyCode::Tab | KeyCode::Down => {
        self.cycle(1);
        KeyResult::Handled
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.cycle(-1);
        KeyResult::Handled
      }
      _ => {
        if self.input.handle_key(key) == InputResult::Consumed {
          self.selected_suggestion = 0;
        }
        // The palette is modal
        KeyResult::Handled
      }
    }
  }

  /// The highlighted suggestion, or the raw input when nothing matches
  fn resolve_command(&self) -> String {
    match self.suggestions().get(self.selected_suggestion) {
      Some(cmd) => cmd.name.to_string(),
      None => self.input.value().trim().to_lowercase(),
    }
  }

  /// Render the command overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let suggestions = self.suggestions();
    let shown = suggestions.len().min(MAX_SUGGESTIONS);
    let list_area = render_prompt(
      frame,
      area,
      "Command",
      ":",
      &self.input,
      shown as u16,
    );

    if shown == 0 || list_area.height == 0 {
      return;
    }

    let items: Vec<ListItem> = suggestions
      .iter()
      .take(MAX_SUGGESTIONS)
      .map(|cmd| {
        ListItem::new(Line::from(vec![
          Span::styled(
            format!("{:<10}", cmd.name),
            Style::default().fg(Color::Cyan),
          ),
          Span::styled(cmd.description, Style::default().fg(Color::DarkGray)),
        ]))
      })
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.selected_suggestion));

    frame.render_stateful_widget(list, list_area, &mut state);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn submit(palette: &mut CommandInput, text: &str) -> KeyResult<CommandEvent> {
    palette.handle_key(key(KeyCode::Char(':')));
    for c in text.chars() {
      palette.handle_key(key(KeyCode::Char(c)));
    }
    palette.handle_key(key(KeyCode::Enter))
  }

  #[test]
  fn test_colon_activates() {
    let mut palette = CommandInput::new();
    assert_eq!(palette.handle_key(key(KeyCode::Char('x'))), KeyResult::NotHandled);
    assert_eq!(palette.handle_key(key(KeyCode::Char(':'))), KeyResult::Handled);
    assert!(palette.is_active());
  }

  #[test]
  fn test_submit_resolves_alias() {
    let mut palette = CommandInput::new();
    assert_eq!(
      submit(&mut palette, "?"),
      KeyResult::Event(CommandEvent::Submitted("help".to_string()))
    );
    assert!(!palette.is_active());
  }

  #[test]
  fn test_submit_unknown_passes_raw_input() {
    let mut palette = CommandInput::new();
    assert_eq!(
      submit(&mut palette, " Bogus "),
      KeyResult::Event(CommandEvent::Submitted("bogus".to_string()))
    );
  }

  #[test]
  fn test_tab_cycles_suggestions() {
    let mut palette = CommandInput::new();
    palette.handle_key(key(KeyCode::Char(':')));
    palette.handle_key(key(KeyCode::Tab));
    palette.handle_key(key(KeyCode::Tab));
    assert_eq!(
      palette.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(CommandEvent::Submitted("help".to_string()))
    );
  }

  #[test]
  fn test_escape_cancels() {
    let mut palette = CommandInput::new();
    palette.handle_key(key(KeyCode::Char(':')));
    assert_eq!(
      palette.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(CommandEvent::Cancelled)
    );
    assert!(!palette.is_active());
  }
}
