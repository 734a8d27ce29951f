use super::KeyResult;
use crate::news::{Category, CategoryFilter};
use crate::ui::renderfns::category_color;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Number of tabs: "All" plus every category
const TAB_COUNT: usize = Category::ALL.len() + 1;

/// Events emitted by the category bar that parent needs to handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryBarEvent {
  /// User picked a different category
  Selected(CategoryFilter),
}

/// Tab bar for picking the listing category.
///
/// `h`/`l` (or the arrow keys) move between tabs with wrapping, digits jump
/// straight to a tab.
#[derive(Debug, Clone, Default)]
pub struct CategoryBar {
  selected: CategoryFilter,
}

impl CategoryBar {
  pub fn new(selected: CategoryFilter) -> Self {
    Self { selected }
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<CategoryBarEvent> {
    let index = self.selected.index();
    let target = match key.code {
      KeyCode::Char('h') | KeyCode::Left => (index + TAB_COUNT - 1) % TAB_COUNT,
      KeyCode::Char('l') | KeyCode::Right => (index + 1) % TAB_COUNT,
      KeyCode::Char(c) => match c.to_digit(10) {
        Some(d) if (d as usize) < TAB_COUNT => d as usize,
        _ => return KeyResult::NotHandled,
      },
      _ => return KeyResult::NotHandled,
    };

    if target == index {
      return KeyResult::Handled;
    }
    self.selected = CategoryFilter::from_index(target);
    KeyResult::Event(CategoryBarEvent::Selected(self.selected))
  }

  pub fn render(&self, frame: &mut Frame, area: Rect) {
    let mut spans = Vec::new();

    for index in 0..TAB_COUNT {
      let filter = CategoryFilter::from_index(index);
      if index > 0 {
        spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
      }

      let style = if filter == self.selected {
        Style::default()
          .fg(Color::Black)
          .bg(category_color(filter))
          .bold()
      } else {
        Style::default().fg(Color::Gray)
      };
      spans.push(Span::styled(format!(" {} {} ", index, filter.label()), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
  }
}
