use super::input::TextInput;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Draw a bordered prompt box at the top-left of `area` and return the
/// region below the prompt line, for suggestions.
pub fn render_prompt(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  prefix: &str,
  input: &TextInput,
  extra_rows: u16,
) -> Rect {
  let width = (area.width * 60 / 100).clamp(30, 60).min(area.width);
  let height = (3 + extra_rows).min(area.height);

  // Position at top-left of content area with small margin
  let overlay_area = Rect::new(
    area.x + 1.min(area.width),
    area.y + 1.min(area.height),
    width.saturating_sub(1),
    height,
  );

  frame.render_widget(Clear, overlay_area);

  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow))
    .title(format!(" {} ", title));

  let inner = block.inner(overlay_area);
  frame.render_widget(block, overlay_area);

  if inner.height == 0 {
    return inner;
  }

  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Input line
      Constraint::Min(0),    // Suggestions
    ])
    .split(inner);

  let input_line = Line::from(vec![
    Span::styled(prefix.to_string(), Style::default().fg(Color::Yellow)),
    Span::raw(input.value().to_string()),
  ]);
  frame.render_widget(Paragraph::new(input_line), chunks[0]);

  let offset = (prefix.chars().count() + input.cursor_position()) as u16;
  let max_x = chunks[0].right().saturating_sub(1);
  frame.set_cursor_position(((chunks[0].x + offset).min(max_x), chunks[0].y));

  chunks[1]
}
