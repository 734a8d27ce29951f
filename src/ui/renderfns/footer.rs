use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the footer bar with the navigation breadcrumb and, on the right, an
/// optional status message
pub fn draw_footer(frame: &mut Frame, area: Rect, breadcrumb: &[String], status: Option<&str>) {
  let status_width = status.map_or(0, |s| s.chars().count() as u16 + 2);
  let chunks = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Min(0), Constraint::Length(status_width)])
    .split(area);

  let mut spans = vec![Span::raw(" ")];

  for (i, part) in breadcrumb.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
    }

    let style = if i + 1 == breadcrumb.len() {
      // Current view - highlighted
      Style::default().fg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::White)
    };

    spans.push(Span::styled(part.clone(), style));
  }

  frame.render_widget(
    Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black)),
    chunks[0],
  );

  if let Some(status) = status {
    let paragraph = Paragraph::new(format!("{} ", status))
      .alignment(Alignment::Right)
      .style(Style::default().fg(Color::Yellow).bg(Color::Black));
    frame.render_widget(paragraph, chunks[1]);
  }
}
