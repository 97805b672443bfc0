use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the status line: the last error if any, otherwise a neutral summary
pub fn draw_footer(frame: &mut Frame, area: Rect, summary: &str, error: Option<&str>) {
  let line = match error {
    Some(message) => Line::from(vec![
      Span::styled(" error ", Style::default().fg(Color::Black).bg(Color::Red)),
      Span::styled(format!(" {}", message), Style::default().fg(Color::Red)),
    ]),
    None => Line::from(Span::styled(
      format!(" {}", summary),
      Style::default().fg(Color::DarkGray),
    )),
  };

  let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}
