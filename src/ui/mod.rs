pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::ListState;
use views::TransactionsView;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  let coordinator = app.coordinator();
  let shortcuts = app.view().shortcuts(&coordinator);
  renderfns::draw_header(
    frame,
    chunks[0],
    app.title(),
    &TransactionsView::filter_label(&coordinator),
    &shortcuts,
  );

  app.view_mut().render(frame, chunks[1], &coordinator);

  let summary = status_summary(&coordinator);
  renderfns::draw_footer(frame, chunks[2], &summary, app.last_error());
}

fn status_summary(coordinator: &crate::coordinator::ViewCoordinator) -> String {
  match coordinator.display() {
    Some(display) if coordinator.more_available() => {
      format!("{} transactions, more available", display.transactions.len())
    }
    Some(display) => format!("{} transactions", display.transactions.len()),
    None => "Waiting for data".to_string(),
  }
}

/// Keep the list selection inside the list bounds
pub fn ensure_valid_selection(state: &mut ListState, len: usize) {
  if len == 0 {
    state.select(None);
  } else {
    match state.selected() {
      Some(i) if i >= len => state.select(Some(len - 1)),
      None => state.select(Some(0)),
      _ => {}
    }
  }
}
