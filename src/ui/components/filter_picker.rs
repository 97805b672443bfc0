use super::KeyResult;
use crate::coordinator::{Filter, FilterOption};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

/// Events emitted by the filter picker that the parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPickerEvent {
  /// A filter was chosen
  Selected(Filter),
  /// Picker cancelled
  Cancelled,
}

/// Overlay listing the employee filter options
#[derive(Debug, Clone, Default)]
pub struct FilterPicker {
  active: bool,
  options: Vec<FilterOption>,
  selected: usize,
}

impl FilterPicker {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Show the picker with the cursor on the current filter
  pub fn show(&mut self, options: Vec<FilterOption>, current: &Filter) {
    self.selected = options
      .iter()
      .position(|option| &option.value == current)
      .unwrap_or(0);
    self.options = options;
    self.active = true;
  }

  pub fn hide(&mut self) {
    self.active = false;
    self.options.clear();
    self.selected = 0;
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FilterPickerEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc | KeyCode::Char('q') => {
        self.hide();
        KeyResult::Event(FilterPickerEvent::Cancelled)
      }
      KeyCode::Enter => {
        let chosen = self.options.get(self.selected).map(|o| o.value.clone());
        self.hide();
        match chosen {
          Some(filter) => KeyResult::Event(FilterPickerEvent::Selected(filter)),
          None => KeyResult::Event(FilterPickerEvent::Cancelled),
        }
      }
      KeyCode::Char('j') | KeyCode::Down => {
        if !self.options.is_empty() {
          self.selected = (self.selected + 1) % self.options.len();
        }
        KeyResult::Handled
      }
      KeyCode::Char('k') | KeyCode::Up => {
        if !self.options.is_empty() {
          self.selected = if self.selected == 0 {
            self.options.len() - 1
          } else {
            self.selected - 1
          };
        }
        KeyResult::Handled
      }
      _ => KeyResult::Handled,
    }
  }

  /// Render the picker overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active || self.options.is_empty() {
      return;
    }

    let max_label_len = self
      .options
      .iter()
      .map(|o| o.label.chars().count())
      .max()
      .unwrap_or(10);
    let width = (max_label_len as u16 + 6)
      .max(24)
      .min(area.width.saturating_sub(4));
    let height = (self.options.len() as u16 + 2)
      .max(3)
      .min(area.height.saturating_sub(4));

    // Center the overlay
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Filter by employee ");

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let items: Vec<ListItem> = self
      .options
      .iter()
      .map(|option| {
        let style = match option.value {
          Filter::AllEmployees => Style::default().fg(Color::Yellow),
          Filter::Employee(_) => Style::default().fg(Color::Cyan),
        };
        ListItem::new(Line::from(Span::styled(option.label.as_str(), style)))
      })
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.selected));

    frame.render_stateful_widget(list, inner, &mut state);
  }
}
