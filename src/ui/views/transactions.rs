use crate::cache::FetchStatus;
use crate::coordinator::{DisplaySource, Filter, TransactionRow, ViewCoordinator};
use crate::ui::components::{FilterPicker, FilterPickerEvent, KeyResult};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{format_amount, truncate};
use crate::ui::view::{ShortcutInfo, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// The transaction list with its employee filter and "view more" control
pub struct TransactionsView {
  list_state: ListState,
  picker: FilterPicker,
}

impl TransactionsView {
  pub fn new() -> Self {
    Self {
      list_state: ListState::default(),
      picker: FilterPicker::new(),
    }
  }

  pub fn handle_key(&mut self, key: KeyEvent, coordinator: &ViewCoordinator) -> ViewAction {
    match self.picker.handle_key(key) {
      KeyResult::Event(FilterPickerEvent::Selected(filter)) => {
        self.list_state.select(None);
        return ViewAction::Select(filter);
      }
      KeyResult::Event(FilterPickerEvent::Cancelled) | KeyResult::Handled => {
        return ViewAction::None
      }
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('f') => {
        if !coordinator.is_filter_busy() {
          let options = coordinator.filter_options();
          if !options.is_empty() {
            self.picker.show(options, &coordinator.filter());
          }
        }
      }
      KeyCode::Char('m') => {
        if coordinator.can_load_more() {
          return ViewAction::LoadMore;
        }
      }
      KeyCode::Char('a') | KeyCode::Char(' ') => {
        let rows = coordinator.rows().unwrap_or_default();
        if let Some(row) = self.list_state.selected().and_then(|i| rows.get(i)) {
          return ViewAction::SetApproval {
            transaction_id: row.id.clone(),
            approved: !row.approved,
          };
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Quit,
      _ => {}
    }
    ViewAction::None
  }

  pub fn render(&mut self, frame: &mut Frame, area: Rect, coordinator: &ViewCoordinator) {
    let Some(display) = coordinator.display() else {
      // Nothing to show yet: no list, no controls
      let session = coordinator.session();
      let message = if session.paginated.is_loading() || session.by_employee.is_loading() {
        "Loading transactions..."
      } else if matches!(session.paginated.status(), FetchStatus::Failed(_))
        || matches!(session.by_employee.status(), FetchStatus::Failed(_))
      {
        "Failed to load transactions."
      } else {
        "No transactions loaded."
      };
      let paragraph = Paragraph::new(message)
        .block(list_block(" Transactions ".to_string()))
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      self.picker.render_overlay(frame, area);
      return;
    };

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Min(1),    // List
        Constraint::Length(1), // View more
      ])
      .split(area);

    let rows: Vec<TransactionRow> = display.transactions.iter().map(TransactionRow::from).collect();
    ensure_valid_selection(&mut self.list_state, rows.len());

    let title = match display.source {
      DisplaySource::AllTransactions => format!(" All transactions ({}) ", rows.len()),
      DisplaySource::Employee => format!(" Employee transactions ({}) ", rows.len()),
    };

    if rows.is_empty() {
      let paragraph = Paragraph::new("No transactions found.")
        .block(list_block(title))
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, chunks[0]);
    } else {
      let items: Vec<ListItem> = rows.iter().map(row_item).collect();
      let list = List::new(items)
        .block(list_block(title))
        .highlight_style(
          Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
      frame.render_stateful_widget(list, chunks[0], &mut self.list_state);
    }

    self.render_view_more(frame, chunks[1], coordinator);
    self.picker.render_overlay(frame, area);
  }

  fn render_view_more(&self, frame: &mut Frame, area: Rect, coordinator: &ViewCoordinator) {
    if !coordinator.more_available() {
      return;
    }
    let (label, style) = match coordinator.session().paginated.status() {
      FetchStatus::Fetching => ("[ Loading... ]", Style::default().fg(Color::DarkGray)),
      FetchStatus::Failed(_) => (
        "[ View more (m), last attempt failed ]",
        Style::default().fg(Color::Red),
      ),
      FetchStatus::Idle | FetchStatus::Ready => {
        ("[ View more (m) ]", Style::default().fg(Color::Cyan).bold())
      }
    };
    let paragraph = Paragraph::new(label)
      .style(style)
      .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
  }

  pub fn shortcuts(&self, coordinator: &ViewCoordinator) -> Vec<ShortcutInfo> {
    if self.picker.is_active() {
      return vec![
        ShortcutInfo::new("enter", "select").with_priority(10),
        ShortcutInfo::new("esc", "cancel").with_priority(20),
      ];
    }

    let mut shortcuts = vec![
      ShortcutInfo::new("j/k", "move").with_priority(10),
      ShortcutInfo::new("a", "approve").with_priority(40),
      ShortcutInfo::new("q", "quit").with_priority(90),
    ];
    if !coordinator.filter_options().is_empty() && !coordinator.is_filter_busy() {
      shortcuts.push(ShortcutInfo::new("f", "filter").with_priority(20));
    }
    if coordinator.can_load_more() {
      shortcuts.push(ShortcutInfo::new("m", "view more").with_priority(30));
    }
    shortcuts
  }

  /// Label for the active filter, shown in the header
  pub fn filter_label(coordinator: &ViewCoordinator) -> String {
    if coordinator.is_filter_busy() {
      return "Loading employees...".to_string();
    }
    if let FetchStatus::Failed(_) = coordinator.session().employees.status() {
      if coordinator.filter_options().is_empty() {
        return "Employees unavailable".to_string();
      }
    }
    let current = coordinator.filter();
    match &current {
      Filter::AllEmployees => "All Employees".to_string(),
      Filter::Employee(id) => coordinator
        .filter_options()
        .into_iter()
        .find(|option| option.value == current)
        .map(|option| option.label)
        .unwrap_or_else(|| id.to_string()),
    }
  }
}

fn list_block(title: String) -> Block<'static> {
  Block::default()
    .title(title)
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue))
}

fn row_item(row: &TransactionRow) -> ListItem<'static> {
  let (mark, mark_color) = if row.approved {
    ("[x]", Color::Green)
  } else {
    ("[ ]", Color::DarkGray)
  };

  ListItem::new(Line::from(vec![
    Span::styled(mark, Style::default().fg(mark_color)),
    Span::raw(" "),
    Span::styled(
      format!("{:<24}", truncate(&row.merchant, 24)),
      Style::default().fg(Color::White),
    ),
    Span::raw(" "),
    Span::styled(
      format!("{:<20}", truncate(&row.employee, 20)),
      Style::default().fg(Color::Cyan),
    ),
    Span::raw(" "),
    Span::styled(
      format!("{:>14}", format_amount(row.amount)),
      Style::default().fg(Color::Yellow),
    ),
    Span::raw(" "),
    Span::styled(row.date.to_string(), Style::default().fg(Color::DarkGray)),
  ]))
}
