use crate::api::TransportError;
use crate::config::Config;
use crate::coordinator::ViewCoordinator;
use crate::event::{Event, EventHandler};
use crate::ui;
use crate::ui::view::ViewAction;
use crate::ui::views::TransactionsView;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::future::Future;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Main application state
pub struct App {
  coordinator: Arc<ViewCoordinator>,

  view: TransactionsView,

  /// Header title
  title: String,

  /// Last background failure, shown until the next key press
  last_error: Option<String>,

  /// Event sender for async tasks
  event_tx: mpsc::UnboundedSender<Event>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: &Config, coordinator: Arc<ViewCoordinator>) -> Self {
    let (tx, _rx) = mpsc::unbounded_channel();

    Self {
      coordinator,
      view: TransactionsView::new(),
      title: config.display_title(),
      last_error: None,
      event_tx: tx,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(Duration::from_millis(100));
    self.event_tx = events.sender();

    let result = self.event_loop(&mut terminal, &mut events).await;

    // Cleanup terminal, even if the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    events: &mut EventHandler,
  ) -> Result<()> {
    while !self.should_quit {
      self.ensure_loaded();

      terminal.draw(|frame| ui::draw(frame, self))?;

      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }
    Ok(())
  }

  /// Start the initial load the first time the directory is seen empty
  fn ensure_loaded(&self) {
    if self.coordinator.needs_initial_load() {
      self.spawn("Loading data", |coordinator| async move {
        coordinator.initial_load().await
      });
    }
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
          self.should_quit = true;
          return;
        }
        self.last_error = None;
        let action = self.view.handle_key(key, &self.coordinator);
        self.perform(action);
      }
      Event::Tick | Event::Updated => {} // Redraw happens every loop
      Event::Error(message) => self.last_error = Some(message),
    }
  }

  fn perform(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Quit => self.should_quit = true,
      ViewAction::Select(filter) => {
        info!(?filter, "filter selected");
        self.spawn("Loading transactions", move |coordinator| async move {
          coordinator.select(filter).await
        });
      }
      ViewAction::LoadMore => {
        self.spawn("Loading more transactions", |coordinator| async move {
          coordinator.load_more().await.map(|_| ())
        });
      }
      ViewAction::SetApproval {
        transaction_id,
        approved,
      } => {
        self.spawn("Updating approval", move |coordinator| async move {
          coordinator.set_approval(&transaction_id, approved).await
        });
      }
    }
  }

  /// Run a coordinator operation in the background and report its outcome
  fn spawn<F, Fut>(&self, label: &'static str, op: F)
  where
    F: FnOnce(Arc<ViewCoordinator>) -> Fut,
    Fut: Future<Output = Result<(), TransportError>> + Send + 'static,
  {
    let tx = self.event_tx.clone();
    let operation = op(Arc::clone(&self.coordinator));

    tokio::spawn(async move {
      let event = match operation.await {
        Ok(()) => Event::Updated,
        Err(e) => {
          warn!(error = %e, "{} failed", label);
          Event::Error(format!("{} failed: {}", label, e))
        }
      };
      // The UI may already be gone
      let _ = tx.send(event);
    });
  }

  // Accessors for UI rendering
  pub fn coordinator(&self) -> Arc<ViewCoordinator> {
    Arc::clone(&self.coordinator)
  }

  pub fn view(&self) -> &TransactionsView {
    &self.view
  }

  pub fn view_mut(&mut self) -> &mut TransactionsView {
    &mut self.view
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn last_error(&self) -> Option<&str> {
    self.last_error.as_deref()
  }
}
