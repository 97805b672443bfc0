//! Decides which transaction cache feeds the display and drives the switch
//! between the paginated all-transactions view and the single-employee view.

use chrono::NaiveDate;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use crate::api::transport::{ApiRequest, TransportError};
use crate::api::types::{Employee, EmployeeId, Transaction, TransactionId};
use crate::session::Session;

/// Label of the filter entry that shows every employee
pub const ALL_EMPLOYEES_LABEL: &str = "All Employees";

/// Employee filter applied to the transaction list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Filter {
  #[default]
  AllEmployees,
  Employee(EmployeeId),
}

/// One entry of the employee filter dropdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
  pub value: Filter,
  pub label: String,
}

impl FilterOption {
  pub fn all_employees() -> Self {
    Self {
      value: Filter::AllEmployees,
      label: ALL_EMPLOYEES_LABEL.to_string(),
    }
  }
}

impl From<&Employee> for FilterOption {
  fn from(employee: &Employee) -> Self {
    Self {
      value: Filter::Employee(employee.id.clone()),
      label: employee.full_name(),
    }
  }
}

/// Which cache the displayed list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplaySource {
  AllTransactions,
  Employee,
}

/// The transaction list currently shown
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
  pub source: DisplaySource,
  pub transactions: Vec<Transaction>,
}

/// A transaction flattened for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
  pub id: TransactionId,
  pub merchant: String,
  pub employee: String,
  pub amount: f64,
  pub date: NaiveDate,
  pub approved: bool,
}

impl From<&Transaction> for TransactionRow {
  fn from(transaction: &Transaction) -> Self {
    Self {
      id: transaction.id.clone(),
      merchant: transaction.merchant.clone(),
      employee: transaction.employee.full_name(),
      amount: transaction.amount,
      date: transaction.date,
      approved: transaction.approved,
    }
  }
}

#[derive(Debug)]
struct ViewState {
  filter: Filter,
  /// "View more" affordance, latched off once the feed is seen exhausted
  more_available: bool,
  /// Bumped on every view switch so a slow transition cannot re-arm the
  /// affordance after the user has moved on
  mode_generation: u64,
  initial_load_started: bool,
}

pub struct ViewCoordinator {
  session: Arc<Session>,
  state: Mutex<ViewState>,
}

impl ViewCoordinator {
  pub fn new(session: Arc<Session>) -> Self {
    Self {
      session,
      state: Mutex::new(ViewState {
        filter: Filter::AllEmployees,
        more_available: true,
        mode_generation: 0,
        initial_load_started: false,
      }),
    }
  }

  fn state(&self) -> MutexGuard<'_, ViewState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn session(&self) -> &Session {
    &self.session
  }

  pub fn filter(&self) -> Filter {
    self.state().filter.clone()
  }

  /// Paginated data wins over the employee list; with neither there is
  /// nothing to show.
  pub fn display(&self) -> Option<DisplayList> {
    if let Some(window) = self.session.paginated.value() {
      return Some(DisplayList {
        source: DisplaySource::AllTransactions,
        transactions: window.data,
      });
    }
    self
      .session
      .by_employee
      .value()
      .map(|transactions| DisplayList {
        source: DisplaySource::Employee,
        transactions,
      })
  }

  pub fn rows(&self) -> Option<Vec<TransactionRow>> {
    self
      .display()
      .map(|list| list.transactions.iter().map(TransactionRow::from).collect())
  }

  /// Filter entries: empty until the directory is loaded, then the
  /// all-employees entry followed by one entry per employee.
  pub fn filter_options(&self) -> Vec<FilterOption> {
    let Some(employees) = self.session.employees.value() else {
      return Vec::new();
    };
    std::iter::once(FilterOption::all_employees())
      .chain(employees.iter().map(FilterOption::from))
      .collect()
  }

  /// True while the employee directory is loading; disables the filter.
  pub fn is_filter_busy(&self) -> bool {
    self.session.employees.is_loading()
  }

  /// Whether the "view more" control should be offered.
  pub fn more_available(&self) -> bool {
    let mut state = self.state();
    if state.more_available && self.session.paginated.is_exhausted() {
      debug!("transaction feed exhausted");
      state.more_available = false;
    }
    state.more_available
  }

  /// "View more" is enabled: something is shown, more pages exist and no page
  /// fetch is in flight.
  pub fn can_load_more(&self) -> bool {
    self.display().is_some() && self.more_available() && !self.session.paginated.is_loading()
  }

  /// The directory has never been requested in this session.
  pub fn needs_initial_load(&self) -> bool {
    let employees = &self.session.employees;
    !self.state().initial_load_started && !employees.is_loaded() && !employees.is_loading()
  }

  /// Load the directory and the first transaction page concurrently. Runs at
  /// most once per session.
  pub async fn initial_load(&self) -> Result<(), TransportError> {
    {
      let mut state = self.state();
      if state.initial_load_started {
        return Ok(());
      }
      state.initial_load_started = true;
    }
    info!("starting initial load");
    self.show_all().await
  }

  pub async fn select(&self, filter: Filter) -> Result<(), TransportError> {
    match filter {
      Filter::AllEmployees => self.show_all().await,
      Filter::Employee(employee_id) => self.show_employee(employee_id).await,
    }
  }

  /// Switch to the paginated view: drop both transaction lists, reload the
  /// directory and page 0 together. "View more" is re-armed as soon as page 0
  /// lands, without waiting for the directory.
  pub async fn show_all(&self) -> Result<(), TransportError> {
    let generation = self.enter_mode(Filter::AllEmployees);
    info!("showing all transactions");

    self.session.paginated.invalidate();
    self.session.by_employee.invalidate();

    let (directory, first_page) = futures::join!(self.session.employees.fetch_all(), async {
      let first_page = self.session.paginated.fetch_first_page().await;
      self.rearm_more(generation);
      first_page
    });

    first_page?;
    directory?;
    Ok(())
  }

  /// Switch to a single employee's transactions. The paginated window is
  /// dropped so a later return to all transactions starts from page 0.
  pub async fn show_employee(&self, employee_id: EmployeeId) -> Result<(), TransportError> {
    self.enter_mode(Filter::Employee(employee_id.clone()));
    info!(%employee_id, "showing employee transactions");

    self.session.paginated.invalidate();
    self
      .session
      .by_employee
      .fetch_by_employee(&employee_id)
      .await?;
    Ok(())
  }

  /// Append the next page. Returns whether anything was appended.
  pub async fn load_more(&self) -> Result<bool, TransportError> {
    if !self.can_load_more() {
      debug!("view more is disabled");
      return Ok(false);
    }
    let appended = self.session.paginated.fetch_next_page().await?;
    // Latch the affordance as soon as the last page lands
    self.more_available();
    Ok(appended.is_some())
  }

  /// Set a transaction's approval. The caches are only touched once the
  /// transport has accepted the change.
  pub async fn set_approval(
    &self,
    transaction_id: &TransactionId,
    approved: bool,
  ) -> Result<(), TransportError> {
    let request = ApiRequest::SetTransactionApproval {
      transaction_id: transaction_id.clone(),
      value: approved,
    };
    self.session.transport.request(&request).await?;

    let in_feed = self.session.paginated.set_approved(transaction_id, approved);
    let in_employee = self.session.by_employee.set_approved(transaction_id, approved);
    info!(
      %transaction_id,
      approved,
      in_feed,
      in_employee,
      "transaction approval updated"
    );
    Ok(())
  }

  fn rearm_more(&self, generation: u64) {
    let mut state = self.state();
    if state.mode_generation == generation {
      state.more_available = true;
    } else {
      debug!("view changed during transition, affordance left alone");
    }
  }

  fn enter_mode(&self, filter: Filter) -> u64 {
    let mut state = self.state();
    state.filter = filter;
    state.more_available = false;
    state.mode_generation += 1;
    state.mode_generation
  }
}
