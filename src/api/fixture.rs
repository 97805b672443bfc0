//! In-process fake API backed by a JSON dataset.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;

use super::transport::{ApiRequest, Transport, TransportError};
use super::types::{Employee, EmployeeId, PageCursor, TransactionId, Transaction};

/// Number of transactions served per page
pub const TRANSACTIONS_PER_PAGE: usize = 5;

const EMBEDDED_DATASET: &str = include_str!("../../data/mock-data.json");

/// Employees and transactions served by the fixture
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
  pub employees: Vec<Employee>,
  pub transactions: Vec<Transaction>,
}

impl Dataset {
  /// The dataset compiled into the binary
  pub fn embedded() -> Result<Self, TransportError> {
    Ok(serde_json::from_str(EMBEDDED_DATASET)?)
  }

  pub fn from_path(path: &Path) -> color_eyre::Result<Self> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
      color_eyre::eyre::eyre!("Failed to read dataset {}: {}", path.display(), e)
    })?;
    serde_json::from_str(&contents).map_err(|e| {
      color_eyre::eyre::eyre!("Failed to parse dataset {}: {}", path.display(), e)
    })
  }
}

/// Transport that answers from an in-memory dataset after a fixed delay
pub struct FixtureTransport {
  dataset: Mutex<Dataset>,
  latency: Duration,
}

impl FixtureTransport {
  pub fn new(dataset: Dataset) -> Self {
    Self {
      dataset: Mutex::new(dataset),
      latency: Duration::ZERO,
    }
  }

  /// Delay every response by `latency`
  pub fn with_latency(mut self, latency: Duration) -> Self {
    self.latency = latency;
    self
  }

  fn respond(&self, request: &ApiRequest) -> Result<Value, TransportError> {
    let mut dataset = self.dataset.lock().unwrap_or_else(PoisonError::into_inner);

    match request {
      ApiRequest::Employees => Ok(serde_json::to_value(&dataset.employees)?),
      ApiRequest::PaginatedTransactions { page } => paginate(&dataset.transactions, *page),
      ApiRequest::TransactionsByEmployee { employee_id } => {
        by_employee(&dataset.transactions, employee_id)
      }
      ApiRequest::SetTransactionApproval {
        transaction_id,
        value,
      } => {
        set_approval(&mut dataset.transactions, transaction_id, *value)?;
        Ok(Value::Null)
      }
    }
  }
}

#[async_trait]
impl Transport for FixtureTransport {
  async fn request(&self, request: &ApiRequest) -> Result<Value, TransportError> {
    if !self.latency.is_zero() {
      tokio::time::sleep(self.latency).await;
    }
    debug!(endpoint = request.endpoint(), "fixture request");
    self.respond(request)
  }
}

fn paginate(transactions: &[Transaction], page: PageCursor) -> Result<Value, TransportError> {
  let start = page.0 as usize * TRANSACTIONS_PER_PAGE;
  if start > transactions.len() {
    return Err(TransportError::Rejected(format!("Invalid page {}", page.0)));
  }
  let end = (start + TRANSACTIONS_PER_PAGE).min(transactions.len());
  let next_page = if end < transactions.len() {
    Some(page.0 + 1)
  } else {
    None
  };

  Ok(json!({
    "data": &transactions[start..end],
    "nextPage": next_page,
  }))
}

fn by_employee(
  transactions: &[Transaction],
  employee_id: &EmployeeId,
) -> Result<Value, TransportError> {
  if employee_id.as_str().is_empty() {
    return Err(TransportError::Rejected(
      "Employee id cannot be empty".to_string(),
    ));
  }
  let matching: Vec<&Transaction> = transactions
    .iter()
    .filter(|t| &t.employee.id == employee_id)
    .collect();
  Ok(serde_json::to_value(matching)?)
}

fn set_approval(
  transactions: &mut [Transaction],
  transaction_id: &TransactionId,
  value: bool,
) -> Result<(), TransportError> {
  let transaction = transactions
    .iter_mut()
    .find(|t| &t.id == transaction_id)
    .ok_or_else(|| TransportError::Rejected("Invalid transaction to approve".to_string()))?;
  transaction.approved = value;
  Ok(())
}
