//! Transport seam between the caches and whatever answers requests.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::types::{EmployeeId, PageCursor, TransactionId};

/// Describes one request against the transaction API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
  /// Full employee directory
  Employees,
  /// One page of the all-transactions feed
  PaginatedTransactions { page: PageCursor },
  /// Every transaction of a single employee
  TransactionsByEmployee { employee_id: EmployeeId },
  /// Set the approval flag of a transaction
  SetTransactionApproval {
    transaction_id: TransactionId,
    value: bool,
  },
}

impl ApiRequest {
  /// Endpoint name, shared by the HTTP routes and the fixture dispatcher.
  pub fn endpoint(&self) -> &'static str {
    match self {
      Self::Employees => "employees",
      Self::PaginatedTransactions { .. } => "paginatedTransactions",
      Self::TransactionsByEmployee { .. } => "transactionsByEmployee",
      Self::SetTransactionApproval { .. } => "setTransactionApproval",
    }
  }
}

/// Failure reported by a transport. The caches treat every variant alike.
#[derive(Error, Debug)]
pub enum TransportError {
  #[error("HTTP request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("Failed to parse response: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("Request rejected: {0}")]
  Rejected(String),

  #[error("Invalid API URL: {0}")]
  InvalidUrl(#[from] url::ParseError),
}

/// Answers API requests with a parsed JSON payload or fails outright.
#[async_trait]
pub trait Transport: Send + Sync {
  async fn request(&self, request: &ApiRequest) -> Result<Value, TransportError>;
}

/// Issue a request and decode its payload into `T`.
pub async fn fetch<T: DeserializeOwned>(
  transport: &dyn Transport,
  request: &ApiRequest,
) -> Result<T, TransportError> {
  let payload = transport.request(request).await?;
  Ok(serde_json::from_value(payload)?)
}
