use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Employee identifier as issued by the directory
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub String);

impl EmployeeId {
  #[cfg(test)]
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for EmployeeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Transaction identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl TransactionId {
  #[cfg(test)]
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for TransactionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
  pub id: EmployeeId,
  pub first_name: String,
  pub last_name: String,
}

impl Employee {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

/// A single card transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
  pub id: TransactionId,
  pub amount: f64,
  pub employee: Employee,
  pub merchant: String,
  pub date: NaiveDate,
  pub approved: bool,
}

/// Opaque cursor naming a page of the transaction feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(pub u32);

impl PageCursor {
  pub const FIRST: PageCursor = PageCursor(0);
}

/// Accumulated window over the paginated feed.
///
/// `next_page == None` means the feed is exhausted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
  pub data: Vec<Transaction>,
  pub next_page: Option<PageCursor>,
}

impl PageWindow {
  pub fn is_exhausted(&self) -> bool {
    self.next_page.is_none()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_page_window_parses_null_cursor() {
    let window: PageWindow = serde_json::from_value(json!({
      "data": [],
      "nextPage": null,
    }))
    .expect("valid window");

    assert!(window.data.is_empty());
    assert!(window.is_exhausted());
  }

  #[test]
  fn test_transaction_wire_shape() {
    let txn: Transaction = serde_json::from_value(json!({
      "id": "t1",
      "amount": 12.5,
      "employee": { "id": "1", "firstName": "Ann", "lastName": "Lee" },
      "merchant": "Cafe",
      "date": "2022-01-24",
      "approved": false,
    }))
    .expect("valid transaction");

    assert_eq!(txn.id.as_str(), "t1");
    assert_eq!(txn.employee.full_name(), "Ann Lee");
    assert_eq!(txn.date, NaiveDate::from_ymd_opt(2022, 1, 24).expect("date"));
  }

  #[test]
  fn test_missing_cursor_means_exhausted() {
    let window: PageWindow = serde_json::from_value(json!({ "data": [] })).expect("valid window");
    assert_eq!(window.next_page, None);
  }
}
