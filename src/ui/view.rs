use crate::api::types::TransactionId;
use crate::coordinator::Filter;

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
  pub priority: u8, // Lower = shown first
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      priority: 100,
    }
  }

  pub const fn with_priority(mut self, priority: u8) -> Self {
    self.priority = priority;
    self
  }
}

/// Actions the view asks the App to carry out in response to input
#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
  /// No action needed
  None,
  /// Apply an employee filter (or go back to all transactions)
  Select(Filter),
  /// Append the next page
  LoadMore,
  /// Set the approval flag of a transaction
  SetApproval {
    transaction_id: TransactionId,
    approved: bool,
  },
  /// Leave the application
  Quit,
}
