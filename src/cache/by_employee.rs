use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use crate::api::transport::{fetch, ApiRequest, Transport, TransportError};
use crate::api::types::{EmployeeId, Transaction, TransactionId};

use super::slot::{CacheSlot, FetchStatus};

/// Transactions of the most recently requested employee. Not keyed by id: a
/// fetch for another employee simply overwrites the list.
pub struct EmployeeFilteredTransactionCache {
  transport: Arc<dyn Transport>,
  slot: Mutex<CacheSlot<Vec<Transaction>>>,
}

impl EmployeeFilteredTransactionCache {
  pub fn new(transport: Arc<dyn Transport>) -> Self {
    Self {
      transport,
      slot: Mutex::new(CacheSlot::default()),
    }
  }

  fn slot(&self) -> MutexGuard<'_, CacheSlot<Vec<Transaction>>> {
    self.slot.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn value(&self) -> Option<Vec<Transaction>> {
    self.slot().value().cloned()
  }

  pub fn is_loading(&self) -> bool {
    self.slot().is_loading()
  }

  pub fn status(&self) -> FetchStatus {
    self.slot().status().clone()
  }

  pub async fn fetch_by_employee(
    &self,
    employee_id: &EmployeeId,
  ) -> Result<Option<Vec<Transaction>>, TransportError> {
    let ticket = self.slot().begin();
    debug!(%ticket, %employee_id, "fetching employee transactions");

    let request = ApiRequest::TransactionsByEmployee {
      employee_id: employee_id.clone(),
    };
    let result = fetch::<Vec<Transaction>>(self.transport.as_ref(), &request).await;

    let mut slot = self.slot();
    match result {
      Ok(transactions) => {
        let stored = slot.complete(ticket, |_| transactions).cloned();
        if stored.is_none() {
          debug!(%ticket, %employee_id, "discarding superseded employee transactions");
        }
        Ok(stored)
      }
      Err(e) => {
        warn!(%ticket, %employee_id, error = %e, "employee transaction fetch failed");
        slot.fail(ticket, &e);
        Err(e)
      }
    }
  }

  /// Set the approval flag of a held transaction. Returns whether it was found.
  pub fn set_approved(&self, id: &TransactionId, approved: bool) -> bool {
    let mut slot = self.slot();
    let Some(transactions) = slot.value_mut() else {
      return false;
    };
    match transactions.iter_mut().find(|t| &t.id == id) {
      Some(transaction) => {
        transaction.approved = approved;
        true
      }
      None => false,
    }
  }

  pub fn invalidate(&self) {
    self.slot().invalidate();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::testing::{payloads, ScriptedTransport};

  fn cache() -> (Arc<ScriptedTransport>, Arc<EmployeeFilteredTransactionCache>) {
    let transport = Arc::new(ScriptedTransport::new());
    let cache = Arc::new(EmployeeFilteredTransactionCache::new(transport.clone()));
    (transport, cache)
  }

  fn ids(transactions: &[Transaction]) -> Vec<&str> {
    transactions.iter().map(|t| t.id.as_str()).collect()
  }

  #[tokio::test]
  async fn test_fetch_overwrites_previous_employee() {
    let (transport, cache) = cache();
    transport.push(
      "transactionsByEmployee",
      Ok(payloads::transactions(&["a1"], "1")),
    );
    transport.push(
      "transactionsByEmployee",
      Ok(payloads::transactions(&["b1", "b2"], "2")),
    );

    cache
      .fetch_by_employee(&EmployeeId::new("1"))
      .await
      .expect("first");
    cache
      .fetch_by_employee(&EmployeeId::new("2"))
      .await
      .expect("second");

    let held = cache.value().expect("value");
    assert_eq!(ids(&held), vec!["b1", "b2"]);
    assert_eq!(
      transport.calls()[1],
      ApiRequest::TransactionsByEmployee {
        employee_id: EmployeeId::new("2")
      }
    );
  }

  #[tokio::test]
  async fn test_failure_keeps_previous_list() {
    let (transport, cache) = cache();
    transport.push(
      "transactionsByEmployee",
      Ok(payloads::transactions(&["tX"], "2")),
    );
    transport.push(
      "transactionsByEmployee",
      Err(TransportError::Rejected("offline".to_string())),
    );

    cache
      .fetch_by_employee(&EmployeeId::new("2"))
      .await
      .expect("first");
    assert!(cache
      .fetch_by_employee(&EmployeeId::new("1"))
      .await
      .is_err());

    assert_eq!(ids(&cache.value().expect("kept")), vec!["tX"]);
    assert!(!cache.is_loading());
  }

  #[tokio::test]
  async fn test_empty_result_is_not_null() {
    let (transport, cache) = cache();
    transport.push(
      "transactionsByEmployee",
      Ok(payloads::transactions(&[], "1")),
    );

    cache
      .fetch_by_employee(&EmployeeId::new("1"))
      .await
      .expect("fetch");

    assert_eq!(cache.value(), Some(Vec::new()));
  }

  #[tokio::test]
  async fn test_invalidate_clears_list() {
    let (transport, cache) = cache();
    transport.push(
      "transactionsByEmployee",
      Ok(payloads::transactions(&["a1"], "1")),
    );

    cache
      .fetch_by_employee(&EmployeeId::new("1"))
      .await
      .expect("fetch");
    cache.invalidate();

    assert!(cache.value().is_none());
  }

  #[tokio::test]
  async fn test_newer_request_wins_over_slower_older_one() {
    let (transport, cache) = cache();
    let release_old = transport.push_gated(
      "transactionsByEmployee",
      Ok(payloads::transactions(&["old"], "1")),
    );
    transport.push(
      "transactionsByEmployee",
      Ok(payloads::transactions(&["new"], "2")),
    );

    let slow = tokio::spawn({
      let cache = cache.clone();
      async move { cache.fetch_by_employee(&EmployeeId::new("1")).await }
    });
    transport.wait_for_calls(1).await;

    cache
      .fetch_by_employee(&EmployeeId::new("2"))
      .await
      .expect("newer");
    release_old.send(()).expect("release");
    let discarded = slow.await.expect("join").expect("older");

    assert!(discarded.is_none());
    assert_eq!(ids(&cache.value().expect("value")), vec!["new"]);
  }
}
