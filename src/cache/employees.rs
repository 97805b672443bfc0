use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use crate::api::transport::{fetch, ApiRequest, Transport, TransportError};
use crate::api::types::Employee;

use super::slot::{CacheSlot, FetchStatus};

/// Holds the full employee directory once fetched.
pub struct EmployeeCache {
  transport: Arc<dyn Transport>,
  slot: Mutex<CacheSlot<Vec<Employee>>>,
}

impl EmployeeCache {
  pub fn new(transport: Arc<dyn Transport>) -> Self {
    Self {
      transport,
      slot: Mutex::new(CacheSlot::default()),
    }
  }

  fn slot(&self) -> MutexGuard<'_, CacheSlot<Vec<Employee>>> {
    self.slot.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn value(&self) -> Option<Vec<Employee>> {
    self.slot().value().cloned()
  }

  pub fn is_loaded(&self) -> bool {
    self.slot().value().is_some()
  }

  pub fn is_loading(&self) -> bool {
    self.slot().is_loading()
  }

  pub fn status(&self) -> FetchStatus {
    self.slot().status().clone()
  }

  /// Fetch the whole directory and replace the cached list.
  ///
  /// Every call goes to the transport. Returns `None` when a newer fetch or an
  /// invalidation overtook this one and its response was discarded.
  pub async fn fetch_all(&self) -> Result<Option<Vec<Employee>>, TransportError> {
    let ticket = self.slot().begin();
    debug!(%ticket, "fetching employees");

    let result = fetch::<Vec<Employee>>(self.transport.as_ref(), &ApiRequest::Employees).await;

    let mut slot = self.slot();
    match result {
      Ok(employees) => {
        let stored = slot.complete(ticket, |_| employees).cloned();
        if stored.is_none() {
          debug!(%ticket, "discarding superseded employee response");
        }
        Ok(stored)
      }
      Err(e) => {
        warn!(%ticket, error = %e, "employee fetch failed");
        slot.fail(ticket, &e);
        Err(e)
      }
    }
  }

  pub fn invalidate(&self) {
    self.slot().invalidate();
  }
}
