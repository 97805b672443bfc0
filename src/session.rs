//! Top-level context owning the three caches for the life of the program.

use std::sync::Arc;

use crate::api::Transport;
use crate::cache::{EmployeeCache, EmployeeFilteredTransactionCache, PaginatedTransactionCache};

/// The caches of one session, all talking to the same transport.
pub struct Session {
  pub transport: Arc<dyn Transport>,
  pub employees: EmployeeCache,
  pub paginated: PaginatedTransactionCache,
  pub by_employee: EmployeeFilteredTransactionCache,
}

impl Session {
  pub fn new(transport: Arc<dyn Transport>) -> Self {
    Self {
      employees: EmployeeCache::new(Arc::clone(&transport)),
      paginated: PaginatedTransactionCache::new(Arc::clone(&transport)),
      by_employee: EmployeeFilteredTransactionCache::new(Arc::clone(&transport)),
      transport,
    }
  }
}
