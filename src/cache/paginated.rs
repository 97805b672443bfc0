use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use crate::api::transport::{fetch, ApiRequest, Transport, TransportError};
use crate::api::types::{PageCursor, PageWindow, TransactionId};

use super::slot::{CacheSlot, FetchStatus, Ticket};

/// Accumulating window over the paginated all-transactions feed.
///
/// `fetch_first_page` replaces the window, `fetch_next_page` appends to it.
pub struct PaginatedTransactionCache {
  transport: Arc<dyn Transport>,
  slot: Mutex<CacheSlot<PageWindow>>,
}

impl PaginatedTransactionCache {
  pub fn new(transport: Arc<dyn Transport>) -> Self {
    Self {
      transport,
      slot: Mutex::new(CacheSlot::default()),
    }
  }

  fn slot(&self) -> MutexGuard<'_, CacheSlot<PageWindow>> {
    self.slot.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn value(&self) -> Option<PageWindow> {
    self.slot().value().cloned()
  }

  pub fn is_loading(&self) -> bool {
    self.slot().is_loading()
  }

  pub fn status(&self) -> FetchStatus {
    self.slot().status().clone()
  }

  /// True once a window is held whose feed has no further pages
  pub fn is_exhausted(&self) -> bool {
    self.slot().value().is_some_and(PageWindow::is_exhausted)
  }

  /// Fetch page 0 and replace the window with it.
  pub async fn fetch_first_page(&self) -> Result<Option<PageWindow>, TransportError> {
    let ticket = self.slot().begin();
    debug!(%ticket, "fetching first transaction page");
    self
      .load(ticket, PageCursor::FIRST, |_, page| page)
      .await
  }

  /// Fetch the page after the current window and append it.
  ///
  /// Returns `None` without touching the transport when nothing is cached, the
  /// feed is exhausted, or another page fetch is still in flight.
  pub async fn fetch_next_page(&self) -> Result<Option<PageWindow>, TransportError> {
    let (ticket, cursor) = {
      let mut slot = self.slot();
      if slot.is_loading() {
        debug!("ignoring next page request while a fetch is in flight");
        return Ok(None);
      }
      let Some(cursor) = slot.value().and_then(|window| window.next_page) else {
        return Ok(None);
      };
      (slot.begin(), cursor)
    };
    debug!(%ticket, page = cursor.0, "fetching next transaction page");

    self
      .load(ticket, cursor, |previous, page| match previous {
        Some(mut window) => {
          window.data.extend(page.data);
          window.next_page = page.next_page;
          window
        }
        None => page,
      })
      .await
  }

  async fn load(
    &self,
    ticket: Ticket,
    cursor: PageCursor,
    merge: impl FnOnce(Option<PageWindow>, PageWindow) -> PageWindow,
  ) -> Result<Option<PageWindow>, TransportError> {
    let request = ApiRequest::PaginatedTransactions { page: cursor };
    let result = fetch::<PageWindow>(self.transport.as_ref(), &request).await;

    let mut slot = self.slot();
    match result {
      Ok(page) => {
        let stored = slot
          .complete(ticket, |previous| merge(previous, page))
          .cloned();
        match &stored {
          Some(window) => debug!(
            %ticket,
            len = window.data.len(),
            exhausted = window.is_exhausted(),
            "transaction page applied"
          ),
          None => debug!(%ticket, "discarding superseded transaction page"),
        }
        Ok(stored)
      }
      Err(e) => {
        warn!(%ticket, page = cursor.0, error = %e, "transaction page fetch failed");
        slot.fail(ticket, &e);
        Err(e)
      }
    }
  }

  /// Set the approval flag of a held transaction. Returns whether it was found.
  pub fn set_approved(&self, id: &TransactionId, approved: bool) -> bool {
    let mut slot = self.slot();
    let Some(window) = slot.value_mut() else {
      return false;
    };
    match window.data.iter_mut().find(|t| &t.id == id) {
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
