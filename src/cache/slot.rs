//! Value slot shared by all caches: the cached value, its fetch status and a
//! generation counter that decides whether a resolving fetch may still apply.

use std::fmt;

/// Fetch status of a cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
  /// Nothing fetched yet, or the last fetch was discarded
  Idle,
  /// A fetch is in flight
  Fetching,
  /// The last applied fetch succeeded
  Ready,
  /// The last applied fetch failed; the value was left as it was
  Failed(String),
}

impl FetchStatus {
  pub fn is_fetching(&self) -> bool {
    matches!(self, FetchStatus::Fetching)
  }
}

/// Captured generation of a fetch. Only the holder of the current ticket may
/// write the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

#[derive(Debug)]
pub struct CacheSlot<T> {
  value: Option<T>,
  status: FetchStatus,
  generation: u64,
  /// Ticket of the most recently started fetch
  latest_fetch: Option<Ticket>,
}

impl<T> Default for CacheSlot<T> {
  fn default() -> Self {
    Self {
      value: None,
      status: FetchStatus::Idle,
      generation: 0,
      latest_fetch: None,
    }
  }
}

impl<T> CacheSlot<T> {
  pub fn value(&self) -> Option<&T> {
    self.value.as_ref()
  }

  pub fn value_mut(&mut self) -> Option<&mut T> {
    self.value.as_mut()
  }

  pub fn status(&self) -> &FetchStatus {
    &self.status
  }

  pub fn is_loading(&self) -> bool {
    self.status.is_fetching()
  }

  /// Start a fetch. Any fetch already in flight is superseded.
  pub fn begin(&mut self) -> Ticket {
    self.generation += 1;
    let ticket = Ticket(self.generation);
    self.latest_fetch = Some(ticket);
    self.status = FetchStatus::Fetching;
    ticket
  }

  /// Drop the value and reset the status to `Idle`. A fetch in flight keeps
  /// `Fetching` until it resolves, but its response will be discarded.
  pub fn invalidate(&mut self) {
    self.generation += 1;
    self.value = None;
    if !self.status.is_fetching() {
      self.status = FetchStatus::Idle;
    }
  }

  pub fn is_current(&self, ticket: Ticket) -> bool {
    ticket.0 == self.generation
  }

  /// Apply a successful response if `ticket` is still current.
  ///
  /// `apply` receives the previous value and returns the new one. Returns the
  /// stored value, or `None` when the response was discarded.
  pub fn complete(&mut self, ticket: Ticket, apply: impl FnOnce(Option<T>) -> T) -> Option<&T> {
    if !self.is_current(ticket) {
      self.settle_stale(ticket);
      return None;
    }
    self.value = Some(apply(self.value.take()));
    self.status = FetchStatus::Ready;
    self.value.as_ref()
  }

  /// Record a failed fetch. The value is never touched.
  pub fn fail(&mut self, ticket: Ticket, error: &dyn fmt::Display) {
    if !self.is_current(ticket) {
      self.settle_stale(ticket);
      return;
    }
    self.status = FetchStatus::Failed(error.to_string());
  }

  /// A discarded fetch clears the loading flag only if no newer fetch was
  /// started after it.
  fn settle_stale(&mut self, ticket: Ticket) {
    if self.latest_fetch == Some(ticket) {
      self.status = FetchStatus::Idle;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_new_slot_is_empty_and_idle() {
    let slot: CacheSlot<Vec<u32>> = CacheSlot::default();
    assert!(slot.value().is_none());
    assert_eq!(slot.status(), &FetchStatus::Idle);
    assert!(!slot.is_loading());
  }

  #[test]
  fn test_complete_applies_current_ticket() {
    let mut slot = CacheSlot::default();
    let ticket = slot.begin();
    assert!(slot.is_loading());

    assert_eq!(slot.complete(ticket, |_| vec![1, 2]), Some(&vec![1, 2]));
    assert_eq!(slot.status(), &FetchStatus::Ready);
  }

  #[test]
  fn test_failure_keeps_value() {
    let mut slot = CacheSlot::default();
    let first = slot.begin();
    slot.complete(first, |_| vec![7]);

    let second = slot.begin();
    slot.fail(second, &"boom");

    assert_eq!(slot.value(), Some(&vec![7]));
    assert_eq!(slot.status(), &FetchStatus::Failed("boom".to_string()));
    assert!(!slot.is_loading());
  }

  #[test]
  fn test_invalidate_discards_in_flight_response() {
    let mut slot = CacheSlot::default();
    let ticket = slot.begin();
    slot.invalidate();
    assert!(slot.is_loading());

    assert!(slot.complete(ticket, |_| vec![1]).is_none());
    assert!(slot.value().is_none());
    assert_eq!(slot.status(), &FetchStatus::Idle);
  }

  #[test]
  fn test_invalidate_clears_settled_status() {
    let mut slot = CacheSlot::default();
    let ticket = slot.begin();
    slot.fail(ticket, &"boom");
    slot.invalidate();
    assert_eq!(slot.status(), &FetchStatus::Idle);

    let ticket = slot.begin();
    slot.complete(ticket, |_| vec![3]);
    slot.invalidate();
    assert!(slot.value().is_none());
    assert_eq!(slot.status(), &FetchStatus::Idle);
  }

  #[test]
  fn test_superseded_fetch_leaves_newer_one_loading() {
    let mut slot = CacheSlot::default();
    let older = slot.begin();
    let newer = slot.begin();

    assert!(slot.complete(older, |_| vec![1]).is_none());
    assert!(slot.is_loading());

    slot.complete(newer, |_| vec![2]);
    assert_eq!(slot.value(), Some(&vec![2]));
    assert!(!slot.is_loading());
  }

  #[test]
  fn test_stale_failure_after_newer_success_keeps_ready() {
    let mut slot = CacheSlot::default();
    let older = slot.begin();
    let newer = slot.begin();
    slot.complete(newer, |_| vec![2]);

    slot.fail(older, &"late");
    assert_eq!(slot.status(), &FetchStatus::Ready);
    assert_eq!(slot.value(), Some(&vec![2]));
  }
}
