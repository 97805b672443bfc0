//! In-memory caches for the three data sources.
//!
//! Each cache owns its value exclusively: only its own fetch and invalidate
//! operations write it. Every cache tracks a fetch status and a generation
//! counter so that:
//! - a response that arrives after `invalidate()` is discarded
//! - a replacing fetch supersedes any older one still in flight
//! - `fetch_next_page` is ignored while a page fetch is in flight

mod by_employee;
mod employees;
mod paginated;
mod slot;

pub use by_employee::EmployeeFilteredTransactionCache;
pub use employees::EmployeeCache;
pub use paginated::PaginatedTransactionCache;
pub use slot::FetchStatus;
