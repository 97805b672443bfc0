//! Transaction API: wire types, the transport seam and its implementations.

pub mod client;
pub mod fixture;
pub mod transport;
pub mod types;

#[cfg(test)]
pub mod testing;

use color_eyre::{eyre::eyre, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::Config;

pub use client::HttpTransport;
pub use fixture::{Dataset, FixtureTransport};
pub use transport::{Transport, TransportError};

/// Build the transport selected by the configuration.
///
/// A configured API URL wins; otherwise the fixture answers from the
/// configured dataset file or the embedded one.
pub fn connect(config: &Config) -> Result<Arc<dyn Transport>> {
  if let Some(url) = &config.api.url {
    info!(%url, "using HTTP transport");
    let transport = HttpTransport::new(url, Config::get_api_token())
      .map_err(|e| eyre!("Failed to create HTTP transport: {}", e))?;
    return Ok(Arc::new(transport));
  }

  let dataset = match &config.fixture.path {
    Some(path) => Dataset::from_path(path)?,
    None => Dataset::embedded().map_err(|e| eyre!("Embedded dataset is invalid: {}", e))?,
  };
  info!(
    employees = dataset.employees.len(),
    transactions = dataset.transactions.len(),
    latency_ms = config.fixture.latency_ms,
    "using fixture transport"
  );
  let transport = FixtureTransport::new(dataset)
    .with_latency(Duration::from_millis(config.fixture.latency_ms));
  Ok(Arc::new(transport))
}
