mod api;
mod app;
mod cache;
mod config;
mod coordinator;
mod event;
mod logging;
mod session;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "txview")]
#[command(about = "A terminal viewer for card transactions with an employee filter")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/txview/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Base URL of the transaction API (overrides the built-in fixture)
  #[arg(short, long)]
  url: Option<String>,

  /// JSON dataset served by the built-in fixture
  #[arg(short, long)]
  fixture: Option<PathBuf>,

  /// Simulated fixture latency in milliseconds
  #[arg(long)]
  latency_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let _log_guard = logging::init()?;

  // Load configuration, then let the command line override it
  let mut config = config::Config::load(args.config.as_deref())?;
  if let Some(url) = args.url {
    config.api.url = Some(url);
  }
  if let Some(path) = args.fixture {
    config.fixture.path = Some(path);
  }
  if let Some(latency_ms) = args.latency_ms {
    config.fixture.latency_ms = latency_ms;
  }
  info!(?config, "starting txview");

  let transport = api::connect(&config)?;
  let session = Arc::new(session::Session::new(transport));
  let coordinator = Arc::new(coordinator::ViewCoordinator::new(session));

  let mut app = app::App::new(&config, coordinator);
  app.run().await?;

  Ok(())
}
