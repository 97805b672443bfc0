use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  #[serde(default)]
  pub fixture: FixtureConfig,
  /// Custom title for header (defaults to the data source)
  pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
  /// Base URL of the transaction API. When unset the built-in fixture is used.
  pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureConfig {
  /// JSON dataset with `employees` and `transactions` (defaults to the embedded one)
  pub path: Option<PathBuf>,
  /// Simulated response delay
  #[serde(default = "default_latency_ms")]
  pub latency_ms: u64,
}

impl Default for FixtureConfig {
  fn default() -> Self {
    Self {
      path: None,
      latency_ms: default_latency_ms(),
    }
  }
}

fn default_latency_ms() -> u64 {
  300
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./txview.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/txview/config.yaml
  ///
  /// Without any file the defaults apply.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("txview.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("txview").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
    // An empty file deserializes to unit, not to a mapping
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(contents)
  }

  /// Get the API bearer token from the environment, if any.
  pub fn get_api_token() -> Option<String> {
    std::env::var("TXVIEW_API_TOKEN")
      .ok()
      .filter(|token| !token.is_empty())
  }

  /// Header title: the configured one, else the API host or "fixture".
  pub fn display_title(&self) -> String {
    if let Some(title) = &self.title {
      return title.clone();
    }
    match &self.api.url {
      Some(url) => url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(String::from))
        .unwrap_or_else(|| url.clone()),
      None => "fixture".to_string(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn test_defaults_use_fixture() {
    let config = Config::default();
    assert!(config.api.url.is_none());
    assert!(config.fixture.path.is_none());
    assert_eq!(config.fixture.latency_ms, 300);
    assert_eq!(config.display_title(), "fixture");
  }

  #[test]
  fn test_parse_full_config() {
    let config = Config::parse(
      "api:\n  url: https://api.example.com/v1\nfixture:\n  latency_ms: 0\ntitle: Expenses\n",
    )
    .expect("valid config");

    assert_eq!(config.api.url.as_deref(), Some("https://api.example.com/v1"));
    assert_eq!(config.fixture.latency_ms, 0);
    assert_eq!(config.display_title(), "Expenses");
  }

  #[test]
  fn test_partial_fixture_section_keeps_default_latency() {
    let config = Config::parse("fixture:\n  path: data.json\n").expect("valid config");
    assert_eq!(config.fixture.path, Some(PathBuf::from("data.json")));
    assert_eq!(config.fixture.latency_ms, 300);
  }

  #[test]
  fn test_empty_file_is_default() {
    let config = Config::parse("  \n").expect("empty config");
    assert!(config.title.is_none());
  }

  #[test]
  fn test_title_falls_back_to_api_host() {
    let config = Config {
      api: ApiConfig {
        url: Some("https://api.example.com/v1".to_string()),
      },
      ..Config::default()
    };
    assert_eq!(config.display_title(), "api.example.com");
  }

  #[test]
  fn test_load_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "title: From file").expect("write config");

    let config = Config::load(Some(file.path())).expect("config loads");
    assert_eq!(config.title.as_deref(), Some("From file"));
  }

  #[test]
  fn test_load_missing_explicit_path_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("nope.yaml");

    let err = Config::load(Some(&missing)).expect_err("missing file");
    assert!(err.to_string().contains("Config file not found"));
  }

  #[test]
  fn test_load_reports_parse_errors() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "fixture: [not, a, mapping]").expect("write config");

    let err = Config::load(Some(file.path())).expect_err("invalid config");
    assert!(err.to_string().contains("Failed to parse config file"));
  }
}
