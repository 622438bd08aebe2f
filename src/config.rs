use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::constants::{API_MAX_PAGE_SIZE, DEFAULT_API_BASE_URL, DEFAULT_PORT, MOCK_MONSTER_COUNT};
use crate::error::{CatalogError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub remote: RemoteConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Larger `size` values on the listing endpoint are capped to this.
    pub max_page_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            max_page_size: API_MAX_PAGE_SIZE,
        }
    }
}

/// Where the catalog collection comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Mock,
    File,
    Remote,
}

impl std::str::FromStr for SourceKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(SourceKind::Mock),
            "file" => Ok(SourceKind::File),
            "remote" => Ok(SourceKind::Remote),
            other => Err(CatalogError::Config(format!("Unknown catalog source '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub source: SourceKind,
    /// JSON catalog used by the `file` source.
    pub file: PathBuf,
    pub mock_count: usize,
    pub mock_seed: u64,
    pub owned_ratio: f64,
    /// Directory that image paths are resolved against.
    pub image_root: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::Mock,
            file: PathBuf::from("data/catalog.json"),
            mock_count: MOCK_MONSTER_COUNT,
            mock_seed: 42,
            owned_ratio: 0.1,
            image_root: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    /// `size` used while walking the remote listing.
    pub fetch_page_size: usize,
    pub owned_ids: Vec<u64>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_seconds: 30,
            fetch_page_size: API_MAX_PAGE_SIZE,
            owned_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_prefix: "monst_dex.log".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Prometheus exporter address; no exporter when unset.
    pub listen: Option<SocketAddr>,
}

impl Config {
    /// Reads `config.toml` from the working directory and applies environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    /// A missing file yields the defaults; an unreadable or malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                CatalogError::Config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            Self::from_toml_str(&content)?
        } else {
            Self::default()
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `MONST_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("MONST_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| CatalogError::Config(format!("Invalid MONST_PORT '{}': {}", port, e)))?;
        }
        if let Some(url) = lookup("MONST_API_BASE_URL") {
            self.remote.base_url = url;
        }
        if let Some(source) = lookup("MONST_CATALOG_SOURCE") {
            self.catalog.source = source.parse()?;
        }
        if let Some(file) = lookup("MONST_CATALOG_FILE") {
            self.catalog.file = PathBuf::from(file);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.max_page_size == 0 {
            return Err(CatalogError::Config(
                "server.max_page_size must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.catalog.owned_ratio) {
            return Err(CatalogError::Config(format!(
                "catalog.owned_ratio must be within 0..=1, got {}",
                self.catalog.owned_ratio
            )));
        }
        if self.catalog.source == SourceKind::Remote && self.remote.base_url.trim().is_empty() {
            return Err(CatalogError::Config(
                "remote.base_url is required for the remote source".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.catalog.source, SourceKind::Mock);
        assert_eq!(config.server.max_page_size, 100);
        assert_eq!(config.catalog.mock_count, 9000);
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml_str(
            r#"
            [server]
            port = 9000

            [catalog]
            source = "file"
            file = "fixtures/catalog.json"

            [metrics]
            listen = "127.0.0.1:9898"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.catalog.source, SourceKind::File);
        assert_eq!(config.catalog.file, PathBuf::from("fixtures/catalog.json"));
        assert!(config.metrics.listen.is_some());
    }

    #[test]
    fn test_unknown_source_rejected() {
        let err = Config::from_toml_str("[catalog]\nsource = \"sql\"\n").unwrap_err();
        assert!(matches!(err, CatalogError::Toml(_)));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("MONST_PORT", "3001"),
            ("MONST_CATALOG_SOURCE", "remote"),
            ("MONST_API_BASE_URL", "http://api.internal:8080"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.catalog.source, SourceKind::Remote);
        assert_eq!(config.remote.base_url, "http://api.internal:8080");
    }

    #[test]
    fn test_invalid_port_override() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(|key| (key == "MONST_PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[test]
    fn test_validate_owned_ratio() {
        let mut config = Config::default();
        config.catalog.owned_ratio = 2.0;
        assert!(config.validate().is_err());
    }
}
