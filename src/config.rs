//! Configuration for the folio server.
//!
//! Settings come from, in increasing precedence: built-in defaults, an
//! optional `folio.toml`, environment variables (`PORT`, `FOLIO_HOST`,
//! `FOLIO_SITE_DIR`), and CLI flags. Without `--config`, the file is
//! discovered with `prefer` in the standard config locations.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_SITE_DIR: &str = "site";
/// The single page served for `/` and every unmatched path.
pub const DEFAULT_DOCUMENT: &str = "portfolio.html";
/// Subdirectory of the site served under `/assets`.
pub const ASSETS_SUBDIR: &str = "assets";
/// Name `prefer` searches for (`folio.toml` and friends).
pub const CONFIG_NAME: &str = "folio";

pub const PORT_ENV: &str = "PORT";
pub const HOST_ENV: &str = "FOLIO_HOST";
pub const SITE_DIR_ENV: &str = "FOLIO_SITE_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("unsupported config file format: {path} (expected .toml)")]
    UnsupportedFormat { path: PathBuf },

    #[error("{var} must be a port number, got {value:?}")]
    InvalidPort { var: &'static str, value: String },
}

/// Resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Interface to listen on.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Site root holding the document and the assets directory.
    pub site_dir: PathBuf,
    /// Filename of the portfolio document inside the site root.
    pub document: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            site_dir: PathBuf::from(DEFAULT_SITE_DIR),
            document: DEFAULT_DOCUMENT.to_string(),
        }
    }
}

impl Settings {
    /// Create settings serving a specific site root.
    pub fn with_site_dir(site_dir: impl Into<PathBuf>) -> Self {
        Self {
            site_dir: site_dir.into(),
            ..Default::default()
        }
    }

    pub fn document_path(&self) -> PathBuf {
        self.site_dir.join(&self.document)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.site_dir.join(ASSETS_SUBDIR)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // An empty PORT counts as unset.
        if let Some(value) = lookup(PORT_ENV).filter(|v| !v.trim().is_empty()) {
            self.port = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort {
                    var: PORT_ENV,
                    value,
                })?;
        }
        if let Some(host) = lookup(HOST_ENV).filter(|v| !v.is_empty()) {
            self.host = host;
        }
        if let Some(dir) = lookup(SITE_DIR_ENV).filter(|v| !v.is_empty()) {
            self.site_dir = PathBuf::from(dir);
        }
        Ok(())
    }
}

/// Contents of `folio.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Relative paths resolve against the config file's directory.
    pub site_dir: Option<PathBuf>,
    pub document: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            None | Some("toml") => {}
            Some(_) => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_to(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(host) = &self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(dir) = &self.site_dir {
            settings.site_dir = if dir.is_absolute() {
                dir.clone()
            } else {
                base_dir.join(dir)
            };
        }
        if let Some(document) = &self.document {
            settings.document = document.clone();
        }
    }
}

/// Options controlling where settings are loaded from.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file; must exist when given.
    pub config_path: Option<PathBuf>,
}

/// Locate a `folio` config file in the standard locations.
async fn discover_config_file() -> Option<PathBuf> {
    let found = prefer::load(CONFIG_NAME).await.ok()?;
    let path = found.source_path()?.to_path_buf();
    if path.extension().and_then(|e| e.to_str()) != Some("toml") {
        tracing::warn!(path = %path.display(), "ignoring non-TOML config file");
        return None;
    }
    Some(path)
}

/// Load settings from the config file (if any) and the process environment.
pub async fn load_settings(options: &LoadOptions) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    let config_path = match &options.config_path {
        Some(path) => Some(path.clone()),
        None => discover_config_file().await,
    };
    if let Some(path) = config_path {
        let file = FileConfig::load(&path)?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        file.apply_to(&mut settings, &base_dir);
        tracing::debug!(path = %path.display(), "loaded config file");
    }

    settings.apply_env(|key| std::env::var(key).ok())?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.port, 3000);
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.document_path(), PathBuf::from("site/portfolio.html"));
        assert_eq!(settings.assets_dir(), PathBuf::from("site/assets"));
    }

    #[test]
    fn test_port_from_env() {
        let mut settings = Settings::default();
        settings.apply_env(env(&[("PORT", "8080")])).unwrap();
        assert_eq!(settings.port, 8080);
    }

    #[test]
    fn test_empty_port_uses_default() {
        let mut settings = Settings::default();
        settings.apply_env(env(&[("PORT", "")])).unwrap();
        assert_eq!(settings.port, DEFAULT_PORT);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let mut settings = Settings::default();
        let err = settings.apply_env(env(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { var: "PORT", .. }));
        assert!(err.to_string().contains("\"http\""));
    }

    #[test]
    fn test_host_and_site_from_env() {
        let mut settings = Settings::default();
        settings
            .apply_env(env(&[("FOLIO_HOST", "127.0.0.1"), ("FOLIO_SITE_DIR", "/srv/site")]))
            .unwrap();
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.site_dir, PathBuf::from("/srv/site"));
    }

    #[test]
    fn test_file_config_resolves_relative_site_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        fs::write(&path, "port = 4000\nsite_dir = \"public\"\ndocument = \"index.html\"\n").unwrap();

        let file = FileConfig::load(&path).unwrap();
        let mut settings = Settings::default();
        file.apply_to(&mut settings, dir.path());

        assert_eq!(settings.port, 4000);
        assert_eq!(settings.site_dir, dir.path().join("public"));
        assert_eq!(settings.document, "index.html");
        assert_eq!(settings.host, DEFAULT_HOST);
    }

    #[test]
    fn test_file_config_rejects_unknown_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        fs::write(&path, "prot = 4000\n").unwrap();
        assert!(matches!(
            FileConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_non_toml_config_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("folio.yaml");
        fs::write(&path, "port: 4000\n").unwrap();
        assert!(matches!(
            FileConfig::load(&path),
            Err(ConfigError::UnsupportedFormat { .. })
        ));
    }

    #[tokio::test]
    async fn test_explicit_config_file_applied() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        fs::write(&path, "site_dir = \"public\"\ndocument = \"index.html\"\n").unwrap();

        let options = LoadOptions {
            config_path: Some(path),
        };
        let settings = load_settings(&options).await.unwrap();
        assert_eq!(settings.site_dir, dir.path().join("public"));
        assert_eq!(settings.document, "index.html");
    }

    #[tokio::test]
    async fn test_explicit_missing_config_fails() {
        let options = LoadOptions {
            config_path: Some(PathBuf::from("/nonexistent/folio.toml")),
        };
        assert!(matches!(
            load_settings(&options).await,
            Err(ConfigError::Read { .. })
        ));
    }
}
