//! Site configuration loading.
//!
//! Files are YAML (`.yaml`/`.yml`) or JSON (`.json`). Missing sections keep
//! their defaults. The remote access key may also come from the
//! environment so it never has to be committed next to the site.

use std::env;
use std::fs;
use std::path::Path;

use historia_types::SiteConfig;
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding `remote.access_key`.
pub const ACCESS_KEY_ENV: &str = "HISTORIA_UNSPLASH_ACCESS_KEY";

/// Error surfaced while loading a site configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config extension '{0}'; expected .yaml, .yml or .json")]
    UnsupportedExtension(String),
    #[error("config must list at least one page")]
    NoPages,
}

/// Loads a site configuration, or the built-in defaults when `path` is `None`,
/// then applies environment overrides.
pub fn load_site_config(path: Option<&Path>) -> Result<SiteConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => SiteConfig::default(),
    };
    apply_env_overrides(&mut config);
    if config.pages.is_empty() {
        return Err(ConfigError::NoPages);
    }
    Ok(config)
}

/// Parses configuration text according to `extension`.
pub fn parse_site_config(content: &str, extension: &str) -> Result<SiteConfig, ConfigError> {
    match extension.to_ascii_lowercase().as_str() {
        "yaml" | "yml" => Ok(serde_yaml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        other => Err(ConfigError::UnsupportedExtension(other.to_string())),
    }
}

fn read_config_file(path: &Path) -> Result<SiteConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
    debug!(path = %path.display(), "loading site config");
    parse_site_config(&content, extension)
}

fn apply_env_overrides(config: &mut SiteConfig) {
    if let Ok(key) = env::var(ACCESS_KEY_ENV) {
        let trimmed = key.trim();
        if !trimmed.is_empty() {
            config.remote.access_key = Some(trimmed.to_string());
        }
    }
}
