//! Configuration loading.
//!
//! The catalog runs on compiled-in defaults; a JSON file may override any
//! subset of fields. The file is named by `SKULENS_CATALOG_CONFIG`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;

use skulens_core::DomainError;
use skulens_products::CatalogConfig;

/// Environment variable holding the path of the catalog config file.
pub const CONFIG_ENV_VAR: &str = "SKULENS_CATALOG_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Parse and validate a JSON config document.
pub fn from_json(json: &str) -> Result<CatalogConfig, ConfigError> {
    let config: CatalogConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Read, parse and validate the config file at `path`.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<CatalogConfig, ConfigError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_json(&json)
}

/// Load the config named by [`CONFIG_ENV_VAR`], or the defaults if unset.
pub fn load_from_env() -> Result<CatalogConfig, ConfigError> {
    resolve(std::env::var_os(CONFIG_ENV_VAR))
}

fn resolve(path: Option<OsString>) -> Result<CatalogConfig, ConfigError> {
    match path {
        Some(path) if !path.is_empty() => {
            tracing::info!(path = ?path, "loading catalog config");
            load_from_path(PathBuf::from(path))
        }
        _ => Ok(CatalogConfig::default()),
    }
}
