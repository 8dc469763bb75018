use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::domain::is_valid_pathway_org;
use crate::error::KeggError;
use crate::resolver::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::storage::Storage;

pub const DEFAULT_CONFIG_FILE: &str = "kegg-tools.json";

/// On-disk form of `kegg-tools.json`. Every key is optional.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub cache_dir: Option<Utf8PathBuf>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub organism: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub cache_dir: Utf8PathBuf,
    pub base_url: String,
    pub timeout_secs: u64,
    pub organism: Option<String>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `path`, or `kegg-tools.json` in the working directory when no path
    /// is given. Only a missing default file falls back to defaults.
    pub fn resolve(path: Option<&str>) -> Result<Settings, KeggError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Self::resolve_config(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| KeggError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| KeggError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<Settings, KeggError> {
        let cache_dir = match config.cache_dir {
            Some(dir) => dir,
            None => Storage::default_dir()?,
        };

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(KeggError::InvalidField {
                field: "base url",
                value: base_url,
            });
        }

        if let Some(organism) = &config.organism {
            if !is_valid_pathway_org(organism) {
                return Err(KeggError::InvalidField {
                    field: "pathway organism",
                    value: organism.clone(),
                });
            }
        }

        Ok(Settings {
            cache_dir,
            base_url,
            timeout_secs: config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            organism: config.organism,
        })
    }
}
