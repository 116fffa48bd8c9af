use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};

use crate::release::ReleaseVersion;

const CONFIG_DIR: &str = "deploy-scripts";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_RELEASES_DIR: &str = "releases";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub networks: HashMap<String, NetworkConfig>,

    #[serde(default)]
    pub bundle: BundleSettings,

    #[serde(default)]
    pub defaults: Option<Defaults>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub chain_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleSettings {
    /// Base directory for `release` runs without an explicit output directory
    #[serde(default = "default_releases_dir")]
    pub releases_dir: PathBuf,
}

impl Default for BundleSettings {
    fn default() -> Self {
        Self {
            releases_dir: default_releases_dir(),
        }
    }
}

fn default_releases_dir() -> PathBuf {
    PathBuf::from(DEFAULT_RELEASES_DIR)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Defaults {
    pub network: Option<String>,
}

impl AppConfig {
    /// Load configuration from `path`, or the default location when none is
    /// given. A missing default file yields the default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {:?}", path))?;

        toml::from_str(&content).wrap_err("Failed to parse config file")
    }

    /// Get the default configuration file path
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Get a network by name, falling back to default
    pub fn get_network(&self, name: Option<&str>) -> Option<(&String, &NetworkConfig)> {
        if let Some(name) = name {
            self.networks.get_key_value(name)
        } else if let Some(defaults) = &self.defaults {
            if let Some(default_name) = &defaults.network {
                self.networks.get_key_value(default_name)
            } else {
                self.networks.iter().next()
            }
        } else {
            self.networks.iter().next()
        }
    }

    /// `releases/v<version>` unless the config moves the releases directory
    pub fn default_output_dir(&self, version: &ReleaseVersion) -> PathBuf {
        self.bundle.releases_dir.join(format!("v{}", version))
    }
}
