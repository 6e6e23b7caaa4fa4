use anyhow::{Context, Result};
use libpass_core::ManagerConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// CLI configuration loaded from TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Pass to run when no pass flag is given (argument string, e.g. "report")
    #[serde(default)]
    pub default_pass: Option<String>,

    /// Passes selected on every run, in addition to command-line flags
    #[serde(default)]
    pub select: Vec<String>,

    /// Pass manager settings; falls back to LIBPASS_* env vars
    #[serde(default = "ManagerConfig::from_env")]
    pub manager: ManagerConfig,
}

impl CliConfig {
    /// Return the default config directory path: ~/.config/libpass/
    pub fn default_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("could not determine user config directory")?
            .join("libpass");
        Ok(config_dir)
    }

    /// Return the default config file path.
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::default_config_dir()?.join("config.toml"))
    }

    /// Load config from the given path, or the default path.
    /// Returns default config if the file does not exist.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            debug!(?config_path, "Loading config");
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read config: {}", config_path.display()))?;
            let config: Self = toml::from_str(&content)
                .with_context(|| format!("failed to parse config: {}", config_path.display()))?;
            Ok(config)
        } else {
            debug!(?config_path, "Config file not found, using defaults");
            Ok(Self {
                manager: ManagerConfig::from_env(),
                ..Self::default()
            })
        }
    }
}
