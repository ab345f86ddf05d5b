// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, path::PathBuf, str::FromStr};

use tokio::fs;

use radisync_caldav::CalDavConfig;
use radisync_core::{APP_NAME, Config as CoreConfig};
use radisync_google::GoogleConfig;

const RADISYNC_CONFIG_ENV: &str = "RADISYNC_CONFIG";

/// Locates, reads and normalizes the configuration file.
///
/// The path is taken from `path`, then from `RADISYNC_CONFIG`, then from the
/// user config directory.
#[tracing::instrument]
pub async fn parse_config(path: Option<PathBuf>) -> Result<Config, Box<dyn Error>> {
    let path = if let Some(path) = path {
        path
    } else if let Ok(env_path) = std::env::var(RADISYNC_CONFIG_ENV) {
        PathBuf::from(env_path)
    } else {
        let config = get_config_dir()?.join(format!("{APP_NAME}/config.toml"));
        if !config.exists() {
            return Err(format!("No config found at: {}", config.display()).into());
        }
        config
    };

    let mut config = fs::read_to_string(&path)
        .await
        .map_err(|e| format!("Failed to read config file at {}: {}", path.display(), e))?
        .parse::<Config>()
        .map_err(|e| format!("Failed to parse config file at {}: {}", path.display(), e))?;
    config.core.normalize()?;
    Ok(config)
}

/// Configuration of the radisync application.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// The `CalDAV` collection.
    pub caldav: CalDavConfig,

    /// The Google Calendar API.
    #[serde(default)]
    pub google: GoogleConfig,

    /// The sync engine.
    #[serde(default)]
    pub core: CoreConfig,
}

impl FromStr for Config {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

fn get_config_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(windows)]
    let config_dir = dirs::config_dir();
    config_dir.ok_or_else(|| "User-specific home directory not found".into())
}
