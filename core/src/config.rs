// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::{Path, PathBuf};

use crate::checkpoint::FileStore;

/// The name of the application.
pub const APP_NAME: &str = "radisync";

/// Configuration of the sync engine.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Config {
    /// Directory holding the checkpoint store.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
}

impl Config {
    /// Expands the state directory, or picks the user state directory if
    /// none is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured path cannot be expanded.
    pub fn normalize(&mut self) -> Result<(), Box<dyn Error>> {
        match &self.state_dir {
            Some(a) => {
                self.state_dir = Some(
                    expand_path(a)
                        .map_err(|e| format!("Failed to expand state directory path: {e}"))?,
                );
            }
            None => match get_state_dir() {
                Ok(a) => self.state_dir = Some(a.join(APP_NAME)),
                Err(e) => tracing::warn!("Failed to get state directory: {e}"),
            },
        }

        Ok(())
    }

    /// Path of the checkpoint store file, if a state directory is known.
    #[must_use]
    pub fn state_file(&self) -> Option<PathBuf> {
        self.state_dir.as_ref().map(|dir| dir.join(FileStore::FILE_NAME))
    }
}

/// Handle tilde (~) and environment variables in the path
fn expand_path(path: &Path) -> Result<PathBuf, Box<dyn Error>> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }

    let path = path.to_str().ok_or("Invalid path")?;

    // Handle tilde and home directory
    let home_prefixes: &[&str] = if cfg!(unix) {
        &["~/", "$HOME/", "${HOME}/"]
    } else {
        &[r"~\", "~/", r"%UserProfile%\", r"%UserProfile%/"]
    };
    for prefix in home_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_home_dir()?.join(stripped));
        }
    }

    // Handle config directories
    let config_prefixes: &[&str] = if cfg!(unix) {
        &["$XDG_CONFIG_HOME/", "${XDG_CONFIG_HOME}/"]
    } else {
        &[r"%LOCALAPPDATA%\", "%LOCALAPPDATA%/"]
    };
    for prefix in config_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_config_dir()?.join(stripped));
        }
    }

    Ok(path.into())
}

fn get_home_dir() -> Result<PathBuf, Box<dyn Error>> {
    dirs::home_dir().ok_or_else(|| "User-specific home directory not found".into())
}

fn get_config_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(windows)]
    let config_dir = dirs::config_dir();
    config_dir.ok_or_else(|| "User-specific config directory not found".into())
}

fn get_state_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let state_dir = xdg::BaseDirectories::new().get_state_home();
    #[cfg(windows)]
    let state_dir = dirs::data_dir();
    state_dir.ok_or_else(|| "User-specific state directory not found".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path_home_env() {
        let home = get_home_dir().unwrap();
        let home_prefixes: &[&str] = if cfg!(unix) {
            &["~", "$HOME", "${HOME}"]
        } else {
            &[r"~", r"%UserProfile%"]
        };
        for prefix in home_prefixes {
            let result = expand_path(&PathBuf::from(format!("{prefix}/state"))).unwrap();
            assert_eq!(result, home.join("state"));
            assert!(result.is_absolute());
        }
    }

    #[test]
    fn test_expand_path_absolute_untouched() {
        let path = std::env::temp_dir().join("radisync");
        assert_eq!(expand_path(&path).unwrap(), path);
    }

    #[test]
    fn test_expand_path_relative_untouched() {
        let path = PathBuf::from("state/radisync");
        assert_eq!(expand_path(&path).unwrap(), path);
    }

    #[test]
    fn test_state_file_in_configured_dir() {
        let dir = std::env::temp_dir().join("radisync-state");
        let mut config: Config = toml::from_str(&format!(
            "state_dir = {:?}",
            dir.to_str().unwrap()
        ))
        .unwrap();
        config.normalize().unwrap();

        assert_eq!(config.state_file(), Some(dir.join("state.json")));
    }

    #[test]
    fn test_default_state_dir_is_named_after_app() {
        let mut config = Config::default();
        config.normalize().unwrap();

        if let Some(dir) = config.state_dir {
            assert!(dir.ends_with(APP_NAME));
        }
    }
}
