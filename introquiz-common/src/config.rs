//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "INTROQUIZ_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "introquiz.db";

/// Audio directory name inside the root folder
pub const AUDIO_DIR: &str = "audio";

/// Optional TOML configuration file contents
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the database and the audio files
    pub root_folder: Option<PathBuf>,
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Root folder resolution, in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file in the platform config directory
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&Path>, env_var_name: &str) -> PathBuf {
    let config_file = default_config_file();
    resolve_root_folder_with(cli_arg, env_var_name, config_file.as_deref())
}

/// Same as [`resolve_root_folder`] with an explicit config file location
pub fn resolve_root_folder_with(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config_file: Option<&Path>,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = config_file.filter(|p| p.exists()) {
        match TomlConfig::load(path) {
            Ok(TomlConfig {
                root_folder: Some(root),
            }) => return root,
            Ok(_) => debug!("No root_folder in {}", path.display()),
            // A broken config file falls through to the compiled default
            Err(e) => warn!("Ignoring config file: {}", e),
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Path of the database file for a given root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE)
}

/// Path of the audio directory for a given root folder
pub fn audio_dir(root_folder: &Path) -> PathBuf {
    root_folder.join(AUDIO_DIR)
}

/// Platform config file location (`<config_dir>/introquiz/config.toml`)
fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("introquiz").join("config.toml"))
}

/// OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("introquiz"))
        .unwrap_or_else(|| PathBuf::from("./introquiz_data"))
}
