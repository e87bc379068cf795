use std::path::{Path, PathBuf};

use crate::app_dirs;

use super::{AdBuilderSettings, CONFIG_FILE_NAME, ConfigError, map_app_dir_error};

/// Resolve the settings file path, ensuring the app directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load settings from the app directory, returning defaults if the file is missing.
pub fn load_or_default() -> Result<AdBuilderSettings, ConfigError> {
    load_from(&config_path()?)
}

/// Load settings from `path`; a missing file yields defaults.
pub fn load_from(path: &Path) -> Result<AdBuilderSettings, ConfigError> {
    if !path.exists() {
        tracing::debug!("No settings at {}; using defaults", path.display());
        return Ok(AdBuilderSettings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: AdBuilderSettings =
        toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(settings.normalized())
}
