//! Ad builder settings persisted as TOML in the app directory.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ad_builder::validation::FieldLimits;
use crate::ad_gateway::api::DEFAULT_BASE_URL;
use crate::app_dirs;

mod load;
mod save;


/// Filename of the settings file inside the app directory.
pub const CONFIG_FILE_NAME: &str = "adbuilder.toml";

pub const DEFAULT_TOAST_DURATION_MS: u64 = 4000;
pub const DEFAULT_NUM_SLOTS: u32 = 5;
pub const DEFAULT_TITLE_MAX_LEN: usize = 40;
pub const DEFAULT_DESCRIPTION_MAX_LEN: usize = 120;

pub use load::{config_path, load_from, load_or_default};
pub use save::{save, save_to_path};

/// Tunables for the ad builder workflow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdBuilderSettings {
    /// Root of the advertisement backend.
    pub api_base_url: String,
    /// How long a toast stays visible.
    pub toast_duration_ms: u64,
    /// Number of purchasable slots offered.
    pub num_slots: u32,
    pub title_max_len: usize,
    pub description_max_len: usize,
}

impl Default for AdBuilderSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
            num_slots: DEFAULT_NUM_SLOTS,
            title_max_len: DEFAULT_TITLE_MAX_LEN,
            description_max_len: DEFAULT_DESCRIPTION_MAX_LEN,
        }
    }
}

impl AdBuilderSettings {
    /// Clamp out-of-range values back into something usable.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        self.api_base_url = self.api_base_url.trim().to_string();
        if url::Url::parse(&self.api_base_url).is_err() {
            tracing::warn!(
                "Ignoring invalid api_base_url {:?}; using {}",
                self.api_base_url,
                defaults.api_base_url
            );
            self.api_base_url = defaults.api_base_url;
        }
        self.toast_duration_ms = self.toast_duration_ms.max(1);
        self.num_slots = self.num_slots.max(1);
        if self.title_max_len == 0 {
            self.title_max_len = defaults.title_max_len;
        }
        if self.description_max_len == 0 {
            self.description_max_len = defaults.description_max_len;
        }
        self
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn limits(&self) -> FieldLimits {
        FieldLimits {
            title_max_len: self.title_max_len,
            description_max_len: self.description_max_len,
        }
    }
}

/// Errors that may occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory could be resolved for this platform.
    #[error("No suitable config directory available")]
    NoConfigDir,
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            ConfigError::CreateDir { path, source }
        }
    }
}
