use std::io::Write;
use std::path::Path;

use super::load::config_path;
use super::{AdBuilderSettings, ConfigError};

const TEMP_FILE_ATTEMPTS: usize = 5;

/// Persist settings to the app directory.
pub fn save(settings: &AdBuilderSettings) -> Result<(), ConfigError> {
    save_to_path(settings, &config_path()?)
}

/// Write settings to `path` atomically, creating parent directories as needed.
pub fn save_to_path(settings: &AdBuilderSettings, path: &Path) -> Result<(), ConfigError> {
    let dir = path.parent().ok_or_else(|| ConfigError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::other("config path has no parent directory"),
    })?;
    std::fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let data = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_write(dir, path, data.as_bytes())
}

fn atomic_write(dir: &Path, path: &Path, data: &[u8]) -> Result<(), ConfigError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ConfigError::Write {
            path: path.to_path_buf(),
            source: std::io::Error::other("config path has no file name"),
        })?;

    for _ in 0..TEMP_FILE_ATTEMPTS {
        let suffix: u64 = rand::random();
        let tmp_path = dir.join(format!("{file_name}.tmp-{suffix:016x}"));
        let mut file = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
        {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(source) => {
                return Err(ConfigError::Write {
                    path: tmp_path,
                    source,
                });
            }
        };
        let written = file.write_all(data).and_then(|()| file.sync_all());
        drop(file);
        if let Err(source) = written.and_then(|()| std::fs::rename(&tmp_path, path)) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(ConfigError::Write {
                path: path.to_path_buf(),
                source,
            });
        }
        return Ok(());
    }

    Err(ConfigError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("failed to create temporary file for {}", path.display()),
        ),
    })
}
