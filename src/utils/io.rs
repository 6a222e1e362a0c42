use crate::error::{BspyError, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Create `path` if it does not exist. With `overwrite`, an existing
/// directory is removed and created again empty.
pub fn create_directory<P: AsRef<Path>>(path: P, overwrite: bool) -> Result<PathBuf> {
    let path = path.as_ref();
    if !path.exists() {
        fs::create_dir_all(path)?;
    } else if overwrite {
        fs::remove_dir_all(path)?;
        fs::create_dir_all(path)?;
    }
    Ok(path.to_path_buf())
}

/// Create `path/<name>_<YYYY_MM_DD_HHMMSS>` using local time.
pub fn create_directory_timestamp<P: AsRef<Path>>(path: P, name: &str, overwrite: bool) -> Result<PathBuf> {
    let datetime = chrono::Local::now().format("%Y_%m_%d_%H%M%S");
    create_directory(path.as_ref().join(format!("{}_{}", name, datetime)), overwrite)
}

/// Write a configuration back out as block-style YAML.
pub fn save_configs<T: Serialize, P: AsRef<Path>>(configs: &T, path: P) -> Result<()> {
    let yaml = serde_yaml::to_string(configs)?;
    fs::write(path.as_ref(), yaml).map_err(|e| {
        BspyError::Configuration(format!(
            "Failed to write config {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    Ok(())
}
