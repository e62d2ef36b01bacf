use std::path::{Path, PathBuf};

use autoheader::RawOptions;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_FILE_NAME: &str = "autoheader.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Layout of a config file. Only the `[auto_header]` table is read.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub auto_header: Option<RawOptions>,
}

/// Config file used for `input` when none is given: next to the input.
pub fn default_path(input: &Path) -> PathBuf {
    input
        .parent()
        .map(|dir| dir.join(DEFAULT_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME))
}

/// Load the `[auto_header]` options. A missing file or table yields `None`.
pub fn load(path: &Path) -> Result<Option<RawOptions>, ConfigError> {
    if !path.exists() {
        log::debug!("no config file at {}", path.display());
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let file: ConfigFile = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(file.auto_header)
}
