use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::config::schema::{PatchConfig, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read patch config from {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse patch config{}: {source}", display_origin(.path))]
    Yaml {
        path: Option<PathBuf>,
        source: serde_yaml::Error,
    },

    #[error("invalid patch config{}: {source}", display_origin(.path))]
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

fn display_origin(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" ({})", path.display()),
        None => String::new(),
    }
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        let path = path.to_path_buf();
        match self {
            ConfigError::Yaml { path: None, source } => ConfigError::Yaml {
                path: Some(path),
                source,
            },
            ConfigError::Validation { path: None, source } => ConfigError::Validation {
                path: Some(path),
                source,
            },
            other => other,
        }
    }
}

pub fn load_from_str(input: &str) -> Result<PatchConfig, ConfigError> {
    let config: PatchConfig =
        serde_yaml::from_str(input).map_err(|source| ConfigError::Yaml { path: None, source })?;
    config
        .validate()
        .map_err(|source| ConfigError::Validation { path: None, source })?;
    Ok(config)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<PatchConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(target: "nodepatch::config", "loaded patch config from {}", path.display());
    load_from_str(&contents).map_err(|error| error.with_path(path))
}
