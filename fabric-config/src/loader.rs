// Standard library imports
use std::fs;
use std::path::{Path, PathBuf};

// External crate imports
use tracing::debug;

// Internal imports
use crate::config::FabricConfig;
use crate::error::{ConfigError, Result};

/// Environment variable naming a configuration file
pub const CONFIG_ENV_VAR: &str = "FABRIC_CONFIG";

/// File picked up from the working directory when nothing else is given
pub const DEFAULT_CONFIG_FILE: &str = "fabric.yaml";

/// Finds and loads `fabric.yaml`.
///
/// Priority:
/// 1. **Explicit path** (`--config`). Must exist.
/// 2. **`FABRIC_CONFIG`**. Must exist when set.
/// 3. **Working directory** `fabric.yaml`, if present.
/// 4. **Defaults.**
///
/// Environment overrides are applied to whichever source won.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    explicit_path: Option<PathBuf>,
    search_dir: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    /// Directory searched for `fabric.yaml` instead of the working directory.
    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dir = Some(dir.into());
        self
    }

    /// Load using the process environment.
    pub fn load(&self) -> Result<FabricConfig> {
        self.load_with(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` for every environment read.
    pub fn load_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<FabricConfig> {
        let mut config = match self.resolve_path(&lookup)? {
            Some(path) => {
                debug!("Loading config from: {}", path.display());
                Self::load_file(&path)?
            }
            None => {
                debug!("No configuration file found, using defaults");
                FabricConfig::default()
            }
        };

        config.apply_overrides_from(lookup);
        config.validate()?;
        Ok(config)
    }

    fn resolve_path(&self, lookup: &impl Fn(&str) -> Option<String>) -> Result<Option<PathBuf>> {
        // Priority 1: explicit path
        if let Some(path) = &self.explicit_path {
            return Self::require(path.clone());
        }

        // Priority 2: FABRIC_CONFIG
        if let Some(path) = lookup(CONFIG_ENV_VAR).filter(|v| !v.trim().is_empty()) {
            return Self::require(PathBuf::from(path));
        }

        // Priority 3: working directory
        let local = match &self.search_dir {
            Some(dir) => dir.join(DEFAULT_CONFIG_FILE),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };
        Ok(local.exists().then_some(local))
    }

    fn require(path: PathBuf) -> Result<Option<PathBuf>> {
        if path.exists() {
            Ok(Some(path))
        } else {
            Err(ConfigError::NotFound(path))
        }
    }

    fn load_file(path: &Path) -> Result<FabricConfig> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        // An empty file means "all defaults".
        if contents.trim().is_empty() {
            return Ok(FabricConfig::default());
        }

        serde_yaml_ng::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
