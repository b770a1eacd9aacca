//! Target configuration and persisted user preferences

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ResampError, Result};

/// Configuration governing a single conversion run
///
/// Read once at run start and immutable for the duration of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    /// Target width in pixels
    pub width: u32,
    /// Target height in pixels
    pub height: u32,
    /// Directory resized JPEGs are written into
    pub output_dir: PathBuf,
    /// Whether `output_dir` came from the fixed-path preference
    pub use_fixed_path: bool,
}

impl TargetConfig {
    /// Create a configuration for a run
    pub fn new(width: u32, height: u32, output_dir: PathBuf) -> Self {
        Self {
            width,
            height,
            output_dir,
            use_fixed_path: false,
        }
    }

    /// Validate the configuration before a run starts
    ///
    /// Checks dimensions first, then that the output path names an existing,
    /// writable directory. Writability is probed with a throwaway file since
    /// permission metadata alone is not reliable across platforms.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ResampError::invalid_dimensions(self.width, self.height));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(ResampError::invalid_output_path(
                self.output_dir.clone(),
                "no output directory given",
            ));
        }

        let metadata = std::fs::metadata(&self.output_dir).map_err(|e| {
            ResampError::invalid_output_path(self.output_dir.clone(), e.to_string())
        })?;
        if !metadata.is_dir() {
            return Err(ResampError::invalid_output_path(
                self.output_dir.clone(),
                "not a directory",
            ));
        }

        let probe = self
            .output_dir
            .join(format!(".resamp-probe-{}", std::process::id()));
        std::fs::write(&probe, b"").map_err(|e| {
            ResampError::invalid_output_path(
                self.output_dir.clone(),
                format!("not writable: {}", e),
            )
        })?;
        let _ = std::fs::remove_file(&probe);

        Ok(())
    }
}

/// Persisted per-user preferences
///
/// Loaded once at startup and saved on request; a missing or malformed file
/// falls back to the built-in defaults without failing the workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Default target width
    pub default_width: u32,
    /// Default target height
    pub default_height: u32,
    /// Preferred fixed output directory ("" when unset)
    pub output_path: PathBuf,
    /// Whether the fixed output directory is reused across runs
    pub use_fixed_path: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_width: 1920,
            default_height: 1080,
            output_path: PathBuf::new(),
            use_fixed_path: false,
        }
    }
}

impl Preferences {
    /// The per-user preferences file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .map(|dir| dir.join("resamp").join("settings.toml"))
    }

    /// Load preferences from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ResampError::settings(format!("failed to read preferences: {}", e)))?;
        Ok(toml::from_str(&content)?)
    }

    /// Load preferences, falling back to defaults on any failure
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No preferences file at {:?}, using defaults", path);
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!("Ignoring unreadable preferences at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save preferences to file, creating parent directories as needed
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ResampError::settings(format!("failed to create {:?}: {}", parent, e)))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|e| ResampError::settings(format!("failed to write preferences: {}", e)))?;
        Ok(())
    }
}
