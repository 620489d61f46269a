//! Configuration for the op bridge.
//!
//! This crate parses the TOML-based `~/.tfop/config.toml` (and project-specific
//! variants) so the host glue can decide how diagnostics are emitted and what the
//! op catalog exposes.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dirs::home_dir;
use serde::{Deserialize, Serialize};
use tfop_core::logging::Level;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "TFOP_CONFIG";

const CONFIG_DIR: &str = ".tfop";
const CONFIG_FILE: &str = "config.toml";

/// Bridge configuration loaded from TOML files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// Diagnostic output.
    pub logging: LoggingConfig,

    /// Op catalog exposure.
    pub catalog: CatalogConfig,
}

/// Configuration for the tracing subscriber installed by the host glue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Install a subscriber when the bridge is first used.
    pub enabled: bool,

    /// Maximum level emitted.
    pub level: Level,

    /// Print event targets.
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: Level::Info,
            with_target: false,
        }
    }
}

/// Configuration for the serialized op catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CatalogConfig {
    /// List ops whose names start with `_`.
    pub include_internal: bool,
}

impl BridgeConfig {
    /// Loads configuration from the given path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str::<BridgeConfig>(contents).map_err(ConfigError::Parse)
    }

    /// Returns the default configuration path (`$HOME/.tfop/config.toml`).
    pub fn default_path() -> Result<PathBuf> {
        let home = home_dir().ok_or(ConfigError::HomeDirMissing)?;
        Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load configuration from `$TFOP_CONFIG`, the nearest project file, or the
    /// global file, in that order. Defaults apply when none exists.
    pub fn load_scoped() -> Result<Self> {
        let explicit = env::var_os(CONFIG_ENV).map(PathBuf::from);
        let cwd = env::current_dir().ok();
        match locate(explicit, cwd.as_deref(), home_dir()) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

/// Picks the configuration file to load.
///
/// An explicit path is returned even if it does not exist, so a typo surfaces as an
/// IO error instead of silently falling back.
fn locate(explicit: Option<PathBuf>, cwd: Option<&Path>, home: Option<PathBuf>) -> Option<PathBuf> {
    if explicit.is_some() {
        return explicit;
    }
    if let Some(path) = cwd.and_then(project_config_path) {
        return Some(path);
    }
    home.map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
        .filter(|path| path.exists())
}

fn project_config_path(cwd: &Path) -> Option<PathBuf> {
    for ancestor in cwd.ancestors() {
        let candidate = ancestor.join(CONFIG_DIR).join(CONFIG_FILE);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

/// Errors that can occur while loading bridge configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO failure when reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unable to determine home directory for default config path")]
    HomeDirMissing,
}
