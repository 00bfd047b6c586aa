//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/ntree/ntree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `NTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{Order, ParseOrderError};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid setting {key}: {message}")]
    Invalid { key: String, message: String },

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Effective settings for the `ntree` command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Traversal order used when none is given on the command line
    pub order: Order,
    /// Separator placed between node names in traversal output
    pub delimiter: String,
    /// Spaces per level in outline files
    pub indent: usize,
    /// Colored terminal output
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            order: Order::BreadthFirst,
            delimiter: "|".into(),
            indent: 2,
            color: true,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub order: Option<Order>,
    pub delimiter: Option<String>,
    pub indent: Option<usize>,
    pub color: Option<bool>,
}

/// Get the XDG config directory for ntree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ntree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("ntree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|e| SettingsError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Missing keys are `None`; present keys that fail to convert are invalid.
fn env_value<V>(key: &str, lookup: Result<V, ConfigError>) -> Result<Option<V>, SettingsError> {
    match lookup {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(invalid(key, e)),
    }
}

fn invalid(key: &str, message: impl std::fmt::Display) -> SettingsError {
    SettingsError::Invalid {
        key: key.into(),
        message: message.to_string(),
    }
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            order: overlay.order.unwrap_or(self.order),
            delimiter: overlay
                .delimiter
                .clone()
                .unwrap_or_else(|| self.delimiter.clone()),
            indent: overlay.indent.unwrap_or(self.indent),
            color: overlay.color.unwrap_or(self.color),
        }
    }

    /// Load settings with layered precedence, using the XDG global config.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_from(global_config_path().as_deref(), explicit)
    }

    /// Load settings from the given global and explicit config files.
    ///
    /// A missing global file is skipped; a missing explicit file is an error.
    #[instrument(level = "debug")]
    pub fn load_from(
        global: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<Self, SettingsError> {
        let mut current = Self::default();

        if let Some(global_path) = global {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading explicit config");
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Apply NTREE_* environment variables as explicit overrides.
    ///
    /// A variable that is set but does not convert is an error, not a no-op.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("NTREE"))
            .build()?;

        if let Some(val) = env_value("order", config.get_string("order"))? {
            settings.order = val
                .parse()
                .map_err(|e: ParseOrderError| invalid("order", e))?;
        }
        if let Some(val) = env_value("delimiter", config.get_string("delimiter"))? {
            settings.delimiter = val;
        }
        if let Some(val) = env_value("indent", config.get_int("indent"))? {
            settings.indent = usize::try_from(val).map_err(|e| invalid("indent", e))?;
        }
        if let Some(val) = env_value("color", config.get_bool("color"))? {
            settings.color = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.indent == 0 {
            return Err(invalid("indent", "must be at least 1"));
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# ntree configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/ntree/ntree.toml
#   Explicit: ntree --config <file>
#   Env:      NTREE_* environment variables

# Traversal order when --order is not given: "breadth-first" (bfs) or "depth-first" (dfs)
order = "breadth-first"

# Separator between node names in traversal output
delimiter = "|"

# Spaces per nesting level in outline files (tabs always count as one level)
indent = 2

# Colored terminal output (NO_COLOR is honored as well)
color = true
"#
        .to_string()
    }
}
