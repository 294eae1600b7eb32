//! Editor configuration, loaded from TOML.
//!
//! ```toml
//! store_dir = "~/.local/share/ranger"
//! log_filter = "ranger_core=info,ranger_cli=info"
//!
//! [fallback_action]
//! name = "Fold"
//! color = "#f44336"
//!
//! [new_action]
//! name = "New Action"
//! color = "#aabbcc"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Color;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Name and color used when an action is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTemplate {
    pub name: String,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Directory of the file-backed store.
    pub store_dir: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive used by the CLI.
    pub log_filter: String,
    /// The implicit "no decision" action.
    pub fallback_action: ActionTemplate,
    /// Defaults for `add_action`.
    pub new_action: ActionTemplate,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(".ranger"),
            log_filter: "ranger_core=info,ranger_cli=info".to_string(),
            fallback_action: ActionTemplate {
                name: "Fold".to_string(),
                color: Color::from_hex_unchecked("#f44336"),
            },
            new_action: ActionTemplate {
                name: "New Action".to_string(),
                color: Color::from_hex_unchecked("#aabbcc"),
            },
        }
    }
}

impl EditorConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
