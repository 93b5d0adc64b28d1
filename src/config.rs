//! Configuration loading.
//!
//! Settings live in a small TOML file:
//!
//! ```toml
//! spec_suffix = "Spec"
//! namespace_prefix = "spec"
//! extensions = ["php"]
//! ```
//!
//! The file is looked up in this order, first hit wins:
//!
//!   1. an explicit path (the CLI's `--config`)
//!   2. `phpspec-rewrite.toml` in the working directory
//!   3. `phpspec-rewrite/config.toml` in the user's config directory
//!
//! A missing file means defaults.  A file that exists but cannot be read or
//! parsed is an error.

use std::path::{Path, PathBuf};

use etcetera::BaseStrategy;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::naming::{DEFAULT_SPEC_SUFFIX, SpecNaming};

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "phpspec-rewrite.toml";

/// Directory name inside the user config directory.
const APP_DIR: &str = "phpspec-rewrite";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Class-name suffix marking a specification class.
    pub spec_suffix: String,
    /// When set, only classes in this namespace (or below) are rewritten.
    pub namespace_prefix: Option<String>,
    /// File extensions picked up when walking directories.
    pub extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spec_suffix: DEFAULT_SPEC_SUFFIX.to_string(),
            namespace_prefix: None,
            extensions: vec!["php".to_string()],
        }
    }
}

impl Config {
    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the first config file found, or defaults.
    ///
    /// An explicit path must exist.
    pub fn load(explicit: Option<&Path>, working_dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::discover(working_dir) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// The first existing config file among the implicit locations.
    pub fn discover(working_dir: &Path) -> Option<PathBuf> {
        let local = working_dir.join(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        let user = user_config_path()?;
        user.is_file().then_some(user)
    }

    /// The naming convention described by this config.
    pub fn naming(&self) -> SpecNaming {
        let naming = SpecNaming::suffix(self.spec_suffix.clone());
        match &self.namespace_prefix {
            Some(prefix) => naming.within_namespace(prefix.clone()),
            None => naming,
        }
    }

    /// Whether `path` has one of the configured extensions.
    pub fn wants(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            })
    }
}

/// `<config dir>/phpspec-rewrite/config.toml`, if a home directory exists.
fn user_config_path() -> Option<PathBuf> {
    let strategy = etcetera::choose_base_strategy().ok()?;
    Some(strategy.config_dir().join(APP_DIR).join("config.toml"))
}
