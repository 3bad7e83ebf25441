//! User configuration shared with Cookiecutter (`~/.cookiecutterrc`).

use crate::constants::{USER_CONFIG_ENV, USER_CONFIG_FILENAME};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Abbreviations available without any user configuration.
const DEFAULT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("gh", "https://github.com/{0}.git"),
    ("gl", "https://gitlab.com/{0}.git"),
    ("bb", "https://bitbucket.org/{0}"),
];

#[derive(Debug, Default, Deserialize)]
struct RawUserConfig {
    #[serde(default)]
    default_context: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    abbreviations: IndexMap<String, String>,
}

/// Settings read from the user's configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct UserConfig {
    /// Defaults that replace template-declared defaults when prompting.
    pub default_context: IndexMap<String, serde_json::Value>,
    /// Template source shorthands, e.g. `gh` for GitHub.
    pub abbreviations: IndexMap<String, String>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            default_context: IndexMap::new(),
            abbreviations: DEFAULT_ABBREVIATIONS
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        }
    }
}

impl UserConfig {
    /// Loads the configuration from `$COOKIECUTTER_CONFIG`, then `~/.cookiecutterrc`.
    ///
    /// A missing default file yields the built-in defaults; an explicitly configured
    /// file that cannot be read is an error.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(USER_CONFIG_ENV) {
            return Self::from_file(PathBuf::from(path));
        }

        match dirs::home_dir().map(|home| home.join(USER_CONFIG_FILENAME)) {
            Some(path) if path.exists() => Self::from_file(path),
            _ => {
                debug!("No user config found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::UserConfigError {
            path: path.display().to_string(),
            e: e.to_string(),
        })?;
        Self::from_yaml_str(&content).map_err(|e| Error::UserConfigError {
            path: path.display().to_string(),
            e: e.to_string(),
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let raw: Option<RawUserConfig> = serde_yaml::from_str(content)?;
        let raw = raw.unwrap_or_default();

        let mut config = Self { default_context: raw.default_context, ..Self::default() };
        config.abbreviations.extend(raw.abbreviations);
        Ok(config)
    }

    /// Expands an abbreviated template source (`gh:owner/repo`).
    pub fn expand_abbreviations(&self, template: &str) -> String {
        if let Some(expansion) = self.abbreviations.get(template) {
            return expansion.clone();
        }

        if let Some((prefix, rest)) = template.split_once(':') {
            if let Some(expansion) = self.abbreviations.get(prefix) {
                return expansion.replace("{0}", rest);
            }
        }

        template.to_string()
    }
}
