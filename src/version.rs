//! Detection of the installed Kedro version.

use crate::constants::tool;
use crate::error::{Error, Result};
use log::debug;
use regex::Regex;
use std::fmt::Display;
use std::process::Command;

/// Commands tried in order until one reports a version.
const DETECTION_COMMANDS: &[(&str, &[&str])] = &[
    ("kedro", &["--version"]),
    ("python3", &["-c", "import importlib.metadata as m; print(m.version('kedro'))"]),
    ("python", &["-c", "import importlib.metadata as m; print(m.version('kedro'))"]),
];

/// Version string of the tool the generated project targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolVersion(String);

impl ToolVersion {
    pub fn new<S: Into<String>>(version: S) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Detects the installed version once for the current invocation.
    ///
    /// The environment override wins, then each detection command is run in turn.
    pub fn detect() -> Result<Self> {
        if let Ok(version) = std::env::var(tool::VERSION_ENV) {
            let version = version.trim();
            if !version.is_empty() {
                debug!("Using {} from {}", version, tool::VERSION_ENV);
                return Ok(Self::new(version));
            }
        }

        for (program, args) in DETECTION_COMMANDS {
            let output = match Command::new(program).args(*args).output() {
                Ok(output) if output.status.success() => output,
                Ok(output) => {
                    debug!("'{program}' exited with {}", output.status);
                    continue;
                }
                Err(e) => {
                    debug!("Could not run '{program}': {e}");
                    continue;
                }
            };
            let stdout = String::from_utf8_lossy(&output.stdout);
            if let Some(version) = parse_version(&stdout) {
                debug!("Detected {} {version} via '{program}'", tool::NAME);
                return Ok(Self::new(version));
            }
        }

        Err(Error::ToolNotInstalled { tool: tool::NAME.to_string() })
    }
}

impl Display for ToolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extracts the first version-looking token from a command's output.
pub fn parse_version(output: &str) -> Option<String> {
    let re = Regex::new(r"\b(\d+\.\d+(?:\.\d+)?(?:[-.+]?[0-9A-Za-z]+)*)\b").ok()?;
    re.captures(output).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_string())
}
