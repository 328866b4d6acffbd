use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::project::Project;

/// The only launch mode build-tool launchers support.
pub const EXECUTE_MODE: &str = "execute";

/// A stored launch configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchConfig {
    pub name: String,
    pub project: Project,

    /// Binary target to run; empty selects the package default.
    #[serde(rename = "CargoIdentifier", default)]
    pub identifier: String,

    /// Passthrough arguments as one shell-style string.
    #[serde(rename = "CargoArguments", default)]
    pub arguments: String,
}

impl LaunchConfig {
    pub fn new(name: impl Into<String>, project: Project) -> Self {
        Self {
            name: name.into(),
            project,
            identifier: String::new(),
            arguments: String::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("cannot parse launch arguments {arguments:?}")]
    BadArguments {
        arguments: String,
        #[source]
        source: shell_words::ParseError,
    },

    #[error("unsupported launch mode: {0}")]
    UnsupportedMode(String),
}
