use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A project as known to the host's project model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub root: PathBuf,
}

impl Project {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }

    /// The item for the project's root folder.
    pub fn root_item(&self) -> ProjectItem {
        ProjectItem {
            project: self.clone(),
            path: self.root.clone(),
        }
    }
}

/// A file or folder inside a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItem {
    pub project: Project,
    pub path: PathBuf,
}

impl ProjectItem {
    pub fn new(project: Project, path: impl Into<PathBuf>) -> Self {
        Self {
            project,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
