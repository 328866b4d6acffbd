use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::job::BuildJob;

use super::launch::{LaunchConfig, LaunchError};
use super::project::{Project, ProjectItem};

/// Produces unstarted jobs for the host's build actions.
pub trait Builder: Send + Sync {
    fn build(&self, item: &ProjectItem) -> BuildJob;

    fn clean(&self, item: &ProjectItem) -> BuildJob;

    fn configure(&self, project: &Project) -> BuildJob;

    fn install(&self, item: &ProjectItem, install_prefix: Option<&Path>) -> BuildJob;

    /// Removes all build artifacts of the project.
    fn prune(&self, project: &Project) -> BuildJob;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileManagerFeatures {
    pub files: bool,
    pub folders: bool,
    pub targets: bool,
}

/// Answers the host's project-model questions about build layout.
pub trait FileManager: Send + Sync {
    fn features(&self) -> FileManagerFeatures;

    fn has_build_info(&self, item: &ProjectItem) -> bool;

    fn build_directory(&self, item: &ProjectItem) -> PathBuf;

    fn include_directories(&self, _item: &ProjectItem) -> Vec<PathBuf> {
        Vec::new()
    }

    fn framework_directories(&self, _item: &ProjectItem) -> Vec<PathBuf> {
        Vec::new()
    }

    fn defines(&self, _item: &ProjectItem) -> HashMap<String, String> {
        HashMap::new()
    }

    fn targets(&self, _folder: &ProjectItem) -> Vec<String> {
        Vec::new()
    }

    /// Target editing is not supported unless a manager says otherwise.
    fn add_files_to_target(&self, _files: &[ProjectItem], _target: &str) -> bool {
        false
    }

    fn remove_files_from_targets(&self, _files: &[ProjectItem]) -> bool {
        false
    }
}

/// Describes how the host should run a project's executable.
pub trait LauncherProvider: Send + Sync {
    fn executable(&self, cfg: &LaunchConfig) -> Option<PathBuf>;

    fn arguments(&self, cfg: &LaunchConfig) -> Result<Vec<String>, LaunchError>;

    fn working_directory(&self, cfg: &LaunchConfig) -> PathBuf;

    fn use_terminal(&self, _cfg: &LaunchConfig) -> bool {
        false
    }

    fn native_app_config_type_id(&self) -> &str;
}

pub trait Launcher: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn supported_modes(&self) -> &[&'static str];

    /// Returns `Ok(None)` for modes this launcher does not handle.
    fn start(&self, mode: &str, cfg: &LaunchConfig) -> Result<Option<BuildJob>, LaunchError>;
}

pub trait LaunchConfigurationType: Send + Sync {
    fn type_id(&self) -> &str;

    fn name(&self) -> &str;

    fn launchers(&self) -> &[Arc<dyn Launcher>];

    fn configure_from_item(&self, cfg: &mut LaunchConfig, item: &ProjectItem);
}
