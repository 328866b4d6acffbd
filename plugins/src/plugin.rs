use std::path::{Path, PathBuf};
use std::sync::Arc;

use cargo_bridge_core::api::{
    find_executable, run_build, run_clean, run_configure, run_install, BuildJob, Builder,
    FileManager, FileManagerFeatures, LaunchConfig, LaunchError, LauncherProvider, Project,
    ProjectItem, TOOL_NAME,
};

use crate::launch::{self, CargoExecutionConfigType, CONFIG_TYPE_ID};

/// The one object the host talks to for Cargo projects.
///
/// Jobs always run in the project root, which is also the build directory;
/// Cargo keeps its own artifacts under `target/`.
pub struct CargoPlugin {
    config_type: Arc<CargoExecutionConfigType>,
}

impl CargoPlugin {
    pub fn new() -> Self {
        Self {
            config_type: Arc::new(CargoExecutionConfigType::new()),
        }
    }

    pub fn config_type(&self) -> Arc<CargoExecutionConfigType> {
        self.config_type.clone()
    }
}

impl Default for CargoPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder for CargoPlugin {
    fn build(&self, item: &ProjectItem) -> BuildJob {
        run_build(&item.project.root)
    }

    fn clean(&self, item: &ProjectItem) -> BuildJob {
        run_clean(&item.project.root)
    }

    fn configure(&self, project: &Project) -> BuildJob {
        run_configure(&project.root)
    }

    fn install(&self, item: &ProjectItem, install_prefix: Option<&Path>) -> BuildJob {
        run_install(&item.project.root, install_prefix)
    }

    fn prune(&self, project: &Project) -> BuildJob {
        self.clean(&project.root_item())
    }
}

impl FileManager for CargoPlugin {
    fn features(&self) -> FileManagerFeatures {
        FileManagerFeatures {
            files: true,
            folders: true,
            targets: false,
        }
    }

    fn has_build_info(&self, _item: &ProjectItem) -> bool {
        false
    }

    fn build_directory(&self, item: &ProjectItem) -> PathBuf {
        item.project.root.clone()
    }
}

impl LauncherProvider for CargoPlugin {
    fn executable(&self, _cfg: &LaunchConfig) -> Option<PathBuf> {
        find_executable(TOOL_NAME)
    }

    fn arguments(&self, cfg: &LaunchConfig) -> Result<Vec<String>, LaunchError> {
        launch::arguments(cfg)
    }

    fn working_directory(&self, cfg: &LaunchConfig) -> PathBuf {
        cfg.project.root.clone()
    }

    fn native_app_config_type_id(&self) -> &str {
        CONFIG_TYPE_ID
    }
}
