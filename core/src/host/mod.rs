//! Narrow capability interfaces between the host IDE and build-tool plugins,
//! and the registry the host's plugin loader hands to a plugin at load time.
mod launch;
mod project;
mod registry;
mod traits;

pub use launch::{LaunchConfig, LaunchError, EXECUTE_MODE};
pub use project::{Project, ProjectItem};
pub use registry::PluginRegistry;
pub use traits::{
    Builder, FileManager, FileManagerFeatures, LaunchConfigurationType, Launcher,
    LauncherProvider,
};
