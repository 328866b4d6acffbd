//! Stable re-exports for consumers (`plugins`, `cli`, and host integrations).
//!
//! Prefer importing from `cargo_bridge_core::api` instead of reaching into internal modules.

pub use crate::config::{load_default, AppConfig, LaunchDefaults, LoggingConfig, OutputConfig, OutputFormat};
pub use crate::error::{ConfigError, ErrorKind, JobError};
pub use crate::host::{
    Builder, FileManager, FileManagerFeatures, LaunchConfig, LaunchConfigurationType, LaunchError,
    Launcher, LauncherProvider, PluginRegistry, Project, ProjectItem, EXECUTE_MODE,
};
pub use crate::job::{
    run_build, run_clean, run_configure, run_custom, run_install, run_launch, BuildCommand,
    BuildJob, JobCanceller, JobHandle, JobResult, JobState, FAILED_LINE, FINISHED_LINE, TOOL_NAME,
};
pub use crate::output::{
    classify, drain_into, output_channel, Category, ClassifierState, Location, OutputClassifier,
    OutputItem, OutputLine, OutputRx, OutputSink, OutputTx,
};
pub use crate::process::{
    find_executable, ProcessErrorKind, ProcessEvent, ProcessHandle, ProcessSupervisor,
    TokioSupervisor,
};
