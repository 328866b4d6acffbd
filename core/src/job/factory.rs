//! Constructors for the jobs the host asks for.
use std::path::Path;

use super::build_job::BuildJob;
use super::command::BuildCommand;

pub fn run_build(project_root: &Path) -> BuildJob {
    BuildJob::new(BuildCommand::Build, project_root)
}

pub fn run_clean(project_root: &Path) -> BuildJob {
    BuildJob::new(BuildCommand::Clean, project_root)
}

/// Configure-only job. It carries no tool command and fails with
/// `NoCommand` without spawning anything.
pub fn run_configure(project_root: &Path) -> BuildJob {
    BuildJob::new(BuildCommand::Configure, project_root)
}

pub fn run_install(project_root: &Path, install_prefix: Option<&Path>) -> BuildJob {
    let job = BuildJob::new(BuildCommand::Install, project_root);
    match install_prefix {
        Some(prefix) => job.with_install_prefix(prefix),
        None => job,
    }
}

/// `run` with arguments already derived from a launch configuration
/// (`--bin <name>`, `-- <passthrough>`).
pub fn run_launch(project_root: &Path, run_arguments: Vec<String>) -> BuildJob {
    BuildJob::new(BuildCommand::Run, project_root).with_extra_arguments(run_arguments)
}

pub fn run_custom(project_root: &Path, command: &str, args: Vec<String>) -> BuildJob {
    BuildJob::new(BuildCommand::from(command), project_root).with_extra_arguments(args)
}
