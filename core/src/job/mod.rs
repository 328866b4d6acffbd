//! One external build-tool invocation: argument construction, spawn, output
//! relay through the classifier, cancellation and outcome mapping.
mod build_job;
mod command;
mod factory;
mod state;

pub use build_job::{BuildJob, JobCanceller, JobHandle, FAILED_LINE, FINISHED_LINE};
pub use command::{BuildCommand, TOOL_NAME};
pub use factory::{run_build, run_clean, run_configure, run_custom, run_install, run_launch};
pub use state::{JobResult, JobState};
