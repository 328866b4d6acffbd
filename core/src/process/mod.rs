//! Process supervisor primitive: spawn a child, relay its output lines and
//! report how it ended as a single event stream.
mod child;
mod exit;
mod supervisor;
mod tee;

use std::path::PathBuf;

pub use child::TokioSupervisor;
pub use exit::{classify_exit, Termination};
pub use supervisor::{ProcessErrorKind, ProcessEvent, ProcessHandle, ProcessSupervisor};

/// Resolves `name` through the executable search path.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    match which::which(name) {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::debug!(program = name, error = %e, "executable not found on PATH");
            None
        }
    }
}
