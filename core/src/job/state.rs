use std::fmt;

use serde::Serialize;

use crate::error::{ErrorKind, JobError};

/// Lifecycle of a job. `Running` is entered once; the terminal states are
/// final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Created,
    Running,
    Succeeded,
    Failed,
    Killed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Succeeded | JobState::Failed | JobState::Killed
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Created => "created",
            JobState::Running => "running",
            JobState::Succeeded => "succeeded",
            JobState::Failed => "failed",
            JobState::Killed => "killed",
        };
        f.write_str(s)
    }
}

/// Final outcome of a job, reported exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobResult {
    pub state: JobState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JobError>,
    /// Exit code of the tool, when it exited normally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl JobResult {
    pub fn succeeded() -> Self {
        Self {
            state: JobState::Succeeded,
            error: None,
            exit_code: Some(0),
        }
    }

    pub fn failed(error: JobError, exit_code: Option<i32>) -> Self {
        Self {
            state: JobState::Failed,
            error: Some(error),
            exit_code,
        }
    }

    pub fn killed() -> Self {
        Self {
            state: JobState::Killed,
            error: None,
            exit_code: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.state == JobState::Succeeded
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}
