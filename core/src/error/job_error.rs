use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Terminal failure reasons of a build job. None of them are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The caller supplied no tool command.
    NoCommand,
    /// The process could not be spawned, e.g. the tool is missing.
    FailedToStart,
    /// The process terminated abnormally.
    Crashed,
    UnknownExecError,
    /// The process ran and exited non-zero; its diagnostics are already in
    /// the output.
    FailedShownError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NoCommand => "no_command",
            ErrorKind::FailedToStart => "failed_to_start",
            ErrorKind::Crashed => "crashed",
            ErrorKind::UnknownExecError => "unknown_exec_error",
            ErrorKind::FailedShownError => "failed_shown_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct JobError {
    pub kind: ErrorKind,
    pub message: String,
}

impl JobError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn no_command() -> Self {
        Self::new(ErrorKind::NoCommand, "No Cargo command specified")
    }

    pub fn failed_to_start(detail: &str) -> Self {
        Self::new(
            ErrorKind::FailedToStart,
            with_detail("Failed to start command.", detail),
        )
    }

    pub fn crashed(detail: &str) -> Self {
        Self::new(ErrorKind::Crashed, with_detail("Command crashed.", detail))
    }

    pub fn unknown(detail: &str) -> Self {
        Self::new(
            ErrorKind::UnknownExecError,
            with_detail("Unknown error executing command.", detail),
        )
    }

    /// Non-zero exit. The diagnostics were shown, so the text stays empty.
    pub fn failed_shown() -> Self {
        Self::new(ErrorKind::FailedShownError, "")
    }
}

fn with_detail(headline: &str, detail: &str) -> String {
    if detail.trim().is_empty() {
        headline.to_string()
    } else {
        format!("{headline} ({})", detail.trim())
    }
}
