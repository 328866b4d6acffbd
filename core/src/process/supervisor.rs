use std::path::Path;

use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessErrorKind {
    FailedToStart,
    Crashed,
    Unknown,
}

/// Everything a running child reports. All output lines precede the single
/// terminal event (`Exited` or `Error`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    Stdout(String),
    Stderr(String),
    Exited(i32),
    Error {
        kind: ProcessErrorKind,
        message: String,
    },
}

impl ProcessEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessEvent::Exited(_) | ProcessEvent::Error { .. })
    }
}

/// Owner's view of one spawned process.
pub struct ProcessHandle {
    events: mpsc::UnboundedReceiver<ProcessEvent>,
    kill_tx: Option<oneshot::Sender<()>>,
}

impl ProcessHandle {
    pub fn new(
        events: mpsc::UnboundedReceiver<ProcessEvent>,
        kill_tx: oneshot::Sender<()>,
    ) -> Self {
        Self {
            events,
            kill_tx: Some(kill_tx),
        }
    }

    pub async fn next_event(&mut self) -> Option<ProcessEvent> {
        self.events.recv().await
    }

    /// Requests termination. Returns false if a kill was already requested or
    /// the process is gone. The exit is still reported through the events.
    pub fn kill(&mut self) -> bool {
        match self.kill_tx.take() {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }
}

pub trait ProcessSupervisor: Send + Sync {
    /// Spawns `program` in `cwd`. Spawn failures are reported as an
    /// `Error { kind: FailedToStart, .. }` event on the returned handle.
    ///
    /// Must be called from within a Tokio runtime.
    fn spawn(&self, program: &Path, args: &[String], cwd: &Path) -> ProcessHandle;
}
