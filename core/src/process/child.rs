use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::exit::{classify_exit, Termination};
use super::supervisor::{ProcessErrorKind, ProcessEvent, ProcessHandle, ProcessSupervisor};
use super::tee::pump_lines;

/// Output still buffered in pipes held open by grandchildren is abandoned
/// after this long once the child itself was killed.
const KILLED_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Same bound after a normal exit. The exit is reported once the pipes close
/// or this elapses, whichever comes first.
const EXITED_DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Spawns real OS processes with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSupervisor;

impl ProcessSupervisor for TokioSupervisor {
    fn spawn(&self, program: &Path, args: &[String], cwd: &Path) -> ProcessHandle {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (kill_tx, kill_rx) = oneshot::channel();

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match cmd.spawn() {
            Ok(child) => {
                tracing::debug!(
                    program = %program.display(),
                    pid = child.id().unwrap_or_default(),
                    "child spawned"
                );
                tokio::spawn(supervise(child, event_tx, kill_rx));
            }
            Err(e) => {
                tracing::warn!(program = %program.display(), error = %e, "spawn failed");
                let _ = event_tx.send(ProcessEvent::Error {
                    kind: ProcessErrorKind::FailedToStart,
                    message: e.to_string(),
                });
            }
        }

        ProcessHandle::new(event_rx, kill_tx)
    }
}

async fn supervise(
    mut child: Child,
    tx: mpsc::UnboundedSender<ProcessEvent>,
    kill_rx: oneshot::Receiver<()>,
) {
    let mut kill_rx = Some(kill_rx);
    let mut pumps: Vec<JoinHandle<()>> = [
        child
            .stdout
            .take()
            .map(|s| pump_lines(s, tx.clone(), "stdout", ProcessEvent::Stdout)),
        child
            .stderr
            .take()
            .map(|s| pump_lines(s, tx.clone(), "stderr", ProcessEvent::Stderr)),
    ]
    .into_iter()
    .flatten()
    .collect();

    let (status, killed) = {
        let wait_fut = child.wait();
        tokio::pin!(wait_fut);
        tokio::select! {
            res = &mut wait_fut => (Some(res), false),
            () = kill_requested(&mut kill_rx) => (None, true),
        }
    };

    let status = match status {
        Some(res) => res,
        None => {
            if let Err(e) = child.start_kill() {
                tracing::warn!(error = %e, "kill request failed");
            }
            child.wait().await
        }
    };

    // The child is gone, but descendants may still hold the pipes open.
    let grace = if killed {
        KILLED_DRAIN_GRACE
    } else {
        EXITED_DRAIN_GRACE
    };
    let drained = tokio::select! {
        _ = drain(&mut pumps) => true,
        _ = tokio::time::sleep(grace) => false,
        () = kill_requested(&mut kill_rx) => {
            tracing::debug!("kill requested while draining output");
            false
        }
    };
    if !drained {
        tracing::debug!("output pipes still open, abandoning drain");
        for task in &pumps {
            task.abort();
        }
        drain(&mut pumps).await;
    }

    let event = match status {
        Ok(status) => match classify_exit(status) {
            Termination::Code(code) => ProcessEvent::Exited(code),
            Termination::Signal(sig) => ProcessEvent::Error {
                kind: ProcessErrorKind::Crashed,
                message: format!("terminated by signal {sig}"),
            },
            Termination::Unknown => ProcessEvent::Error {
                kind: ProcessErrorKind::Crashed,
                message: format!("abnormal termination: {status}"),
            },
        },
        Err(e) => ProcessEvent::Error {
            kind: ProcessErrorKind::Unknown,
            message: e.to_string(),
        },
    };
    let _ = tx.send(event);
}

/// Waits for the pump tasks still running. Lines they relay all precede the
/// terminal event.
async fn drain(pumps: &mut [JoinHandle<()>]) {
    for task in pumps.iter_mut() {
        if !task.is_finished() {
            let _ = task.await;
        }
    }
}

/// Resolves once a kill is requested. Never resolves if the handle was
/// dropped without asking, or after the request was already consumed.
async fn kill_requested(rx: &mut Option<oneshot::Receiver<()>>) {
    if let Some(inner) = rx.as_mut() {
        let requested = inner.await.is_ok();
        *rx = None;
        if requested {
            return;
        }
    }
    std::future::pending::<()>().await
}
