use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::Instrument;
use uuid::Uuid;

use crate::error::JobError;
use crate::output::{OutputClassifier, OutputLine, OutputTx};
use crate::process::{
    find_executable, ProcessErrorKind, ProcessEvent, ProcessHandle, ProcessSupervisor,
    TokioSupervisor,
};

use super::command::{BuildCommand, TOOL_NAME};
use super::state::{JobResult, JobState};

pub const FINISHED_LINE: &str = "*** Finished ***";
pub const FAILED_LINE: &str = "*** Failed ***";

/// A not yet started tool invocation.
#[derive(Debug, Clone)]
pub struct BuildJob {
    id: Uuid,
    command: BuildCommand,
    working_dir: PathBuf,
    install_prefix: Option<PathBuf>,
    extra_args: Vec<String>,
}

impl BuildJob {
    pub fn new(command: BuildCommand, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            id: Uuid::new_v4(),
            command,
            working_dir: working_dir.into(),
            install_prefix: None,
            extra_args: Vec::new(),
        }
    }

    /// Appended as `--root <prefix>` right after the command.
    pub fn with_install_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.install_prefix = Some(prefix.into());
        self
    }

    pub fn with_extra_arguments(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn command(&self) -> &BuildCommand {
        &self.command
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn title(&self) -> String {
        format!("{TOOL_NAME} {}", self.command)
    }

    /// Tool argv without the program, or `None` when there is no command.
    pub fn arguments(&self) -> Option<Vec<String>> {
        let command = self.command.as_arg()?;
        let mut args = vec![command.to_string()];
        if let Some(prefix) = &self.install_prefix {
            args.push("--root".to_string());
            args.push(prefix.to_string_lossy().into_owned());
        }
        args.extend(self.extra_args.iter().cloned());
        Some(args)
    }

    /// `<dir>> cargo <args>` with arguments quoted so the line can be pasted
    /// into a shell.
    pub fn echo_line(&self, args: &[String]) -> String {
        format!(
            "{}> {} {}",
            self.working_dir.display(),
            TOOL_NAME,
            shell_words::join(args)
        )
    }

    /// Starts the job with the OS process supervisor. Must be called from
    /// within a Tokio runtime.
    pub fn start(self, output: OutputTx) -> JobHandle {
        self.start_with(&TokioSupervisor, output)
    }

    /// Spawns the tool and returns immediately; the outcome is delivered
    /// through the handle.
    pub fn start_with(self, supervisor: &dyn ProcessSupervisor, output: OutputTx) -> JobHandle {
        let title = self.title();
        let (state_tx, state_rx) = watch::channel(JobState::Created);
        let (result_tx, result_rx) = oneshot::channel();
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let killed = Arc::new(AtomicBool::new(false));

        let handle = JobHandle {
            id: self.id,
            title,
            state_rx,
            result_rx,
            canceller: JobCanceller {
                killed: killed.clone(),
                control_tx,
            },
        };

        let Some(args) = self.arguments() else {
            tracing::warn!(job.id = %self.id, "no tool command specified");
            let result = JobResult::failed(JobError::no_command(), None);
            state_tx.send_replace(result.state);
            let _ = result_tx.send(result);
            return handle;
        };

        output.send(OutputLine::Echo {
            text: self.echo_line(&args),
        });

        let program = find_executable(TOOL_NAME).unwrap_or_else(|| PathBuf::from(TOOL_NAME));
        let process = supervisor.spawn(&program, &args, &self.working_dir);
        state_tx.send_replace(JobState::Running);

        let span = tracing::info_span!(
            "job",
            job.id = %self.id,
            job.command = %self.command,
        );
        tracing::info!(parent: &span, cwd = %self.working_dir.display(), ?args, "job started");

        let driver = JobDriver {
            process,
            classifier: OutputClassifier::with_base_dir(&self.working_dir),
            output,
            control_rx,
            killed,
            state_tx,
        };
        tokio::spawn(
            async move {
                let result = driver.run().await;
                let _ = result_tx.send(result);
            }
            .instrument(span),
        );

        handle
    }
}

enum JobControl {
    Kill,
}

/// Cloneable cancellation side of a running job.
#[derive(Clone)]
pub struct JobCanceller {
    killed: Arc<AtomicBool>,
    control_tx: mpsc::UnboundedSender<JobControl>,
}

impl JobCanceller {
    /// Requests termination. Always accepted; the final `Killed` state is
    /// reported once the process is gone.
    pub fn cancel(&self) -> bool {
        self.killed.store(true, Ordering::SeqCst);
        let _ = self.control_tx.send(JobControl::Kill);
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.killed.load(Ordering::SeqCst)
    }
}

/// Host-side view of a started job.
pub struct JobHandle {
    id: Uuid,
    title: String,
    state_rx: watch::Receiver<JobState>,
    result_rx: oneshot::Receiver<JobResult>,
    canceller: JobCanceller,
}

impl JobHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> JobState {
        *self.state_rx.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<JobState> {
        self.state_rx.clone()
    }

    pub fn cancel(&self) -> bool {
        self.canceller.cancel()
    }

    pub fn canceller(&self) -> JobCanceller {
        self.canceller.clone()
    }

    pub async fn wait(self) -> JobResult {
        match self.result_rx.await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(job.id = %self.id, "job driver dropped without a result");
                JobResult::failed(JobError::unknown("job driver stopped"), None)
            }
        }
    }
}

struct JobDriver {
    process: ProcessHandle,
    classifier: OutputClassifier,
    output: OutputTx,
    control_rx: mpsc::UnboundedReceiver<JobControl>,
    killed: Arc<AtomicBool>,
    state_tx: watch::Sender<JobState>,
}

enum Outcome {
    Exited(i32),
    Error(ProcessErrorKind, String),
}

impl JobDriver {
    async fn run(mut self) -> JobResult {
        let outcome = loop {
            tokio::select! {
                biased;

                Some(JobControl::Kill) = self.control_rx.recv() => {
                    if self.process.kill() {
                        tracing::info!("kill requested");
                    }
                }

                event = self.process.next_event() => match event {
                    Some(ProcessEvent::Stdout(line)) | Some(ProcessEvent::Stderr(line)) => {
                        let item = self.classifier.classify(&line);
                        self.output.send(OutputLine::Item(item));
                    }
                    Some(ProcessEvent::Exited(code)) => break Outcome::Exited(code),
                    Some(ProcessEvent::Error { kind, message }) => break Outcome::Error(kind, message),
                    None => {
                        break Outcome::Error(
                            ProcessErrorKind::Unknown,
                            "process event stream closed".to_string(),
                        )
                    }
                },
            }
        };

        let result = self.finish(outcome);
        self.state_tx.send_replace(result.state);
        result
    }

    fn finish(&self, outcome: Outcome) -> JobResult {
        if self.killed.load(Ordering::SeqCst) {
            tracing::info!("job killed");
            return JobResult::killed();
        }

        match outcome {
            Outcome::Exited(0) => {
                self.emit_status(FINISHED_LINE);
                tracing::info!(exit_code = 0, "job finished");
                JobResult::succeeded()
            }
            Outcome::Exited(code) => {
                self.emit_status(FAILED_LINE);
                tracing::info!(exit_code = code, "job failed");
                JobResult::failed(JobError::failed_shown(), Some(code))
            }
            Outcome::Error(kind, message) => {
                let error = match kind {
                    ProcessErrorKind::FailedToStart => JobError::failed_to_start(&message),
                    ProcessErrorKind::Crashed => JobError::crashed(&message),
                    ProcessErrorKind::Unknown => JobError::unknown(&message),
                };
                tracing::warn!(error.kind = %error.kind, error.message = %error.message, "job failed");
                JobResult::failed(error, None)
            }
        }
    }

    fn emit_status(&self, text: &str) {
        self.output.send(OutputLine::Echo {
            text: text.to_string(),
        });
    }
}
