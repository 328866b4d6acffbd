//! End-to-end tests of the build job lifecycle against scripted and real
//! processes.
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use cargo_bridge_core::api::{
    output_channel, run_build, run_configure, run_install, BuildCommand, BuildJob, Category,
    ErrorKind, JobState, OutputLine, OutputRx, ProcessErrorKind, ProcessEvent, ProcessHandle,
    ProcessSupervisor, FAILED_LINE, FINISHED_LINE,
};
use pretty_assertions::assert_eq;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Spawned {
    program: PathBuf,
    args: Vec<String>,
    cwd: PathBuf,
}

/// Replays a fixed event list. With `on_kill` set, the process stays alive
/// after the list until killed and then reports that event.
#[derive(Default)]
struct Scripted {
    events: Vec<ProcessEvent>,
    on_kill: Option<ProcessEvent>,
    spawned: Arc<Mutex<Vec<Spawned>>>,
}

impl Scripted {
    fn new(events: Vec<ProcessEvent>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    fn until_killed(events: Vec<ProcessEvent>, on_kill: ProcessEvent) -> Self {
        Self {
            events,
            on_kill: Some(on_kill),
            ..Self::default()
        }
    }

    fn spawned(&self) -> Vec<Spawned> {
        self.spawned.lock().unwrap().clone()
    }
}

impl ProcessSupervisor for Scripted {
    fn spawn(&self, program: &Path, args: &[String], cwd: &Path) -> ProcessHandle {
        self.spawned.lock().unwrap().push(Spawned {
            program: program.to_path_buf(),
            args: args.to_vec(),
            cwd: cwd.to_path_buf(),
        });

        let (tx, rx) = mpsc::unbounded_channel();
        let (kill_tx, kill_rx) = oneshot::channel::<()>();
        for ev in &self.events {
            tx.send(ev.clone()).unwrap();
        }
        if let Some(on_kill) = self.on_kill.clone() {
            tokio::spawn(async move {
                if kill_rx.await.is_ok() {
                    let _ = tx.send(on_kill);
                }
            });
        }
        ProcessHandle::new(rx, kill_tx)
    }
}

fn out(line: &str) -> ProcessEvent {
    ProcessEvent::Stdout(line.to_string())
}

fn err(line: &str) -> ProcessEvent {
    ProcessEvent::Stderr(line.to_string())
}

async fn collect(mut rx: OutputRx) -> Vec<OutputLine> {
    let mut lines = Vec::new();
    while let Some(line) = rx.recv().await {
        lines.push(line);
    }
    lines
}

fn texts(lines: &[OutputLine]) -> Vec<&str> {
    lines.iter().map(|l| l.text()).collect()
}

#[tokio::test]
async fn successful_build_finishes_with_status_line() {
    let supervisor = Scripted::new(vec![
        err("   Compiling demo v0.1.0 (/work/demo)"),
        err("    Finished dev [unoptimized + debuginfo] target(s) in 0.40s"),
        ProcessEvent::Exited(0),
    ]);
    let (tx, rx) = output_channel();
    let handle = run_build(Path::new("/work/demo")).start_with(&supervisor, tx);
    assert_eq!(handle.title(), "cargo build");
    let state = handle.subscribe_state();

    let result = handle.wait().await;
    let lines = collect(rx).await;

    assert_eq!(result.state, JobState::Succeeded);
    assert_eq!(result.error, None);
    assert_eq!(*state.borrow(), JobState::Succeeded);
    assert_eq!(
        texts(&lines),
        vec![
            "/work/demo> cargo build",
            "   Compiling demo v0.1.0 (/work/demo)",
            "    Finished dev [unoptimized + debuginfo] target(s) in 0.40s",
            FINISHED_LINE,
        ]
    );
    assert_eq!(lines[1].item().unwrap().category, Category::Action);
    assert!(matches!(lines.last(), Some(OutputLine::Echo { .. })));

    let spawned = supervisor.spawned();
    assert_eq!(spawned.len(), 1);
    assert_eq!(spawned[0].args, vec!["build".to_string()]);
    assert_eq!(spawned[0].cwd, PathBuf::from("/work/demo"));
}

#[tokio::test]
async fn non_zero_exit_is_failed_shown_error() {
    let supervisor = Scripted::new(vec![
        err("error[E0425]: cannot find value `y` in this scope"),
        err(" --> src/main.rs:3:13"),
        err("  |"),
        err("3 |     let x = y;"),
        err("  |             ^ not found in this scope"),
        err("error: could not compile `demo` due to previous error"),
        ProcessEvent::Exited(101),
    ]);
    let (tx, rx) = output_channel();
    let result = run_build(Path::new("/work/demo"))
        .start_with(&supervisor, tx)
        .wait()
        .await;
    let lines = collect(rx).await;

    assert_eq!(result.state, JobState::Failed);
    assert_eq!(result.error_kind(), Some(ErrorKind::FailedShownError));
    assert_eq!(result.exit_code, Some(101));
    assert_eq!(lines.last().unwrap().text(), FAILED_LINE);

    let location = lines[2].item().unwrap();
    assert_eq!(location.category, Category::Error);
    let loc = location.location.as_ref().unwrap();
    assert_eq!(loc.path, PathBuf::from("/work/demo/src/main.rs"));
    assert_eq!((loc.line, loc.column), (Some(2), Some(12)));

    let context = lines[4].item().unwrap();
    assert_eq!(context.category, Category::Information);
    assert!(context.activatable);
    assert_eq!(context.location.as_ref().unwrap().line, Some(2));
    assert_eq!(context.location.as_ref().unwrap().column, Some(4));
}

#[tokio::test]
async fn cancel_suppresses_crash() {
    let supervisor = Scripted::until_killed(
        vec![out("   Compiling demo v0.1.0")],
        ProcessEvent::Error {
            kind: ProcessErrorKind::Crashed,
            message: "terminated by signal 9".into(),
        },
    );
    let (tx, rx) = output_channel();
    let handle = run_build(Path::new("/work/demo")).start_with(&supervisor, tx);
    assert_eq!(handle.state(), JobState::Running);
    assert!(handle.cancel());

    let result = handle.wait().await;
    let lines = collect(rx).await;

    assert_eq!(result.state, JobState::Killed);
    assert_eq!(result.error, None);
    assert!(!texts(&lines).contains(&FAILED_LINE));
    assert!(!texts(&lines).contains(&FINISHED_LINE));
}

#[tokio::test]
async fn cancel_wins_over_clean_exit() {
    let supervisor = Scripted::until_killed(vec![], ProcessEvent::Exited(0));
    let (tx, _rx) = output_channel();
    let handle = run_build(Path::new("/w")).start_with(&supervisor, tx);
    let canceller = handle.canceller();
    assert!(canceller.cancel());
    assert!(canceller.is_cancelled());
    assert!(handle.cancel());

    let result = handle.wait().await;
    assert_eq!(result.state, JobState::Killed);
    assert_eq!(result.error, None);
}

#[tokio::test]
async fn configure_fails_without_spawning() {
    let supervisor = Scripted::new(vec![ProcessEvent::Exited(0)]);
    let (tx, rx) = output_channel();
    let handle = run_configure(Path::new("/work/demo")).start_with(&supervisor, tx);
    assert_eq!(handle.state(), JobState::Failed);
    assert!(handle.cancel());

    let result = handle.wait().await;
    assert_eq!(result.state, JobState::Failed);
    assert_eq!(result.error_kind(), Some(ErrorKind::NoCommand));
    assert_eq!(result.error.unwrap().message, "No Cargo command specified");
    assert!(supervisor.spawned().is_empty());
    assert!(collect(rx).await.is_empty());
}

#[tokio::test]
async fn process_errors_map_to_error_kinds() {
    let cases = [
        (ProcessErrorKind::FailedToStart, ErrorKind::FailedToStart),
        (ProcessErrorKind::Crashed, ErrorKind::Crashed),
        (ProcessErrorKind::Unknown, ErrorKind::UnknownExecError),
    ];
    for (process_kind, job_kind) in cases {
        let supervisor = Scripted::new(vec![ProcessEvent::Error {
            kind: process_kind,
            message: "boom".into(),
        }]);
        let (tx, rx) = output_channel();
        let result = run_build(Path::new("/w"))
            .start_with(&supervisor, tx)
            .wait()
            .await;
        let lines = collect(rx).await;

        assert_eq!(result.state, JobState::Failed);
        assert_eq!(result.error_kind(), Some(job_kind));
        assert!(result.error.unwrap().message.contains("boom"));
        assert_eq!(texts(&lines), vec!["/w> cargo build"]);
    }
}

#[tokio::test]
async fn closed_event_stream_is_unknown_error() {
    struct Vanishing;
    impl ProcessSupervisor for Vanishing {
        fn spawn(&self, _: &Path, _: &[String], _: &Path) -> ProcessHandle {
            let (_tx, rx) = mpsc::unbounded_channel();
            let (kill_tx, _) = oneshot::channel();
            ProcessHandle::new(rx, kill_tx)
        }
    }

    let (tx, _rx) = output_channel();
    let result = run_build(Path::new("/w")).start_with(&Vanishing, tx).wait().await;
    assert_eq!(result.error_kind(), Some(ErrorKind::UnknownExecError));
}

#[tokio::test]
async fn install_passes_root_and_extra_arguments() {
    let supervisor = Scripted::new(vec![ProcessEvent::Exited(0)]);
    let (tx, rx) = output_channel();
    let job = run_install(Path::new("/work/demo"), Some(Path::new("/opt/my tools")))
        .with_extra_arguments(vec!["--path".into(), ".".into()]);
    job.start_with(&supervisor, tx).wait().await;

    assert_eq!(
        supervisor.spawned()[0].args,
        vec!["install", "--root", "/opt/my tools", "--path", "."]
    );
    let lines = collect(rx).await;
    assert_eq!(
        lines[0].text(),
        "/work/demo> cargo install --root '/opt/my tools' --path ."
    );
}

#[tokio::test]
async fn parallel_jobs_do_not_share_classifier_state() {
    let a = Scripted::new(vec![
        err("error: a"),
        err("--> src/a.rs:1:1"),
        ProcessEvent::Exited(101),
    ]);
    let b = Scripted::new(vec![out("5 | let b = 1;"), ProcessEvent::Exited(0)]);

    let (tx_a, rx_a) = output_channel();
    let (tx_b, rx_b) = output_channel();
    let ha = run_build(Path::new("/a")).start_with(&a, tx_a);
    let hb = BuildJob::new(BuildCommand::Run, "/b").start_with(&b, tx_b);
    let (ra, rb) = tokio::join!(ha.wait(), hb.wait());
    assert_eq!(ra.state, JobState::Failed);
    assert_eq!(rb.state, JobState::Succeeded);

    let lines_b = collect(rx_b).await;
    let context = lines_b[1].item().unwrap();
    assert_eq!(context.category, Category::Information);
    assert!(context.location.is_none());

    let lines_a = collect(rx_a).await;
    assert_eq!(
        lines_a[2].item().unwrap().location.as_ref().unwrap().path,
        PathBuf::from("/a/src/a.rs")
    );
}

#[cfg(unix)]
mod real_process {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    use cargo_bridge_core::api::TokioSupervisor;

    const FINISH_WITHIN: Duration = Duration::from_secs(4);

    /// Runs `sh -c <script>` in place of the build tool.
    struct Shim(&'static str);

    impl ProcessSupervisor for Shim {
        fn spawn(&self, _program: &Path, _args: &[String], cwd: &Path) -> ProcessHandle {
            TokioSupervisor.spawn(
                Path::new("sh"),
                &["-c".to_string(), self.0.to_string()],
                cwd,
            )
        }
    }

    #[tokio::test]
    async fn streams_real_output_and_maps_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let shim = Shim("echo 'error[E0308]: mismatched types' 1>&2; echo ' --> src/lib.rs:7:2' 1>&2; exit 101");
        let (tx, rx) = output_channel();
        let result = run_build(dir.path()).start_with(&shim, tx).wait().await;
        let lines = collect(rx).await;

        assert_eq!(result.error_kind(), Some(ErrorKind::FailedShownError));
        assert_eq!(result.exit_code, Some(101));
        assert_eq!(lines.len(), 4);
        let loc = lines[2].item().unwrap().location.clone().unwrap();
        assert_eq!(loc.path, dir.path().join("src/lib.rs"));
        assert_eq!(loc.line, Some(6));
        assert_eq!(lines[3].text(), FAILED_LINE);
    }

    #[tokio::test]
    async fn cancelling_a_real_process_reports_killed() {
        let dir = tempfile::tempdir().unwrap();
        let shim = Shim("echo started; exec sleep 30");
        let (tx, mut rx) = output_channel();
        let handle = run_build(dir.path()).start_with(&shim, tx);

        // Wait for the echo line and the first output line.
        rx.recv().await.unwrap();
        assert_eq!(rx.recv().await.unwrap().text(), "started");
        assert!(handle.cancel());

        let result = handle.wait().await;
        assert_eq!(result.state, JobState::Killed);
        assert_eq!(result.error, None);
    }

    #[tokio::test]
    async fn background_descendant_does_not_hold_the_job_open() {
        let dir = tempfile::tempdir().unwrap();
        let shim = Shim("sleep 8 & echo hi; exit 0");
        let (tx, rx) = output_channel();
        let handle = run_build(dir.path()).start_with(&shim, tx);

        let result = tokio::time::timeout(FINISH_WITHIN, handle.wait())
            .await
            .expect("job should finish when the tool exits");
        assert_eq!(result.state, JobState::Succeeded);
        assert_eq!(result.error, None);

        let lines = collect(rx).await;
        assert_eq!(&texts(&lines)[1..], &["hi", FINISHED_LINE]);
    }

    #[tokio::test]
    async fn cancel_is_honoured_while_descendant_holds_pipes() {
        let dir = tempfile::tempdir().unwrap();
        let shim = Shim("sleep 8 & echo hi; exit 0");
        let (tx, mut rx) = output_channel();
        let handle = run_build(dir.path()).start_with(&shim, tx);

        rx.recv().await.unwrap();
        assert_eq!(rx.recv().await.unwrap().text(), "hi");
        assert!(handle.cancel());

        let result = tokio::time::timeout(FINISH_WITHIN, handle.wait())
            .await
            .expect("cancelled job should finish");
        assert_eq!(result.state, JobState::Killed);
        assert_eq!(result.error, None);
    }
}
