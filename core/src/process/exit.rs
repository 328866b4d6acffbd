use std::process::ExitStatus;

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Code(i32),
    Signal(i32),
    Unknown,
}

pub fn classify_exit(status: ExitStatus) -> Termination {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(code) = status.code() {
            Termination::Code(code)
        } else if let Some(sig) = status.signal() {
            Termination::Signal(sig)
        } else {
            Termination::Unknown
        }
    }
    #[cfg(not(unix))]
    {
        match status.code() {
            Some(code) => Termination::Code(code),
            None => Termination::Unknown,
        }
    }
}
