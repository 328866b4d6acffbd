use cargo_bridge_core::api::{ErrorKind, JobResult, JobState};

/// Exit code for the same conventions a shell uses for the wrapped tool.
pub fn exit_code(result: &JobResult) -> i32 {
    match result.state {
        JobState::Succeeded => 0,
        JobState::Killed => 130,
        _ => match result.error_kind() {
            Some(ErrorKind::FailedShownError) => match result.exit_code {
                Some(code) if code != 0 => code,
                _ => 1,
            },
            _ => 2,
        },
    }
}
