use std::fmt;

/// Name of the external build tool. Resolved through the executable search
/// path at spawn time.
pub const TOOL_NAME: &str = "cargo";

/// The tool subcommand a job runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BuildCommand {
    Build,
    Clean,
    /// Configure-only mode. The tool has no such subcommand, so the job
    /// carries no command and fails with `NoCommand` when started.
    Configure,
    Install,
    Run,
    Custom(String),
}

impl BuildCommand {
    /// The argument passed to the tool, `None` for a bare job.
    pub fn as_arg(&self) -> Option<&str> {
        match self {
            BuildCommand::Build => Some("build"),
            BuildCommand::Clean => Some("clean"),
            BuildCommand::Configure => None,
            BuildCommand::Install => Some("install"),
            BuildCommand::Run => Some("run"),
            BuildCommand::Custom(cmd) => {
                let cmd = cmd.trim();
                (!cmd.is_empty()).then_some(cmd)
            }
        }
    }
}

impl From<&str> for BuildCommand {
    fn from(s: &str) -> Self {
        match s.trim() {
            "build" => BuildCommand::Build,
            "clean" => BuildCommand::Clean,
            "install" => BuildCommand::Install,
            "run" => BuildCommand::Run,
            other => BuildCommand::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for BuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg().unwrap_or(""))
    }
}
