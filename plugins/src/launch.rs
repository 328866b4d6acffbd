use std::sync::Arc;

use cargo_bridge_core::api::{
    run_launch, BuildJob, LaunchConfigurationType, LaunchError, Launcher, ProjectItem,
    EXECUTE_MODE,
};

pub use cargo_bridge_core::api::LaunchConfig;

pub const LAUNCHER_ID: &str = "CargoLauncher";
pub const CONFIG_TYPE_ID: &str = "CargoLauncherType";

const LAUNCHER_NAME: &str = "Cargo Launcher";
const SUPPORTED_MODES: &[&str] = &[EXECUTE_MODE];

/// Full `cargo` argument list for running a configuration:
/// `run [--bin <identifier>] [-- <arguments>...]`.
pub fn arguments(cfg: &LaunchConfig) -> Result<Vec<String>, LaunchError> {
    let mut args = vec!["run".to_string()];
    if !cfg.identifier.is_empty() {
        args.push("--bin".to_string());
        args.push(cfg.identifier.clone());
    }

    let passthrough =
        shell_words::split(&cfg.arguments).map_err(|source| LaunchError::BadArguments {
            arguments: cfg.arguments.clone(),
            source,
        })?;
    if !passthrough.is_empty() {
        args.push("--".to_string());
        args.extend(passthrough);
    }
    Ok(args)
}

/// Runs a package binary through `cargo run`.
#[derive(Debug, Default)]
pub struct CargoLauncher;

impl Launcher for CargoLauncher {
    fn id(&self) -> &str {
        LAUNCHER_ID
    }

    fn name(&self) -> &str {
        LAUNCHER_NAME
    }

    fn description(&self) -> &str {
        "Runs a Rust executable with Cargo"
    }

    fn supported_modes(&self) -> &[&'static str] {
        SUPPORTED_MODES
    }

    fn start(&self, mode: &str, cfg: &LaunchConfig) -> Result<Option<BuildJob>, LaunchError> {
        if mode != EXECUTE_MODE {
            tracing::warn!(mode, config = %cfg.name, "unknown launch mode for cargo launcher");
            return Ok(None);
        }

        let mut args = arguments(cfg)?;
        // The job supplies `run` itself.
        args.remove(0);
        tracing::debug!(config = %cfg.name, ?args, "launching");
        Ok(Some(run_launch(&cfg.project.root, args)))
    }
}

/// Launch configuration type for Cargo binaries. Every item is accepted;
/// Plasma applet folders (`metadata.desktop` listing `Plasma/Applet`) are not
/// detected.
pub struct CargoExecutionConfigType {
    launchers: Vec<Arc<dyn Launcher>>,
}

impl CargoExecutionConfigType {
    pub fn new() -> Self {
        Self {
            launchers: vec![Arc::new(CargoLauncher)],
        }
    }
}

impl Default for CargoExecutionConfigType {
    fn default() -> Self {
        Self::new()
    }
}

impl LaunchConfigurationType for CargoExecutionConfigType {
    fn type_id(&self) -> &str {
        CONFIG_TYPE_ID
    }

    fn name(&self) -> &str {
        LAUNCHER_NAME
    }

    fn launchers(&self) -> &[Arc<dyn Launcher>] {
        &self.launchers
    }

    fn configure_from_item(&self, cfg: &mut LaunchConfig, item: &ProjectItem) {
        cfg.project = item.project.clone();
        cfg.identifier = item.path().to_string_lossy().into_owned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cargo_bridge_core::api::{BuildCommand, Project};
    use pretty_assertions::assert_eq;

    fn config(identifier: &str, arguments: &str) -> LaunchConfig {
        let mut cfg = LaunchConfig::new("demo", Project::new("demo", "/work/demo"));
        cfg.identifier = identifier.to_string();
        cfg.arguments = arguments.to_string();
        cfg
    }

    #[test]
    fn bare_config_is_just_run() {
        assert_eq!(arguments(&config("", "")).unwrap(), vec!["run"]);
        assert_eq!(arguments(&config("", "   ")).unwrap(), vec!["run"]);
    }

    #[test]
    fn identifier_and_arguments_are_appended() {
        assert_eq!(
            arguments(&config("app", "--port 8080 'a b'")).unwrap(),
            vec!["run", "--bin", "app", "--", "--port", "8080", "a b"]
        );
        assert_eq!(
            arguments(&config("", "-v")).unwrap(),
            vec!["run", "--", "-v"]
        );
    }

    #[test]
    fn unbalanced_quotes_are_rejected() {
        let err = arguments(&config("app", "\"open")).unwrap_err();
        assert!(matches!(err, LaunchError::BadArguments { ref arguments, .. } if arguments == "\"open"));
    }

    #[test]
    fn execute_builds_run_job_in_project_root() {
        let job = CargoLauncher
            .start(EXECUTE_MODE, &config("app", "x"))
            .unwrap()
            .unwrap();
        assert_eq!(job.command(), &BuildCommand::Run);
        assert_eq!(job.working_dir(), std::path::Path::new("/work/demo"));
        assert_eq!(
            job.arguments().unwrap(),
            vec!["run", "--bin", "app", "--", "x"]
        );
    }

    #[test]
    fn other_modes_start_nothing() {
        assert!(CargoLauncher.start("debug", &config("", "")).unwrap().is_none());
        assert_eq!(CargoLauncher.supported_modes(), &["execute"]);
    }

    #[test]
    fn configure_from_item_sets_identifier() {
        let project = Project::new("demo", "/work/demo");
        let item = ProjectItem::new(project.clone(), "/work/demo/target/debug/app");
        let mut cfg = LaunchConfig::new("new", Project::new("", ""));
        CargoExecutionConfigType::new().configure_from_item(&mut cfg, &item);
        assert_eq!(cfg.identifier, "/work/demo/target/debug/app");
        assert_eq!(cfg.project, project);
    }

    #[test]
    fn config_type_carries_the_launcher() {
        let ty = CargoExecutionConfigType::new();
        assert_eq!(ty.type_id(), "CargoLauncherType");
        let ids: Vec<&str> = ty.launchers().iter().map(|l| l.id()).collect();
        assert_eq!(ids, vec!["CargoLauncher"]);
    }
}
