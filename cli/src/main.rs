use anyhow::Context;
use clap::Parser;

mod commands;
mod logging;
mod project;
mod render;
mod status;

use cargo_bridge_core::api::{
    drain_into, load_default, output_channel, run_custom, AppConfig, BuildJob, Builder,
    LaunchConfig, LauncherProvider, PluginRegistry, Project, EXECUTE_MODE,
};
use cargo_bridge_plugins::{register, CargoPlugin};
use commands::cli::{self, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    let mut cfg = load_default()?;
    if let Some(format) = args.format {
        cfg.output.format = format;
    }
    if args.ascii {
        cfg.output.ascii = true;
    }
    let guard = logging::init(&cfg.logging)?;

    let start = match &args.project {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let project = project::discover(&start)?;

    let mut registry = PluginRegistry::new();
    let plugin = register(&mut registry);
    let job = job_for(&args.command, &cfg, &project, &plugin, &registry)?;
    tracing::info!(project = %project.name, job = %job.title(), "running");

    let code = run(job, &cfg).await;
    drop(guard);
    std::process::exit(code);
}

fn job_for(
    command: &Commands,
    cfg: &AppConfig,
    project: &Project,
    plugin: &CargoPlugin,
    registry: &PluginRegistry,
) -> anyhow::Result<BuildJob> {
    let root = project.root_item();
    let job = match command {
        Commands::Build => plugin.build(&root),
        Commands::Clean => plugin.clean(&root),
        Commands::Configure => plugin.configure(project),
        Commands::Install(install) => plugin.install(&root, install.root.as_deref()),
        Commands::Run(run) => {
            let mut launch = LaunchConfig::new(&project.name, project.clone());
            launch.identifier = run
                .bin
                .clone()
                .unwrap_or_else(|| cfg.launch.identifier.clone());
            launch.arguments = if run.args.is_empty() {
                cfg.launch.arguments.clone()
            } else {
                shell_words::join(&run.args)
            };

            let type_id = plugin.native_app_config_type_id();
            let launcher = registry
                .configuration_type(type_id)
                .and_then(|t| t.launchers().first().cloned())
                .with_context(|| format!("no launcher registered for {type_id}"))?;
            launcher
                .start(EXECUTE_MODE, &launch)?
                .context("launcher cannot execute")?
        }
        Commands::Custom(custom) => run_custom(&project.root, &custom.command, custom.args.clone()),
    };
    Ok(job)
}

/// Runs the job to completion, streaming its output to stdout. Ctrl-C
/// cancels the job instead of killing this process.
async fn run(job: BuildJob, cfg: &AppConfig) -> i32 {
    let mut renderer = render::Renderer::new(
        std::io::stdout(),
        job.id().to_string(),
        cfg.output.format,
        cfg.output.ascii,
    )
    .with_show_echo(cfg.output.show_echo);

    let (tx, rx) = output_channel();
    let handle = job.start(tx);

    let canceller = handle.canceller();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, cancelling job");
            canceller.cancel();
        }
    });

    let printer = tokio::spawn(async move {
        drain_into(rx, &mut renderer).await;
        renderer
    });

    let result = handle.wait().await;
    match printer.await {
        Ok(mut renderer) => renderer.end(&result),
        Err(err) => tracing::error!(error = %err, "output printer stopped"),
    }
    status::exit_code(&result)
}
