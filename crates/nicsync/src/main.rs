mod cli;
mod commands;
mod error;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nicsync_core::{HostShell, ProcessExecutor, RuntimeConfig};

use crate::cli::{Cli, Command, GlobalOpts, LogFormat};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose, cli.global.quiet, cli.global.log_format);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, quiet: bool, format: LogFormat) {
    let filter = match (quiet, verbosity) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands never touch the host
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "nicsync", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let runtime = build_runtime_config(&cli.global)?;
            let shell = HostShell::new(Arc::new(ProcessExecutor::new(runtime.executor.clone())));

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &shell, runtime, &cli.global).await
        }
    }
}

/// Load the config file and environment, then apply CLI flag overrides.
fn build_runtime_config(global: &GlobalOpts) -> Result<RuntimeConfig, CliError> {
    let cfg = nicsync_config::load_config(global.config.as_deref())?;
    let mut runtime = cfg.to_runtime_config()?;

    if let Some(ref powershell) = global.powershell {
        runtime.executor.powershell.clone_from(powershell);
    }
    Ok(runtime)
}
