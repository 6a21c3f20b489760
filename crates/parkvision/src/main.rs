mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use parkvision_core::Dashboard;

use crate::cli::{Cli, Command};
use crate::config::KeyringTokenStore;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let store = KeyringTokenStore;

    match cli.command {
        // Config commands don't need a backend
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global, &store),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "parkvision", &mut std::io::stdout());
            Ok(())
        }

        // Login needs a backend but no token yet
        Command::Login(args) => commands::auth::login(args, &cli.global, &store).await,
        Command::Logout => commands::auth::logout(&cli.global, &store),

        // All other commands require an authenticated dashboard
        cmd => {
            let cfg = config::load_config_or_default();
            let server = config::resolve_authenticated(&cli.global, &cfg, &store)?;
            let dashboard = Dashboard::new(server)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &dashboard, &cli.global).await
        }
    }
}
