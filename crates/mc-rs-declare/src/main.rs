mod config;
mod engine;
mod error;
mod plan;
mod resources;
mod run;
mod state;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use config::DeclareConfig;
use error::HostError;
use mc_rs_rcon::RconClient;
use mc_rs_reconcile::CommandClient;
use state::StateStore;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Declarative Minecraft server state over RCON", long_about = None)]
struct Args {
    /// Host configuration file
    #[arg(long, default_value = "server.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show what `apply` would do without contacting the server
    Plan {
        #[arg(long, default_value = "resources.toml")]
        file: PathBuf,
    },
    /// Bring the server in line with the declarations
    Apply {
        #[arg(long, default_value = "resources.toml")]
        file: PathBuf,
    },
    /// Re-read every tracked object
    Refresh,
    /// Tear down every tracked object
    Destroy,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let config = match DeclareConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", args.config.display());
            return ExitCode::FAILURE;
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    match run(args.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            run::log_failure(&e);
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn connect(config: &DeclareConfig) -> Result<CommandClient<RconClient>, HostError> {
    let password = config.rcon.password()?;
    let rcon = RconClient::connect(&config.rcon.address, &password, config.rcon.timeout()).await?;
    Ok(CommandClient::new(rcon))
}

async fn run(command: Command, config: &DeclareConfig) -> Result<(), HostError> {
    let mut store = StateStore::load(&config.state.path)?;
    let summary = match command {
        Command::Plan { file } => {
            let declared = resources::load_declarations(file)?;
            let steps = plan::plan(&declared, &store)?;
            print!("{}", plan::render(&steps));
            return Ok(());
        }
        Command::Apply { file } => {
            let declared = resources::load_declarations(file)?;
            let steps = plan::plan(&declared, &store)?;
            let client = connect(config).await?;
            run::apply(&client, &mut store, &steps).await?
        }
        Command::Refresh => {
            let client = connect(config).await?;
            run::refresh_all(&client, &mut store).await?
        }
        Command::Destroy => {
            let client = connect(config).await?;
            run::destroy_all(&client, &mut store).await?
        }
    };
    info!(
        "Done: {} step(s), {} warning(s)",
        summary.steps, summary.warnings
    );
    Ok(())
}
