mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "padop",
    about = "Fact-gated reconciler for the Etherpad deployment unit",
    version,
    propagate_version = true
)]
struct Cli {
    /// Unit root (default: auto-detect from .padop/ or .git/)
    #[arg(long, global = true, env = "PADOP_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize unit state (config and empty fact set)
    Init,

    /// Run one reconcile pass for a delivered event
    Handle {
        /// Event name, e.g. install, db-master-changed, config-changed
        event: String,

        /// JSON file with relation payloads attached to this event
        #[arg(long)]
        payload: Option<PathBuf>,

        /// This unit currently holds leadership
        #[arg(long)]
        leader: bool,

        /// The service process is currently running
        #[arg(long)]
        service_running: bool,
    },

    /// Show the persisted fact set
    Facts,

    /// Show the status the unit would report from its current facts
    Status,

    /// Inspect and validate the unit configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, cli.json),
        Commands::Handle {
            event,
            payload,
            leader,
            service_running,
        } => cmd::handle::run(
            &root,
            &event,
            payload.as_deref(),
            leader,
            service_running,
            cli.json,
        ),
        Commands::Facts => cmd::facts::run(&root, cli.json),
        Commands::Status => cmd::status::run(&root, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
