mod allocator;
mod cli;
mod collector;
mod error;
mod fmt;
mod ledger;
mod models;
mod pdf;
mod portal;
mod prompt;
mod receipts;
mod reconciler;
mod recorder;
mod settings;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        None => cli::run_interactive(),
        Some(Commands::Init(args)) => cli::init::run(args),
        Some(Commands::New { offline }) => cli::new::run(offline),
        Some(Commands::Missing) => cli::missing::run(),
        Some(Commands::Pending) => cli::pending::run(),
        Some(Commands::NextId) => cli::next_id::run(),
        Some(Commands::Read { file, open }) => cli::read::run(&file, open),
        Some(Commands::Status) => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
