//! BREMS review CLI
//!
//! Command-line front end for the profile-request change-set builder

use brems_core::logging_facility::{init, Profile};
use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "brems-cli")]
#[command(about = "BREMS - Profile request review tooling", long_about = None)]
struct Cli {
    /// Logging profile: development (text) or production (JSON), written to stderr
    #[arg(long, global = true, default_value = "development")]
    log_profile: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the reviewer change set for a profile request
    Review(commands::review::ReviewArgs),
    /// Narrow a full edit-form submission to the changed fields
    Propose(commands::propose::ProposeArgs),
}

fn main() {
    let cli = Cli::parse();
    init(cli.log_profile);

    let result = match cli.command {
        Commands::Review(args) => commands::review::execute(args),
        Commands::Propose(args) => commands::propose::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
