mod commands;
mod input_output;
mod logging;

use clap::Parser;
use commands::Commands;

/// Run scopelex grammar definitions over text.
#[derive(clap::Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Subcommand to run.
    #[clap(subcommand)]
    pub command: Commands,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    Args::parse().command.run()
}
