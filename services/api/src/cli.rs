use crate::eligibility::{run_check, CheckArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use volunteer_portal::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Volunteer Portal",
    about = "Run the volunteer portal scheduling service or evaluate shift eligibility offline",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate shift eligibility without starting the server
    Eligibility {
        #[command(subcommand)]
        command: EligibilityCommand,
    },
}

#[derive(Subcommand, Debug)]
enum EligibilityCommand {
    /// Print the decision, summary, and gate table for one volunteer and opportunity
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// JSON file with `volunteers` and `opportunities` to preload
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Eligibility {
            command: EligibilityCommand::Check(args),
        } => run_check(args),
    }
}
