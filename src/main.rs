use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use pullarim::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for pullarim::AppCommand {
    fn from(cmd: Commands) -> pullarim::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => {
                pullarim::AppCommand::Convert { amount, from, to }
            }
            Commands::Rates => pullarim::AppCommand::Rates,
            Commands::Watch => pullarim::AppCommand::Watch,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert, e.g. 1,500.25 (defaults to the last amount used)
        amount: Option<String>,
        /// Source currency code (defaults to the last one used)
        #[arg(short, long)]
        from: Option<String>,
        /// Target currency code (defaults to the last one used)
        #[arg(short, long)]
        to: Option<String>,
    },
    /// Display today's exchange rates
    Rates,
    /// Start an interactive converter with live rate updates
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => pullarim::cli::setup::setup(),
        Some(cmd) => pullarim::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
