use anyhow::Result;
use btcwatch::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};

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

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Store the API key for the rates service
    Key {
        /// API key issued by apilayer
        api_key: String,
    },
    /// Set the amount of Bitcoin you hold
    Holding {
        /// Non-negative decimal amount, e.g. 0.25
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },
    /// List, add or remove favorite currencies
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesCommand>,
    },
    /// List every currency that can be added to favorites
    Symbols,
    /// Show your holding in each favorite currency
    Rates,
}

#[derive(Subcommand)]
enum FavoritesCommand {
    /// Show favorite currencies
    List,
    /// Add a currency code, e.g. EUR
    Add { code: String },
    /// Remove a currency code
    Remove { code: String },
}

impl From<FavoritesCommand> for btcwatch::FavoritesAction {
    fn from(cmd: FavoritesCommand) -> btcwatch::FavoritesAction {
        match cmd {
            FavoritesCommand::List => btcwatch::FavoritesAction::List,
            FavoritesCommand::Add { code } => btcwatch::FavoritesAction::Add(code),
            FavoritesCommand::Remove { code } => btcwatch::FavoritesAction::Remove(code),
        }
    }
}

impl From<Commands> for btcwatch::AppCommand {
    fn from(cmd: Commands) -> btcwatch::AppCommand {
        match cmd {
            Commands::Key { api_key } => btcwatch::AppCommand::Key(api_key),
            Commands::Holding { amount } => btcwatch::AppCommand::Holding(amount),
            Commands::Favorites { action } => btcwatch::AppCommand::Favorites(
                action.map_or(btcwatch::FavoritesAction::List, Into::into),
            ),
            Commands::Symbols => btcwatch::AppCommand::Symbols,
            Commands::Rates => btcwatch::AppCommand::Rates,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => btcwatch::cli::setup::setup_at_path(path),
            None => btcwatch::cli::setup::setup(),
        },
        Some(cmd) => btcwatch::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
