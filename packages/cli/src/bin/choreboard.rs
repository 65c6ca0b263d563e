use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::process;

mod cli;

#[derive(Parser)]
#[command(name = "choreboard")]
#[command(about = "Choreboard CLI - household chore schedule")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether a member is on shift now, or when their next shift starts
    Shift {
        /// Member id (defaults to CHOREBOARD_USER_ID)
        #[arg(long)]
        user: Option<String>,
        /// Resolve at this local time instead of now ("YYYY-MM-DD HH:MM")
        #[arg(long)]
        at: Option<String>,
    },
    /// Print a day's shifts
    Roster {
        /// Day to show (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Show the overrides that make a day match a day template
    Diff {
        /// Day to compare (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// JSON file with the day template items
        #[arg(long)]
        template: PathBuf,
        /// Submit the overrides to the server
        #[arg(long)]
        apply: bool,
    },
    /// Stay connected and print notifications and shift updates
    Watch {
        /// Member id (defaults to CHOREBOARD_USER_ID)
        #[arg(long)]
        user: Option<String>,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli.command).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let config = choreboard_config::ClientConfig::from_env()?;

    match command {
        Commands::Shift { user, at } => cli::schedule::show_shift(&config, user, at).await,
        Commands::Roster { date } => cli::schedule::show_roster(&config, date).await,
        Commands::Diff {
            date,
            template,
            apply,
        } => cli::schedule::show_diff(&config, &date, &template, apply).await,
        Commands::Watch { user } => cli::watch::watch(&config, user).await,
    }
}
