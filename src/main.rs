//! Binary entry point for people-store.
//!
//! A small command-line front end over the person store.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::{Parser, Subcommand};
use commands::{CommandContext, SortKey};
use people_store::config::PeopleStoreConfig;
use people_store::observability::{self, LoggingConfig};
use std::path::Path;
use std::process::ExitCode;

/// people-store - An embedded JSON-backed person store.
#[derive(Parser)]
#[command(name = "people-store")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "PEOPLE_STORE_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List all people.
    List {
        /// Sort key: first or last.
        #[arg(short, long, value_enum, default_value = "first")]
        sort: SortKey,
    },

    /// Show a single person.
    Show {
        /// Person id.
        id: String,
    },

    /// Add a person.
    Add {
        /// First name.
        first: String,

        /// Last name.
        last: String,

        /// Email address.
        #[arg(short, long)]
        email: Option<String>,

        /// Phone number.
        #[arg(short, long)]
        phone: Option<String>,
    },

    /// Replace fields of an existing person.
    Update {
        /// Person id.
        id: String,

        /// New first name.
        #[arg(long)]
        first: Option<String>,

        /// New last name.
        #[arg(long)]
        last: Option<String>,

        /// New email address.
        #[arg(short, long)]
        email: Option<String>,

        /// New phone number.
        #[arg(short, long)]
        phone: Option<String>,
    },

    /// Remove a person.
    Remove {
        /// Person id.
        id: String,
    },

    /// Print the store file path.
    Path,
}

/// Main entry point.
#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init(LoggingConfig::from_settings(
        Some(&config.logging),
        cli.verbose,
    )) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands, config: &PeopleStoreConfig) -> anyhow::Result<()> {
    if matches!(command, Commands::Path) {
        println!("{}", config.store.file_path().display());
        return Ok(());
    }

    let ctx = CommandContext::open(config)?;

    match command {
        Commands::List { sort } => commands::cmd_list(&ctx, sort),
        Commands::Show { id } => commands::cmd_show(&ctx, &id),
        Commands::Add {
            first,
            last,
            email,
            phone,
        } => commands::cmd_add(&ctx, first, last, email, phone),
        Commands::Update {
            id,
            first,
            last,
            email,
            phone,
        } => commands::cmd_update(&ctx, &id, first, last, email, phone),
        Commands::Remove { id } => commands::cmd_remove(&ctx, &id),
        Commands::Path => Ok(()),
    }
}

/// Loads configuration, then applies environment overrides.
fn load_config(path: Option<&str>) -> people_store::Result<PeopleStoreConfig> {
    let config = match path {
        Some(config_path) if !config_path.trim().is_empty() => {
            PeopleStoreConfig::load_from_file(Path::new(config_path))?
        },
        _ => PeopleStoreConfig::load_default(),
    };
    Ok(config.with_env_overrides())
}
