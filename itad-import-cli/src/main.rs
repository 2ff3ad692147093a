//! itad-import CLI
//!
//! Command-line front end for importing an Epic Games Store purchase history
//! into an IsThereAnyDeal collection.

mod cli_types;
mod commands;
mod error;
mod logger;
mod spinner;

use clap::Parser;

use cli_types::{Cli, CollectionAction, Commands, ConfigAction};
pub(crate) use error::CliError;
pub(crate) use logger::log_blank;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{}", e);
        std::process::exit(2);
    }

    let quiet = cli.quiet;
    let result = match cli.command {
        Commands::Login => commands::auth::run_login(quiet),
        Commands::Logout => commands::auth::run_logout(),
        Commands::Status => commands::auth::run_status(),
        Commands::Parse { input } => commands::parse::run_parse(&input),
        Commands::Import { input, curate } => commands::import::run_import(&input, &curate, quiet),
        Commands::Sync { input, curate } => commands::sync::run_sync(&input, &curate, quiet),
        Commands::Link => commands::sync::run_link(quiet),
        Commands::Search { title, limit } => commands::search::run_search(&title, limit, quiet),
        Commands::Collection { action } => match action {
            CollectionAction::Games => commands::collection::run_games(quiet),
            CollectionAction::Groups => commands::collection::run_groups(quiet),
            CollectionAction::NewGroup { title, public } => {
                commands::collection::run_new_group(&title, public, quiet)
            }
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Setup => commands::config::run_config_setup(),
            ConfigAction::Path => commands::config::run_config_path(),
        },
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
