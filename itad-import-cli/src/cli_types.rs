//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "itad-import")]
#[command(
    about = "Import an Epic Games Store purchase history into IsThereAnyDeal",
    long_about = None
)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the order export comes from.
#[derive(Args, Clone)]
pub(crate) struct InputArgs {
    /// Epic order history JSON file, or '-' to read stdin
    pub file: Option<PathBuf>,

    /// Reuse the last export that parsed successfully
    #[arg(long, conflicts_with = "file")]
    pub cached: bool,
}

/// Selection adjustments shared by import and sync.
#[derive(Args, Clone)]
pub(crate) struct CurateArgs {
    /// Offer ids to leave out (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Toggle entries interactively before confirming
    #[arg(short, long)]
    pub interactive: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Log in to IsThereAnyDeal (OAuth with PKCE)
    Login,

    /// Forget stored tokens
    Logout,

    /// Show login and sync-link status
    Status,

    /// Parse an order export and list the purchases found
    Parse {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Add purchased games to your IsThereAnyDeal collection
    Import {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        curate: CurateArgs,
    },

    /// Replace the linked Epic category with this export's games
    Sync {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        curate: CurateArgs,
    },

    /// Link the sync profile used by 'sync'
    Link,

    /// Search the IsThereAnyDeal catalog by title
    Search {
        /// Title to search for
        title: String,

        /// Maximum number of results
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Inspect and organize your collection
    Collection {
        #[command(subcommand)]
        action: CollectionAction,
    },

    /// Manage API credentials configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum CollectionAction {
    /// List games in the collection
    Games,

    /// List collection groups
    Groups,

    /// Create a collection group
    NewGroup {
        /// Group title
        title: String,

        /// Make the group visible on your public profile
        #[arg(long)]
        public: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show current credentials and their sources
    Show,

    /// Interactively set up credentials
    Setup,

    /// Print the config file path
    Path,
}
