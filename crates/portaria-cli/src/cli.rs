//! Command-line arguments.

use clap::{Parser, Subcommand};

/// Portaria: facility administration console
#[derive(Parser, Debug)]
#[command(name = "portaria")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "PORTARIA_CONFIG")]
    pub config: Option<String>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        /// Address to bind, overriding `server.bind`
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Inspect or edit the configuration
    Config {
        /// Config action
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print the status a ticket shows for a given day
    CheckStatus {
        /// Scheduled day of the ticket (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Stored status (aberto, pendente, concluido)
        #[arg(short, long, default_value = "aberto")]
        status: String,

        /// Day to evaluate against (YYYY-MM-DD); defaults to today in the configured timezone
        #[arg(short, long)]
        today: Option<String>,
    },

    /// Dry-run a bulk authorization file (one `name;cpf;room1,room2` per line)
    BulkCheck {
        /// File to check
        file: String,

        /// Day the authorizations would be for (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
}

/// `config` subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,

    /// Print a value by dotted key (e.g. `server.bind`)
    Get {
        /// Dotted key
        key: String,
    },

    /// Set a value by dotted key in the config file
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },

    /// Write a default config file
    Init {
        /// Where to write it; defaults to the standard location
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration as environment variables
    Export {
        /// Format as `--env KEY=VALUE` for `docker run`
        #[arg(long)]
        docker_env: bool,
    },
}
