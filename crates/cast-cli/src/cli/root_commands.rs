use clap::{Args, Subcommand};

use crate::cli::subcommands::TaskCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server, web UI and dispatch workers.
    Serve(ServeArgs),
    /// Check bot tokens against the Bot API.
    Validate(ValidateArgs),
    /// Manage tasks on a running server.
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// Show aggregate counters from a running server.
    Stats,
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Listen address (overrides `server.host`)
    #[arg(long)]
    pub host: Option<String>,
    /// Listen port (overrides `server.port` and `PORT`)
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Clone, Debug, Args)]
pub struct ValidateArgs {
    /// One or more bot tokens
    #[arg(required = true)]
    pub tokens: Vec<String>,
}
