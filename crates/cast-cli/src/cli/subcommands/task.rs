use clap::Subcommand;

/// Task commands. All of them talk to a running server.
#[derive(Clone, Debug, Subcommand)]
pub enum TaskCommands {
    /// Create and start a task.
    Create {
        #[arg(long)]
        name: Option<String>,
        /// Bot token; repeat or comma-separate for several
        #[arg(long = "token", required = true)]
        tokens: Vec<String>,
        /// Destination chat id; repeat or comma-separate for several.
        /// Group and channel ids are negative (`-100…`).
        #[arg(long = "chat", required = true, allow_hyphen_values = true)]
        chats: Vec<String>,
        #[arg(long)]
        message: String,
        /// Photo URL or a path on the server
        #[arg(long)]
        photo: Option<String>,
        /// Seconds between cycles
        #[arg(long)]
        delay: Option<f64>,
        /// Show "typing…" before each send
        #[arg(long)]
        typing: bool,
    },
    /// List tasks.
    List,
    /// Get a task by ID.
    Get { id: String },
    /// Start (or restart) a task.
    Start { id: String },
    /// Stop a task.
    Stop { id: String },
    /// Delete a task.
    Delete { id: String },
}
