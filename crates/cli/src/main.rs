//! EduMentor CLI — the main entry point.
//!
//! Commands:
//! - `chat`    — Interactive study session
//! - `ask`     — Single question, single answer
//! - `history` — Show a session transcript
//! - `reset`   — Wipe a session

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "edumentor",
    about = "EduMentor — AI study assistant with quizzes and document summaries",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive study session
    Chat {
        /// Resume a named session instead of starting a fresh one
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Ask a single question and print the answer
    Ask {
        /// The question text
        question: String,

        /// Session to ask under (defaults to "default")
        #[arg(short, long)]
        session: Option<String>,

        /// Print the full reply envelope as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the stored transcript of a session
    History {
        /// Session id
        session: String,
    },

    /// Delete all stored state for a session
    Reset {
        /// Session id
        session: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Chat { session } => commands::chat::run(session).await?,
        Commands::Ask {
            question,
            session,
            json,
        } => commands::chat::run_single(&question, session, json).await?,
        Commands::History { session } => commands::session::history(&session).await?,
        Commands::Reset { session } => commands::session::reset(&session).await?,
    }

    Ok(())
}
