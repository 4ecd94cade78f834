use clap::{Parser, Subcommand};

/// Command line interface for the medboard backend
#[derive(Parser, Debug)]
#[command(name = "medboard-backend", version, about = "Healthcare job-board backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run pending database migrations and exit
    Migrate,
    /// Start the API server (default)
    Serve,
}
