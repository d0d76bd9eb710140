use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pushbox")]
#[command(about = "PushBox CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Consume JSON events from stdin and dispatch uploads
    Run(RunArgs),
    /// List discovered upload backends and their config schemas
    Backends,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Path to the configuration file (overrides PUSHBOX_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Extra event identifiers to accept in operator mappings (repeatable)
    #[arg(long = "known-event")]
    pub known_events: Vec<String>,
}
