use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mediabox")]
#[command(about = "mediabox CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a local file through a media provider
    Ingest(IngestArgs),
}

#[derive(clap::Args, Debug)]
pub struct IngestArgs {
    /// File to ingest
    pub path: PathBuf,

    /// Provider to route the file through
    #[arg(long, default_value = "file")]
    pub provider: String,

    /// Media context; defaults to the configured default context
    #[arg(long)]
    pub context: Option<String>,
}
