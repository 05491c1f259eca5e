use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(about, version)]
pub(crate) struct Cli {
    /// Path to the configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Process a single uploaded object.
    Handle {
        /// Bucket the object was uploaded to.
        #[arg(long)]
        bucket: String,

        /// Object key.
        #[arg(long)]
        name: String,
    },

    /// Accept upload events over HTTP.
    Serve,
}
