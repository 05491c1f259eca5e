//! # Upload thumbnailer
//!
//! Thumbnailer processes objects uploaded to the instrument data buckets. For
//! every upload it produces a PNG preview image and a JSON metadata document,
//! and stores both in a companion meta bucket under the same object stem.
//!
//! # CLI subcommands
//!
//! - [`handle`] processes a single upload and exits.
//! - [`serve`] accepts upload notifications as JSON `POST` requests.
//!
//! [`handle`]: commands::handle
//! [`serve`]: commands::serve
//!
//! # Processing
//!
//! Formats are classified in the [`format`] module. Previews are generated by
//! the [`thumbnail`] module and metadata by the [`metadata`] module, both backed
//! by an external scientific signal library (see [`library`]). The steps of a
//! single upload are described in the [`pipeline`] module.

/// CLI configuration and available subcommands.
mod cli;

/// Subcommand implementations.
mod commands;

mod format;
mod library;
mod metadata;
mod pipeline;

/// Object storage access.
mod storage;

mod thumbnail;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Command};
use common::{config::Config, logging, s3::ConfiguredClient};
use library::CommandLibrary;
use pipeline::{Pipeline, Settings, UploadEvent};

/// Upload thumbnailer entrypoint.
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let config = Config::new(cli.config)?;

    logging::init(&config);

    let Some(thumbnailer_config) = config.thumbnailer.as_ref() else {
        return Err(anyhow::Error::msg("unable to load thumbnailer config"));
    };

    let Some(storage_config) = config.storage.as_ref() else {
        return Err(anyhow::Error::msg("unable to load storage config"));
    };

    let pipeline = Pipeline::new(
        Arc::new(ConfiguredClient::new(storage_config).await),
        Arc::new(CommandLibrary::new(thumbnailer_config)),
        Settings::from(thumbnailer_config),
    );

    match cli.command {
        Command::Handle { bucket, name } => {
            commands::handle(pipeline, UploadEvent { bucket, name }).await?
        }
        Command::Serve => commands::serve(pipeline, thumbnailer_config.address).await?,
    }

    Ok(())
}
