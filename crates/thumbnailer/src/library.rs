//! # Signal library
//!
//! Decoding microscopy formats, rendering signal previews and reading vendor
//! metadata is delegated to an external scientific signal library. The library
//! is wrapped by an executable configured in [`Thumbnailer::library_program`],
//! which is invoked with one of the following subcommands:
//!
//! | Subcommand | Output |
//! |---|---|
//! | `load [--lazy] [--only-valid-data] <file>` | JSON array of `{"title", "original_filename"}` |
//! | `thumbnail [--lazy] [--only-valid-data] --index <i> --title <t> --output <png> <file>` | PNG written to `<png>` |
//! | `metadata --reader <name> --extra <json> <file>` | JSON object |
//!
//! A non-zero exit status is treated as a failure of the corresponding operation.
//!
//! [`Thumbnailer::library_program`]: common::config::Thumbnailer::library_program

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use common::config;
use derive_more::{Display, Error, From};
use serde::Deserialize;
use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::format::Reader;

/// Signal library errors.
#[derive(Debug, Display, Error, From)]
pub(crate) enum SignalError {
    /// Unable to start or communicate with the library process.
    Io(io::Error),

    /// Library output is not valid JSON.
    Json(serde_json::Error),

    /// Library process exited unsuccessfully.
    #[display(fmt = "signal library exited with {}: {}", status, stderr)]
    Failed {
        #[error(not(source))]
        status: String,
        #[error(not(source))]
        stderr: String,
    },

    /// File was loaded, but it doesn't contain any signals.
    #[display(fmt = "file does not contain any signals")]
    NoSignals,
}

/// Options used to load a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LoadOptions {
    /// Avoid reading the whole dataset into memory.
    pub lazy: bool,

    /// Skip uninitialized frames of partially acquired series.
    pub only_valid_data: bool,
}

/// Single signal of a loaded file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct Signal {
    /// Position of the signal inside the file.
    #[serde(skip)]
    pub index: usize,

    /// Signal title, possibly empty.
    pub title: String,

    /// File name the signal was originally loaded from.
    pub original_filename: String,
}

/// Scientific signal library operations.
#[async_trait]
pub(crate) trait SignalLibrary: Send + Sync {
    /// Load all signals contained in a file.
    async fn load(&self, path: &Path, options: LoadOptions) -> Result<Vec<Signal>, SignalError>;

    /// Render a PNG preview of a signal to `output`, using the signal title as a caption.
    async fn render_thumbnail(
        &self,
        path: &Path,
        options: LoadOptions,
        signal: &Signal,
        output: &Path,
    ) -> Result<(), SignalError>;

    /// Extract metadata with a format-specific reader.
    ///
    /// `extra` contains custom metadata attached to the uploaded object.
    async fn extract_metadata(
        &self,
        reader: Reader,
        path: &Path,
        extra: &HashMap<String, String>,
    ) -> Result<Value, SignalError>;
}

/// [`SignalLibrary`] implemented by an external executable.
pub(crate) struct CommandLibrary {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandLibrary {
    pub(crate) fn new(config: &config::Thumbnailer) -> Self {
        Self {
            program: config.library_program.clone(),
            args: config.library_args.clone(),
        }
    }

    fn command(&self, subcommand: &str) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(subcommand);
        command
    }

    fn command_with_options(&self, subcommand: &str, options: LoadOptions) -> Command {
        let mut command = self.command(subcommand);

        if options.lazy {
            command.arg("--lazy");
        }

        if options.only_valid_data {
            command.arg("--only-valid-data");
        }

        command
    }
}

/// Run the command to completion, returning its standard output.
async fn run(mut command: Command) -> Result<Vec<u8>, SignalError> {
    let output = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(SignalError::Failed {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output.stdout)
}

#[async_trait]
impl SignalLibrary for CommandLibrary {
    #[instrument(skip(self), err)]
    async fn load(&self, path: &Path, options: LoadOptions) -> Result<Vec<Signal>, SignalError> {
        let mut command = self.command_with_options("load", options);
        command.arg(path);

        let mut signals: Vec<Signal> = serde_json::from_slice(&run(command).await?)?;

        for (index, signal) in signals.iter_mut().enumerate() {
            signal.index = index;
        }

        debug!(count = signals.len(), "loaded signals");

        Ok(signals)
    }

    #[instrument(skip(self), err)]
    async fn render_thumbnail(
        &self,
        path: &Path,
        options: LoadOptions,
        signal: &Signal,
        output: &Path,
    ) -> Result<(), SignalError> {
        let mut command = self.command_with_options("thumbnail", options);
        command
            .arg("--index")
            .arg(signal.index.to_string())
            .arg("--title")
            .arg(&signal.title)
            .arg("--output")
            .arg(output)
            .arg(path);

        run(command).await?;

        Ok(())
    }

    #[instrument(skip(self, extra), err)]
    async fn extract_metadata(
        &self,
        reader: Reader,
        path: &Path,
        extra: &HashMap<String, String>,
    ) -> Result<Value, SignalError> {
        let mut command = self.command("metadata");
        command
            .arg("--reader")
            .arg(reader.name())
            .arg("--extra")
            .arg(serde_json::to_string(extra)?)
            .arg(path);

        Ok(serde_json::from_slice(&run(command).await?)?)
    }
}
