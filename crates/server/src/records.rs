//! External experiment record builder.
//!
//! Record building is a batch job that lives outside of this service. The API
//! only starts it on behalf of the trusted scheduler and passes its summary back.

use std::{io, path::PathBuf, process::Stdio};

use axum::async_trait;
use common::config;
use derive_more::{Display, Error, From};
use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Record builder errors.
#[derive(Debug, Display, From, Error)]
pub(crate) enum RecordBuildError {
    /// Unable to start or communicate with the record builder process.
    Io(io::Error),

    /// Record builder process exited unsuccessfully.
    #[display(fmt = "record builder exited with {}: {}", status, stderr)]
    Failed {
        #[error(not(source))]
        status: String,
        #[error(not(source))]
        stderr: String,
    },

    /// No record builder is configured for this deployment.
    #[display(fmt = "record builder is not configured")]
    NotConfigured,
}

/// Routine that compiles finished sessions into experiment records.
#[async_trait]
pub(crate) trait RecordBuilder: Send + Sync {
    /// Build all pending records, returning a summary of the run.
    async fn build(&self, verbose: bool) -> Result<Value, RecordBuildError>;

    /// Verbosity requested by the deployment configuration.
    fn verbose(&self) -> bool {
        false
    }
}

/// [`RecordBuilder`] that runs an external program.
///
/// The program's standard output is treated as a JSON summary.
/// Output that isn't valid JSON is returned as a string value.
pub(crate) struct CommandRecordBuilder {
    program: PathBuf,
    args: Vec<String>,
    verbose: bool,
}

impl CommandRecordBuilder {
    pub(crate) fn new(config: &config::Records) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            verbose: config.verbose,
        }
    }
}

#[async_trait]
impl RecordBuilder for CommandRecordBuilder {
    #[instrument(skip(self), err)]
    async fn build(&self, verbose: bool) -> Result<Value, RecordBuildError> {
        let mut command = Command::new(&self.program);
        command.args(&self.args);

        if verbose {
            command.arg("--verbose");
        }

        let output = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(RecordBuildError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(bytes = stdout.len(), "record builder finished");

        Ok(serde_json::from_str(&stdout)
            .unwrap_or_else(|_| Value::String(stdout.trim().to_string())))
    }

    fn verbose(&self) -> bool {
        self.verbose
    }
}

/// [`RecordBuilder`] used when no record builder is configured.
pub(crate) struct DisabledRecordBuilder;

#[async_trait]
impl RecordBuilder for DisabledRecordBuilder {
    async fn build(&self, _: bool) -> Result<Value, RecordBuildError> {
        Err(RecordBuildError::NotConfigured)
    }
}
