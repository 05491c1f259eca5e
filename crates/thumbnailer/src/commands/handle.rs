use tracing::info;

use crate::pipeline::{Pipeline, PipelineError, UploadEvent};

/// Process a single upload event and exit.
pub(crate) async fn handle(pipeline: Pipeline, event: UploadEvent) -> Result<(), PipelineError> {
    let artifacts = pipeline.process(&event).await?;

    info!(
        bucket = %artifacts.bucket,
        thumbnail = %artifacts.thumbnail_key,
        metadata = %artifacts.metadata_key,
        "upload processed"
    );

    Ok(())
}
