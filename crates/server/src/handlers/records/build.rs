use std::sync::Arc;

use axum::Extension;
use serde_json::Value;
use tracing::info;

use crate::{
    envelope::{ApiError, Envelope},
    records::RecordBuilder,
};

/// Run the external record builder and return its summary.
pub(super) async fn build(
    Extension(builder): Extension<Arc<dyn RecordBuilder>>,
) -> Result<Envelope<Value>, ApiError> {
    info!("starting record build");

    let summary = builder
        .build(builder.verbose())
        .await
        .map_err(ApiError::RecordBuild)?;

    Ok(Envelope::with_data(summary))
}
