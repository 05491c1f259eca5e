//! # Upload pipeline
//!
//! Each upload event is processed by the following steps:
//!
//! 1. The uploaded object is downloaded into a temporary file that keeps the
//!    original extension, along with its custom metadata.
//! 2. The meta bucket (`<bucket><meta_suffix>`) is created as a publicly readable
//!    bucket, unless it already exists.
//! 3. A preview image is generated and uploaded as `<stem>.png`.
//! 4. Metadata is extracted and uploaded as `<stem>.json`.
//!
//! Temporary files are removed once the event is processed, regardless of the
//! outcome.

use std::{io, path::PathBuf, sync::Arc};

use common::{config, s3};
use derive_more::{Display, Error, From};
use serde::Deserialize;
use tempfile::Builder;
use tracing::{info, instrument};

use crate::{
    format::{split_extension, Format},
    library::SignalLibrary,
    metadata,
    storage::ObjectStorage,
    thumbnail::{self, Thumbnail},
};

/// Pipeline errors.
#[derive(Debug, Display, Error, From)]
pub(crate) enum PipelineError {
    /// Object storage error.
    Storage(s3::Error),

    /// Local file IO error.
    Io(io::Error),

    /// Unable to serialize extracted metadata.
    Json(serde_json::Error),
}

/// Object upload notification.
///
/// Unknown fields of the notification payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct UploadEvent {
    pub bucket: String,
    pub name: String,
}

/// Keys of the uploaded artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Artifacts {
    pub bucket: String,
    pub thumbnail_key: String,
    pub metadata_key: String,
    pub thumbnail: Thumbnail,
}

/// Pipeline settings.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub placeholder: Option<PathBuf>,
    pub down_sample_factor: u32,
    pub meta_suffix: String,
}

impl From<&config::Thumbnailer> for Settings {
    fn from(config: &config::Thumbnailer) -> Self {
        Self {
            placeholder: config.placeholder.clone(),
            down_sample_factor: config.down_sample_factor,
            meta_suffix: config.meta_suffix.clone(),
        }
    }
}

/// Upload event processor.
pub(crate) struct Pipeline {
    storage: Arc<dyn ObjectStorage>,
    library: Arc<dyn SignalLibrary>,
    settings: Settings,
}

impl Pipeline {
    pub(crate) fn new(
        storage: Arc<dyn ObjectStorage>,
        library: Arc<dyn SignalLibrary>,
        settings: Settings,
    ) -> Self {
        Self {
            storage,
            library,
            settings,
        }
    }

    /// Generate and upload the preview image and metadata of an uploaded object.
    #[instrument(skip_all, fields(bucket = %event.bucket, name = %event.name), err)]
    pub(crate) async fn process(&self, event: &UploadEvent) -> Result<Artifacts, PipelineError> {
        let (stem, extension) = split_extension(&event.name);
        let format = Format::from_extension(extension);

        let source = Builder::new().suffix(extension).tempfile()?;
        let extra = self
            .storage
            .download(&event.bucket, &event.name, source.path())
            .await?;

        let bucket = format!("{}{}", event.bucket, self.settings.meta_suffix);

        if !self.storage.bucket_exists(&bucket).await? {
            info!(%bucket, "creating public meta bucket");
            self.storage.create_public_bucket(&bucket).await?;
        }

        let thumbnail_file = Builder::new().suffix(".png").tempfile()?;
        let thumbnail = thumbnail::generate(
            self.library.as_ref(),
            &format,
            source.path(),
            thumbnail_file.path(),
            self.settings.placeholder.as_deref(),
            self.settings.down_sample_factor,
        )
        .await?;

        let thumbnail_key = format!("{stem}.png");
        self.storage
            .upload(&bucket, &thumbnail_key, thumbnail_file.path(), "image/png")
            .await?;
        info!(%bucket, key = %thumbnail_key, ?thumbnail, "uploaded thumbnail");

        let metadata =
            metadata::generate(self.library.as_ref(), &format, source.path(), &extra).await;

        let metadata_file = Builder::new().suffix(".json").tempfile()?;
        tokio::fs::write(metadata_file.path(), serde_json::to_vec(&metadata)?).await?;

        let metadata_key = format!("{stem}.json");
        self.storage
            .upload(&bucket, &metadata_key, metadata_file.path(), "application/json")
            .await?;
        info!(%bucket, key = %metadata_key, "uploaded metadata");

        Ok(Artifacts {
            bucket,
            thumbnail_key,
            metadata_key,
            thumbnail,
        })
    }
}
