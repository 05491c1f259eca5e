//! Preview image generation.
//!
//! TIFF images are shrunk directly, while every other format is rendered by the
//! signal library. Any failure along the way results in a placeholder image,
//! so a preview is always produced for an upload.

use std::{
    io,
    path::{Path, PathBuf},
};

use derive_more::{Display, Error, From};
use image::{imageops::FilterType, GenericImageView, ImageError, ImageFormat, Rgba, RgbaImage};
use tokio::task::JoinError;
use tracing::{debug, warn};

use crate::{
    format::{split_extension, Format, ThumbnailStrategy},
    library::{LoadOptions, Signal, SignalError, SignalLibrary},
};

/// Edge length of the generated placeholder image.
const PLACEHOLDER_SIZE: u32 = 500;

/// Fill color of the generated placeholder image.
const PLACEHOLDER_COLOR: Rgba<u8> = Rgba([0xcc, 0xcc, 0xcc, 0xff]);

/// Kind of preview image that was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Thumbnail {
    Rendered,
    Placeholder,
}

#[derive(Debug, Display, Error, From)]
enum ThumbnailError {
    Image(ImageError),
    Signal(SignalError),
    Join(JoinError),
}

/// Write a PNG preview of `source` to `output`.
///
/// Only a failure to write the generated placeholder into `output` is reported
/// as an error.
pub(crate) async fn generate(
    library: &dyn SignalLibrary,
    format: &Format,
    source: &Path,
    output: &Path,
    placeholder: Option<&Path>,
    down_sample_factor: u32,
) -> io::Result<Thumbnail> {
    let result = match format.thumbnail_strategy(down_sample_factor) {
        ThumbnailStrategy::DownSample { factor } => down_sample(source, output, factor).await,
        ThumbnailStrategy::Signal(options) => render_signal(library, source, options, output).await,
    };

    match result {
        Ok(()) => {
            debug!(?format, "thumbnail rendered");
            Ok(Thumbnail::Rendered)
        }
        Err(err) => {
            warn!(%err, ?format, "unable to render thumbnail, using placeholder");
            write_placeholder(placeholder, output).await?;
            Ok(Thumbnail::Placeholder)
        }
    }
}

async fn down_sample(source: &Path, output: &Path, factor: u32) -> Result<(), ThumbnailError> {
    let source = source.to_path_buf();
    let output = output.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<(), ImageError> {
        let image = image::io::Reader::open(&source)?
            .with_guessed_format()?
            .decode()?;

        let factor = factor.max(1);
        let (width, height) = image.dimensions();

        image
            .resize_exact(
                (width / factor).max(1),
                (height / factor).max(1),
                FilterType::Triangle,
            )
            .into_rgba8()
            .save_with_format(&output, ImageFormat::Png)
    })
    .await??;

    Ok(())
}

async fn render_signal(
    library: &dyn SignalLibrary,
    source: &Path,
    options: LoadOptions,
    output: &Path,
) -> Result<(), ThumbnailError> {
    let signals = library.load(source, options).await?;
    let signal = select_signal(signals)?;

    library
        .render_thumbnail(source, options, &signal, output)
        .await?;

    Ok(())
}

/// Pick the signal to preview and give it a descriptive title.
///
/// Files with multiple signals are previewed by their first signal, with its title
/// annotated by the total signal count. An untitled single signal is named after
/// its original file.
pub(crate) fn select_signal(signals: Vec<Signal>) -> Result<Signal, SignalError> {
    let count = signals.len();
    let mut signal = signals.into_iter().next().ok_or(SignalError::NoSignals)?;

    if count > 1 {
        signal.title = format!(
            "{} (1 of {count} total signals in file \"{}\")",
            signal.title, signal.original_filename
        );
    } else if signal.title.is_empty() {
        signal.title = split_extension(&signal.original_filename).0.to_string();
    }

    Ok(signal)
}

/// Copy the configured placeholder, falling back to a generated one.
async fn write_placeholder(placeholder: Option<&Path>, output: &Path) -> io::Result<()> {
    if let Some(placeholder) = placeholder {
        match tokio::fs::copy(placeholder, output).await {
            Ok(_) => return Ok(()),
            Err(err) => warn!(
                %err,
                path = %placeholder.display(),
                "unable to copy configured placeholder, generating one"
            ),
        }
    }

    let output: PathBuf = output.to_path_buf();

    tokio::task::spawn_blocking(move || {
        RgbaImage::from_pixel(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, PLACEHOLDER_COLOR)
            .save_with_format(&output, ImageFormat::Png)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))
    })
    .await
    .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?
}
