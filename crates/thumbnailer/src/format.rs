//! Supported upload formats.
//!
//! Every upload is classified once by its file extension, and the resulting
//! [`Format`] decides both how a preview is produced and which metadata reader
//! of the signal library is used. Extensions without a dedicated variant fall back
//! to [`Format::Unsupported`], which still gets a best-effort preview.

use crate::library::LoadOptions;

/// Upload format, keyed by file extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Format {
    /// FEI Quanta SEM TIFF image (`.tif`).
    Tif,

    /// Gatan DigitalMicrograph 3 file (`.dm3`).
    Dm3,

    /// Gatan DigitalMicrograph 4 file (`.dm4`).
    Dm4,

    /// FEI TIA series file (`.ser`).
    Ser,

    /// EDAX spectrum file (`.spc`).
    Spc,

    /// EMSA/MAS spectrum file (`.msa`).
    Msa,

    /// Any other extension, lower-cased and without the leading dot.
    Unsupported(String),
}

/// Way of producing a preview image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ThumbnailStrategy {
    /// Shrink the raster image directly, without the signal library.
    DownSample {
        /// Divisor applied to both dimensions.
        factor: u32,
    },

    /// Load the file through the signal library and render its first signal.
    Signal(LoadOptions),
}

/// Metadata reader provided by the signal library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reader {
    Quanta,
    DigitalMicrograph,
    Ser,
    Spc,
    Msa,
}

impl Reader {
    /// Reader name understood by the signal library.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Reader::Quanta => "quanta",
            Reader::DigitalMicrograph => "digital_micrograph",
            Reader::Ser => "ser",
            Reader::Spc => "spc",
            Reader::Msa => "msa",
        }
    }
}

impl Format {
    /// Classify a file extension, with or without the leading dot.
    pub(crate) fn from_extension(extension: &str) -> Self {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();

        match extension.as_str() {
            "tif" => Format::Tif,
            "dm3" => Format::Dm3,
            "dm4" => Format::Dm4,
            "ser" => Format::Ser,
            "spc" => Format::Spc,
            "msa" => Format::Msa,
            _ => Format::Unsupported(extension),
        }
    }

    pub(crate) fn thumbnail_strategy(&self, down_sample_factor: u32) -> ThumbnailStrategy {
        match self {
            Format::Tif => ThumbnailStrategy::DownSample {
                factor: down_sample_factor,
            },
            Format::Ser => ThumbnailStrategy::Signal(LoadOptions {
                lazy: true,
                only_valid_data: true,
            }),
            _ => ThumbnailStrategy::Signal(LoadOptions {
                lazy: true,
                only_valid_data: false,
            }),
        }
    }

    pub(crate) fn reader(&self) -> Option<Reader> {
        match self {
            Format::Tif => Some(Reader::Quanta),
            Format::Dm3 | Format::Dm4 => Some(Reader::DigitalMicrograph),
            Format::Ser => Some(Reader::Ser),
            Format::Spc => Some(Reader::Spc),
            Format::Msa => Some(Reader::Msa),
            Format::Unsupported(_) => None,
        }
    }
}

/// Split an object name into its stem and extension.
///
/// The extension keeps its leading dot, and only the last path segment is
/// considered, so `2021/run.1/image` has no extension at all.
pub(crate) fn split_extension(name: &str) -> (&str, &str) {
    let file_start = name.rfind('/').map_or(0, |index| index + 1);

    match name[file_start..].rfind('.') {
        Some(0) | None => (name, ""),
        Some(index) => name.split_at(file_start + index),
    }
}
