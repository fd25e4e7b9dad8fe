use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while generating or writing a word cloud.
#[derive(Debug, Error)]
pub enum WordCloudError {
    #[error("We need at least 1 word to plot a word cloud, got 0.")]
    NoWords,
    #[error("Couldn't find space to draw. The canvas size is too small.")]
    CanvasTooSmall,
    #[error("invalid canvas size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("unknown colormap `{0}`")]
    UnknownColormap(String),
    #[error("invalid colour `{value}`: {message}")]
    InvalidColor { value: String, message: String },
    #[error("unable to read font file {path}: {source}")]
    FontFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid font data")]
    InvalidFont(#[from] ab_glyph::InvalidFont),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Errors raised while resolving or reading a dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("File, URL, or dataset does not exist: '{0}'")]
    NotFound(String),
    #[error("unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to download {url}: {message}")]
    Download { url: String, message: String },
    #[error("unsupported file format: '{0}'")]
    UnsupportedFormat(String),
    #[error("malformed CSV in {location}: {source}")]
    Csv {
        location: String,
        #[source]
        source: csv::Error,
    },
    #[error("dataset {0} has neither a title nor an abstract column")]
    MissingColumns(String),
    #[error("malformed dataset index {location}: {message}")]
    Index { location: String, message: String },
}

/// Everything a plugin invocation can fail with.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed arguments, or a `--help`/`--version` request.
    #[error(transparent)]
    Usage(#[from] clap::Error),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    WordCloud(#[from] WordCloudError),
}
