//! Unified error type for the vodforge application.
//!
//! All crates funnel their failures into [`Error`], which carries enough context
//! for API handlers to derive an HTTP status code via [`Error::http_status`].
//! Pipeline failures are terminal for the upload they belong to; nothing in
//! here is retried automatically.

use std::fmt;
use std::path::PathBuf;

/// Unified error type covering all failure modes in vodforge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Probing the input media failed (bad exit, unparsable output, or
    /// malformed geometry). The message carries the raw diagnostic text.
    #[error("Probe error: {0}")]
    Probe(String),

    /// The source resolution is below every catalog rendition; nothing can
    /// be produced without upscaling.
    #[error("no feasible rendition for {width}x{height} source")]
    NoFeasibleRendition {
        /// Source video width in pixels.
        width: u32,
        /// Source video height in pixels.
        height: u32,
    },

    /// No audio track in the input uses a supported codec.
    #[error("no compatible audio track in source (codecs found: {found:?})")]
    NoCompatibleAudio {
        /// Codec names of the tracks that were enumerated.
        found: Vec<String>,
    },

    /// The external encoder failed, or reported success without producing
    /// every expected output artifact.
    #[error("Encode error: {0}")]
    Encode(String),

    /// Writing a published artifact (manifest) failed.
    #[error("Write error at {path}: {message}")]
    Write {
        /// Path that was being written.
        path: PathBuf,
        /// Human-readable error description.
        message: String,
    },

    /// The upload request carried no video file.
    #[error("no video file was uploaded")]
    MissingUpload,

    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "asset").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An external tool (ffmpeg, ffprobe) could not be located or run.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Probe(_) => 422,
            Error::NoFeasibleRendition { .. } => 422,
            Error::NoCompatibleAudio { .. } => 422,
            Error::Encode(_) => 502,
            Error::Write { .. } => 500,
            Error::MissingUpload => 400,
            Error::NotFound { .. } => 404,
            Error::Validation(_) => 400,
            Error::Tool { .. } => 502,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Write`].
    pub fn write(path: impl Into<PathBuf>, source: impl fmt::Display) -> Self {
        Error::Write {
            path: path.into(),
            message: source.to_string(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
