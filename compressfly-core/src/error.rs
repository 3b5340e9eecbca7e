//! Error types for compressFly operations.
//!
//! A single error enum covers every failure the library can report: build-time
//! structural failures (missing inputs, data a codec cannot represent),
//! decode-time format failures (unknown codec tag, corrupt chunk stream), and
//! the umbrella "not a valid archive" outcome returned by archive maintenance.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for compressFly operations.
#[derive(Debug, Error)]
pub enum CompressFlyError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A listed input path is neither a file nor a directory.
    #[error("{} does not exist", path.display())]
    MissingInput {
        /// The offending path.
        path: PathBuf,
    },

    /// Raw file bytes or a path string contain a reserved marker of the codec.
    #[error("Could not compress {path} using {codec}")]
    IncompatibleData {
        /// Path of the entry that could not be encoded.
        path: String,
        /// Name of the active codec.
        codec: String,
    },

    /// The encoder produced a token stream the decoder would frame differently.
    #[error("Encoded stream is ambiguous at offset {offset}")]
    AmbiguousEncoding {
        /// Byte offset of the first mis-framed token in the encoded output.
        offset: u64,
    },

    /// The metadata chunk names no known codec.
    #[error("Invalid compression format: unrecognized codec tag {}", String::from_utf8_lossy(tag))]
    UnrecognizedCodecTag {
        /// The raw metadata bytes.
        tag: Vec<u8>,
    },

    /// A chunk or codec payload could not be decoded.
    #[error("Corrupted data at offset {offset}: {message}")]
    CorruptStream {
        /// Byte offset where corruption was detected.
        offset: u64,
        /// Description of the corruption.
        message: String,
    },

    /// A codec or option parameter is out of range.
    #[error("Invalid parameter: {message}")]
    InvalidParameter {
        /// Description of the invalid parameter.
        message: String,
    },

    /// The archive could not be parsed.
    #[error("{} is not a valid archive: {reason}", path.display())]
    NotAValidArchive {
        /// Path of the archive.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// A timed batch operation exceeded its deadline.
    #[error("Decompress execution timed out [{seconds} seconds]")]
    Timeout {
        /// The configured timeout.
        seconds: u64,
    },
}

/// Result type alias for compressFly operations.
pub type Result<T> = std::result::Result<T, CompressFlyError>;

impl CompressFlyError {
    /// Create a missing input error.
    pub fn missing_input(path: impl Into<PathBuf>) -> Self {
        Self::MissingInput { path: path.into() }
    }

    /// Create an incompatible data error.
    pub fn incompatible(path: impl Into<String>, codec: impl Into<String>) -> Self {
        Self::IncompatibleData {
            path: path.into(),
            codec: codec.into(),
        }
    }

    /// Create an ambiguous encoding error.
    pub fn ambiguous(offset: usize) -> Self {
        Self::AmbiguousEncoding {
            offset: offset as u64,
        }
    }

    /// Create an unrecognized codec tag error.
    pub fn unrecognized_tag(tag: impl Into<Vec<u8>>) -> Self {
        Self::UnrecognizedCodecTag { tag: tag.into() }
    }

    /// Create a corrupted stream error.
    pub fn corrupted(offset: usize, message: impl Into<String>) -> Self {
        Self::CorruptStream {
            offset: offset as u64,
            message: message.into(),
        }
    }

    /// Create a truncated stream error: `needed` bytes at `offset` are missing.
    pub fn truncated(offset: usize, needed: usize) -> Self {
        Self::corrupted(offset, format!("expected {needed} more bytes"))
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create a not-a-valid-archive error.
    pub fn not_an_archive(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::NotAValidArchive {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error describes a malformed archive rather than an
    /// environmental failure.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::UnrecognizedCodecTag { .. }
                | Self::CorruptStream { .. }
                | Self::NotAValidArchive { .. }
        )
    }

    /// Short, stable name of the variant, used in batch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "Io",
            Self::MissingInput { .. } => "MissingInput",
            Self::IncompatibleData { .. } => "IncompatibleData",
            Self::AmbiguousEncoding { .. } => "AmbiguousEncoding",
            Self::UnrecognizedCodecTag { .. } => "UnrecognizedCodecTag",
            Self::CorruptStream { .. } => "CorruptStream",
            Self::InvalidParameter { .. } => "InvalidParameter",
            Self::NotAValidArchive { .. } => "NotAValidArchive",
            Self::Timeout { .. } => "Timeout",
        }
    }
}
