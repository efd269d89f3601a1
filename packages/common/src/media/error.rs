use thiserror::Error;

/// Errors that can occur while accepting or serving media files.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The submitted filename is empty or contains nothing safe to keep.
    #[error("invalid or empty filename")]
    InvalidFilename,

    /// The file extension is not in the allowed image/video sets.
    #[error("unsupported media extension: '{0}'")]
    UnsupportedType(String),

    /// The upload exceeds the configured size limit.
    #[error("upload exceeds size limit ({actual} > {limit} bytes)")]
    SizeExceeded { actual: u64, limit: u64 },

    /// The requested media file does not exist in the store.
    #[error("media file not found: {0}")]
    NotFound(String),

    /// An I/O error occurred while writing or reading the store.
    #[error("media store IO error: {0}")]
    Io(#[from] std::io::Error),
}
