use std::io;
use thiserror::Error;

/// Custom error types for the lz4stream library.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying I/O errors from the bound source or sink stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The codec refused to create a compression or decompression context.
    #[error("Failed to create LZ4 context: {message}")]
    CodecInit { message: String },

    /// A compression call (begin, update, flush or end) failed.
    /// The writer is unusable afterwards.
    #[error("LZ4 compression failed: {message}")]
    CodecWrite { message: String },

    /// A decompression call failed, or the source ended inside a frame.
    /// The reader is unusable afterwards.
    #[error("LZ4 decompression failed: {message}")]
    CodecRead { message: String },

    /// A configuration value was rejected before any codec context was created.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The writer's frame has already been closed, or was abandoned after a failure.
    #[error("Stream already closed")]
    Closed,
}

impl Error {
    /// Create a new `CodecInit` error with a descriptive message.
    pub fn codec_init(message: impl Into<String>) -> Self {
        Self::CodecInit {
            message: message.into(),
        }
    }

    /// Create a new `CodecWrite` error with a descriptive message.
    pub fn codec_write(message: impl Into<String>) -> Self {
        Self::CodecWrite {
            message: message.into(),
        }
    }

    /// Create a new `CodecRead` error with a descriptive message.
    pub fn codec_read(message: impl Into<String>) -> Self {
        Self::CodecRead {
            message: message.into(),
        }
    }

    /// Create a new `InvalidConfig` error with a descriptive message.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Returns true if the adapter that produced this error must not be used again.
    ///
    /// Codec failures leave the codec context in an undefined state. A writer
    /// whose sink failed has lost compressed output, so retrying the same bytes
    /// would corrupt the frame. Only `Interrupted` is retryable, and the
    /// adapters already retry it internally.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::Io(e) => e.kind() != io::ErrorKind::Interrupted,
            Error::InvalidConfig { .. } | Error::Closed => false,
            Error::CodecInit { .. } | Error::CodecWrite { .. } | Error::CodecRead { .. } => true,
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        let kind = match err {
            Error::Io(inner) => return inner,
            Error::CodecRead { .. } => io::ErrorKind::InvalidData,
            Error::CodecInit { .. } | Error::CodecWrite { .. } => io::ErrorKind::Other,
            Error::InvalidConfig { .. } => io::ErrorKind::InvalidInput,
            Error::Closed => io::ErrorKind::BrokenPipe,
        };
        io::Error::new(kind, err)
    }
}

/// Result type alias for the library operations.
pub type Result<T> = std::result::Result<T, Error>;
