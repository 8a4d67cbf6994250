//! Construction-time configuration for the stream adapters.
//!
//! Buffer sizes are fixed once an adapter is built. A larger source buffer
//! means fewer codec calls per byte at the cost of memory; a smaller one
//! flushes (or refills) more often.

use crate::error::{Error, Result};

/// Default source buffer capacity for both adapters, in bytes.
pub const DEFAULT_SOURCE_BUFFER_SIZE: usize = 256;

/// Default decompressed-output buffer capacity for the reader, in bytes.
pub const DEFAULT_DESTINATION_BUFFER_SIZE: usize = 256;

/// Maximum independent block size recorded in the frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockSize {
    /// Let the codec choose (64 KiB).
    #[default]
    Default,
    Max64KB,
    Max256KB,
    Max1MB,
    Max4MB,
}

/// Whether blocks may reference data from previous blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockMode {
    #[default]
    Linked,
    Independent,
}

/// Frame-level options handed to the compressor when the frame header is written.
///
/// `FramePreferences::default()` is equivalent to the codec's own defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FramePreferences {
    /// Compression level. 0 selects the fast default; values above 2 select high compression.
    pub level: u32,
    pub block_size: BlockSize,
    pub block_mode: BlockMode,
    /// Append a checksum of the whole uncompressed content to the frame footer.
    pub content_checksum: bool,
    /// Append a checksum after every compressed block.
    pub block_checksum: bool,
    /// Emit a block on every update instead of accumulating up to the block size.
    pub auto_flush: bool,
    /// Trade compression ratio for decompression speed (high compression levels only).
    pub favor_dec_speed: bool,
}

impl FramePreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn block_size(mut self, block_size: BlockSize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn block_mode(mut self, block_mode: BlockMode) -> Self {
        self.block_mode = block_mode;
        self
    }

    pub fn content_checksum(mut self, enabled: bool) -> Self {
        self.content_checksum = enabled;
        self
    }

    pub fn block_checksum(mut self, enabled: bool) -> Self {
        self.block_checksum = enabled;
        self
    }

    pub fn auto_flush(mut self, enabled: bool) -> Self {
        self.auto_flush = enabled;
        self
    }

    pub fn favor_dec_speed(mut self, enabled: bool) -> Self {
        self.favor_dec_speed = enabled;
        self
    }
}

/// Configuration for [`Lz4Writer`](crate::Lz4Writer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterConfig {
    /// Uncompressed bytes accumulated before a mandatory flush through the codec.
    pub source_buffer_size: usize,
    pub preferences: FramePreferences,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            source_buffer_size: DEFAULT_SOURCE_BUFFER_SIZE,
            preferences: FramePreferences::default(),
        }
    }
}

impl WriterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_buffer_size(mut self, size: usize) -> Self {
        self.source_buffer_size = size;
        self
    }

    pub fn preferences(mut self, preferences: FramePreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Rejects configurations the writer cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.source_buffer_size == 0 {
            return Err(Error::invalid_config("source_buffer_size must be non-zero"));
        }
        Ok(())
    }
}

/// Configuration for [`Lz4Reader`](crate::Lz4Reader).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Compressed bytes pulled from the source per refill.
    pub source_buffer_size: usize,
    /// Decompressed bytes produced per codec call at most.
    pub destination_buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            source_buffer_size: DEFAULT_SOURCE_BUFFER_SIZE,
            destination_buffer_size: DEFAULT_DESTINATION_BUFFER_SIZE,
        }
    }
}

impl ReaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_buffer_size(mut self, size: usize) -> Self {
        self.source_buffer_size = size;
        self
    }

    pub fn destination_buffer_size(mut self, size: usize) -> Self {
        self.destination_buffer_size = size;
        self
    }

    /// Rejects configurations the reader cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.source_buffer_size == 0 {
            return Err(Error::invalid_config("source_buffer_size must be non-zero"));
        }
        if self.destination_buffer_size == 0 {
            return Err(Error::invalid_config(
                "destination_buffer_size must be non-zero",
            ));
        }
        Ok(())
    }
}
