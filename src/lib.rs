//! # lz4stream
//!
//! Buffered `std::io` adapters that carry LZ4-framed data over any byte stream.
//!
//! ## Overview
//!
//! `lz4stream` wraps a sink in an [`Lz4Writer`] that compresses everything
//! written to it, and a source in an [`Lz4Reader`] that decompresses frame
//! data as it is read. Both adapters use fixed-size buffers chosen at
//! construction and drive liblz4's frame API; the bytes on the wire are
//! exactly the codec's native frame format, with no extra envelope.
//!
//! ## Key Features
//!
//! * **Drop-in I/O**: `Lz4Writer` implements `Write`, `Lz4Reader` implements `Read` and `BufRead`
//! * **Fixed Memory**: Buffer sizes are set once through [`WriterConfig`] / [`ReaderConfig`]
//! * **Well-formed Frames**: The footer is written on `close()` or, failing that, on drop
//! * **Strict Decoding**: A source that ends inside a frame is an error, never a short read
//! * **Pluggable Codec**: The adapters are generic over the [`Compressor`] / [`Decompressor`] seam
//!
//! ## Quick Start
//!
//! ```rust
//! use lz4stream::{Lz4Reader, Lz4Writer, Result};
//! use std::io::Cursor;
//!
//! fn main() -> Result<()> {
//!     let mut compressed = Vec::new();
//!     let mut writer = Lz4Writer::new(&mut compressed)?;
//!     writer.append(&[b'A'; 10_000])?;
//!     writer.close()?;
//!     drop(writer);
//!
//!     let mut reader = Lz4Reader::new(Cursor::new(compressed))?;
//!     let mut count = 0;
//!     while let Some(byte) = reader.read_byte()? {
//!         assert_eq!(byte, b'A');
//!         count += 1;
//!     }
//!     assert_eq!(count, 10_000);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! * **`Compressor` / `Decompressor`**: the frame codec, implemented over liblz4 by
//!   [`FrameCompressor`] and [`FrameDecompressor`], each owning its codec context
//! * **`Overflow` / `Underflow`**: the buffering hooks; the writer drains its source
//!   buffer when it fills, the reader refills its output span when it runs dry
//! * **`Lz4Writer` / `Lz4Reader`**: the adapters, built on those hooks

pub mod codec;
pub mod config;
pub mod error;
pub mod reader;
pub mod traits;
pub mod writer;

// Re-export the main public API for user convenience.
pub use codec::{Compressor, Decompressor, FrameCompressor, FrameDecompressor, Progress};
pub use config::{BlockMode, BlockSize, FramePreferences, ReaderConfig, WriterConfig};
pub use error::{Error, Result};
pub use reader::Lz4Reader;
pub use traits::{Overflow, Underflow};
pub use writer::Lz4Writer;
