//! Buffering hooks shared by the stream adapters.
//!
//! Each adapter owns a fixed-size buffer and implements exactly one hook:
//! the writer drains its buffer through the codec when it fills up, the
//! reader refills its readable span when the caller has consumed it. The
//! `std::io` trait implementations are thin layers over these hooks.

use crate::error::Result;

/// Flush-on-full: the write side drain event.
pub trait Overflow {
    /// Compresses every buffered byte and writes the result downstream,
    /// leaving the buffer empty.
    ///
    /// Runs even when nothing is buffered, since the codec may need the call.
    fn overflow(&mut self) -> Result<()>;
}

/// Refill-on-empty: the read side underflow event.
pub trait Underflow {
    /// Replaces the exhausted readable span with freshly decompressed bytes.
    ///
    /// Returns the first byte of the new span without consuming it, or
    /// `Ok(None)` on a clean end of stream.
    fn underflow(&mut self) -> Result<Option<u8>>;
}
