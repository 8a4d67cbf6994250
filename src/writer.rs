//! A buffering writer that compresses into a single LZ4 frame.

use crate::codec::{Compressor, FrameCompressor};
use crate::config::WriterConfig;
use crate::error::{Error, Result};
use crate::traits::Overflow;
use std::io::{self, Write};

/// A writer that compresses everything appended to it into one LZ4 frame.
///
/// Bytes accumulate in a fixed-size source buffer. When the buffer fills,
/// or on [`flush`](Lz4Writer::flush), the buffered span is handed to the
/// compressor and its output is written to the sink. The frame header is
/// written at construction; [`close`](Lz4Writer::close) writes the footer.
///
/// The frame is closed automatically when the writer is dropped. Errors
/// raised by that implicit close are logged and discarded, so call `close`
/// explicitly whenever the outcome matters.
///
/// ```no_run
/// # use lz4stream::Lz4Writer;
/// let mut out = Vec::new();
/// let mut writer = Lz4Writer::new(&mut out)?;
/// writer.append(b"hello hello hello")?;
/// writer.close()?;
/// # Ok::<(), lz4stream::Error>(())
/// ```
pub struct Lz4Writer<W: Write, C: Compressor = FrameCompressor> {
    sink: W,
    // `None` once the frame is closed; dropping the compressor frees its context.
    codec: Option<C>,
    // Set when the frame was abandoned after a failure rather than closed.
    failed: bool,
    source: Box<[u8]>,
    pos: usize,
    destination: Box<[u8]>,
    total_in: u64,
    total_out: u64,
}

impl<W: Write> Lz4Writer<W> {
    /// Creates a writer with the default configuration and writes the frame header.
    pub fn new(sink: W) -> Result<Self> {
        Self::with_config(sink, &WriterConfig::default())
    }

    /// Creates a writer with the given configuration and writes the frame header.
    pub fn with_config(sink: W, config: &WriterConfig) -> Result<Self> {
        config.validate()?;
        let codec = FrameCompressor::new(&config.preferences)?;
        Self::with_compressor(sink, codec, config.source_buffer_size)
    }
}

impl<W: Write, C: Compressor> Lz4Writer<W, C> {
    /// Creates a writer around an already constructed compressor.
    ///
    /// The destination buffer is sized once, to `compressor.bound(source_buffer_size)`.
    pub fn with_compressor(sink: W, compressor: C, source_buffer_size: usize) -> Result<Self> {
        WriterConfig::new()
            .source_buffer_size(source_buffer_size)
            .validate()?;
        let destination_size = compressor.bound(source_buffer_size);
        let mut writer = Self {
            sink,
            codec: Some(compressor),
            failed: false,
            source: vec![0u8; source_buffer_size].into_boxed_slice(),
            pos: 0,
            destination: vec![0u8; destination_size].into_boxed_slice(),
            total_in: 0,
            total_out: 0,
        };
        if let Err(err) = writer.write_header() {
            // A frame that never started must not get a footer on drop.
            writer.codec = None;
            return Err(err);
        }
        Ok(writer)
    }

    /// Appends bytes, compressing and writing out every time the source buffer fills.
    pub fn append(&mut self, mut buf: &[u8]) -> Result<()> {
        if self.codec.is_none() {
            return Err(Error::Closed);
        }
        while !buf.is_empty() {
            let n = (self.source.len() - self.pos).min(buf.len());
            self.source[self.pos..self.pos + n].copy_from_slice(&buf[..n]);
            self.pos += n;
            self.total_in += n as u64;
            buf = &buf[n..];
            if self.pos == self.source.len() {
                self.overflow()?;
            }
        }
        Ok(())
    }

    /// Compresses the buffered bytes, drains the codec's own block buffer and
    /// flushes the sink, so that everything appended so far is decodable downstream.
    ///
    /// After a successful close this only flushes the sink. After a failure
    /// it returns [`Error::Closed`], like [`append`](Lz4Writer::append).
    pub fn flush(&mut self) -> Result<()> {
        if self.failed {
            return Err(Error::Closed);
        }
        if self.codec.is_none() {
            return self.flush_sink();
        }
        let result = self.flush_frame();
        self.poison_on_err(result)
    }

    /// Compresses the remaining bytes, writes the frame footer and releases the codec.
    ///
    /// Calling `close` again is a no-op. After a failed close the writer is
    /// closed as well; the frame written so far is incomplete.
    ///
    /// A writer that has failed is already closed, without a footer.
    pub fn close(&mut self) -> Result<()> {
        if self.codec.is_none() {
            return Ok(());
        }
        let result = self.write_footer();
        let result = self.poison_on_err(result);
        self.codec = None;
        tracing::debug!(
            total_in = self.total_in,
            total_out = self.total_out,
            ok = result.is_ok(),
            "closed lz4 frame"
        );
        result
    }

    /// True once [`close`](Lz4Writer::close) has run or any call has failed.
    pub fn is_closed(&self) -> bool {
        self.codec.is_none()
    }

    /// Number of bytes waiting in the source buffer.
    pub fn buffered(&self) -> usize {
        self.pos
    }

    /// Capacity of the source buffer.
    pub fn capacity(&self) -> usize {
        self.source.len()
    }

    /// Uncompressed bytes accepted so far.
    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    /// Compressed bytes written to the sink so far.
    pub fn total_out(&self) -> u64 {
        self.total_out
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Writing to the sink directly corrupts the frame.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    fn write_header(&mut self) -> Result<()> {
        let codec = self.codec.as_mut().ok_or(Error::Closed)?;
        let n = codec.begin(&mut self.destination)?;
        tracing::debug!(header_len = n, "began lz4 frame");
        self.emit(n)
    }

    fn flush_frame(&mut self) -> Result<()> {
        self.overflow()?;
        let codec = self.codec.as_mut().ok_or(Error::Closed)?;
        let n = codec.flush(&mut self.destination)?;
        self.emit(n)?;
        self.flush_sink()
    }

    fn write_footer(&mut self) -> Result<()> {
        self.overflow()?;
        let codec = self.codec.as_mut().ok_or(Error::Closed)?;
        let n = codec.end(&mut self.destination)?;
        self.emit(n)?;
        self.flush_sink()
    }

    // After the header, a failed codec call leaves the context undefined and a
    // failed sink write drops output the codec has already consumed. Either way
    // the frame cannot be completed: release the codec so that neither later
    // calls nor the drop-time close extend it.
    fn poison_on_err<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            if self.codec.take().is_some() {
                tracing::debug!(error = %err, "abandoning lz4 frame after failure");
                self.failed = true;
            }
        }
        result
    }

    fn flush_sink(&mut self) -> Result<()> {
        loop {
            match self.sink.flush() {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => return other.map_err(Error::from),
            }
        }
    }

    fn emit(&mut self, n: usize) -> Result<()> {
        let bytes = self.destination.get(..n).ok_or_else(|| {
            Error::codec_write(format!(
                "codec reported {n} bytes for a {} byte buffer",
                self.destination.len()
            ))
        })?;
        self.sink.write_all(bytes)?;
        self.total_out += n as u64;
        Ok(())
    }
}

impl<W: Write, C: Compressor> Overflow for Lz4Writer<W, C> {
    fn overflow(&mut self) -> Result<()> {
        let codec = self.codec.as_mut().ok_or(Error::Closed)?;
        let len = std::mem::take(&mut self.pos);
        let result = codec
            .update(&mut self.destination, &self.source[..len])
            .and_then(|n| {
                tracing::trace!(input = len, output = n, "compressed source buffer");
                self.emit(n)
            });
        self.poison_on_err(result)
    }
}

impl<W: Write, C: Compressor> Write for Lz4Writer<W, C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Lz4Writer::flush(self).map_err(Into::into)
    }
}

impl<W: Write, C: Compressor> Drop for Lz4Writer<W, C> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::warn!(error = %err, "failed to finish lz4 frame on drop");
        }
    }
}
