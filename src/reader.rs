//! A buffering reader that decompresses LZ4 frames on demand.

use crate::codec::{Decompressor, FrameDecompressor};
use crate::config::ReaderConfig;
use crate::error::{Error, Result};
use crate::traits::Underflow;
use std::io::{self, BufRead, Read};

// What a fatal error was, so that later reads repeat it in the same category.
#[derive(Debug, Clone, Copy)]
enum Failure {
    Io(io::ErrorKind),
    Codec,
}

/// A reader that decompresses LZ4 frame data pulled lazily from a source.
///
/// Compressed bytes are read from the source into a fixed-size buffer and
/// fed to the decompressor, which fills a fixed-size output buffer. Callers
/// see that output one span at a time, through [`read_byte`](Lz4Reader::read_byte),
/// [`peek`](Lz4Reader::peek) or the `Read`/`BufRead` implementations.
///
/// Concatenated frames are decoded back to back. The end of the source is a
/// clean end of stream only on a frame boundary; ending inside a frame is an
/// [`Error::CodecRead`].
pub struct Lz4Reader<R: Read, D: Decompressor = FrameDecompressor> {
    source: R,
    codec: D,
    input: Box<[u8]>,
    // offset <= filled <= input.len()
    offset: usize,
    filled: usize,
    output: Box<[u8]>,
    // pos <= end <= output.len()
    pos: usize,
    end: usize,
    frame_open: bool,
    failure: Option<Failure>,
    total_in: u64,
    total_out: u64,
}

impl<R: Read> Lz4Reader<R> {
    /// Creates a reader with the default configuration.
    pub fn new(source: R) -> Result<Self> {
        Self::with_config(source, &ReaderConfig::default())
    }

    pub fn with_config(source: R, config: &ReaderConfig) -> Result<Self> {
        config.validate()?;
        let codec = FrameDecompressor::new()?;
        Self::with_decompressor(source, codec, config)
    }
}

impl<R: Read, D: Decompressor> Lz4Reader<R, D> {
    /// Creates a reader around an already constructed decompressor.
    pub fn with_decompressor(source: R, decompressor: D, config: &ReaderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source,
            codec: decompressor,
            input: vec![0u8; config.source_buffer_size].into_boxed_slice(),
            offset: 0,
            filled: 0,
            output: vec![0u8; config.destination_buffer_size].into_boxed_slice(),
            pos: 0,
            end: 0,
            frame_open: false,
            failure: None,
            total_in: 0,
            total_out: 0,
        })
    }

    /// Returns the next decompressed byte without consuming it.
    pub fn peek(&mut self) -> Result<Option<u8>> {
        self.underflow()
    }

    /// Returns and consumes the next decompressed byte.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        let byte = self.underflow()?;
        if byte.is_some() {
            self.pos += 1;
        }
        Ok(byte)
    }

    /// Returns the current readable span, decompressing more if it is empty.
    /// An empty span means end of stream.
    pub fn fill(&mut self) -> Result<&[u8]> {
        if self.pos == self.end {
            self.underflow()?;
        }
        Ok(&self.output[self.pos..self.end])
    }

    /// Marks `amt` bytes of the current span as read.
    pub fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.end);
    }

    /// Compressed bytes pulled from the source so far.
    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    /// Decompressed bytes produced so far.
    pub fn total_out(&self) -> u64 {
        self.total_out
    }

    pub fn get_ref(&self) -> &R {
        &self.source
    }

    /// Reading from the source directly desynchronizes the decoder.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.source
    }

    /// Returns the source. Buffered compressed bytes are lost.
    pub fn into_inner(self) -> R {
        self.source
    }

    fn refill(&mut self) -> Result<()> {
        let n = loop {
            match self.source.read(&mut self.input) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };
        self.offset = 0;
        self.filled = n;
        self.total_in += n as u64;
        tracing::trace!(bytes = n, "refilled source buffer");
        Ok(())
    }

    // One pass of the underflow loop. Ok(true) when output is ready,
    // Ok(false) on a clean end of stream, Err(None) to go round again.
    fn decode_step(&mut self) -> std::result::Result<bool, Option<Error>> {
        if self.offset == self.filled {
            self.refill().map_err(Some)?;
        }
        let input = &self.input[self.offset..self.filled];
        if input.is_empty() && !self.frame_open {
            return Ok(false);
        }

        let progress = self
            .codec
            .decompress(&mut self.output, input)
            .map_err(Some)?;
        if progress.consumed > input.len() || progress.produced > self.output.len() {
            return Err(Some(Error::codec_read(format!(
                "codec reported {} bytes consumed and {} produced for {} in and {} out",
                progress.consumed,
                progress.produced,
                input.len(),
                self.output.len()
            ))));
        }
        let source_exhausted = input.is_empty();
        self.offset += progress.consumed;
        self.frame_open = !progress.frame_complete();

        if progress.produced > 0 {
            self.pos = 0;
            self.end = progress.produced;
            self.total_out += progress.produced as u64;
            return Ok(true);
        }
        if source_exhausted {
            // The source has ended and the codec has nothing left to give.
            return Err(Some(Error::codec_read(
                "unexpected end of stream inside an lz4 frame",
            )));
        }
        if progress.consumed == 0 {
            return Err(Some(Error::codec_read("lz4 decoder made no progress")));
        }
        Err(None)
    }
}

impl<R: Read, D: Decompressor> Underflow for Lz4Reader<R, D> {
    fn underflow(&mut self) -> Result<Option<u8>> {
        if self.pos < self.end {
            return Ok(Some(self.output[self.pos]));
        }
        if let Some(failure) = self.failure {
            const UNUSABLE: &str = "reader is unusable after a failed read";
            return Err(match failure {
                Failure::Io(kind) => Error::Io(io::Error::new(kind, UNUSABLE)),
                Failure::Codec => Error::codec_read(UNUSABLE),
            });
        }
        loop {
            match self.decode_step() {
                Ok(true) => return Ok(Some(self.output[self.pos])),
                Ok(false) => return Ok(None),
                Err(None) => continue,
                Err(Some(err)) => {
                    if err.is_fatal() {
                        self.failure = Some(match &err {
                            Error::Io(e) => Failure::Io(e.kind()),
                            _ => Failure::Codec,
                        });
                    }
                    return Err(err);
                }
            }
        }
    }
}

impl<R: Read, D: Decompressor> Read for Lz4Reader<R, D> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let available = self.fill()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        Lz4Reader::consume(self, n);
        Ok(n)
    }
}

impl<R: Read, D: Decompressor> BufRead for Lz4Reader<R, D> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.fill().map_err(Into::into)
    }

    fn consume(&mut self, amt: usize) {
        Lz4Reader::consume(self, amt)
    }
}
