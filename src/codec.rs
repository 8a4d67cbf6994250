//! The frame codec seam and its liblz4 implementation.
//!
//! The adapters never talk to liblz4 directly. They drive a [`Compressor`] or
//! a [`Decompressor`], which keeps the buffering logic testable with scripted
//! codecs and keeps every `unsafe` call in this module.

use crate::config::{BlockMode, BlockSize, FramePreferences};
use crate::error::{Error, Result};
use lz4::liblz4::{
    BlockChecksum, ContentChecksum, FrameType, LZ4FCompressionContext, LZ4FDecompressionContext,
    LZ4FFrameInfo, LZ4FPreferences, LZ4F_compressBegin, LZ4F_compressBound, LZ4F_compressEnd,
    LZ4F_compressUpdate, LZ4F_createCompressionContext, LZ4F_createDecompressionContext,
    LZ4F_decompress, LZ4F_flush, LZ4F_freeCompressionContext, LZ4F_freeDecompressionContext,
    LZ4F_getErrorName, LZ4F_isError, LZ4F_VERSION,
};
use std::ffi::CStr;
use std::ptr;

/// Largest possible frame header, in bytes.
pub const FRAME_HEADER_MAX: usize = 19;

/// The LZ4 frame magic number, little-endian at the start of every frame.
pub const FRAME_MAGIC: u32 = 0x184D_2204;

/// A streaming frame compressor.
///
/// A frame is produced by exactly one `begin`, any number of `update`/`flush`
/// calls, and exactly one `end`. Every call writes into `dst` and returns the
/// number of bytes written; `dst` must hold at least `bound(src.len())` bytes.
pub trait Compressor {
    /// Worst-case output size of a single `update` with `src_len` input bytes.
    /// Also large enough for `begin`, `flush` and `end`.
    fn bound(&self, src_len: usize) -> usize;

    /// Writes the frame header.
    fn begin(&mut self, dst: &mut [u8]) -> Result<usize>;

    /// Compresses `src`. May legitimately write nothing while the codec buffers input.
    fn update(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize>;

    /// Emits any input buffered inside the codec as a complete block.
    fn flush(&mut self, dst: &mut [u8]) -> Result<usize>;

    /// Flushes and writes the frame footer.
    fn end(&mut self, dst: &mut [u8]) -> Result<usize>;
}

/// Outcome of a single [`Decompressor::decompress`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Decompressed bytes written to `dst`.
    pub produced: usize,
    /// Compressed bytes read from `src`.
    pub consumed: usize,
    /// Bytes the codec expects next. Zero once a frame has been fully decoded.
    pub hint: usize,
}

impl Progress {
    /// True when the codec sits on a frame boundary.
    pub fn frame_complete(&self) -> bool {
        self.hint == 0
    }
}

/// A streaming frame decompressor.
///
/// Frame boundaries are implicit in the input: after a frame completes the
/// next call starts decoding a new one.
pub trait Decompressor {
    fn decompress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<Progress>;
}

fn check(code: usize) -> std::result::Result<usize, String> {
    unsafe {
        if LZ4F_isError(code) != 0 {
            let name = CStr::from_ptr(LZ4F_getErrorName(code));
            return Err(name.to_string_lossy().into_owned());
        }
    }
    Ok(code)
}

fn to_lz4_preferences(prefs: &FramePreferences) -> LZ4FPreferences {
    LZ4FPreferences {
        frame_info: LZ4FFrameInfo {
            block_size_id: match prefs.block_size {
                BlockSize::Default => lz4::liblz4::BlockSize::Default,
                BlockSize::Max64KB => lz4::liblz4::BlockSize::Max64KB,
                BlockSize::Max256KB => lz4::liblz4::BlockSize::Max256KB,
                BlockSize::Max1MB => lz4::liblz4::BlockSize::Max1MB,
                BlockSize::Max4MB => lz4::liblz4::BlockSize::Max4MB,
            },
            block_mode: match prefs.block_mode {
                BlockMode::Linked => lz4::liblz4::BlockMode::Linked,
                BlockMode::Independent => lz4::liblz4::BlockMode::Independent,
            },
            content_checksum_flag: if prefs.content_checksum {
                ContentChecksum::ChecksumEnabled
            } else {
                ContentChecksum::NoChecksum
            },
            frame_type: FrameType::Frame,
            content_size: 0,
            dict_id: 0,
            block_checksum_flag: if prefs.block_checksum {
                BlockChecksum::BlockChecksumEnabled
            } else {
                BlockChecksum::NoBlockChecksum
            },
        },
        compression_level: prefs.level,
        auto_flush: u32::from(prefs.auto_flush),
        favor_dec_speed: u32::from(prefs.favor_dec_speed),
        reserved: [0; 3],
    }
}

/// liblz4 frame compression context.
///
/// The context is created in [`FrameCompressor::new`] and freed when the value is dropped.
pub struct FrameCompressor {
    ctx: LZ4FCompressionContext,
    preferences: LZ4FPreferences,
}

impl FrameCompressor {
    pub fn new(preferences: &FramePreferences) -> Result<Self> {
        let mut ctx = LZ4FCompressionContext(ptr::null_mut());
        let code = unsafe { LZ4F_createCompressionContext(&mut ctx, LZ4F_VERSION) };
        check(code).map_err(Error::codec_init)?;
        tracing::debug!(level = preferences.level, "created lz4 compression context");
        Ok(Self {
            ctx,
            preferences: to_lz4_preferences(preferences),
        })
    }
}

impl Compressor for FrameCompressor {
    fn bound(&self, src_len: usize) -> usize {
        let bound = unsafe { LZ4F_compressBound(src_len, &self.preferences) };
        bound.max(FRAME_HEADER_MAX)
    }

    fn begin(&mut self, dst: &mut [u8]) -> Result<usize> {
        let code = unsafe {
            LZ4F_compressBegin(self.ctx, dst.as_mut_ptr(), dst.len(), &self.preferences)
        };
        check(code).map_err(Error::codec_write)
    }

    fn update(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize> {
        let code = unsafe {
            LZ4F_compressUpdate(
                self.ctx,
                dst.as_mut_ptr(),
                dst.len(),
                src.as_ptr(),
                src.len(),
                ptr::null(),
            )
        };
        check(code).map_err(Error::codec_write)
    }

    fn flush(&mut self, dst: &mut [u8]) -> Result<usize> {
        let code = unsafe { LZ4F_flush(self.ctx, dst.as_mut_ptr(), dst.len(), ptr::null()) };
        check(code).map_err(Error::codec_write)
    }

    fn end(&mut self, dst: &mut [u8]) -> Result<usize> {
        let code =
            unsafe { LZ4F_compressEnd(self.ctx, dst.as_mut_ptr(), dst.len(), ptr::null()) };
        check(code).map_err(Error::codec_write)
    }
}

impl Drop for FrameCompressor {
    fn drop(&mut self) {
        unsafe {
            LZ4F_freeCompressionContext(self.ctx);
        }
        tracing::debug!("freed lz4 compression context");
    }
}

/// liblz4 frame decompression context.
///
/// The context is created in [`FrameDecompressor::new`] and freed when the value is dropped.
pub struct FrameDecompressor {
    ctx: LZ4FDecompressionContext,
}

impl FrameDecompressor {
    pub fn new() -> Result<Self> {
        let mut ctx = LZ4FDecompressionContext(ptr::null_mut());
        let code = unsafe { LZ4F_createDecompressionContext(&mut ctx, LZ4F_VERSION) };
        check(code).map_err(Error::codec_init)?;
        tracing::debug!("created lz4 decompression context");
        Ok(Self { ctx })
    }
}

impl Decompressor for FrameDecompressor {
    fn decompress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<Progress> {
        let mut produced = dst.len();
        let mut consumed = src.len();
        let code = unsafe {
            LZ4F_decompress(
                self.ctx,
                dst.as_mut_ptr(),
                &mut produced,
                src.as_ptr(),
                &mut consumed,
                ptr::null(),
            )
        };
        let hint = check(code).map_err(Error::codec_read)?;
        Ok(Progress {
            produced,
            consumed,
            hint,
        })
    }
}

impl Drop for FrameDecompressor {
    fn drop(&mut self) {
        unsafe {
            LZ4F_freeDecompressionContext(self.ctx);
        }
        tracing::debug!("freed lz4 decompression context");
    }
}
