//! Stream compression stage.
//!
//! The default stage is a zlib stream (RFC 1950):
//!
//! ```text
//! +--------+-------------------+----------+
//! | header | deflate blocks    | adler-32 |
//! | 2 bytes| variable          | 4 bytes  |
//! +--------+-------------------+----------+
//! ```

use crate::error::DecodeError;
use crate::{DEFAULT_COMPRESSION_LEVEL, MAX_RECORD_SIZE};
use flate2::write::ZlibEncoder;
use flate2::{Decompress, FlushDecompress, Status};
use std::io::Write;

/// Wraps a serialized record for transmission and unwraps it on receipt.
pub trait Compression {
    /// Compresses a record into a self-contained block.
    fn compress(&self, record: &[u8]) -> Vec<u8>;

    /// Restores the record, failing with [`DecodeError::Corrupt`].
    fn decompress(&self, block: &[u8]) -> Result<Vec<u8>, DecodeError>;
}

/// zlib stream compression.
#[derive(Debug, Clone, Copy)]
pub struct Zlib {
    level: flate2::Compression,
    max_record_size: usize,
}

impl Zlib {
    /// Creates a zlib stage. Levels above 9 are clamped to 9.
    pub fn new(level: u32) -> Self {
        Self {
            level: flate2::Compression::new(level.min(9)),
            max_record_size: MAX_RECORD_SIZE,
        }
    }

    /// Caps the size of a decompressed record.
    pub fn with_max_record_size(mut self, max_record_size: usize) -> Self {
        self.max_record_size = max_record_size;
        self
    }

    pub fn level(&self) -> u32 {
        self.level.level()
    }

    pub fn max_record_size(&self) -> usize {
        self.max_record_size
    }

    fn too_large(&self) -> DecodeError {
        DecodeError::corrupt(format!(
            "decompressed record exceeds {} bytes",
            self.max_record_size
        ))
    }
}

impl Default for Zlib {
    fn default() -> Self {
        Self::new(DEFAULT_COMPRESSION_LEVEL)
    }
}

impl Compression for Zlib {
    fn compress(&self, record: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::with_capacity(record.len() / 2 + 16), self.level);
        // Writes go to a Vec, which never fails.
        encoder
            .write_all(record)
            .and_then(|()| encoder.finish())
            .expect("in-memory zlib stream")
    }

    fn decompress(&self, block: &[u8]) -> Result<Vec<u8>, DecodeError> {
        let mut inflater = Decompress::new(true);
        let limit = self.max_record_size.saturating_add(1);
        let mut out = Vec::with_capacity(block.len().saturating_mul(4).max(64).min(limit));

        loop {
            if out.len() > self.max_record_size {
                return Err(self.too_large());
            }
            if out.len() == out.capacity() {
                let headroom = limit - out.len();
                out.reserve(out.len().max(256).min(headroom));
            }

            let consumed = inflater.total_in() as usize;
            let produced = inflater.total_out();
            // Finish would demand the whole record fit in the current buffer.
            let status = inflater
                .decompress_vec(&block[consumed..], &mut out, FlushDecompress::None)
                .map_err(|e| DecodeError::Corrupt(e.into()))?;

            match status {
                Status::StreamEnd => {
                    if out.len() > self.max_record_size {
                        return Err(self.too_large());
                    }
                    let trailing = block.len() - inflater.total_in() as usize;
                    if trailing > 0 {
                        return Err(DecodeError::corrupt(format!(
                            "{trailing} trailing bytes after end of stream"
                        )));
                    }
                    return Ok(out);
                }
                Status::Ok | Status::BufError => {
                    let stalled = inflater.total_in() as usize == consumed
                        && inflater.total_out() == produced;
                    if stalled {
                        return Err(DecodeError::corrupt("truncated compressed stream"));
                    }
                }
            }
        }
    }
}

/// Pass-through stage for transports that compress on their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uncompressed;

impl Compression for Uncompressed {
    fn compress(&self, record: &[u8]) -> Vec<u8> {
        record.to_vec()
    }

    fn decompress(&self, block: &[u8]) -> Result<Vec<u8>, DecodeError> {
        Ok(block.to_vec())
    }
}
