//! Bit-level reading over the decoded signaling payload.
//!
//! The L1 structures are bit-packed MSB-first, with field widths and field
//! presence depending on values decoded earlier in the same stream, so
//! decoding walks the buffer with a single forward cursor.

use bytes::Bytes;

use crate::error::L1Error;

/// Forward-only bit cursor over an immutable byte buffer.
///
/// The cursor advances monotonically and never moves past the end of the
/// buffer: a read that cannot be satisfied parks the cursor at
/// end-of-buffer and fails with [`L1Error::Truncated`]. No value is ever
/// synthesized past the truncation point.
#[derive(Debug, Clone)]
pub struct BitReader {
    data: Bytes,
    /// Cursor position in bits from the start of `data`.
    pos: usize,
}

impl BitReader {
    /// Wrap a decoded payload.
    pub fn new(data: Bytes) -> Self {
        Self { data, pos: 0 }
    }

    /// Current cursor position in bits.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bits left before end-of-buffer.
    pub fn remaining(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    /// Read `count` bits (1..=64) MSB-first as an unsigned integer.
    pub fn read(&mut self, count: u32) -> Result<u64, L1Error> {
        debug_assert!((1..=64).contains(&count));
        if count as usize > self.remaining() {
            let position = self.pos;
            self.pos = self.data.len() * 8;
            return Err(L1Error::Truncated {
                needed: count,
                position,
            });
        }
        let mut value = 0u64;
        for _ in 0..count {
            let byte = self.data[self.pos / 8];
            let bit = (byte >> (7 - self.pos % 8)) & 1;
            value = (value << 1) | u64::from(bit);
            self.pos += 1;
        }
        Ok(value)
    }

    /// Skip `count` reserved or padding bits, with the same truncation
    /// contract as [`BitReader::read`].
    pub fn skip(&mut self, count: usize) -> Result<(), L1Error> {
        if count > self.remaining() {
            let position = self.pos;
            self.pos = self.data.len() * 8;
            return Err(L1Error::Truncated {
                needed: count as u32,
                position,
            });
        }
        self.pos += count;
        Ok(())
    }
}
