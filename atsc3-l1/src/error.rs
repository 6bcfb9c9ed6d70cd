//! Error types for Layer-1 signaling decode.

use thiserror::Error;

/// Errors produced while decoding tuner-supplied L1 signaling data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum L1Error {
    /// Base64 input length is not a multiple of four.
    #[error("Base64 length {0} is not a multiple of 4")]
    Base64BadLength(usize),

    /// A character outside the standard base64 alphabet.
    #[error("Invalid base64 character {ch:?} at offset {offset}")]
    Base64BadChar { ch: char, offset: usize },

    /// Padding appeared somewhere other than the final one or two positions.
    #[error("Base64 padding at offset {0} is not in the final positions")]
    Base64BadPadding(usize),

    /// The bit reader could not satisfy a read before end-of-buffer.
    #[error("Bitstream truncated: needed {needed} bits at bit offset {position}")]
    Truncated { needed: u32, position: usize },
}
