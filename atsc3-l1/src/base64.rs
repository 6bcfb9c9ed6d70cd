//! Base64 decoding of the tuner-exposed signaling blob.
//!
//! Tuners expose the raw L1 payload as a standard-alphabet base64 string.
//! The decoder is strict: a bad length, a foreign character, or padding
//! outside the final positions rejects the whole input.

use bytes::Bytes;

use crate::error::L1Error;

/// Map one alphabet character to its 6-bit value.
fn symbol_value(b: u8) -> Option<u8> {
    match b {
        b'A'..=b'Z' => Some(b - b'A'),
        b'a'..=b'z' => Some(b - b'a' + 26),
        b'0'..=b'9' => Some(b - b'0' + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}

/// Decode a standard-alphabet base64 string with `=` padding.
///
/// Empty input decodes to an empty buffer. The decoded length is
/// `3 * len / 4` minus one byte per trailing pad character.
pub fn decode(input: &str) -> Result<Bytes, L1Error> {
    let raw = input.as_bytes();
    if raw.is_empty() {
        return Ok(Bytes::new());
    }
    if raw.len() % 4 != 0 {
        return Err(L1Error::Base64BadLength(raw.len()));
    }

    // One pad closes a 2-byte tail group, two pads a 1-byte tail group.
    let pads = raw.iter().rev().take_while(|&&b| b == b'=').count().min(2);
    for (offset, &b) in raw.iter().enumerate() {
        if b == b'=' {
            if offset < raw.len() - pads {
                return Err(L1Error::Base64BadPadding(offset));
            }
        } else if symbol_value(b).is_none() {
            return Err(L1Error::Base64BadChar {
                ch: b as char,
                offset,
            });
        }
    }

    let mut out = Vec::with_capacity(raw.len() / 4 * 3 - pads);
    for group in raw.chunks_exact(4) {
        let mut acc = 0u32;
        for &b in group {
            // Pads decode as zero fill; validated above.
            let v = symbol_value(b).unwrap_or(0);
            acc = (acc << 6) | u32::from(v);
        }
        out.push((acc >> 16) as u8);
        if group[2] != b'=' {
            out.push((acc >> 8) as u8);
        }
        if group[3] != b'=' {
            out.push(acc as u8);
        }
    }

    Ok(Bytes::from(out))
}
