//! ATSC 3.0 Layer-1 signaling decoding.
//!
//! Tuners expose the Layer-1 physical-layer signaling of an ATSC 3.0
//! broadcast (L1-Basic followed by L1-Detail) as a base64 status value.
//! This crate decodes that bit-packed structure into ordered display lines
//! and annotates ModCod pairings with the receive SNR they require.
//!
//! The device side (discovery, tuning, status polling) is a separate
//! concern: callers hand over the captured strings and get lines back.
//!
//! # Example
//!
//! ```rust
//! use atsc3_l1::{DecodeOptions, DetailReport};
//!
//! let plpinfo = "bsid=2600\n0: mod=qam256 cod=10/15 layer=core";
//! let report = DetailReport::build(Some(plpinfo), None, None, &DecodeOptions::default());
//! assert_eq!(report.lines[1].as_str(), "L1D BSID: 2600 (0xA28)");
//! assert_eq!(
//!     report.lines[5].as_str(),
//!     "  -> Required SNR: Min 14.18 dB, Max 17.61 dB"
//! );
//! ```

pub mod base64;
pub mod bits;
pub mod error;
pub mod fields;
pub mod l1_basic;
pub mod l1_detail;
pub mod modcod;
pub mod report;
pub mod status;

#[cfg(test)]
pub(crate) mod testutil;

pub use bits::BitReader;
pub use error::L1Error;
pub use l1_basic::{L1BasicSummary, L1_BASIC_BITS};
pub use l1_detail::DecodeOptions;
pub use modcod::{normalize_modulation, snr_for_modcod, ModcodSnr};
pub use report::{decode_l1, DetailReport, Line, SEPARATOR_TOKEN};
