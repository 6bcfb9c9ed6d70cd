//! Layer-1 Basic signaling decode.
//!
//! L1-Basic is a fixed 200-bit structure at the front of the payload. Two
//! field groups branch on earlier values; both arms of each branch consume
//! the same total width, which keeps every later field offset stable.

use std::fmt;

use crate::bits::BitReader;
use crate::error::L1Error;
use crate::fields::{FftSize, GuardInterval};
use crate::report::Line;

/// Total width of the L1-Basic structure in bits.
pub const L1_BASIC_BITS: usize = 200;

/// Width of the frame-length field group, excluding its mode bit.
const FRAME_LENGTH_BITS: usize = 23;

/// Width of the version-gated tail preceding the CRC.
const BASIC_TAIL_BITS: usize = 48;

/// Time information precision (2-bit code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInfoPrecision {
    NotIncluded,
    Millis,
    Micros,
    Nanos,
}

impl TimeInfoPrecision {
    fn from_code(code: u64) -> Self {
        match code {
            0 => TimeInfoPrecision::NotIncluded,
            1 => TimeInfoPrecision::Millis,
            2 => TimeInfoPrecision::Micros,
            _ => TimeInfoPrecision::Nanos,
        }
    }

    /// Whether L1-Detail carries the second/millisecond fields at all.
    pub fn includes_seconds(&self) -> bool {
        !matches!(self, TimeInfoPrecision::NotIncluded)
    }

    pub fn includes_micros(&self) -> bool {
        matches!(self, TimeInfoPrecision::Micros | TimeInfoPrecision::Nanos)
    }

    pub fn includes_nanos(&self) -> bool {
        matches!(self, TimeInfoPrecision::Nanos)
    }
}

impl fmt::Display for TimeInfoPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeInfoPrecision::NotIncluded => write!(f, "Not included"),
            TimeInfoPrecision::Millis => write!(f, "ms precision"),
            TimeInfoPrecision::Micros => write!(f, "us precision"),
            TimeInfoPrecision::Nanos => write!(f, "ns precision"),
        }
    }
}

/// PAPR reduction mode (2-bit code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaprReduction {
    None,
    ToneReservation,
    Ace,
    Both,
}

impl PaprReduction {
    fn from_code(code: u64) -> Self {
        match code {
            0 => PaprReduction::None,
            1 => PaprReduction::ToneReservation,
            2 => PaprReduction::Ace,
            _ => PaprReduction::Both,
        }
    }
}

impl fmt::Display for PaprReduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaprReduction::None => write!(f, "None"),
            PaprReduction::ToneReservation => write!(f, "Tone reservation only"),
            PaprReduction::Ace => write!(f, "ACE only"),
            PaprReduction::Both => write!(f, "Both TR and ACE"),
        }
    }
}

/// FEC mode protecting the L1-Detail payload itself (3-bit code).
///
/// This table is distinct from the per-PLP FEC type signalled in L1-Detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum L1BasicFecMode {
    Mode1,
    Mode2,
    Mode3,
    Mode4,
    Mode5,
    Mode6,
    Mode7,
    Reserved(u8),
}

impl L1BasicFecMode {
    fn from_code(code: u64) -> Self {
        match code {
            0 => L1BasicFecMode::Mode1,
            1 => L1BasicFecMode::Mode2,
            2 => L1BasicFecMode::Mode3,
            3 => L1BasicFecMode::Mode4,
            4 => L1BasicFecMode::Mode5,
            5 => L1BasicFecMode::Mode6,
            6 => L1BasicFecMode::Mode7,
            _ => L1BasicFecMode::Reserved(code as u8),
        }
    }
}

impl fmt::Display for L1BasicFecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            L1BasicFecMode::Mode1 => write!(f, "Mode 1"),
            L1BasicFecMode::Mode2 => write!(f, "Mode 2"),
            L1BasicFecMode::Mode3 => write!(f, "Mode 3"),
            L1BasicFecMode::Mode4 => write!(f, "Mode 4"),
            L1BasicFecMode::Mode5 => write!(f, "Mode 5"),
            L1BasicFecMode::Mode6 => write!(f, "Mode 6"),
            L1BasicFecMode::Mode7 => write!(f, "Mode 7"),
            L1BasicFecMode::Reserved(code) => write!(f, "Reserved ({})", code),
        }
    }
}

/// Frame length signalling; both variants occupy exactly 23 bits after the
/// mode bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLength {
    /// Frame duration aligned to wall-clock time.
    TimeAligned {
        frame_length: u16,
        excess_samples: u16,
    },
    /// Frame duration aligned to OFDM symbol boundaries.
    SymbolAligned {
        time_offset: u16,
        additional_samples: u8,
    },
}

fn read_frame_length(r: &mut BitReader, lines: &mut Vec<Line>) -> Result<FrameLength, L1Error> {
    let start = r.position();
    let value = if r.read(1)? == 0 {
        lines.push(Line::text("L1B_frame_length_mode: Time-aligned"));
        let frame_length = r.read(10)? as u16;
        lines.push(Line::text(format!("  L1B_frame_length: {}", frame_length)));
        let excess_samples = r.read(13)? as u16;
        lines.push(Line::text(format!(
            "  L1B_excess_samples_per_symbol: {}",
            excess_samples
        )));
        FrameLength::TimeAligned {
            frame_length,
            excess_samples,
        }
    } else {
        lines.push(Line::text("L1B_frame_length_mode: Symbol-aligned"));
        let time_offset = r.read(16)? as u16;
        lines.push(Line::text(format!("  L1B_time_offset: {}", time_offset)));
        let additional_samples = r.read(7)? as u8;
        lines.push(Line::text(format!(
            "  L1B_additional_samples: {}",
            additional_samples
        )));
        FrameLength::SymbolAligned {
            time_offset,
            additional_samples,
        }
    };
    debug_assert_eq!(r.position() - start, 1 + FRAME_LENGTH_BITS);
    Ok(value)
}

/// Version-gated tail of L1-Basic; both variants occupy exactly 48 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicTail {
    /// Version >= 1: explicit first-subframe mimo-mixed flag, then reserved
    /// bits.
    MimoMixed { first_sub_mimo_mixed: bool },
    /// Earlier versions carry only reserved bits; the flag is implicitly
    /// clear.
    Legacy,
}

impl BasicTail {
    pub fn first_sub_mimo_mixed(&self) -> bool {
        matches!(
            self,
            BasicTail::MimoMixed {
                first_sub_mimo_mixed: true
            }
        )
    }
}

fn read_basic_tail(
    r: &mut BitReader,
    version: u8,
    lines: &mut Vec<Line>,
) -> Result<BasicTail, L1Error> {
    let start = r.position();
    let tail = if version >= 1 {
        let flag = r.read(1)?;
        lines.push(Line::text(format!("L1B_first_sub_mimo_mixed: {}", flag)));
        r.skip(47)?;
        BasicTail::MimoMixed {
            first_sub_mimo_mixed: flag == 1,
        }
    } else {
        r.skip(48)?;
        BasicTail::Legacy
    };
    debug_assert_eq!(r.position() - start, BASIC_TAIL_BITS);
    Ok(tail)
}

/// Values carried from L1-Basic into the L1-Detail decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L1BasicSummary {
    pub version: u8,
    pub time_info: TimeInfoPrecision,
    /// Actual subframe count; the stream encodes count minus one.
    pub num_subframes: u16,
    /// L1-Detail size in bytes, including its trailing CRC.
    pub detail_size_bytes: u16,
    pub first_sub_mimo: bool,
    pub first_sub_sbs_first: bool,
    pub first_sub_sbs_last: bool,
    pub first_sub_mimo_mixed: bool,
}

/// Decode the L1-Basic section, appending its display lines and returning
/// the values the L1-Detail decode depends on.
///
/// The trailing CRC is decoded for display only; it is not validated.
pub fn decode(r: &mut BitReader, lines: &mut Vec<Line>) -> Result<L1BasicSummary, L1Error> {
    let start = r.position();
    lines.push(Line::text("--- L1-Basic Signaling ---"));

    let version = r.read(3)? as u8;
    lines.push(Line::text(format!("L1B_version: {}", version)));

    let pilot = r.read(1)?;
    lines.push(Line::text(format!(
        "L1B_mimo_scattered_pilot_encoding: {}",
        if pilot == 0 {
            "Walsh-Hadamard"
        } else {
            "Null pilots"
        }
    )));

    let lls = r.read(1)?;
    lines.push(Line::text(format!(
        "L1B_lls_flag: {}",
        if lls == 0 { "No LLS" } else { "LLS present" }
    )));

    let time_info = TimeInfoPrecision::from_code(r.read(2)?);
    lines.push(Line::text(format!("L1B_time_info_flag: {}", time_info)));

    let return_channel = r.read(1)?;
    lines.push(Line::text(format!(
        "L1B_return_channel_flag: {}",
        return_channel
    )));

    let papr = PaprReduction::from_code(r.read(2)?);
    lines.push(Line::text(format!("L1B_papr_reduction: {}", papr)));

    let _frame_length = read_frame_length(r, lines)?;

    let num_subframes = r.read(8)? as u16 + 1;
    lines.push(Line::text(format!("L1B_num_subframes: {}", num_subframes)));

    let preamble_symbols = r.read(3)? + 1;
    lines.push(Line::text(format!(
        "L1B_preamble_num_symbols: {}",
        preamble_symbols
    )));

    let preamble_reduced = r.read(3)?;
    lines.push(Line::text(format!(
        "L1B_preamble_reduced_carriers: {}",
        preamble_reduced
    )));

    let content_tag = r.read(2)?;
    lines.push(Line::text(format!(
        "L1B_L1_Detail_content_tag: {}",
        content_tag
    )));

    let detail_size_bytes = r.read(13)? as u16;
    lines.push(Line::text(format!(
        "L1B_L1_Detail_size_bytes: {}",
        detail_size_bytes
    )));

    let detail_fec = L1BasicFecMode::from_code(r.read(3)?);
    lines.push(Line::text(format!("L1B_L1_Detail_fec_type: {}", detail_fec)));

    let parity_mode = r.read(2)?;
    lines.push(Line::text(format!(
        "L1B_L1_additional_parity_mode: K={}",
        parity_mode
    )));

    let total_cells = r.read(19)?;
    lines.push(Line::text(format!(
        "L1B_L1_Detail_total_cells: {}",
        total_cells
    )));

    let first_sub_mimo = r.read(1)? == 1;
    lines.push(Line::text(format!(
        "L1B_first_sub_mimo: {}",
        if first_sub_mimo { "MIMO" } else { "No MIMO" }
    )));

    let miso = r.read(2)?;
    lines.push(Line::text(format!("L1B_first_sub_miso: {}", miso)));

    let fft = FftSize::from_code(r.read(2)?);
    lines.push(Line::text(format!("L1B_first_sub_fft_size: {}", fft)));

    let reduced_carriers = r.read(3)?;
    lines.push(Line::text(format!(
        "L1B_first_sub_reduced_carriers: {}",
        reduced_carriers
    )));

    let guard = GuardInterval::from_code(r.read(4)?);
    lines.push(Line::text(format!("L1B_first_sub_guard_interval: {}", guard)));

    let ofdm_symbols = r.read(11)? + 1;
    lines.push(Line::text(format!(
        "L1B_first_sub_num_ofdm_symbols: {}",
        ofdm_symbols
    )));

    let pilot_pattern = r.read(5)?;
    lines.push(Line::text(format!(
        "L1B_first_sub_scattered_pilot_pattern: {}",
        pilot_pattern
    )));

    let pilot_boost = r.read(3)?;
    lines.push(Line::text(format!(
        "L1B_first_sub_scattered_pilot_boost: {}",
        pilot_boost
    )));

    let sbs_first = r.read(1)?;
    lines.push(Line::text(format!("L1B_first_sub_sbs_first: {}", sbs_first)));

    let sbs_last = r.read(1)?;
    lines.push(Line::text(format!("L1B_first_sub_sbs_last: {}", sbs_last)));

    let tail = read_basic_tail(r, version, lines)?;

    let crc = r.read(32)?;
    lines.push(Line::text(format!("L1B_crc: 0x{:08x}", crc)));

    debug_assert_eq!(r.position() - start, L1_BASIC_BITS);

    Ok(L1BasicSummary {
        version,
        time_info,
        num_subframes,
        detail_size_bytes,
        first_sub_mimo,
        first_sub_sbs_first: sbs_first == 1,
        first_sub_sbs_last: sbs_last == 1,
        first_sub_mimo_mixed: tail.first_sub_mimo_mixed(),
    })
}
