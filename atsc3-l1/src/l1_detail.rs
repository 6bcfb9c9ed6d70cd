//! Layer-1 Detail signaling decode.
//!
//! L1-Detail follows L1-Basic in the same bitstream and describes every
//! subframe and every PLP (Physical Layer Pipe) inside it. Its shape is
//! data-dependent: field presence hinges on values decoded in L1-Basic and
//! on values decoded earlier within L1-Detail itself. Subframe 0 reuses the
//! parameter block already signalled in L1-Basic; later subframes signal
//! their own.

use std::fmt;

use log::debug;

use crate::bits::BitReader;
use crate::error::L1Error;
use crate::fields::{FftSize, GuardInterval};
use crate::l1_basic::L1BasicSummary;
use crate::modcod;
use crate::report::Line;

/// Decode behavior that varies with tuner firmware revision.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Skip the padding implied by `L1B_L1_Detail_size_bytes` before the
    /// trailing CRC. Older firmware emits the CRC immediately.
    pub pad_to_detail_size: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            pad_to_detail_size: true,
        }
    }
}

/// PLP layer (2-bit code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlpLayer {
    Core,
    Enhanced,
    Reserved(u8),
}

impl PlpLayer {
    fn from_code(code: u64) -> Self {
        match code {
            0 => PlpLayer::Core,
            1 => PlpLayer::Enhanced,
            _ => PlpLayer::Reserved(code as u8),
        }
    }
}

impl fmt::Display for PlpLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlpLayer::Core => write!(f, "Core"),
            PlpLayer::Enhanced => write!(f, "Enhanced"),
            PlpLayer::Reserved(_) => write!(f, "Reserved"),
        }
    }
}

/// PLP scrambler type (2-bit code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScramblerType {
    Prbs,
    Reserved(u8),
}

impl ScramblerType {
    fn from_code(code: u64) -> Self {
        match code {
            0 => ScramblerType::Prbs,
            _ => ScramblerType::Reserved(code as u8),
        }
    }
}

impl fmt::Display for ScramblerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScramblerType::Prbs => write!(f, "PRBS"),
            ScramblerType::Reserved(_) => write!(f, "Reserved"),
        }
    }
}

/// Per-PLP FEC type (4-bit code). Distinct from the L1-Basic FEC mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlpFecType {
    Bch16kLdpc,
    Bch64kLdpc,
    Crc16kLdpc,
    Crc64kLdpc,
    Ldpc16k,
    Ldpc64k,
    Reserved(u8),
}

impl PlpFecType {
    fn from_code(code: u64) -> Self {
        match code {
            0 => PlpFecType::Bch16kLdpc,
            1 => PlpFecType::Bch64kLdpc,
            2 => PlpFecType::Crc16kLdpc,
            3 => PlpFecType::Crc64kLdpc,
            4 => PlpFecType::Ldpc16k,
            5 => PlpFecType::Ldpc64k,
            _ => PlpFecType::Reserved(code as u8),
        }
    }

    /// Modulation and code-rate fields follow only for the six defined
    /// codes.
    fn has_modcod(&self) -> bool {
        !matches!(self, PlpFecType::Reserved(_))
    }
}

impl fmt::Display for PlpFecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlpFecType::Bch16kLdpc => write!(f, "BCH + 16K LDPC"),
            PlpFecType::Bch64kLdpc => write!(f, "BCH + 64K LDPC"),
            PlpFecType::Crc16kLdpc => write!(f, "CRC + 16K LDPC"),
            PlpFecType::Crc64kLdpc => write!(f, "CRC + 64K LDPC"),
            PlpFecType::Ldpc16k => write!(f, "16K LDPC only"),
            PlpFecType::Ldpc64k => write!(f, "64K LDPC only"),
            PlpFecType::Reserved(_) => write!(f, "Reserved"),
        }
    }
}

/// PLP modulation (4-bit code). The label doubles as the SNR-table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlpModulation {
    Qpsk,
    Qam16,
    Qam64,
    Qam256,
    Qam1024,
    Qam4096,
    Reserved(u8),
}

impl PlpModulation {
    fn from_code(code: u64) -> Self {
        match code {
            0 => PlpModulation::Qpsk,
            1 => PlpModulation::Qam16,
            2 => PlpModulation::Qam64,
            3 => PlpModulation::Qam256,
            4 => PlpModulation::Qam1024,
            5 => PlpModulation::Qam4096,
            _ => PlpModulation::Reserved(code as u8),
        }
    }
}

impl fmt::Display for PlpModulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlpModulation::Qpsk => write!(f, "QPSK"),
            PlpModulation::Qam16 => write!(f, "16QAM"),
            PlpModulation::Qam64 => write!(f, "64QAM"),
            PlpModulation::Qam256 => write!(f, "256QAM"),
            PlpModulation::Qam1024 => write!(f, "1024QAM"),
            PlpModulation::Qam4096 => write!(f, "4096QAM"),
            PlpModulation::Reserved(_) => write!(f, "Reserved"),
        }
    }
}

/// PLP inner code rate (4-bit code). The label doubles as the SNR-table
/// key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlpCodeRate {
    Cr2_15,
    Cr3_15,
    Cr4_15,
    Cr5_15,
    Cr6_15,
    Cr7_15,
    Cr8_15,
    Cr9_15,
    Cr10_15,
    Cr11_15,
    Cr12_15,
    Cr13_15,
    Reserved(u8),
}

impl PlpCodeRate {
    fn from_code(code: u64) -> Self {
        match code {
            0 => PlpCodeRate::Cr2_15,
            1 => PlpCodeRate::Cr3_15,
            2 => PlpCodeRate::Cr4_15,
            3 => PlpCodeRate::Cr5_15,
            4 => PlpCodeRate::Cr6_15,
            5 => PlpCodeRate::Cr7_15,
            6 => PlpCodeRate::Cr8_15,
            7 => PlpCodeRate::Cr9_15,
            8 => PlpCodeRate::Cr10_15,
            9 => PlpCodeRate::Cr11_15,
            10 => PlpCodeRate::Cr12_15,
            11 => PlpCodeRate::Cr13_15,
            _ => PlpCodeRate::Reserved(code as u8),
        }
    }
}

impl fmt::Display for PlpCodeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlpCodeRate::Cr2_15 => write!(f, "2/15"),
            PlpCodeRate::Cr3_15 => write!(f, "3/15"),
            PlpCodeRate::Cr4_15 => write!(f, "4/15"),
            PlpCodeRate::Cr5_15 => write!(f, "5/15"),
            PlpCodeRate::Cr6_15 => write!(f, "6/15"),
            PlpCodeRate::Cr7_15 => write!(f, "7/15"),
            PlpCodeRate::Cr8_15 => write!(f, "8/15"),
            PlpCodeRate::Cr9_15 => write!(f, "9/15"),
            PlpCodeRate::Cr10_15 => write!(f, "10/15"),
            PlpCodeRate::Cr11_15 => write!(f, "11/15"),
            PlpCodeRate::Cr12_15 => write!(f, "12/15"),
            PlpCodeRate::Cr13_15 => write!(f, "13/15"),
            PlpCodeRate::Reserved(_) => write!(f, "Reserved"),
        }
    }
}

/// Time interleaving mode (2-bit code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiMode {
    None,
    Cti,
    Hti,
    Reserved(u8),
}

impl TiMode {
    fn from_code(code: u64) -> Self {
        match code {
            0 => TiMode::None,
            1 => TiMode::Cti,
            2 => TiMode::Hti,
            _ => TiMode::Reserved(code as u8),
        }
    }
}

impl fmt::Display for TiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiMode::None => write!(f, "No TI"),
            TiMode::Cti => write!(f, "CTI"),
            TiMode::Hti => write!(f, "HTI"),
            TiMode::Reserved(_) => write!(f, "Reserved"),
        }
    }
}

/// Per-subframe values that gate later fields. Subframe 0 reuses the
/// values carried from L1-Basic; later subframes decode a fresh copy.
#[derive(Debug, Clone, Copy)]
struct SubframeParams {
    mimo: bool,
    sbs_first: bool,
    sbs_last: bool,
}

fn read_subframe_params(
    r: &mut BitReader,
    lines: &mut Vec<Line>,
) -> Result<SubframeParams, L1Error> {
    let mimo = r.read(1)? == 1;
    lines.push(Line::text(format!(
        "  L1D_mimo: {}",
        if mimo { "MIMO" } else { "No MIMO" }
    )));

    let miso = r.read(2)?;
    lines.push(Line::text(format!("  L1D_miso: {}", miso)));

    let fft = FftSize::from_code(r.read(2)?);
    lines.push(Line::text(format!("  L1D_fft_size: {}", fft)));

    let reduced_carriers = r.read(3)?;
    lines.push(Line::text(format!(
        "  L1D_reduced_carriers: {}",
        reduced_carriers
    )));

    let guard = GuardInterval::from_code(r.read(4)?);
    lines.push(Line::text(format!("  L1D_guard_interval: {}", guard)));

    let ofdm_symbols = r.read(11)? + 1;
    lines.push(Line::text(format!(
        "  L1D_num_ofdm_symbols: {}",
        ofdm_symbols
    )));

    let pilot_pattern = r.read(5)?;
    lines.push(Line::text(format!(
        "  L1D_scattered_pilot_pattern: {}",
        pilot_pattern
    )));

    let pilot_boost = r.read(3)?;
    lines.push(Line::text(format!(
        "  L1D_scattered_pilot_boost: {}",
        pilot_boost
    )));

    let sbs_first = r.read(1)?;
    lines.push(Line::text(format!("  L1D_sbs_first: {}", sbs_first)));

    let sbs_last = r.read(1)?;
    lines.push(Line::text(format!("  L1D_sbs_last: {}", sbs_last)));

    Ok(SubframeParams {
        mimo,
        sbs_first: sbs_first == 1,
        sbs_last: sbs_last == 1,
    })
}

/// Decode one PLP record. `subframe_mimo` is the authoritative MIMO flag
/// for the enclosing subframe; `num_rf` gates the channel-bonding fields.
fn read_plp(
    r: &mut BitReader,
    lines: &mut Vec<Line>,
    subframe_mimo: bool,
    num_rf: u64,
) -> Result<(), L1Error> {
    let id = r.read(6)?;
    lines.push(Line::text(format!("      L1D_plp_id: {}", id)));

    let lls = r.read(1)?;
    lines.push(Line::text(format!("      L1D_plp_lls_flag: {}", lls)));

    let layer = PlpLayer::from_code(r.read(2)?);
    lines.push(Line::text(format!("      L1D_plp_layer: {}", layer)));

    let plp_start = r.read(24)?;
    lines.push(Line::text(format!("      L1D_plp_start: {}", plp_start)));

    let plp_size = r.read(24)?;
    lines.push(Line::text(format!("      L1D_plp_size: {}", plp_size)));

    let scrambler = ScramblerType::from_code(r.read(2)?);
    lines.push(Line::text(format!(
        "      L1D_plp_scrambler_type: {}",
        scrambler
    )));

    let fec_type = PlpFecType::from_code(r.read(4)?);
    lines.push(Line::text(format!("      L1D_plp_fec_type: {}", fec_type)));

    let mut modulation = None;
    if fec_type.has_modcod() {
        let m = PlpModulation::from_code(r.read(4)?);
        lines.push(Line::text(format!("      L1D_plp_mod: {}", m)));

        let c = PlpCodeRate::from_code(r.read(4)?);
        lines.push(Line::text(format!("      L1D_plp_cod: {}", c)));

        if let Some(snr) = modcod::snr_for_modcod(&m.to_string(), &c.to_string()) {
            lines.push(Line::text(format!(
                "  -> Required SNR: Min {:.2} dB, Max {:.2} dB",
                snr.min_snr, snr.max_snr
            )));
        }
        modulation = Some(m);
    }

    let ti_mode = TiMode::from_code(r.read(2)?);
    lines.push(Line::text(format!("      L1D_plp_TI_mode: {}", ti_mode)));

    match ti_mode {
        TiMode::None => {
            let block_start = r.read(15)?;
            lines.push(Line::text(format!(
                "      L1D_plp_fec_block_start: {}",
                block_start
            )));
        }
        TiMode::Cti => {
            let block_start = r.read(22)?;
            lines.push(Line::text(format!(
                "      L1D_plp_CTI_fec_block_start: {}",
                block_start
            )));
        }
        _ => {}
    }

    if num_rf > 0 {
        let bonded = r.read(3)?;
        lines.push(Line::text(format!(
            "      L1D_plp_num_channel_bonded: {}",
            bonded
        )));
        if bonded > 0 {
            let format_sel = r.read(2)?;
            lines.push(Line::text(format!(
                "      L1D_plp_channel_bonding_format: {}",
                format_sel
            )));
            for _ in 0..bonded {
                let rf_id = r.read(3)?;
                lines.push(Line::text(format!(
                    "        L1D_plp_bonded_rf_id: {}",
                    rf_id
                )));
            }
        }
    }

    if subframe_mimo {
        let combining = r.read(1)?;
        lines.push(Line::text(format!(
            "      L1D_plp_mimo_stream_combining: {}",
            combining
        )));
        let iq = r.read(1)?;
        lines.push(Line::text(format!(
            "      L1D_plp_mimo_IQ_interleaving: {}",
            iq
        )));
        let ph = r.read(1)?;
        lines.push(Line::text(format!("      L1D_plp_mimo_PH: {}", ph)));
    }

    if layer == PlpLayer::Core {
        if r.read(1)? == 0 {
            lines.push(Line::text("      L1D_plp_type: non-dispersed"));
        } else {
            lines.push(Line::text("      L1D_plp_type: dispersed"));
            let subslices = r.read(14)? + 1;
            lines.push(Line::text(format!(
                "      L1D_plp_num_subslices: {}",
                subslices
            )));
            let interval = r.read(24)?;
            lines.push(Line::text(format!(
                "      L1D_plp_subslice_interval: {}",
                interval
            )));
        }

        // QPSK PLPs under CTI or HTI carry an extended-interleaving flag.
        if matches!(ti_mode, TiMode::Cti | TiMode::Hti)
            && modulation == Some(PlpModulation::Qpsk)
        {
            let extended = r.read(1)?;
            lines.push(Line::text(format!(
                "      L1D_plp_TI_extended_interleaving: {}",
                extended
            )));
        }

        match ti_mode {
            TiMode::Cti => {
                let depth = r.read(3)?;
                lines.push(Line::text(format!("      L1D_plp_CTI_depth: {}", depth)));
                let start_row = r.read(11)?;
                lines.push(Line::text(format!(
                    "      L1D_plp_CTI_start_row: {}",
                    start_row
                )));
            }
            TiMode::Hti => {
                let inter_subframe = r.read(1)?;
                lines.push(Line::text(format!(
                    "      L1D_plp_HTI_inter_subframe: {}",
                    inter_subframe
                )));
                let ti_blocks = r.read(4)? + 1;
                lines.push(Line::text(format!(
                    "      L1D_plp_HTI_num_ti_blocks: {}",
                    ti_blocks
                )));
                let fec_blocks_max = r.read(12)? + 1;
                lines.push(Line::text(format!(
                    "      L1D_plp_HTI_num_fec_blocks_max: {}",
                    fec_blocks_max
                )));
                if inter_subframe == 0 {
                    let fec_blocks = r.read(12)? + 1;
                    lines.push(Line::text(format!(
                        "      L1D_plp_HTI_num_fec_blocks: {}",
                        fec_blocks
                    )));
                } else {
                    for _ in 0..ti_blocks {
                        let fec_blocks = r.read(12)? + 1;
                        lines.push(Line::text(format!(
                            "        L1D_plp_HTI_num_fec_blocks: {}",
                            fec_blocks
                        )));
                    }
                }
                let cell_interleaver = r.read(1)?;
                lines.push(Line::text(format!(
                    "      L1D_plp_HTI_cell_interleaver: {}",
                    cell_interleaver
                )));
            }
            _ => {}
        }
    } else {
        // Enhanced (and reserved) layers carry only the LDM injection
        // level.
        let ldm = r.read(5)?;
        lines.push(Line::text(format!(
            "      L1D_plp_ldm_injection_level: {}",
            ldm
        )));
    }

    Ok(())
}

/// Decode the L1-Detail section, appending its display lines.
///
/// `basic` carries the L1-Basic values the layout depends on. The reader
/// continues from wherever L1-Basic left it. The trailing CRC is decoded
/// for display only.
pub fn decode(
    r: &mut BitReader,
    basic: &L1BasicSummary,
    lines: &mut Vec<Line>,
    options: &DecodeOptions,
) -> Result<(), L1Error> {
    let detail_start = r.position();

    lines.push(Line::text(" "));
    lines.push(Line::text("--- L1-Detail Signaling ---"));

    let version = r.read(4)?;
    lines.push(Line::text(format!("L1D_version: {}", version)));

    let num_rf = r.read(3)?;
    lines.push(Line::text(format!("L1D_num_rf: {}", num_rf)));
    for _ in 0..num_rf {
        let bonded_bsid = r.read(16)?;
        lines.push(Line::text(format!(
            "  L1D_bonded_bsid: 0x{:04x}",
            bonded_bsid
        )));
        r.skip(3)?;
    }

    if basic.time_info.includes_seconds() {
        let sec = r.read(32)?;
        lines.push(Line::text(format!("L1D_time_sec: {}", sec)));
        let msec = r.read(10)?;
        lines.push(Line::text(format!("L1D_time_msec: {}", msec)));
        if basic.time_info.includes_micros() {
            let usec = r.read(10)?;
            lines.push(Line::text(format!("L1D_time_usec: {}", usec)));
            if basic.time_info.includes_nanos() {
                let nsec = r.read(10)?;
                lines.push(Line::text(format!("L1D_time_nsec: {}", nsec)));
            }
        }
    }

    // PLP count per subframe, kept for the version-2 second pass.
    let mut plp_counts: Vec<u64> = Vec::with_capacity(basic.num_subframes as usize);

    for subframe in 0..basic.num_subframes {
        lines.push(Line::text(" "));
        lines.push(Line::text(format!("Subframe #{}:", subframe)));

        let params = if subframe == 0 {
            SubframeParams {
                mimo: basic.first_sub_mimo,
                sbs_first: basic.first_sub_sbs_first,
                sbs_last: basic.first_sub_sbs_last,
            }
        } else {
            read_subframe_params(r, lines)?
        };

        if basic.num_subframes > 1 {
            let multiplex = r.read(1)?;
            lines.push(Line::text(format!(
                "  L1D_subframe_multiplex: {}",
                multiplex
            )));
        }

        let freq_interleaver = r.read(1)?;
        lines.push(Line::text(format!(
            "  L1D_frequency_interleaver: {}",
            if freq_interleaver == 0 {
                "Preamble Only"
            } else {
                "All Symbols"
            }
        )));

        if params.sbs_first || params.sbs_last {
            let null_cells = r.read(13)?;
            lines.push(Line::text(format!("  L1D_sbs_null_cells: {}", null_cells)));
        }

        let num_plp = r.read(6)? + 1;
        lines.push(Line::text(format!("  L1D_num_plp: {}", num_plp)));
        plp_counts.push(num_plp);

        for plp in 0..num_plp {
            lines.push(Line::text(format!("    PLP #{}:", plp)));
            read_plp(r, lines, params.mimo, num_rf)?;
        }
    }

    if version >= 1 {
        let bsid = r.read(16)?;
        lines.push(Line::text(format!("L1D_bsid: 0x{:04x}", bsid)));
    }

    if version >= 2 {
        for (subframe, &num_plp) in plp_counts.iter().enumerate() {
            let mimo_mixed = if subframe == 0 {
                basic.first_sub_mimo_mixed
            } else {
                let flag = r.read(1)?;
                lines.push(Line::text(format!(
                    "  Subframe #{} L1D_mimo_mixed: {}",
                    subframe, flag
                )));
                flag == 1
            };
            if mimo_mixed {
                for plp in 0..num_plp {
                    let plp_mimo = r.read(1)?;
                    lines.push(Line::text(format!(
                        "    PLP #{} L1D_plp_mimo: {}",
                        plp, plp_mimo
                    )));
                    if plp_mimo == 1 {
                        let combining = r.read(1)?;
                        lines.push(Line::text(format!(
                            "      L1D_plp_mimo_stream_combining: {}",
                            combining
                        )));
                        let iq = r.read(1)?;
                        lines.push(Line::text(format!(
                            "      L1D_plp_mimo_IQ_interleaving: {}",
                            iq
                        )));
                        let ph = r.read(1)?;
                        lines.push(Line::text(format!("      L1D_plp_mimo_PH: {}", ph)));
                    }
                }
            }
        }
    }

    if options.pad_to_detail_size {
        let consumed = r.position() - detail_start;
        let declared = basic.detail_size_bytes as usize * 8;
        if declared >= 32 + consumed {
            let padding = declared - 32 - consumed;
            if padding > 0 {
                debug!("skipping {} padding bits before L1D_crc", padding);
                r.skip(padding)?;
            }
        }
    }

    let crc = r.read(32)?;
    lines.push(Line::text(format!("L1D_crc: 0x{:08x}", crc)));

    Ok(())
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::l1_basic::TimeInfoPrecision;
    use crate::testutil::BitWriter;

    const NO_PAD: DecodeOptions = DecodeOptions {
        pad_to_detail_size: false,
    };

    fn summary() -> L1BasicSummary {
        L1BasicSummary {
            version: 1,
            time_info: TimeInfoPrecision::NotIncluded,
            num_subframes: 1,
            detail_size_bytes: 0,
            first_sub_mimo: false,
            first_sub_sbs_first: false,
            first_sub_sbs_last: false,
            first_sub_mimo_mixed: false,
        }
    }

    /// Detail header: version 1, no bonded RF channels.
    fn push_header(w: &mut BitWriter) {
        w.push(1, 4);
        w.push(0, 3);
    }

    /// Subframe preamble for a single-subframe stream with no SBS cells.
    fn push_subframe_preamble(w: &mut BitWriter, num_plp_minus_one: u64) {
        w.push(1, 1); // frequency interleaver: all symbols
        w.push(num_plp_minus_one, 6);
    }

    /// A core-layer PLP with 256QAM 10/15 and no time interleaving.
    fn push_plain_plp(w: &mut BitWriter) {
        w.push(5, 6); // id
        w.push(1, 1); // lls
        w.push(0, 2); // layer: core
        w.push(0, 24); // start
        w.push(1000, 24); // size
        w.push(0, 2); // scrambler: PRBS
        w.push(1, 4); // fec: BCH + 64K LDPC
        w.push(3, 4); // mod: 256QAM
        w.push(8, 4); // cod: 10/15
        w.push(0, 2); // TI mode: none
        w.push(7, 15); // fec_block_start
        w.push(0, 1); // non-dispersed
    }

    fn push_tail(w: &mut BitWriter) {
        w.push(0x1234, 16); // bsid (version >= 1)
        w.push(0xCAFEF00D, 32); // crc
    }

    fn decode_lines(data: Vec<u8>, basic: &L1BasicSummary, options: &DecodeOptions) -> Vec<String> {
        let mut r = BitReader::new(Bytes::from(data));
        let mut lines = Vec::new();
        decode(&mut r, basic, &mut lines, options).unwrap();
        lines.iter().map(|l| l.as_str().to_string()).collect()
    }

    #[test]
    fn test_single_plp_round_trip() {
        let mut w = BitWriter::new();
        push_header(&mut w);
        push_subframe_preamble(&mut w, 0);
        push_plain_plp(&mut w);
        push_tail(&mut w);

        let lines = decode_lines(w.finish(), &summary(), &NO_PAD);
        assert!(lines.contains(&"L1D_version: 1".to_string()));
        assert!(lines.contains(&"Subframe #0:".to_string()));
        assert!(lines.contains(&"  L1D_num_plp: 1".to_string()));
        assert!(lines.contains(&"      L1D_plp_id: 5".to_string()));
        assert!(lines.contains(&"      L1D_plp_fec_type: BCH + 64K LDPC".to_string()));
        assert!(lines.contains(&"      L1D_plp_mod: 256QAM".to_string()));
        assert!(lines.contains(&"      L1D_plp_cod: 10/15".to_string()));
        assert!(lines.contains(&"  -> Required SNR: Min 14.18 dB, Max 17.61 dB".to_string()));
        assert!(lines.contains(&"      L1D_plp_TI_mode: No TI".to_string()));
        assert!(lines.contains(&"      L1D_plp_fec_block_start: 7".to_string()));
        assert!(lines.contains(&"      L1D_plp_type: non-dispersed".to_string()));
        assert!(lines.contains(&"L1D_bsid: 0x1234".to_string()));
        assert!(lines.contains(&"L1D_crc: 0xcafef00d".to_string()));
    }

    #[test]
    fn test_plp_count_off_by_one() {
        for raw in [0u64, 1, 3] {
            let mut w = BitWriter::new();
            push_header(&mut w);
            push_subframe_preamble(&mut w, raw);
            for _ in 0..=raw {
                push_plain_plp(&mut w);
            }
            push_tail(&mut w);

            let lines = decode_lines(w.finish(), &summary(), &NO_PAD);
            let plp_headers = lines.iter().filter(|l| l.starts_with("    PLP #")).count();
            assert_eq!(plp_headers as u64, raw + 1);
        }
    }

    #[test]
    fn test_subframe_count_off_by_one() {
        for count in [2u16, 3] {
            let mut basic = summary();
            basic.num_subframes = count;

            let mut w = BitWriter::new();
            push_header(&mut w);
            for subframe in 0..count {
                if subframe > 0 {
                    // Fresh per-subframe parameter block, all plain.
                    w.push(0, 1); // mimo
                    w.push(0, 2); // miso
                    w.push(1, 2); // fft 16K
                    w.push(0, 3); // reduced carriers
                    w.push(5, 4); // guard interval
                    w.push(63, 11); // ofdm symbols
                    w.push(0, 5); // pilot pattern
                    w.push(0, 3); // pilot boost
                    w.push(0, 1); // sbs_first
                    w.push(0, 1); // sbs_last
                }
                w.push(0, 1); // subframe multiplex (present: count > 1)
                w.push(1, 1); // frequency interleaver
                w.push(0, 6); // one PLP
                push_plain_plp(&mut w);
            }
            push_tail(&mut w);

            let lines = decode_lines(w.finish(), &basic, &NO_PAD);
            let subframe_headers = lines
                .iter()
                .filter(|l| l.starts_with("Subframe #"))
                .count();
            assert_eq!(subframe_headers as u16, count);
            assert!(lines.contains(&"  L1D_fft_size: 16K".to_string()));
            assert!(lines.contains(&"  L1D_subframe_multiplex: 0".to_string()));
        }
    }

    #[test]
    fn test_enhanced_layer_tail() {
        let mut w = BitWriter::new();
        push_header(&mut w);
        push_subframe_preamble(&mut w, 0);
        w.push(9, 6); // id
        w.push(0, 1); // lls
        w.push(1, 2); // layer: enhanced
        w.push(0, 24);
        w.push(500, 24);
        w.push(0, 2); // scrambler
        w.push(15, 4); // fec: reserved, so no mod/cod follow
        w.push(1, 2); // TI mode: CTI
        w.push(99, 22); // CTI fec block start
        w.push(17, 5); // ldm injection level
        push_tail(&mut w);

        let lines = decode_lines(w.finish(), &summary(), &NO_PAD);
        assert!(lines.contains(&"      L1D_plp_layer: Enhanced".to_string()));
        assert!(lines.contains(&"      L1D_plp_fec_type: Reserved".to_string()));
        assert!(lines.contains(&"      L1D_plp_CTI_fec_block_start: 99".to_string()));
        assert!(lines.contains(&"      L1D_plp_ldm_injection_level: 17".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("      L1D_plp_mod:")));
    }

    #[test]
    fn test_cti_core_layer_fields() {
        let mut w = BitWriter::new();
        push_header(&mut w);
        push_subframe_preamble(&mut w, 0);
        w.push(0, 6); // id
        w.push(0, 1); // lls
        w.push(0, 2); // layer: core
        w.push(0, 24);
        w.push(100, 24);
        w.push(0, 2); // scrambler
        w.push(0, 4); // fec: BCH + 16K LDPC
        w.push(0, 4); // mod: QPSK
        w.push(2, 4); // cod: 4/15
        w.push(1, 2); // TI mode: CTI
        w.push(4000, 22); // CTI fec block start
        w.push(1, 1); // dispersed
        w.push(3, 14); // subslices (-1)
        w.push(600, 24); // subslice interval
        w.push(1, 1); // TI extended interleaving (QPSK under CTI)
        w.push(5, 3); // CTI depth
        w.push(800, 11); // CTI start row
        push_tail(&mut w);

        let lines = decode_lines(w.finish(), &summary(), &NO_PAD);
        assert!(lines.contains(&"      L1D_plp_type: dispersed".to_string()));
        assert!(lines.contains(&"      L1D_plp_num_subslices: 4".to_string()));
        assert!(lines.contains(&"      L1D_plp_subslice_interval: 600".to_string()));
        assert!(lines.contains(&"      L1D_plp_TI_extended_interleaving: 1".to_string()));
        assert!(lines.contains(&"      L1D_plp_CTI_depth: 5".to_string()));
        assert!(lines.contains(&"      L1D_plp_CTI_start_row: 800".to_string()));
        assert!(lines.contains(&"  -> Required SNR: Min -2.89 dB, Max -1.36 dB".to_string()));
    }

    #[test]
    fn test_hti_inter_subframe_block_run() {
        let mut w = BitWriter::new();
        push_header(&mut w);
        push_subframe_preamble(&mut w, 0);
        w.push(0, 6); // id
        w.push(0, 1); // lls
        w.push(0, 2); // layer: core
        w.push(0, 24);
        w.push(100, 24);
        w.push(0, 2); // scrambler
        w.push(3, 4); // fec: CRC + 64K LDPC
        w.push(2, 4); // mod: 64QAM
        w.push(5, 4); // cod: 7/15
        w.push(2, 2); // TI mode: HTI
        w.push(0, 1); // non-dispersed
        w.push(1, 1); // inter-subframe: per-block run follows
        w.push(2, 4); // ti blocks (-1) => 3 blocks
        w.push(40, 12); // fec blocks max (-1)
        for blocks in [10u64, 20, 30] {
            w.push(blocks, 12); // per-block fec blocks (-1)
        }
        w.push(1, 1); // cell interleaver
        push_tail(&mut w);

        let lines = decode_lines(w.finish(), &summary(), &NO_PAD);
        assert!(lines.contains(&"      L1D_plp_HTI_inter_subframe: 1".to_string()));
        assert!(lines.contains(&"      L1D_plp_HTI_num_ti_blocks: 3".to_string()));
        assert!(lines.contains(&"      L1D_plp_HTI_num_fec_blocks_max: 41".to_string()));
        let per_block: Vec<_> = lines
            .iter()
            .filter(|l| l.starts_with("        L1D_plp_HTI_num_fec_blocks:"))
            .collect();
        assert_eq!(per_block.len(), 3);
        assert_eq!(per_block[0], "        L1D_plp_HTI_num_fec_blocks: 11");
        assert_eq!(per_block[2], "        L1D_plp_HTI_num_fec_blocks: 31");
        assert!(lines.contains(&"      L1D_plp_HTI_cell_interleaver: 1".to_string()));
    }

    #[test]
    fn test_channel_bonding_and_time_fields() {
        let mut basic = summary();
        basic.time_info = TimeInfoPrecision::Micros;

        let mut w = BitWriter::new();
        w.push(1, 4); // version
        w.push(2, 3); // two bonded RF channels
        for bsid in [0x0A0Bu64, 0x0C0D] {
            w.push(bsid, 16);
            w.push(0, 3); // reserved
        }
        w.push(1_600_000_000, 32); // time_sec
        w.push(123, 10); // time_msec
        w.push(456, 10); // time_usec
        push_subframe_preamble(&mut w, 0);
        w.push(0, 6); // id
        w.push(0, 1); // lls
        w.push(0, 2); // layer: core
        w.push(0, 24);
        w.push(100, 24);
        w.push(0, 2); // scrambler
        w.push(0, 4); // fec
        w.push(3, 4); // mod
        w.push(8, 4); // cod
        w.push(0, 2); // TI mode: none
        w.push(0, 15); // fec block start
        w.push(2, 3); // num channel bonded
        w.push(1, 2); // bonding format
        w.push(3, 3); // rf id
        w.push(4, 3); // rf id
        w.push(0, 1); // non-dispersed
        push_tail(&mut w);

        let lines = decode_lines(w.finish(), &basic, &NO_PAD);
        assert!(lines.contains(&"  L1D_bonded_bsid: 0x0a0b".to_string()));
        assert!(lines.contains(&"L1D_time_sec: 1600000000".to_string()));
        assert!(lines.contains(&"L1D_time_usec: 456".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("L1D_time_nsec:")));
        assert!(lines.contains(&"      L1D_plp_num_channel_bonded: 2".to_string()));
        assert!(lines.contains(&"      L1D_plp_channel_bonding_format: 1".to_string()));
        assert!(lines.contains(&"        L1D_plp_bonded_rf_id: 3".to_string()));
        assert!(lines.contains(&"        L1D_plp_bonded_rf_id: 4".to_string()));
    }

    #[test]
    fn test_mimo_plp_flags_from_carried_state() {
        let mut basic = summary();
        basic.first_sub_mimo = true;

        let mut w = BitWriter::new();
        push_header(&mut w);
        push_subframe_preamble(&mut w, 0);
        w.push(0, 6); // id
        w.push(0, 1); // lls
        w.push(0, 2); // layer: core
        w.push(0, 24);
        w.push(100, 24);
        w.push(0, 2); // scrambler
        w.push(0, 4); // fec
        w.push(1, 4); // mod: 16QAM
        w.push(0, 4); // cod: 2/15
        w.push(0, 2); // TI mode: none
        w.push(0, 15); // fec block start
        w.push(1, 1); // mimo stream combining
        w.push(0, 1); // mimo IQ interleaving
        w.push(1, 1); // mimo PH
        w.push(0, 1); // non-dispersed
        push_tail(&mut w);

        let lines = decode_lines(w.finish(), &basic, &NO_PAD);
        assert!(lines.contains(&"      L1D_plp_mimo_stream_combining: 1".to_string()));
        assert!(lines.contains(&"      L1D_plp_mimo_IQ_interleaving: 0".to_string()));
        assert!(lines.contains(&"      L1D_plp_mimo_PH: 1".to_string()));
    }

    #[test]
    fn test_version_gates_bsid_and_mimo_mixed_pass() {
        // Version 0: no BSID, no second pass.
        let mut w = BitWriter::new();
        w.push(0, 4);
        w.push(0, 3);
        push_subframe_preamble(&mut w, 0);
        push_plain_plp(&mut w);
        w.push(0xAABBCCDD, 32); // crc only
        let lines = decode_lines(w.finish(), &summary(), &NO_PAD);
        assert!(!lines.iter().any(|l| l.starts_with("L1D_bsid:")));
        assert!(lines.contains(&"L1D_crc: 0xaabbccdd".to_string()));

        // Version 2 with the carried mimo-mixed flag set: a per-PLP pass
        // follows the BSID.
        let mut basic = summary();
        basic.first_sub_mimo_mixed = true;
        let mut w = BitWriter::new();
        w.push(2, 4);
        w.push(0, 3);
        push_subframe_preamble(&mut w, 0);
        push_plain_plp(&mut w);
        w.push(0x1234, 16); // bsid
        w.push(1, 1); // PLP #0 mimo
        w.push(1, 1); // stream combining
        w.push(1, 1); // IQ interleaving
        w.push(0, 1); // PH
        w.push(0xCAFEF00D, 32);
        let lines = decode_lines(w.finish(), &basic, &NO_PAD);
        assert!(lines.contains(&"    PLP #0 L1D_plp_mimo: 1".to_string()));
        assert!(lines.contains(&"      L1D_plp_mimo_IQ_interleaving: 1".to_string()));
    }

    #[test]
    fn test_pad_skip_to_declared_detail_size() {
        let mut w = BitWriter::new();
        push_header(&mut w);
        push_subframe_preamble(&mut w, 0);
        push_plain_plp(&mut w);
        w.push(0x1234, 16); // bsid

        // Pad the declared size so the CRC lands on the last 32 bits.
        let consumed = w.len();
        let padding = (8 - (consumed + 32) % 8) % 8 + 8; // non-zero, byte-aligning
        let declared_bits = consumed + padding + 32;
        assert_eq!(declared_bits % 8, 0);
        for _ in 0..padding {
            w.push(0, 1);
        }
        w.push(0xCAFEF00D, 32);

        let mut basic = summary();
        basic.detail_size_bytes = (declared_bits / 8) as u16;

        let lines = decode_lines(w.finish(), &basic, &DecodeOptions::default());
        assert!(lines.contains(&"L1D_crc: 0xcafef00d".to_string()));
    }
}
