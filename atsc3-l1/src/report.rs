//! Detail-report assembly.
//!
//! The report is an ordered, append-only list of display lines. The caller
//! renders it on screen or persists it verbatim; order is display order.

use std::io::{self, Write};

use bytes::Bytes;
use log::warn;
use serde::{Serialize, Serializer};

use crate::base64;
use crate::bits::BitReader;
use crate::error::L1Error;
use crate::l1_basic;
use crate::l1_detail::{self, DecodeOptions};
use crate::modcod::{self, ModcodSnr};
use crate::status;

/// Renderer-reserved separator token, drawn as a horizontal rule.
pub const SEPARATOR_TOKEN: &str = "__HLINE__";

/// One unit of report output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Plain printable text.
    Text(String),
    /// Horizontal-rule separator, meaningful only to the renderer.
    Separator,
}

impl Line {
    /// Build a text line.
    pub fn text(s: impl Into<String>) -> Self {
        Line::Text(s.into())
    }

    /// The literal string form, exactly as persisted.
    pub fn as_str(&self) -> &str {
        match self {
            Line::Text(s) => s,
            Line::Separator => SEPARATOR_TOKEN,
        }
    }
}

impl Serialize for Line {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Decode a raw L1 payload into display lines.
///
/// Truncation ends the decode with a marker line; everything already
/// decoded is kept, and nothing is fabricated for unread fields.
pub fn decode_l1(payload: Bytes, lines: &mut Vec<Line>, options: &DecodeOptions) {
    let mut reader = BitReader::new(payload);
    let result = l1_basic::decode(&mut reader, lines)
        .and_then(|summary| l1_detail::decode(&mut reader, &summary, lines, options));
    if let Err(L1Error::Truncated { position, .. }) = result {
        lines.push(Line::text(format!("L1 data truncated at bit {}", position)));
    }
}

/// SNR annotation for one plpinfo status line carrying `mod=` and `cod=`.
fn plp_line_snr(line: &str) -> Option<&'static ModcodSnr> {
    let raw_mod = status::find_status_field(line, "mod")?;
    let cod = status::find_status_field(line, "cod")?;
    modcod::snr_for_modcod(&modcod::normalize_modulation(raw_mod), cod)
}

/// A fully assembled detail report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailReport {
    pub lines: Vec<Line>,
}

impl DetailReport {
    /// Assemble the detail view from the tuner-supplied strings.
    ///
    /// Every input is optional: absent identifiers are reported as
    /// `Not set`, an absent or rejected L1 blob simply omits the bit-level
    /// section.
    pub fn build(
        plpinfo: Option<&str>,
        streaminfo: Option<&str>,
        l1_base64: Option<&str>,
        options: &DecodeOptions,
    ) -> Self {
        let mut lines = vec![Line::text(" ")];

        match plpinfo.and_then(|s| status::find_status_value(s, "bsid")) {
            Some(bsid) => lines.push(Line::text(format!("L1D BSID: {} (0x{:X})", bsid, bsid))),
            None => lines.push(Line::text("L1D BSID: Not set")),
        }
        match streaminfo.and_then(|s| status::find_status_value(s, "tsid")) {
            Some(tsid) => lines.push(Line::text(format!("SLT TSID: {} (0x{:X})", tsid, tsid))),
            None => lines.push(Line::text("SLT TSID: Not set")),
        }
        lines.push(Line::text(" "));

        if let Some(plpinfo) = plpinfo {
            for line in plpinfo.lines() {
                if line.is_empty() || line.starts_with("bsid=") {
                    continue;
                }
                lines.push(Line::text(line));
                if let Some(snr) = plp_line_snr(line) {
                    lines.push(Line::text(format!(
                        "  -> Required SNR: Min {:.2} dB, Max {:.2} dB",
                        snr.min_snr, snr.max_snr
                    )));
                }
                lines.push(Line::text(" "));
            }
        }

        if let Some(blob) = l1_base64 {
            match base64::decode(blob.trim()) {
                Ok(payload) if !payload.is_empty() => {
                    lines.push(Line::text(" "));
                    lines.push(Line::Separator);
                    lines.push(Line::text(" "));
                    decode_l1(payload, &mut lines, options);
                }
                Ok(_) => {}
                Err(e) => warn!("rejecting L1 payload: {}", e),
            }
        }

        DetailReport { lines }
    }

    /// Persist the line list verbatim, one line per row.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        for line in &self.lines {
            writeln!(w, "{}", line.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{self, BasicParams, BitWriter};

    /// Base64 blob for a minimal valid stream: full L1-Basic plus a
    /// single-subframe, single-PLP L1-Detail.
    fn sample_blob() -> String {
        let mut w = BitWriter::new();
        testutil::push_l1_basic(&mut w, &BasicParams::default());
        w.push(1, 4); // L1D version
        w.push(0, 3); // num_rf
        w.push(1, 1); // frequency interleaver
        w.push(0, 6); // one PLP
        w.push(5, 6); // id
        w.push(1, 1); // lls
        w.push(0, 2); // layer: core
        w.push(0, 24); // start
        w.push(1000, 24); // size
        w.push(0, 2); // scrambler
        w.push(1, 4); // fec
        w.push(3, 4); // mod: 256QAM
        w.push(8, 4); // cod: 10/15
        w.push(0, 2); // TI mode: none
        w.push(7, 15); // fec block start
        w.push(0, 1); // non-dispersed
        w.push(0x1234, 16); // bsid
        w.push(0xCAFEF00D, 32); // crc
        testutil::to_base64(&w.finish())
    }

    const NO_PAD: DecodeOptions = DecodeOptions {
        pad_to_detail_size: false,
    };

    fn rendered(report: &DetailReport) -> Vec<String> {
        report.lines.iter().map(|l| l.as_str().to_string()).collect()
    }

    #[test]
    fn test_full_report_order() {
        let plpinfo = "bsid=2600\n0: mod=qam256 cod=10/15 layer=core";
        let streaminfo = "tsid=4369 prog=3";
        let report = DetailReport::build(
            Some(plpinfo),
            Some(streaminfo),
            Some(&sample_blob()),
            &NO_PAD,
        );
        let lines = rendered(&report);

        assert_eq!(lines[0], " ");
        assert_eq!(lines[1], "L1D BSID: 2600 (0xA28)");
        assert_eq!(lines[2], "SLT TSID: 4369 (0x1111)");
        assert_eq!(lines[3], " ");
        assert_eq!(lines[4], "0: mod=qam256 cod=10/15 layer=core");
        assert_eq!(lines[5], "  -> Required SNR: Min 14.18 dB, Max 17.61 dB");

        let separator_at = report
            .lines
            .iter()
            .position(|l| *l == Line::Separator)
            .unwrap();
        let basic_at = lines
            .iter()
            .position(|l| l == "--- L1-Basic Signaling ---")
            .unwrap();
        let detail_at = lines
            .iter()
            .position(|l| l == "--- L1-Detail Signaling ---")
            .unwrap();
        assert!(separator_at < basic_at && basic_at < detail_at);
        assert!(lines.contains(&"      L1D_plp_mod: 256QAM".to_string()));
    }

    #[test]
    fn test_missing_inputs_render_not_set() {
        let report = DetailReport::build(None, None, None, &NO_PAD);
        let lines = rendered(&report);
        assert_eq!(
            lines,
            vec![" ", "L1D BSID: Not set", "SLT TSID: Not set", " "]
        );
    }

    #[test]
    fn test_invalid_base64_omits_l1_section() {
        let report = DetailReport::build(None, None, Some("not base64!"), &NO_PAD);
        let lines = rendered(&report);
        assert!(!lines.iter().any(|l| l.contains("L1-Basic")));
        assert!(!report.lines.contains(&Line::Separator));
    }

    #[test]
    fn test_empty_blob_omits_l1_section() {
        let report = DetailReport::build(None, None, Some(""), &NO_PAD);
        assert!(!report.lines.contains(&Line::Separator));
    }

    #[test]
    fn test_unmatched_modcod_omits_annotation() {
        let plpinfo = "bsid=1\n0: mod=qam2048 cod=1/15";
        let report = DetailReport::build(Some(plpinfo), None, None, &NO_PAD);
        let lines = rendered(&report);
        assert!(lines.contains(&"0: mod=qam2048 cod=1/15".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("  -> Required SNR:")));
    }

    #[test]
    fn test_truncation_is_safe_at_every_offset() {
        let blob = sample_blob();
        let full = crate::base64::decode(&blob).unwrap();
        for cut in 0..full.len() {
            let mut lines = Vec::new();
            decode_l1(full.slice(..cut), &mut lines, &NO_PAD);
            if cut > 0 {
                assert!(
                    lines.last().unwrap().as_str().starts_with("L1 data truncated"),
                    "no truncation marker at cut {}",
                    cut
                );
            }
        }
        // The untruncated stream decodes to the end without a marker.
        let mut lines = Vec::new();
        decode_l1(full, &mut lines, &NO_PAD);
        assert!(!lines.last().unwrap().as_str().starts_with("L1 data truncated"));
    }

    #[test]
    fn test_write_to_is_verbatim() {
        let report = DetailReport {
            lines: vec![
                Line::text(" "),
                Line::text("L1D BSID: 1 (0x1)"),
                Line::Separator,
                Line::text("L1B_version: 1"),
            ],
        };
        let mut out = Vec::new();
        report.write_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            " \nL1D BSID: 1 (0x1)\n__HLINE__\nL1B_version: 1\n"
        );
    }

    #[test]
    fn test_line_serializes_to_literal_string() {
        let json = serde_json::to_string(&vec![Line::text("a"), Line::Separator]).unwrap();
        assert_eq!(json, r#"["a","__HLINE__"]"#);
    }
}
