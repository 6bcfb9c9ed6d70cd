use std::path::PathBuf;

use clap::Parser;
use clap_num::maybe_hex;

/// Output format for the report.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text with a drawn separator rule
    #[default]
    Table,
    /// JSON array of report lines
    Json,
}

#[derive(Debug, Parser)]
#[clap(name = "atsc3-inspect")]
#[clap(about = "Decode ATSC 3.0 L1 signaling captured from a tuner. ", long_about = None)]
#[clap(version)]
pub(crate) struct Cli {
    /// File holding the tuner's base64 L1 signaling blob.{n}
    /// This is the value of the tuner's `l1detail` status variable,
    /// captured to a file.{n}
    /// If '-' is specified, the blob is read from stdin.
    #[clap(short, long, value_name = "FILE")]
    pub l1: Option<String>,

    /// File holding the tuner's `plpinfo` status string.{n}
    /// One line per PLP plus a `bsid=` line, as reported by the device.
    #[clap(short, long, value_name = "FILE")]
    pub plpinfo: Option<PathBuf>,

    /// File holding the tuner's `streaminfo` status string.
    #[clap(short, long, value_name = "FILE")]
    pub streaminfo: Option<PathBuf>,

    /// RF channel number, used only in the saved report filename.
    #[clap(long, default_value = "0")]
    pub rf: u32,

    /// Override the broadcast stream ID used in the saved filename.{n}
    /// Accepts decimal or 0x-prefixed hex. If unset, the BSID is taken
    /// from plpinfo, falling back to the TSID from streaminfo.
    #[clap(long, value_parser = maybe_hex::<u16>)]
    pub bsid: Option<u16>,

    /// Save the report to a timestamped file in addition to printing it.
    #[clap(long)]
    pub save: bool,

    /// Directory the saved report is written into.
    #[clap(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Read the trailing L1-Detail CRC immediately instead of skipping to
    /// the offset implied by L1B_L1_Detail_size_bytes.{n}
    /// Older tuner firmware emits no padding before the CRC.
    #[clap(long)]
    pub no_pad_skip: bool,

    /// Output format.
    #[clap(value_enum, long, short = 'f', default_value = "table")]
    pub format: OutputFormat,

    /// Enable verbose logging.
    #[clap(short, long)]
    pub verbose: bool,
}
