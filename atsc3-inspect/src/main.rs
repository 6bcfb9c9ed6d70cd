//! atsc3-inspect: decode ATSC 3.0 L1 signaling captured from a tuner.
//!
//! The device side (discovery, tuning, status polling) stays outside this
//! tool: it consumes the tuner status strings after they have been captured
//! to files and renders the same detail report the control panel shows.

use std::error::Error;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use log::{error, info, warn};

use atsc3_l1::{status, DecodeOptions, DetailReport, Line};

mod context;

use context::{Cli, OutputFormat};

fn main() -> ExitCode {
    let args = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Cli) -> Result<(), Box<dyn Error>> {
    let plpinfo = read_input_file(args.plpinfo.as_deref())?;
    let streaminfo = read_input_file(args.streaminfo.as_deref())?;
    let l1_blob = match args.l1.as_deref() {
        Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Some(buf)
        }
        Some(path) => Some(fs::read_to_string(path)?),
        None => None,
    };

    if plpinfo.is_none() && streaminfo.is_none() && l1_blob.is_none() {
        warn!("no tuner inputs supplied; the report will be mostly empty");
    }

    let options = DecodeOptions {
        pad_to_detail_size: !args.no_pad_skip,
    };
    let report = DetailReport::build(
        plpinfo.as_deref(),
        streaminfo.as_deref(),
        l1_blob.as_deref(),
        &options,
    );

    match args.format {
        OutputFormat::Table => {
            for line in &report.lines {
                match line {
                    Line::Separator => println!("{}", "-".repeat(60).as_str().dimmed()),
                    Line::Text(text) => println!("{}", text),
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report.lines)?),
    }

    if args.save {
        let path = save_report(args, &report, plpinfo.as_deref(), streaminfo.as_deref())?;
        info!("saved details to {}", path.display());
    }

    Ok(())
}

fn read_input_file(path: Option<&Path>) -> Result<Option<String>, Box<dyn Error>> {
    match path {
        Some(p) => Ok(Some(fs::read_to_string(p)?)),
        None => Ok(None),
    }
}

/// Write the report under a `rf<ch>-bsid<id>-details-<stamp>.txt` name,
/// identifying the capture by BSID when the tuner reported one.
fn save_report(
    args: &Cli,
    report: &DetailReport,
    plpinfo: Option<&str>,
    streaminfo: Option<&str>,
) -> Result<PathBuf, Box<dyn Error>> {
    let id = args
        .bsid
        .map(i64::from)
        .or_else(|| plpinfo.and_then(|s| status::find_status_value(s, "bsid")))
        .or_else(|| streaminfo.and_then(|s| status::find_status_value(s, "tsid")))
        .unwrap_or(0);
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let filename = format!("rf{}-bsid{}-details-{}.txt", args.rf, id, stamp);
    let path = args.output_dir.join(filename);
    let file = fs::File::create(&path)?;
    report.write_to(file)?;
    Ok(path)
}
