//! Car Status CLI Application
//!
//! Replays captured CAN traffic through the car-status-decoder library and
//! prints the resulting dashboard state. It adds:
//! - TOML configuration with command-line overrides
//! - Text and JSON reports
//! - Per-identifier frame counts for unknown captures

use anyhow::{Context, Result};
use car_status_decoder::{open_capture, CaptureFormat, Dispatcher, MonotonicClock, Replay};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

mod config;
mod report;

use config::{AppConfig, OutputFormat};
use report::Report;

/// Car Status - Decode captured CAN traffic into dashboard telemetry
#[derive(Parser, Debug)]
#[command(name = "car-status")]
#[command(about = "Replay CAN captures through the car status decoders", long_about = None)]
#[command(version)]
struct Args {
    /// Capture file(s) to replay (can be repeated)
    #[arg(long, value_name = "FILE")]
    capture: Vec<PathBuf>,

    /// Capture layout: binary or hex (default: from file extension)
    #[arg(long, value_name = "FORMAT", value_parser = parse_capture_format)]
    input_format: Option<CaptureFormat>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file for the report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Only report these fields (comma separated)
    #[arg(long, value_name = "FIELDS", value_delimiter = ',')]
    track: Vec<String>,

    /// Maximum number of frames to replay
    #[arg(long, value_name = "COUNT")]
    max_frames: Option<u64>,

    /// Print frame counts per CAN identifier
    #[arg(long)]
    ids: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn parse_capture_format(value: &str) -> std::result::Result<CaptureFormat, String> {
    match value.to_lowercase().as_str() {
        "binary" | "bin" => Ok(CaptureFormat::Binary),
        "hex" => Ok(CaptureFormat::Hex),
        other => Err(format!("unknown capture format '{}' (expected binary or hex)", other)),
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Car Status CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", car_status_decoder::VERSION);

    let config = resolve_config(&args)?;
    config.validate()?;

    run(&config, &args)
}

/// Merge the config file (if any) with command-line overrides
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if !args.capture.is_empty() {
        config.input.files = args.capture.clone();
    }
    if args.input_format.is_some() {
        config.input.format = args.input_format;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if !args.track.is_empty() {
        config.output.track = args.track.clone();
    }

    log::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

fn run(config: &AppConfig, args: &Args) -> Result<()> {
    let dispatcher = Dispatcher::new().with_config(config.decoder_config());
    let mut replay = Replay::new(dispatcher, MonotonicClock::new());

    for path in &config.input.files {
        log::info!("Replaying capture: {:?}", path);
        let frames = open_capture(path, config.input.format)
            .with_context(|| format!("Failed to open capture: {:?}", path))?;
        replay.run(frames, args.max_frames);
    }

    let (status, stats) = replay.finish();

    if args.ids {
        print!("{}", report::render_id_counts(&stats));
    }

    let stats = config.output.include_stats.then_some(stats);
    let report = Report::new(config.input.files.clone(), &status, &config.output.track, stats);
    let rendered = report.render(config.output.format)?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write report: {:?}", path))?;
            log::info!("Report written to {:?}", path);
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_args_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[input]\nfiles = [\"file.bin\"]\n[output]\nformat = \"json\"\ntrack = [\"rpm\"]"
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let args = Args::try_parse_from([
            "car-status",
            "--config",
            path,
            "--capture",
            "cli.hex",
            "--track",
            "speed_kph,ac_on",
        ])
        .unwrap();
        let config = resolve_config(&args).unwrap();

        assert_eq!(config.input.files, vec![PathBuf::from("cli.hex")]);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.track, vec!["speed_kph", "ac_on"]);
    }

    #[test]
    fn test_input_format_flag() {
        let args =
            Args::try_parse_from(["car-status", "--capture", "a.dat", "--input-format", "hex"])
                .unwrap();
        assert_eq!(args.input_format, Some(CaptureFormat::Hex));

        assert!(Args::try_parse_from(["car-status", "--input-format", "blf"]).is_err());
    }

    #[test]
    fn test_run_writes_report() {
        let mut capture = tempfile::Builder::new().suffix(".hex").tempfile().unwrap();
        writeln!(capture, "1603100511001f11210080").unwrap();
        let out = tempfile::NamedTempFile::new().unwrap();

        let args = Args::try_parse_from([
            "car-status",
            "--capture",
            capture.path().to_str().unwrap(),
            "--format",
            "json",
            "--track",
            "rpm",
            "--output",
            out.path().to_str().unwrap(),
        ])
        .unwrap();
        let config = resolve_config(&args).unwrap();
        run(&config, &args).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.path()).unwrap()).unwrap();
        assert_eq!(json["fields"][0]["value"], 7936);
        assert_eq!(json["stats"]["decoded"], 1);
    }

    fn rpm_capture(counts: &[u8]) -> tempfile::NamedTempFile {
        let mut capture = tempfile::Builder::new().suffix(".hex").tempfile().unwrap();
        for count in counts {
            // 0x316, length 4, rpm LSB in byte 2
            writeln!(capture, "1603080000{:02x}{}", count, "00".repeat(5)).unwrap();
        }
        capture
    }

    #[test]
    fn test_max_frames_caps_all_captures() {
        let first = rpm_capture(&[1, 2, 3]);
        let second = rpm_capture(&[4, 5, 6]);
        let out = tempfile::NamedTempFile::new().unwrap();

        let args = Args::try_parse_from([
            "car-status",
            "--capture",
            first.path().to_str().unwrap(),
            "--capture",
            second.path().to_str().unwrap(),
            "--max-frames",
            "4",
            "--format",
            "json",
            "--track",
            "rpm",
            "--output",
            out.path().to_str().unwrap(),
        ])
        .unwrap();
        let config = resolve_config(&args).unwrap();
        run(&config, &args).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.path()).unwrap()).unwrap();
        assert_eq!(json["stats"]["total_frames"], 4);
        assert_eq!(json["stats"]["decoded"], 4);
        assert_eq!(json["fields"][0]["value"], 4);
        assert_eq!(json["captures"].as_array().map(|c| c.len()), Some(2));
    }
}
