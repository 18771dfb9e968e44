//! Capture file parsers (binary serial records, hex dumps)
//!
//! Each parser opens a file and returns an iterator over CanFrame objects.
//! Both formats carry the same 11-byte record written by the bus sniffer.

use crate::types::{CanFrame, DecoderError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod hexdump;
pub mod record;

// Re-export parser types
pub use hexdump::{HexDumpParser, HexDumpReader};
pub use record::{SerialRecordParser, SerialRecordReader, RECORD_LEN};

/// Common trait for all capture parsers
pub trait CaptureParser {
    type Frames: Iterator<Item = Result<CanFrame>>;

    /// Parse a capture file and return an iterator over CAN frames
    fn parse(path: &Path) -> Result<Self::Frames>;
}

impl CaptureParser for SerialRecordParser {
    type Frames = SerialRecordReader<std::io::BufReader<std::fs::File>>;

    fn parse(path: &Path) -> Result<Self::Frames> {
        SerialRecordParser::parse(path)
    }
}

impl CaptureParser for HexDumpParser {
    type Frames = HexDumpReader<std::io::BufReader<std::fs::File>>;

    fn parse(path: &Path) -> Result<Self::Frames> {
        HexDumpParser::parse(path)
    }
}

/// Supported capture layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureFormat {
    /// Raw 11-byte records back to back
    Binary,
    /// One record per line as hex digits
    Hex,
}

impl CaptureFormat {
    /// Determine the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        match extension.as_deref() {
            Some("bin") | Some("raw") | Some("rec") => Ok(CaptureFormat::Binary),
            Some("hex") | Some("txt") | Some("log") => Ok(CaptureFormat::Hex),
            _ => Err(DecoderError::UnsupportedFormat(format!(
                "{:?} (expected .bin/.raw/.rec or .hex/.txt/.log)",
                path
            ))),
        }
    }
}

/// Frames from a capture file, boxed so both formats share one type
pub type FrameIter = Box<dyn Iterator<Item = Result<CanFrame>>>;

/// Open a capture file, picking the parser from `format` or the extension
pub fn open_capture(path: &Path, format: Option<CaptureFormat>) -> Result<FrameIter> {
    let format = match format {
        Some(format) => format,
        None => CaptureFormat::from_path(path)?,
    };
    log::debug!("Opening {:?} as {:?} capture", path, format);

    match format {
        CaptureFormat::Binary => Ok(Box::new(
            <SerialRecordParser as CaptureParser>::parse(path)?,
        )),
        CaptureFormat::Hex => Ok(Box::new(<HexDumpParser as CaptureParser>::parse(path)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        let detect = |name: &str| CaptureFormat::from_path(Path::new(name)).unwrap();

        assert_eq!(detect("drive.bin"), CaptureFormat::Binary);
        assert_eq!(detect("drive.RAW"), CaptureFormat::Binary);
        assert_eq!(detect("serial.log"), CaptureFormat::Hex);
        assert!(CaptureFormat::from_path(Path::new("trace.blf")).is_err());
        assert!(CaptureFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_open_missing_capture() {
        let result = open_capture(Path::new("nonexistent.hex"), None);
        assert!(result.is_err());
    }
}
