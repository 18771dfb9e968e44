//! Hex dump captures
//!
//! The serial logger echoes every record it receives as 22 hex digits,
//! followed by a human-readable rendering of the frame:
//!
//! ```text
//! 1603100511001f11210080 CANFrame(id=0x316, rtr=0, length=8, data=05 11 00 1f 11 21 00 80)
//! ```
//!
//! Only the first token of each line is used. Blank lines and lines starting
//! with `#` are skipped. A line that does not hold a valid record yields an
//! error item and reading continues with the next line.

use crate::formats::record::{parse_record, RECORD_LEN};
use crate::types::{CanFrame, DecoderError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

/// Decode the record held in the first token of `line`
pub fn parse_line(line: &str) -> Result<CanFrame> {
    let token = line.split_whitespace().next().unwrap_or("");

    if token.len() != RECORD_LEN * 2 {
        return Err(DecoderError::LogParseError(format!(
            "expected {} hex digits, got {:?}",
            RECORD_LEN * 2,
            token
        )));
    }

    // from_str_radix alone would let a sign through ("+3")
    if !token.bytes().all(|c| c.is_ascii_hexdigit()) {
        return Err(DecoderError::LogParseError(format!(
            "invalid hex digits in {:?}",
            token
        )));
    }

    let mut record = [0u8; RECORD_LEN];
    for (i, byte) in record.iter_mut().enumerate() {
        let digits = &token[i * 2..i * 2 + 2];
        *byte = u8::from_str_radix(digits, 16).map_err(|e| {
            DecoderError::LogParseError(format!("invalid hex {:?}: {}", digits, e))
        })?;
    }

    parse_record(&record)
}

/// Hex dump capture parser
pub struct HexDumpParser;

impl HexDumpParser {
    /// Open a hex dump file and return an iterator over its frames
    pub fn parse(path: &Path) -> Result<HexDumpReader<BufReader<File>>> {
        log::info!("Parsing hex dump capture: {:?}", path);

        if !path.exists() {
            return Err(DecoderError::LogParseError(format!(
                "Capture file not found: {:?}",
                path
            )));
        }

        let file = File::open(path).map_err(|e| {
            DecoderError::LogParseError(format!("Failed to open capture file: {}", e))
        })?;

        Ok(HexDumpReader::new(BufReader::new(file)))
    }
}

/// Iterator over frames from any line-oriented hex dump
pub struct HexDumpReader<R: BufRead> {
    lines: std::io::Lines<R>,
    line_no: usize,
    finished: bool,
}

impl<R: BufRead> HexDumpReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            finished: false,
        }
    }
}

impl<R: BufRead> Iterator for HexDumpReader<R> {
    type Item = Result<CanFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                // A line that is not UTF-8 has been consumed; the stream can go on
                Some(Err(e)) if e.kind() == ErrorKind::InvalidData => {
                    self.line_no += 1;
                    return Some(Err(DecoderError::LogParseError(format!(
                        "line {}: {}",
                        self.line_no, e
                    ))));
                }
                Some(Err(e)) => {
                    self.line_no += 1;
                    self.finished = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.finished = true;
                    return None;
                }
            };
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            return Some(parse_line(trimmed).map_err(|e| match e {
                DecoderError::LogParseError(msg) => {
                    DecoderError::LogParseError(format!("line {}: {}", self.line_no, msg))
                }
                other => other,
            }));
        }
    }
}
