//! Serial capture records
//!
//! The bus sniffer forwards every received frame over its serial port as a
//! fixed 11-byte record:
//!
//! ```text
//! offset  size  content
//! 0       2     identifier, little-endian u16
//! 2       1     header: bit 0 = RTR, bits 1-4 = data length
//! 3       8     data bytes (always eight, unused tail is padding)
//! ```
//!
//! A binary capture is simply these records back to back.

use crate::types::{CanFrame, DecoderError, Result};
use byteorder::{ByteOrder, LittleEndian};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

/// Size of one serial record in bytes
pub const RECORD_LEN: usize = 11;

const RTR_MASK: u8 = 0b0000_0001;
const LEN_SHIFT: u8 = 1;
const LEN_MASK: u8 = 0b0000_1111;

/// Decode one serial record into a frame
pub fn parse_record(record: &[u8; RECORD_LEN]) -> Result<CanFrame> {
    let id = LittleEndian::read_u16(&record[0..2]);
    let header = record[2];
    let is_remote = header & RTR_MASK != 0;
    let len = ((header >> LEN_SHIFT) & LEN_MASK) as usize;

    if is_remote {
        CanFrame::remote(id, len)
    } else if len > 8 {
        Err(DecoderError::InvalidFrame(format!(
            "record for 0x{:03X} declares {} data bytes",
            id, len
        )))
    } else {
        CanFrame::new(id, &record[3..3 + len])
    }
}

/// Encode a frame back into its serial record (used to build captures)
pub fn encode_record(frame: &CanFrame) -> [u8; RECORD_LEN] {
    let mut record = [0u8; RECORD_LEN];
    LittleEndian::write_u16(&mut record[0..2], frame.id());

    let mut header = ((frame.dlc() as u8) & LEN_MASK) << LEN_SHIFT;
    if frame.is_remote() {
        header |= RTR_MASK;
    }
    record[2] = header;

    let payload = frame.payload();
    record[3..3 + payload.len()].copy_from_slice(payload);
    record
}

/// Binary serial capture parser
pub struct SerialRecordParser;

impl SerialRecordParser {
    /// Open a binary capture file and return an iterator over its frames
    pub fn parse(path: &Path) -> Result<SerialRecordReader<BufReader<File>>> {
        log::info!("Parsing serial capture: {:?}", path);

        if !path.exists() {
            return Err(DecoderError::LogParseError(format!(
                "Capture file not found: {:?}",
                path
            )));
        }

        let file = File::open(path).map_err(|e| {
            DecoderError::LogParseError(format!("Failed to open capture file: {}", e))
        })?;

        Ok(SerialRecordReader::new(BufReader::new(file)))
    }
}

/// Iterator over frames from any byte stream of serial records
pub struct SerialRecordReader<R: Read> {
    reader: R,
    records_read: u64,
    finished: bool,
}

impl<R: Read> SerialRecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            records_read: 0,
            finished: false,
        }
    }

    /// Number of complete records consumed so far
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Fill `buf` completely; `Ok(0)` on clean end of stream, `Ok(n < len)` if truncated
    fn read_full(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> Iterator for SerialRecordReader<R> {
    type Item = Result<CanFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut record = [0u8; RECORD_LEN];
        match self.read_full(&mut record) {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(n) if n < RECORD_LEN => {
                self.finished = true;
                Some(Err(DecoderError::LogParseError(format!(
                    "Truncated record after {} complete records: expected {} bytes, got {}",
                    self.records_read, RECORD_LEN, n
                ))))
            }
            Ok(_) => {
                self.records_read += 1;
                Some(parse_record(&record))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_record() {
        // 0x0316, len 8
        let record = [0x16, 0x03, 0x10, 0x05, 0x11, 0x00, 0x1F, 0x11, 0x21, 0x00, 0x80];
        let frame = parse_record(&record).unwrap();

        assert_eq!(frame.id(), 0x316);
        assert_eq!(frame.dlc(), 8);
        assert!(!frame.is_remote());
        assert_eq!(frame.payload(), &[0x05, 0x11, 0x00, 0x1F, 0x11, 0x21, 0x00, 0x80]);
    }

    #[test]
    fn test_parse_short_record_drops_padding() {
        // 0x01F5, len 2, padding bytes must not leak into the payload
        let record = [0xF5, 0x01, 0x04, 0x64, 0x80, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA];
        let frame = parse_record(&record).unwrap();

        assert_eq!(frame.payload(), &[0x64, 0x80]);
    }

    #[test]
    fn test_parse_remote_record() {
        let record = [0x16, 0x03, 0x11, 0, 0, 0, 0, 0, 0, 0, 0];
        let frame = parse_record(&record).unwrap();

        assert!(frame.is_remote());
        assert_eq!(frame.dlc(), 8);
        assert!(frame.payload().is_empty());
    }

    #[test]
    fn test_parse_record_rejects_bad_length() {
        // len bits = 9
        let record = [0x16, 0x03, 0x12, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(parse_record(&record), Err(DecoderError::InvalidFrame(_))));
    }

    #[test]
    fn test_parse_record_rejects_extended_id() {
        let record = [0x00, 0x08, 0x10, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(parse_record(&record).is_err());
    }

    #[test]
    fn test_encode_matches_parse() {
        let frame = CanFrame::new(0x1F0, &[0x00, 0x01, 0x20, 0xD3]).unwrap();
        let record = encode_record(&frame);

        assert_eq!(&record[..3], &[0xF0, 0x01, 0x08]);
        assert_eq!(parse_record(&record).unwrap(), frame);
    }

    #[test]
    fn test_reader_iterates_records() {
        let mut bytes = Vec::new();
        let rpm = CanFrame::new(0x316, &[0, 0, 0, 0x1F]).unwrap();
        let lateral = CanFrame::new(0x1F3, &[2, 0xBD, 0, 0xFF]).unwrap();
        bytes.extend_from_slice(&encode_record(&rpm));
        bytes.extend_from_slice(&encode_record(&lateral));

        let mut reader = SerialRecordReader::new(Cursor::new(bytes));
        let frames: Vec<_> = reader.by_ref().collect::<Result<Vec<_>>>().unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].id(), 0x1F3);
        assert_eq!(reader.records_read(), 2);
    }

    #[test]
    fn test_reader_reports_truncated_tail() {
        let mut bytes = encode_record(&CanFrame::new(0x316, &[0, 0, 0, 0x1F]).unwrap()).to_vec();
        bytes.extend_from_slice(&[0x16, 0x03, 0x10]);

        let results: Vec<_> = SerialRecordReader::new(Cursor::new(bytes)).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(DecoderError::LogParseError(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = SerialRecordParser::parse(Path::new("nonexistent.bin"));
        assert!(result.is_err());
    }
}
