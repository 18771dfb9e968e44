//! Core types for the car status decoder library
//!
//! This module defines the raw frame type handed to the dispatcher and the
//! error type shared by the capture readers.

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Highest identifier in the 11-bit standard CAN range
pub const MAX_STANDARD_ID: u16 = 0x7FF;

/// Classic CAN payload capacity in bytes
pub const MAX_DATA_LEN: usize = 8;

/// Raw CAN frame as delivered by the transport
///
/// Frames are immutable once built: the only way to get one is through
/// [`CanFrame::new`] or [`CanFrame::remote`], both of which validate the
/// identifier range and payload length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanFrame {
    id: u16,
    data: [u8; MAX_DATA_LEN],
    len: u8,
    is_remote: bool,
}

impl CanFrame {
    /// Build a data frame from an identifier and up to eight payload bytes
    pub fn new(id: u16, payload: &[u8]) -> Result<Self> {
        Self::validate(id, payload.len())?;

        let mut data = [0u8; MAX_DATA_LEN];
        data[..payload.len()].copy_from_slice(payload);

        Ok(Self {
            id,
            data,
            len: payload.len() as u8,
            is_remote: false,
        })
    }

    /// Build a remote (RTR) frame; `dlc` is kept for reference but no data is carried
    pub fn remote(id: u16, dlc: usize) -> Result<Self> {
        Self::validate(id, dlc)?;

        Ok(Self {
            id,
            data: [0u8; MAX_DATA_LEN],
            len: dlc as u8,
            is_remote: true,
        })
    }

    fn validate(id: u16, len: usize) -> Result<()> {
        if id > MAX_STANDARD_ID {
            return Err(DecoderError::InvalidFrame(format!(
                "identifier 0x{:X} outside the 11-bit range",
                id
            )));
        }
        if len > MAX_DATA_LEN {
            return Err(DecoderError::InvalidFrame(format!(
                "data length {} exceeds {} bytes",
                len, MAX_DATA_LEN
            )));
        }
        Ok(())
    }

    /// CAN identifier
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Data length code as received
    pub fn dlc(&self) -> usize {
        self.len as usize
    }

    /// True if this is a remote transmission request
    pub fn is_remote(&self) -> bool {
        self.is_remote
    }

    /// Readable payload bytes (empty for remote frames)
    pub fn payload(&self) -> &[u8] {
        if self.is_remote {
            &[]
        } else {
            &self.data[..self.len as usize]
        }
    }

    /// First `N` payload bytes, or `None` when the frame is too short
    ///
    /// Decoders go through this accessor so they can never read past the
    /// received length.
    pub fn bytes<const N: usize>(&self) -> Option<&[u8; N]> {
        self.payload().get(..N)?.try_into().ok()
    }
}

/// Errors that can occur while building frames or reading captures
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Failed to parse capture file: {0}")]
    LogParseError(String),

    #[error("Unsupported capture format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_construction() {
        let frame = CanFrame::new(0x316, &[0x05, 0x11, 0x00, 0x1F]).unwrap();
        assert_eq!(frame.id(), 0x316);
        assert_eq!(frame.dlc(), 4);
        assert_eq!(frame.payload(), &[0x05, 0x11, 0x00, 0x1F]);
        assert!(!frame.is_remote());
    }

    #[test]
    fn test_frame_rejects_extended_id() {
        let result = CanFrame::new(0x800, &[]);
        assert!(matches!(result, Err(DecoderError::InvalidFrame(_))));
    }

    #[test]
    fn test_frame_rejects_long_payload() {
        let result = CanFrame::new(0x100, &[0; 9]);
        assert!(matches!(result, Err(DecoderError::InvalidFrame(_))));
    }

    #[test]
    fn test_bytes_respects_length() {
        let frame = CanFrame::new(0x1F5, &[0x64, 0x80]).unwrap();
        assert_eq!(frame.bytes::<2>(), Some(&[0x64, 0x80]));
        assert_eq!(frame.bytes::<3>(), None);
        assert_eq!(frame.bytes::<0>(), Some(&[]));
    }

    #[test]
    fn test_remote_frame_has_no_payload() {
        let frame = CanFrame::remote(0x316, 8).unwrap();
        assert_eq!(frame.dlc(), 8);
        assert!(frame.payload().is_empty());
        assert_eq!(frame.bytes::<1>(), None);
    }
}
