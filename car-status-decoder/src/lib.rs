//! Car Status Decoder Library
//!
//! Turns raw CAN frames from the vehicle bus into a timestamped snapshot of
//! dashboard telemetry: engine speed, temperatures, speeds, steering angle
//! and switch states.
//!
//! # Architecture
//!
//! - [`CanFrame`]: one received message (11-bit identifier, up to 8 bytes)
//! - [`decoders`]: one pure function per identifier, collected in a static table
//! - [`Dispatcher`]: routes a frame to the decoder for its identifier
//! - [`CarStatus`]: the store of [`Field`]s the decoders write
//! - [`UpdateObserver`]: optional subscriber told which fields a frame updated
//!
//! Frames with unknown identifiers are ignored, frames too short for their
//! layout are skipped without touching the store. Nothing in the decode path
//! allocates or fails.
//!
//! The library does NOT:
//! - Talk to the CAN controller or transmit frames
//! - Render anything on the display or decide gauge ranges and colours
//! - Persist state between runs
//!
//! # Example Usage
//!
//! ```
//! use car_status_decoder::{CanFrame, CarStatus, Dispatcher};
//!
//! let dispatcher = Dispatcher::new();
//! let mut status = CarStatus::new();
//!
//! let frame = CanFrame::new(0x316, &[0x05, 0x11, 0x00, 0x1F]).unwrap();
//! dispatcher.dispatch(&frame, &mut status, 1_000);
//!
//! assert_eq!(status.rpm().value(), 7936);
//! assert_eq!(status.rpm().last_update(), Some(1_000));
//! ```

// Public modules
pub mod clock;
pub mod config;
pub mod decoders;
pub mod dispatcher;
pub mod field;
pub mod formats;
pub mod observer;
pub mod replay;
pub mod status;
pub mod types;

// Re-export main types for convenience
pub use clock::{ManualClock, MonotonicClock, Tick, TickSource};
pub use config::DecoderConfig;
pub use decoders::{DecodeOutcome, DecoderEntry, DECODERS};
pub use dispatcher::{Dispatch, Dispatcher};
pub use field::{Field, FieldSnapshot, FieldValue};
pub use formats::{open_capture, CaptureFormat};
pub use observer::{LogObserver, RecordingObserver, UpdateObserver};
pub use replay::{Replay, ReplayStats};
pub use status::CarStatus;
pub use types::{CanFrame, DecoderError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
