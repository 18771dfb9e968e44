//! Frame dispatcher
//!
//! Routes each incoming frame to the decoder registered for its identifier.
//! Unknown identifiers are expected (the bus carries far more traffic than
//! the dashboard cares about) and are dropped without effect.

use crate::clock::Tick;
use crate::config::DecoderConfig;
use crate::decoders::{DecodeOutcome, DecoderEntry, DECODERS};
use crate::observer::{LogObserver, UpdateObserver};
use crate::status::CarStatus;
use crate::types::CanFrame;

/// What happened to one frame
#[derive(Debug, Clone, Copy)]
pub enum Dispatch {
    /// A decoder ran and updated all of its fields
    Decoded(&'static DecoderEntry),
    /// A decoder matched but the payload was too short; nothing was written
    Skipped {
        entry: &'static DecoderEntry,
        required: usize,
        actual: usize,
    },
    /// A decoder matched but the identifier is excluded by the message filter
    Filtered(&'static DecoderEntry),
    /// No decoder is registered for the identifier
    Unknown,
}

impl Dispatch {
    /// True if the status store was modified
    pub fn is_decoded(&self) -> bool {
        matches!(self, Dispatch::Decoded(_))
    }

    /// The matching decoder, if any
    pub fn entry(&self) -> Option<&'static DecoderEntry> {
        match *self {
            Dispatch::Decoded(entry) | Dispatch::Filtered(entry) => Some(entry),
            Dispatch::Skipped { entry, .. } => Some(entry),
            Dispatch::Unknown => None,
        }
    }
}

/// Routes frames to decoders from a fixed table
#[derive(Debug, Clone)]
pub struct Dispatcher {
    table: &'static [DecoderEntry],
    config: DecoderConfig,
}

impl Dispatcher {
    /// Dispatcher over the built-in decoder table
    pub fn new() -> Self {
        Self::with_table(DECODERS)
    }

    /// Dispatcher over a caller-supplied table
    ///
    /// Identifiers must be unique; the first match wins otherwise.
    pub fn with_table(table: &'static [DecoderEntry]) -> Self {
        Self {
            table,
            config: DecoderConfig::default(),
        }
    }

    /// Builder method: replace the configuration
    pub fn with_config(mut self, config: DecoderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// All registered decoders
    pub fn entries(&self) -> &'static [DecoderEntry] {
        self.table
    }

    /// Find the decoder registered for `can_id`
    pub fn lookup(&self, can_id: u16) -> Option<&'static DecoderEntry> {
        self.table.iter().find(|entry| entry.id == can_id)
    }

    /// Route `frame` to its decoder and apply it to `status`
    ///
    /// Field update logging from the configuration is honoured here; use
    /// [`Dispatcher::dispatch_observed`] to wire a custom observer.
    pub fn dispatch(&self, frame: &CanFrame, status: &mut CarStatus, now: Tick) -> Dispatch {
        if self.config.log_field_updates {
            self.dispatch_observed(frame, status, now, &mut LogObserver)
        } else {
            self.route(frame, status, now)
        }
    }

    /// Same as [`Dispatcher::dispatch`], then report every field the decoder wrote
    pub fn dispatch_observed<O: UpdateObserver + ?Sized>(
        &self,
        frame: &CanFrame,
        status: &mut CarStatus,
        now: Tick,
        observer: &mut O,
    ) -> Dispatch {
        let result = self.route(frame, status, now);

        if let Dispatch::Decoded(entry) = result {
            for name in entry.fields {
                if let Some(snapshot) = status.field(name) {
                    observer.on_update(entry.id, &snapshot);
                }
            }
        }

        result
    }

    fn route(&self, frame: &CanFrame, status: &mut CarStatus, now: Tick) -> Dispatch {
        let can_id = frame.id();

        let Some(entry) = self.lookup(can_id) else {
            log::trace!("Unknown CAN ID: 0x{:03X}, ignoring", can_id);
            return Dispatch::Unknown;
        };

        if !self.config.should_process_message(can_id) {
            log::trace!("Filtered CAN ID: 0x{:03X} ({})", can_id, entry.name);
            return Dispatch::Filtered(entry);
        }

        match entry.apply(frame, status, now) {
            DecodeOutcome::Applied => Dispatch::Decoded(entry),
            DecodeOutcome::TooShort { required, actual } => {
                log::debug!(
                    "Skipping {} (ID 0x{:03X}): needs {} bytes, frame has {}",
                    entry.name,
                    can_id,
                    required,
                    actual
                );
                Dispatch::Skipped {
                    entry,
                    required,
                    actual,
                }
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::RecordingObserver;

    #[test]
    fn test_dispatcher_knows_all_decoders() {
        let dispatcher = Dispatcher::new();
        assert_eq!(dispatcher.entries().len(), 9);
        for id in [0x316, 0x545, 0x329, 0x153, 0x1F5, 0x1F3, 0x1F0, 0x613, 0x615] {
            assert!(dispatcher.lookup(id).is_some(), "missing 0x{:03X}", id);
        }
        assert!(dispatcher.lookup(0x7FF).is_none());
    }

    #[test]
    fn test_unknown_identifier_is_noop() {
        let dispatcher = Dispatcher::new();
        let mut status = CarStatus::new();
        let before = status.clone();

        let frame = CanFrame::new(0x2A0, &[0xFF; 8]).unwrap();
        let result = dispatcher.dispatch(&frame, &mut status, 50);

        assert!(matches!(result, Dispatch::Unknown));
        assert_eq!(status, before);
    }

    #[test]
    fn test_dispatch_routes_by_identifier() {
        let dispatcher = Dispatcher::new();
        let mut status = CarStatus::new();

        let frame = CanFrame::new(0x316, &[0x00, 0x00, 0x00, 0x1F]).unwrap();
        let result = dispatcher.dispatch(&frame, &mut status, 10);

        assert!(result.is_decoded());
        assert_eq!(result.entry().map(|e| e.name), Some("DME_RPM"));
        assert_eq!(status.rpm().value(), 7936);
        assert_eq!(status.rpm().last_update(), Some(10));
    }

    #[test]
    fn test_short_frame_is_skipped() {
        let dispatcher = Dispatcher::new();
        let mut status = CarStatus::new();
        let before = status.clone();

        let frame = CanFrame::new(0x316, &[0x00, 0x00, 0x00]).unwrap();
        let result = dispatcher.dispatch(&frame, &mut status, 10);

        assert!(matches!(
            result,
            Dispatch::Skipped {
                required: 4,
                actual: 3,
                ..
            }
        ));
        assert_eq!(status, before);
    }

    #[test]
    fn test_remote_frame_is_skipped() {
        let dispatcher = Dispatcher::new();
        let mut status = CarStatus::new();

        let frame = CanFrame::remote(0x1F5, 8).unwrap();
        let result = dispatcher.dispatch(&frame, &mut status, 10);

        assert!(matches!(result, Dispatch::Skipped { actual: 0, .. }));
        assert!(!status.steering_angle_deg().is_set());
    }

    #[test]
    fn test_message_filter() {
        let config = DecoderConfig::new().with_message_filter(vec![0x153]);
        let dispatcher = Dispatcher::new().with_config(config);
        let mut status = CarStatus::new();

        let rpm = CanFrame::new(0x316, &[0x00, 0x00, 0x00, 0x1F]).unwrap();
        assert!(matches!(
            dispatcher.dispatch(&rpm, &mut status, 1),
            Dispatch::Filtered(_)
        ));
        assert!(!status.rpm().is_set());

        let speed = CanFrame::new(0x153, &[0x00, 0x00, 0x19]).unwrap();
        assert!(dispatcher.dispatch(&speed, &mut status, 2).is_decoded());
        assert!(status.speed_kph().is_set());
    }

    #[test]
    fn test_observer_sees_owned_fields() {
        let dispatcher = Dispatcher::new();
        let mut status = CarStatus::new();
        let mut observer = RecordingObserver::new();

        let frame = CanFrame::new(0x153, &[0x00, 0x00, 0x19]).unwrap();
        dispatcher.dispatch_observed(&frame, &mut status, 7, &mut observer);

        assert_eq!(observer.field_names(), vec!["speed_kph", "speed_mph"]);
        assert!(observer.updates.iter().all(|(id, f)| *id == 0x153 && f.last_update == Some(7)));
    }

    #[test]
    fn test_observer_silent_on_unknown_and_short() {
        let dispatcher = Dispatcher::new();
        let mut status = CarStatus::new();
        let mut observer = RecordingObserver::new();

        let unknown = CanFrame::new(0x7FF, &[0; 8]).unwrap();
        let short = CanFrame::new(0x1F0, &[0; 4]).unwrap();
        dispatcher.dispatch_observed(&unknown, &mut status, 1, &mut observer);
        dispatcher.dispatch_observed(&short, &mut status, 2, &mut observer);

        assert!(observer.updates.is_empty());
    }

    fn decode_nothing(_: &CanFrame, _: &mut CarStatus, _: Tick) -> DecodeOutcome {
        DecodeOutcome::Applied
    }

    static CUSTOM: &[DecoderEntry] = &[DecoderEntry {
        id: 0x100,
        name: "Custom",
        required_len: 0,
        fields: &[],
        decode: decode_nothing,
    }];

    #[test]
    fn test_custom_table() {
        let dispatcher = Dispatcher::with_table(CUSTOM);
        let mut status = CarStatus::new();

        let frame = CanFrame::new(0x100, &[]).unwrap();
        assert!(dispatcher.dispatch(&frame, &mut status, 1).is_decoded());

        let rpm = CanFrame::new(0x316, &[0x00, 0x00, 0x00, 0x1F]).unwrap();
        assert!(matches!(dispatcher.dispatch(&rpm, &mut status, 1), Dispatch::Unknown));
    }
}
