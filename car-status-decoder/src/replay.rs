//! Replay driver
//!
//! Feeds a frame source through a [`Dispatcher`] into a [`CarStatus`], one
//! frame at a time, and keeps counters about what happened. This is the
//! same loop the firmware runs on every received frame, minus the display.

use crate::clock::TickSource;
use crate::dispatcher::{Dispatch, Dispatcher};
use crate::observer::UpdateObserver;
use crate::status::CarStatus;
use crate::types::{CanFrame, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counters accumulated over a replay
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    /// Frames handed to the dispatcher
    pub total_frames: u64,
    /// Frames that updated the status store
    pub decoded: u64,
    /// Frames for a known identifier that were too short
    pub skipped_short: u64,
    /// Frames for a known identifier excluded by the message filter
    pub filtered: u64,
    /// Frames with no registered decoder
    pub unknown: u64,
    /// Records the frame source could not parse
    pub read_errors: u64,
    /// Frame count per identifier, decoded or not
    pub per_id: BTreeMap<u16, u64>,
}

impl ReplayStats {
    fn record(&mut self, frame: &CanFrame, result: &Dispatch) {
        self.total_frames += 1;
        *self.per_id.entry(frame.id()).or_insert(0) += 1;

        match result {
            Dispatch::Decoded(_) => self.decoded += 1,
            Dispatch::Skipped { .. } => self.skipped_short += 1,
            Dispatch::Filtered(_) => self.filtered += 1,
            Dispatch::Unknown => self.unknown += 1,
        }
    }
}

/// Runs frames through a dispatcher into an owned status store
pub struct Replay<C: TickSource> {
    dispatcher: Dispatcher,
    status: CarStatus,
    clock: C,
    stats: ReplayStats,
}

impl<C: TickSource> Replay<C> {
    pub fn new(dispatcher: Dispatcher, clock: C) -> Self {
        Self {
            dispatcher,
            status: CarStatus::new(),
            clock,
            stats: ReplayStats::default(),
        }
    }

    /// Process a single frame
    pub fn process(&mut self, frame: &CanFrame) -> Dispatch {
        let now = self.clock.now();
        let result = self.dispatcher.dispatch(frame, &mut self.status, now);
        self.stats.record(frame, &result);
        result
    }

    /// Process a single frame and report updated fields to `observer`
    pub fn process_observed<O: UpdateObserver + ?Sized>(
        &mut self,
        frame: &CanFrame,
        observer: &mut O,
    ) -> Dispatch {
        let now = self.clock.now();
        let result = self
            .dispatcher
            .dispatch_observed(frame, &mut self.status, now, observer);
        self.stats.record(frame, &result);
        result
    }

    /// Drain a frame source, stopping after `max_frames` frames if given
    ///
    /// Unreadable records are counted and logged; they never stop the replay.
    pub fn run<I>(&mut self, frames: I, max_frames: Option<u64>)
    where
        I: IntoIterator<Item = Result<CanFrame>>,
    {
        for item in frames {
            if let Some(max) = max_frames {
                if self.stats.total_frames >= max {
                    log::info!("Frame limit of {} reached", max);
                    break;
                }
            }

            match item {
                Ok(frame) => {
                    self.process(&frame);
                }
                Err(e) => {
                    self.stats.read_errors += 1;
                    log::warn!("Skipping unreadable record: {}", e);
                }
            }
        }

        log::info!(
            "Replay done: {} frames, {} decoded, {} unknown, {} short, {} read errors",
            self.stats.total_frames,
            self.stats.decoded,
            self.stats.unknown,
            self.stats.skipped_short,
            self.stats.read_errors
        );
    }

    pub fn status(&self) -> &CarStatus {
        &self.status
    }

    pub fn stats(&self) -> &ReplayStats {
        &self.stats
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Hand back the final status and statistics
    pub fn finish(self) -> (CarStatus, ReplayStats) {
        (self.status, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::types::DecoderError;

    fn frame(id: u16, data: &[u8]) -> Result<CanFrame> {
        CanFrame::new(id, data)
    }

    #[test]
    fn test_replay_counts_outcomes() {
        let mut replay = Replay::new(Dispatcher::new(), ManualClock::new(0));
        let frames = vec![
            frame(0x316, &[0, 0, 0, 0x1F]),
            frame(0x316, &[0, 0]),
            frame(0x2A0, &[0; 8]),
            Err(DecoderError::LogParseError("bad".into())),
            frame(0x1F3, &[0x02, 0xBD, 0x00, 0xFF]),
        ];

        replay.run(frames, None);
        let stats = replay.stats();

        assert_eq!(stats.total_frames, 4);
        assert_eq!(stats.decoded, 2);
        assert_eq!(stats.skipped_short, 1);
        assert_eq!(stats.unknown, 1);
        assert_eq!(stats.read_errors, 1);
        assert_eq!(stats.per_id.get(&0x316), Some(&2));
        assert_eq!(replay.status().rpm().value(), 7936);
        assert_eq!(replay.status().lat_accel_raw().value(), -1);
    }

    #[test]
    fn test_replay_frame_limit() {
        let mut replay = Replay::new(Dispatcher::new(), ManualClock::new(0));
        let frames = (0..10).map(|i| frame(0x316, &[0, 0, i, 0]));

        replay.run(frames, Some(3));
        assert_eq!(replay.stats().total_frames, 3);
        assert_eq!(replay.status().rpm().value(), 2);
    }

    #[test]
    fn test_replay_uses_clock() {
        let clock = ManualClock::new(1_000);
        let mut replay = Replay::new(Dispatcher::new(), &clock);

        replay.process(&CanFrame::new(0x316, &[0, 0, 0, 0x1F]).unwrap());
        clock.advance(250);
        replay.process(&CanFrame::new(0x1F5, &[0x64, 0x00]).unwrap());

        assert_eq!(replay.status().rpm().last_update(), Some(1_000));
        assert_eq!(replay.status().steering_angle_deg().last_update(), Some(1_250));
    }
}
