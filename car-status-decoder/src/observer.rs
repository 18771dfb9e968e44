//! Update observers
//!
//! Field updates are plain state transitions. Anything that wants to hear
//! about them (logging, a display refresh, a recorder) implements
//! [`UpdateObserver`] and is handed to
//! [`Dispatcher::dispatch_observed`](crate::Dispatcher::dispatch_observed).

use crate::field::FieldSnapshot;

/// Subscriber told about every field a decoded frame wrote
pub trait UpdateObserver {
    /// Called once per updated field, after the decoder has finished
    fn on_update(&mut self, can_id: u16, field: &FieldSnapshot);
}

/// Observer that writes each update to the `log` facade at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl UpdateObserver for LogObserver {
    fn on_update(&mut self, can_id: u16, field: &FieldSnapshot) {
        log::debug!("0x{:03X} {}: {}", can_id, field.name, field.value);
    }
}

/// Observer that keeps every update it sees, in order
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub updates: Vec<(u16, FieldSnapshot)>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the recorded fields, in update order
    pub fn field_names(&self) -> Vec<&'static str> {
        self.updates.iter().map(|(_, f)| f.name).collect()
    }
}

impl UpdateObserver for RecordingObserver {
    fn on_update(&mut self, can_id: u16, field: &FieldSnapshot) {
        self.updates.push((can_id, *field));
    }
}

impl<T: UpdateObserver + ?Sized> UpdateObserver for &mut T {
    fn on_update(&mut self, can_id: u16, field: &FieldSnapshot) {
        (**self).on_update(can_id, field);
    }
}

/// Fan out to two observers
impl<A: UpdateObserver, B: UpdateObserver> UpdateObserver for (A, B) {
    fn on_update(&mut self, can_id: u16, field: &FieldSnapshot) {
        self.0.on_update(can_id, field);
        self.1.on_update(can_id, field);
    }
}
