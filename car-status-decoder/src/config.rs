//! Dispatcher configuration types
//!
//! The dispatcher itself needs very little configuration: which identifiers
//! to act on and whether to log every field update.

use serde::{Deserialize, Serialize};

/// Configuration for the dispatcher
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Optional: only decode these specific CAN message IDs
    #[serde(default)]
    pub message_filter: Option<Vec<u16>>,

    /// Log every field a decoded frame touched (debug level)
    #[serde(default)]
    pub log_field_updates: bool,
}

impl DecoderConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set message filter
    pub fn with_message_filter(mut self, messages: Vec<u16>) -> Self {
        self.message_filter = Some(messages);
        self
    }

    /// Builder method: enable field update logging
    pub fn with_update_logging(mut self, enabled: bool) -> Self {
        self.log_field_updates = enabled;
        self
    }

    /// Check if a message ID should be processed
    pub fn should_process_message(&self, can_id: u16) -> bool {
        match &self.message_filter {
            Some(messages) => messages.contains(&can_id),
            None => true,
        }
    }
}
