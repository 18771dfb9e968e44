//! Per-identifier payload decoders
//!
//! Every decoder is a plain function bound to one CAN identifier. The full
//! set lives in [`DECODERS`], a static table built at compile time: adding a
//! message means adding an entry here, the dispatcher never changes.
//!
//! Decoders share a few rules:
//! - they read the payload only through [`CanFrame::bytes`], so a frame
//!   shorter than the layout is refused with [`DecodeOutcome::TooShort`]
//!   and nothing is written
//! - they write every field they own in one call
//! - malformed content is not an error; it decodes to whatever the layout
//!   says those bytes mean

use crate::clock::Tick;
use crate::status::CarStatus;
use crate::types::CanFrame;
use std::fmt;

pub mod chassis;
pub mod cluster;
pub mod engine;

/// Signature shared by all decoders
pub type DecodeFn = fn(&CanFrame, &mut CarStatus, Tick) -> DecodeOutcome;

/// Result of running one decoder on one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// Every owned field was updated
    Applied,
    /// Payload shorter than the layout; the store was left untouched
    TooShort { required: usize, actual: usize },
}

impl DecodeOutcome {
    pub(crate) fn too_short(frame: &CanFrame, required: usize) -> Self {
        DecodeOutcome::TooShort {
            required,
            actual: frame.payload().len(),
        }
    }
}

/// One row of the decoder table
pub struct DecoderEntry {
    /// CAN identifier this decoder handles
    pub id: u16,
    /// Message name (diagnostics)
    pub name: &'static str,
    /// Minimum payload length the layout reads
    pub required_len: usize,
    /// Names of the status fields written on success
    pub fields: &'static [&'static str],
    /// The decode function itself
    pub decode: DecodeFn,
}

impl fmt::Debug for DecoderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderEntry")
            .field("id", &format_args!("0x{:03X}", self.id))
            .field("name", &self.name)
            .field("required_len", &self.required_len)
            .field("fields", &self.fields)
            .finish()
    }
}

impl DecoderEntry {
    /// Run the decoder against `status`
    pub fn apply(&self, frame: &CanFrame, status: &mut CarStatus, now: Tick) -> DecodeOutcome {
        (self.decode)(frame, status, now)
    }
}

/// All decoders known to the system
pub static DECODERS: &[DecoderEntry] = &[
    DecoderEntry {
        id: engine::OIL_STATUS_ID,
        name: "DME_Status",
        required_len: engine::OIL_STATUS_LEN,
        fields: &[
            "oil_temp_c",
            "oil_temp_f",
            "check_engine",
            "overheat",
            "fuel_cons_raw",
        ],
        decode: engine::decode_oil_status,
    },
    DecoderEntry {
        id: engine::RPM_ID,
        name: "DME_RPM",
        required_len: engine::RPM_LEN,
        fields: &["rpm"],
        decode: engine::decode_rpm,
    },
    DecoderEntry {
        id: engine::WATER_THROTTLE_ID,
        name: "DME_EngineData",
        required_len: engine::WATER_THROTTLE_LEN,
        fields: &[
            "water_temp_c",
            "water_temp_f",
            "throttle_pct",
            "brake_pedal",
            "kickdown",
        ],
        decode: engine::decode_water_throttle,
    },
    DecoderEntry {
        id: chassis::SPEED_ID,
        name: "ASC_Speed",
        required_len: chassis::SPEED_LEN,
        fields: &["speed_kph", "speed_mph"],
        decode: chassis::decode_speed,
    },
    DecoderEntry {
        id: chassis::STEERING_ID,
        name: "LWS_Steering",
        required_len: chassis::STEERING_LEN,
        fields: &["steering_angle_deg"],
        decode: chassis::decode_steering,
    },
    DecoderEntry {
        id: chassis::LATERAL_G_ID,
        name: "DSC_LatAccel",
        required_len: chassis::LATERAL_G_LEN,
        fields: &["lat_accel_raw"],
        decode: chassis::decode_lateral_g,
    },
    DecoderEntry {
        id: chassis::WHEEL_SPEED_ID,
        name: "ABS_WheelSpeed",
        required_len: chassis::WHEEL_SPEED_LEN,
        fields: &[
            "wheel_speed_kph_fl",
            "wheel_speed_kph_fr",
            "wheel_speed_kph_rl",
            "wheel_speed_kph_rr",
            "wheel_speed_mph_fl",
            "wheel_speed_mph_fr",
            "wheel_speed_mph_rl",
            "wheel_speed_mph_rr",
        ],
        decode: chassis::decode_wheel_speed,
    },
    DecoderEntry {
        id: cluster::ODOMETER_ID,
        name: "IKE_Odometer",
        required_len: cluster::ODOMETER_LEN,
        fields: &["odometer_km", "fuel_level_raw", "running_clock_min"],
        decode: cluster::decode_odometer,
    },
    DecoderEntry {
        id: cluster::CLIMATE_ID,
        name: "IKE_Climate",
        required_len: cluster::CLIMATE_LEN,
        fields: &["outside_temp_c", "ac_on"],
        decode: cluster::decode_climate,
    },
];

/// °C to °F, truncated toward zero like the gauge values
pub fn celsius_to_fahrenheit(celsius: i32) -> i32 {
    (celsius as f64 * 1.8 + 32.0) as i32
}
