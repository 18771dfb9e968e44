//! Engine management (DME) messages: RPM, oil/status, water/throttle

use super::{celsius_to_fahrenheit, DecodeOutcome};
use crate::clock::Tick;
use crate::status::CarStatus;
use crate::types::CanFrame;

pub const RPM_ID: u16 = 0x316;
pub const RPM_LEN: usize = 4;

pub const OIL_STATUS_ID: u16 = 0x545;
pub const OIL_STATUS_LEN: usize = 5;

pub const WATER_THROTTLE_ID: u16 = 0x329;
pub const WATER_THROTTLE_LEN: usize = 7;

/// Oil and water temperature offset in °C
const TEMP_OFFSET_C: i32 = 48;

/// Engine speed: byte 3 MSB, byte 2 LSB
pub fn rpm(lsb: u8, msb: u8) -> u16 {
    u16::from_le_bytes([lsb, msb])
}

pub fn oil_temp_c(raw: u8) -> i32 {
    raw as i32 - TEMP_OFFSET_C
}

/// Coolant temperature, 0.75 °C per count
pub fn water_temp_c(raw: u8) -> i32 {
    (raw as f32 * 0.75).round() as i32 - TEMP_OFFSET_C
}

/// Throttle position, 0x00..0xFE mapped to 0..100 %
pub fn throttle_pct(raw: u8) -> u8 {
    (raw as f32 / 254.0 * 100.0) as u8
}

pub fn decode_rpm(frame: &CanFrame, status: &mut CarStatus, now: Tick) -> DecodeOutcome {
    let Some(b) = frame.bytes::<RPM_LEN>() else {
        return DecodeOutcome::too_short(frame, RPM_LEN);
    };

    status.rpm.update(rpm(b[2], b[3]), now);
    DecodeOutcome::Applied
}

pub fn decode_oil_status(frame: &CanFrame, status: &mut CarStatus, now: Tick) -> DecodeOutcome {
    let Some(b) = frame.bytes::<OIL_STATUS_LEN>() else {
        return DecodeOutcome::too_short(frame, OIL_STATUS_LEN);
    };

    let oil_c = oil_temp_c(b[4]);
    status.oil_temp_c.update(oil_c, now);
    status.oil_temp_f.update(celsius_to_fahrenheit(oil_c), now);

    // Check engine: bit 1 of byte 0, overheat: bit 3 of byte 3
    status.check_engine.update(b[0] & 0x02 != 0, now);
    status.overheat.update(b[3] & 0x08 != 0, now);

    // Fuel consumption counter wraps around, byte 2 MSB
    status.fuel_cons_raw.update(u16::from_le_bytes([b[1], b[2]]), now);

    DecodeOutcome::Applied
}

pub fn decode_water_throttle(frame: &CanFrame, status: &mut CarStatus, now: Tick) -> DecodeOutcome {
    let Some(b) = frame.bytes::<WATER_THROTTLE_LEN>() else {
        return DecodeOutcome::too_short(frame, WATER_THROTTLE_LEN);
    };

    let water_c = water_temp_c(b[1]);
    status.water_temp_c.update(water_c, now);
    status.water_temp_f.update(celsius_to_fahrenheit(water_c), now);

    status.throttle_pct.update(throttle_pct(b[5]), now);

    status.brake_pedal.update(b[6] & 0x01 != 0, now);
    status.kickdown.update(b[6] & 0x04 != 0, now);

    DecodeOutcome::Applied
}
