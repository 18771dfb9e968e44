//! Instrument cluster (IKE) messages: odometer and climate

use super::DecodeOutcome;
use crate::clock::Tick;
use crate::status::CarStatus;
use crate::types::CanFrame;

pub const ODOMETER_ID: u16 = 0x613;
pub const ODOMETER_LEN: usize = 5;

pub const CLIMATE_ID: u16 = 0x615;
pub const CLIMATE_LEN: usize = 4;

/// Odometer counts in units of 10 km, byte 1 MSB
pub fn odometer_km(lsb: u8, msb: u8) -> u32 {
    u16::from_le_bytes([lsb, msb]) as u32 * 10
}

/// Outside air temperature: values above 128 encode `-(raw - 128)`
pub fn outside_temp_c(raw: u8) -> i16 {
    if raw > 128 {
        -(raw as i16 - 128)
    } else {
        raw as i16
    }
}

pub fn decode_odometer(frame: &CanFrame, status: &mut CarStatus, now: Tick) -> DecodeOutcome {
    let Some(b) = frame.bytes::<ODOMETER_LEN>() else {
        return DecodeOutcome::too_short(frame, ODOMETER_LEN);
    };

    status.odometer_km.update(odometer_km(b[0], b[1]), now);
    status.fuel_level_raw.update(b[2], now);
    status.running_clock_min.update(u16::from_le_bytes([b[3], b[4]]), now);
    DecodeOutcome::Applied
}

pub fn decode_climate(frame: &CanFrame, status: &mut CarStatus, now: Tick) -> DecodeOutcome {
    let Some(b) = frame.bytes::<CLIMATE_LEN>() else {
        return DecodeOutcome::too_short(frame, CLIMATE_LEN);
    };

    status.outside_temp_c.update(outside_temp_c(b[3]), now);
    status.ac_on.update(b[0] == 0x80, now);
    DecodeOutcome::Applied
}
