//! Chassis messages: vehicle speed, steering angle, lateral acceleration,
//! wheel speeds

use super::DecodeOutcome;
use crate::clock::Tick;
use crate::status::CarStatus;
use crate::types::CanFrame;

pub const SPEED_ID: u16 = 0x153;
pub const SPEED_LEN: usize = 3;

pub const STEERING_ID: u16 = 0x1F5;
pub const STEERING_LEN: usize = 2;

pub const LATERAL_G_ID: u16 = 0x1F3;
pub const LATERAL_G_LEN: usize = 4;

pub const WHEEL_SPEED_ID: u16 = 0x1F0;
pub const WHEEL_SPEED_LEN: usize = 8;

const KPH_TO_MPH: f32 = 0.621371;
const DEG_PER_COUNT: f32 = 0.043945;

/// Vehicle speed in kph, 1/128 kph per count
pub fn speed_kph(lsb: u8, msb: u8) -> f32 {
    u16::from_le_bytes([lsb, msb]) as f32 / 128.0
}

/// Sign-magnitude steering count: 15-bit magnitude, sign in bit 7 of the high byte
pub fn steering_raw(lsb: u8, msb: u8) -> i16 {
    let magnitude = (((msb & 0x7F) as i16) << 8) | lsb as i16;
    if msb & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    }
}

pub fn steering_angle_deg(lsb: u8, msb: u8) -> f32 {
    steering_raw(lsb, msb) as f32 * DEG_PER_COUNT
}

/// 12-bit wheel count: full low byte plus the low nibble of the next byte
pub fn wheel_speed_raw(lsb: u8, msb: u8) -> u16 {
    lsb as u16 | (((msb & 0x0F) as u16) << 8)
}

/// Wheel speed in whole kph; integer division truncates toward zero
pub fn wheel_speed_kph(raw: u16) -> u16 {
    raw / 16
}

/// Wheel speed in whole mph; integer division truncates toward zero
pub fn wheel_speed_mph(raw: u16) -> u16 {
    raw / 10
}

pub fn decode_speed(frame: &CanFrame, status: &mut CarStatus, now: Tick) -> DecodeOutcome {
    let Some(b) = frame.bytes::<SPEED_LEN>() else {
        return DecodeOutcome::too_short(frame, SPEED_LEN);
    };

    let kph = speed_kph(b[1], b[2]);
    status.speed_kph.update(kph, now);
    status.speed_mph.update(kph * KPH_TO_MPH, now);
    DecodeOutcome::Applied
}

pub fn decode_steering(frame: &CanFrame, status: &mut CarStatus, now: Tick) -> DecodeOutcome {
    let Some(b) = frame.bytes::<STEERING_LEN>() else {
        return DecodeOutcome::too_short(frame, STEERING_LEN);
    };

    status.steering_angle_deg.update(steering_angle_deg(b[0], b[1]), now);
    DecodeOutcome::Applied
}

pub fn decode_lateral_g(frame: &CanFrame, status: &mut CarStatus, now: Tick) -> DecodeOutcome {
    let Some(b) = frame.bytes::<LATERAL_G_LEN>() else {
        return DecodeOutcome::too_short(frame, LATERAL_G_LEN);
    };

    // Two's-complement, scaling still unknown so the raw count is kept
    status.lat_accel_raw.update(b[3] as i8, now);
    DecodeOutcome::Applied
}

pub fn decode_wheel_speed(frame: &CanFrame, status: &mut CarStatus, now: Tick) -> DecodeOutcome {
    let Some(b) = frame.bytes::<WHEEL_SPEED_LEN>() else {
        return DecodeOutcome::too_short(frame, WHEEL_SPEED_LEN);
    };

    let raw: [u16; 4] = [
        wheel_speed_raw(b[0], b[1]),
        wheel_speed_raw(b[2], b[3]),
        wheel_speed_raw(b[4], b[5]),
        wheel_speed_raw(b[6], b[7]),
    ];

    status.wheel_speed_kph_fl.update(wheel_speed_kph(raw[0]), now);
    status.wheel_speed_kph_fr.update(wheel_speed_kph(raw[1]), now);
    status.wheel_speed_kph_rl.update(wheel_speed_kph(raw[2]), now);
    status.wheel_speed_kph_rr.update(wheel_speed_kph(raw[3]), now);

    status.wheel_speed_mph_fl.update(wheel_speed_mph(raw[0]), now);
    status.wheel_speed_mph_fr.update(wheel_speed_mph(raw[1]), now);
    status.wheel_speed_mph_rl.update(wheel_speed_mph(raw[2]), now);
    status.wheel_speed_mph_rr.update(wheel_speed_mph(raw[3]), now);

    DecodeOutcome::Applied
}
