//! The status store: every telemetry field the decoders maintain
//!
//! `CarStatus` is created once with default values and lives for the whole
//! process. Decoders get it by mutable reference; everyone else reads it
//! through the field getters or the type-erased [`FieldSnapshot`] views.

use crate::field::{Field, FieldSnapshot};

/// Current vehicle state, one field per physical quantity
#[derive(Debug, Clone, PartialEq)]
pub struct CarStatus {
    // Temperatures
    pub(crate) oil_temp_c: Field<i32>,
    pub(crate) oil_temp_f: Field<i32>,
    pub(crate) water_temp_c: Field<i32>,
    pub(crate) water_temp_f: Field<i32>,
    pub(crate) outside_temp_c: Field<i16>,

    // Engine
    pub(crate) rpm: Field<u16>,
    pub(crate) throttle_pct: Field<u8>,

    // Vehicle dynamics
    pub(crate) speed_kph: Field<f32>,
    pub(crate) speed_mph: Field<f32>,
    pub(crate) steering_angle_deg: Field<f32>,
    pub(crate) lat_accel_raw: Field<i8>,
    pub(crate) wheel_speed_kph_fl: Field<u16>,
    pub(crate) wheel_speed_kph_fr: Field<u16>,
    pub(crate) wheel_speed_kph_rl: Field<u16>,
    pub(crate) wheel_speed_kph_rr: Field<u16>,
    pub(crate) wheel_speed_mph_fl: Field<u16>,
    pub(crate) wheel_speed_mph_fr: Field<u16>,
    pub(crate) wheel_speed_mph_rl: Field<u16>,
    pub(crate) wheel_speed_mph_rr: Field<u16>,

    // Switches / flags
    pub(crate) brake_pedal: Field<bool>,
    pub(crate) kickdown: Field<bool>,
    pub(crate) check_engine: Field<bool>,
    pub(crate) overheat: Field<bool>,
    pub(crate) ac_on: Field<bool>,

    // Odometer / fuel
    pub(crate) odometer_km: Field<u32>,
    pub(crate) fuel_cons_raw: Field<u16>,
    pub(crate) fuel_level_raw: Field<u8>,
    pub(crate) running_clock_min: Field<u16>,
}

impl CarStatus {
    pub fn new() -> Self {
        Self {
            oil_temp_c: Field::new("oil_temp_c"),
            oil_temp_f: Field::new("oil_temp_f"),
            water_temp_c: Field::new("water_temp_c"),
            water_temp_f: Field::new("water_temp_f"),
            outside_temp_c: Field::new("outside_temp_c"),
            rpm: Field::new("rpm"),
            throttle_pct: Field::new("throttle_pct"),
            speed_kph: Field::new("speed_kph"),
            speed_mph: Field::new("speed_mph"),
            steering_angle_deg: Field::new("steering_angle_deg"),
            lat_accel_raw: Field::new("lat_accel_raw"),
            wheel_speed_kph_fl: Field::new("wheel_speed_kph_fl"),
            wheel_speed_kph_fr: Field::new("wheel_speed_kph_fr"),
            wheel_speed_kph_rl: Field::new("wheel_speed_kph_rl"),
            wheel_speed_kph_rr: Field::new("wheel_speed_kph_rr"),
            wheel_speed_mph_fl: Field::new("wheel_speed_mph_fl"),
            wheel_speed_mph_fr: Field::new("wheel_speed_mph_fr"),
            wheel_speed_mph_rl: Field::new("wheel_speed_mph_rl"),
            wheel_speed_mph_rr: Field::new("wheel_speed_mph_rr"),
            brake_pedal: Field::new("brake_pedal"),
            kickdown: Field::new("kickdown"),
            check_engine: Field::new("check_engine"),
            overheat: Field::new("overheat"),
            ac_on: Field::new("ac_on"),
            odometer_km: Field::new("odometer_km"),
            fuel_cons_raw: Field::new("fuel_cons_raw"),
            fuel_level_raw: Field::new("fuel_level_raw"),
            running_clock_min: Field::new("running_clock_min"),
        }
    }

    pub fn oil_temp_c(&self) -> &Field<i32> {
        &self.oil_temp_c
    }

    pub fn oil_temp_f(&self) -> &Field<i32> {
        &self.oil_temp_f
    }

    pub fn water_temp_c(&self) -> &Field<i32> {
        &self.water_temp_c
    }

    pub fn water_temp_f(&self) -> &Field<i32> {
        &self.water_temp_f
    }

    pub fn outside_temp_c(&self) -> &Field<i16> {
        &self.outside_temp_c
    }

    pub fn rpm(&self) -> &Field<u16> {
        &self.rpm
    }

    pub fn throttle_pct(&self) -> &Field<u8> {
        &self.throttle_pct
    }

    pub fn speed_kph(&self) -> &Field<f32> {
        &self.speed_kph
    }

    pub fn speed_mph(&self) -> &Field<f32> {
        &self.speed_mph
    }

    pub fn steering_angle_deg(&self) -> &Field<f32> {
        &self.steering_angle_deg
    }

    pub fn lat_accel_raw(&self) -> &Field<i8> {
        &self.lat_accel_raw
    }

    /// Wheel speeds in kph, ordered front-left, front-right, rear-left, rear-right
    pub fn wheel_speeds_kph(&self) -> [&Field<u16>; 4] {
        [
            &self.wheel_speed_kph_fl,
            &self.wheel_speed_kph_fr,
            &self.wheel_speed_kph_rl,
            &self.wheel_speed_kph_rr,
        ]
    }

    /// Wheel speeds in mph, same order as [`CarStatus::wheel_speeds_kph`]
    pub fn wheel_speeds_mph(&self) -> [&Field<u16>; 4] {
        [
            &self.wheel_speed_mph_fl,
            &self.wheel_speed_mph_fr,
            &self.wheel_speed_mph_rl,
            &self.wheel_speed_mph_rr,
        ]
    }

    pub fn brake_pedal(&self) -> &Field<bool> {
        &self.brake_pedal
    }

    pub fn kickdown(&self) -> &Field<bool> {
        &self.kickdown
    }

    pub fn check_engine(&self) -> &Field<bool> {
        &self.check_engine
    }

    pub fn overheat(&self) -> &Field<bool> {
        &self.overheat
    }

    pub fn ac_on(&self) -> &Field<bool> {
        &self.ac_on
    }

    pub fn odometer_km(&self) -> &Field<u32> {
        &self.odometer_km
    }

    pub fn fuel_cons_raw(&self) -> &Field<u16> {
        &self.fuel_cons_raw
    }

    pub fn fuel_level_raw(&self) -> &Field<u8> {
        &self.fuel_level_raw
    }

    pub fn running_clock_min(&self) -> &Field<u16> {
        &self.running_clock_min
    }

    /// Snapshot of every field, in declaration order
    pub fn fields(&self) -> Vec<FieldSnapshot> {
        vec![
            self.oil_temp_c.snapshot(),
            self.oil_temp_f.snapshot(),
            self.water_temp_c.snapshot(),
            self.water_temp_f.snapshot(),
            self.outside_temp_c.snapshot(),
            self.rpm.snapshot(),
            self.throttle_pct.snapshot(),
            self.speed_kph.snapshot(),
            self.speed_mph.snapshot(),
            self.steering_angle_deg.snapshot(),
            self.lat_accel_raw.snapshot(),
            self.wheel_speed_kph_fl.snapshot(),
            self.wheel_speed_kph_fr.snapshot(),
            self.wheel_speed_kph_rl.snapshot(),
            self.wheel_speed_kph_rr.snapshot(),
            self.wheel_speed_mph_fl.snapshot(),
            self.wheel_speed_mph_fr.snapshot(),
            self.wheel_speed_mph_rl.snapshot(),
            self.wheel_speed_mph_rr.snapshot(),
            self.brake_pedal.snapshot(),
            self.kickdown.snapshot(),
            self.check_engine.snapshot(),
            self.overheat.snapshot(),
            self.ac_on.snapshot(),
            self.odometer_km.snapshot(),
            self.fuel_cons_raw.snapshot(),
            self.fuel_level_raw.snapshot(),
            self.running_clock_min.snapshot(),
        ]
    }

    /// Look up a single field snapshot by name, without building the full list
    pub fn field(&self, name: &str) -> Option<FieldSnapshot> {
        let snapshot = match name {
            "oil_temp_c" => self.oil_temp_c.snapshot(),
            "oil_temp_f" => self.oil_temp_f.snapshot(),
            "water_temp_c" => self.water_temp_c.snapshot(),
            "water_temp_f" => self.water_temp_f.snapshot(),
            "outside_temp_c" => self.outside_temp_c.snapshot(),
            "rpm" => self.rpm.snapshot(),
            "throttle_pct" => self.throttle_pct.snapshot(),
            "speed_kph" => self.speed_kph.snapshot(),
            "speed_mph" => self.speed_mph.snapshot(),
            "steering_angle_deg" => self.steering_angle_deg.snapshot(),
            "lat_accel_raw" => self.lat_accel_raw.snapshot(),
            "wheel_speed_kph_fl" => self.wheel_speed_kph_fl.snapshot(),
            "wheel_speed_kph_fr" => self.wheel_speed_kph_fr.snapshot(),
            "wheel_speed_kph_rl" => self.wheel_speed_kph_rl.snapshot(),
            "wheel_speed_kph_rr" => self.wheel_speed_kph_rr.snapshot(),
            "wheel_speed_mph_fl" => self.wheel_speed_mph_fl.snapshot(),
            "wheel_speed_mph_fr" => self.wheel_speed_mph_fr.snapshot(),
            "wheel_speed_mph_rl" => self.wheel_speed_mph_rl.snapshot(),
            "wheel_speed_mph_rr" => self.wheel_speed_mph_rr.snapshot(),
            "brake_pedal" => self.brake_pedal.snapshot(),
            "kickdown" => self.kickdown.snapshot(),
            "check_engine" => self.check_engine.snapshot(),
            "overheat" => self.overheat.snapshot(),
            "ac_on" => self.ac_on.snapshot(),
            "odometer_km" => self.odometer_km.snapshot(),
            "fuel_cons_raw" => self.fuel_cons_raw.snapshot(),
            "fuel_level_raw" => self.fuel_level_raw.snapshot(),
            "running_clock_min" => self.running_clock_min.snapshot(),
            _ => return None,
        };
        Some(snapshot)
    }

    /// Names of every field, in the order returned by [`CarStatus::fields`]
    pub fn field_names() -> Vec<&'static str> {
        Self::new().fields().into_iter().map(|f| f.name).collect()
    }
}

impl Default for CarStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldValue;
    use std::collections::HashSet;

    #[test]
    fn test_new_status_is_all_defaults() {
        let status = CarStatus::new();
        for field in status.fields() {
            assert_eq!(field.last_update, None, "{} should be unset", field.name);
            assert_eq!(field.value.as_f64(), 0.0, "{} should be zero", field.name);
        }
    }

    #[test]
    fn test_field_names_are_unique() {
        let names = CarStatus::field_names();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(names.len(), unique.len());
        assert_eq!(names.len(), 28);
    }

    #[test]
    fn test_field_lookup_by_name() {
        let mut status = CarStatus::new();
        status.rpm.update(3_200, 77);

        let rpm = status.field("rpm").unwrap();
        assert_eq!(rpm.value, FieldValue::Unsigned(3_200));
        assert_eq!(rpm.last_update, Some(77));
        assert!(status.field("boost_psi").is_none());
    }

    #[test]
    fn test_field_lookup_agrees_with_full_list() {
        let mut status = CarStatus::new();
        status.wheel_speed_mph_rr.update(42, 5);
        status.ac_on.update(true, 6);

        for snapshot in status.fields() {
            assert_eq!(status.field(snapshot.name), Some(snapshot), "{}", snapshot.name);
        }
    }
}
