//! Timestamped telemetry fields
//!
//! A [`Field`] pairs a value with the tick of its last update. Both parts are
//! private and change together through [`Field::update`], which is the only
//! mutation path.

use crate::clock::Tick;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single named, typed, timestamped telemetry value
#[derive(Debug, Clone, PartialEq)]
pub struct Field<T> {
    name: &'static str,
    value: T,
    last_update: Option<Tick>,
}

impl<T: Copy + Default> Field<T> {
    /// Create an unset field holding `T::default()`
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            value: T::default(),
            last_update: None,
        }
    }

    /// Store a new value stamped with `now`
    pub fn update(&mut self, value: T, now: Tick) {
        self.value = value;
        self.last_update = Some(now);
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self) -> T {
        self.value
    }

    /// Tick of the last update, `None` while the field has never been set
    pub fn last_update(&self) -> Option<Tick> {
        self.last_update
    }

    pub fn is_set(&self) -> bool {
        self.last_update.is_some()
    }
}

impl<T: Copy + Default + Into<FieldValue>> Field<T> {
    /// Type-erased copy of this field for display and observers
    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            name: self.name,
            value: self.value.into(),
            last_update: self.last_update,
        }
    }
}

/// Field value with its concrete type erased
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Unsigned integer value
    Unsigned(u64),
    /// Signed integer value
    Integer(i64),
    /// Floating-point value (after scaling)
    Float(f64),
    /// Switch or flag state
    Boolean(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Unsigned(v) => write!(f, "{}", v),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{:.3}", v),
            FieldValue::Boolean(v) => write!(f, "{}", if *v { "true" } else { "false" }),
        }
    }
}

impl FieldValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            FieldValue::Unsigned(v) => *v as f64,
            FieldValue::Integer(v) => *v as f64,
            FieldValue::Float(v) => *v,
            FieldValue::Boolean(v) => {
                if *v {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Convert to i64, truncating floats toward zero
    pub fn as_i64(&self) -> i64 {
        match self {
            FieldValue::Unsigned(v) => *v as i64,
            FieldValue::Integer(v) => *v,
            FieldValue::Float(v) => *v as i64,
            FieldValue::Boolean(v) => {
                if *v {
                    1
                } else {
                    0
                }
            }
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            FieldValue::Unsigned(v) => *v != 0,
            FieldValue::Integer(v) => *v != 0,
            FieldValue::Float(v) => *v != 0.0,
            FieldValue::Boolean(v) => *v,
        }
    }
}

impl From<u8> for FieldValue {
    fn from(v: u8) -> Self {
        FieldValue::Unsigned(v.into())
    }
}

impl From<u16> for FieldValue {
    fn from(v: u16) -> Self {
        FieldValue::Unsigned(v.into())
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::Unsigned(v.into())
    }
}

impl From<i8> for FieldValue {
    fn from(v: i8) -> Self {
        FieldValue::Integer(v.into())
    }
}

impl From<i16> for FieldValue {
    fn from(v: i16) -> Self {
        FieldValue::Integer(v.into())
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Integer(v.into())
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Float(v.into())
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

/// Read-only view of one field, as handed to the display side
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSnapshot {
    pub name: &'static str,
    pub value: FieldValue,
    pub last_update: Option<Tick>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_field_is_unset() {
        let field: Field<u16> = Field::new("rpm");
        assert_eq!(field.name(), "rpm");
        assert_eq!(field.value(), 0);
        assert_eq!(field.last_update(), None);
        assert!(!field.is_set());
    }

    #[test]
    fn test_update_sets_value_and_tick() {
        let mut field: Field<i32> = Field::new("oil_temp_c");
        field.update(92, 1_500);
        assert_eq!(field.value(), 92);
        assert_eq!(field.last_update(), Some(1_500));

        field.update(93, 1_700);
        assert_eq!(field.value(), 93);
        assert_eq!(field.last_update(), Some(1_700));
    }

    #[test]
    fn test_snapshot_erases_type() {
        let mut field: Field<i8> = Field::new("lat_accel_raw");
        field.update(-3, 42);

        let snap = field.snapshot();
        assert_eq!(snap.name, "lat_accel_raw");
        assert_eq!(snap.value, FieldValue::Integer(-3));
        assert_eq!(snap.last_update, Some(42));
    }

    #[test]
    fn test_field_value_conversions() {
        let int_val = FieldValue::Integer(-42);
        assert_eq!(int_val.as_f64(), -42.0);
        assert_eq!(int_val.as_i64(), -42);
        assert!(int_val.as_bool());

        let float_val = FieldValue::Float(4.75);
        assert_eq!(float_val.as_i64(), 4);

        let bool_val = FieldValue::Boolean(false);
        assert_eq!(bool_val.as_f64(), 0.0);
        assert!(!bool_val.as_bool());
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!(format!("{}", FieldValue::Unsigned(7936)), "7936");
        assert_eq!(format!("{}", FieldValue::Float(4.39450001)), "4.395");
        assert_eq!(format!("{}", FieldValue::Boolean(true)), "true");
    }
}
