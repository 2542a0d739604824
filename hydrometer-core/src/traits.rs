//! Core traits for the measurement pipeline
//!
//! These traits are the seams between the numeric core and the hardware or
//! storage around it. Keep them simple - the device runs one measurement cycle
//! to completion and then sleeps.

/// One reading from a tilt sensor
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawSample {
    /// Tilt angle in degrees from vertical
    pub angle: f32,
    /// Temperature in °C at the time of the reading
    pub temp_c: f32,
}

/// A source of tilt readings
///
/// Chip families (MPU6050, ICM42670-P, ...) implement this; the core never
/// sees the bus protocol.
pub trait TiltSensor {
    /// Take a reading
    ///
    /// Returns `None` when no trustworthy value is available, for example
    /// while the float is still moving.
    fn read(&mut self) -> Option<RawSample>;
}

/// Low-pass filter over a scalar sample stream
pub trait Filter {
    /// Add `value` to the window and return the smoothed value
    fn filter(&mut self, value: f32) -> f32;
}
