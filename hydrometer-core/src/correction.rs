//! Hydrometer temperature correction
//!
//! A hydrometer reads true only at the temperature it was calibrated at.
//! Warmer wort is less dense, so the float sinks deeper and the reading comes
//! out low. The correction rescales a reading by the ratio of water density
//! at the measured and the calibration temperature, using the usual cubic
//! approximation in °F.

use crate::constants::physics::{
    FAHRENHEIT_FREEZING_POINT, FAHRENHEIT_PER_CELSIUS, GRAVITY_CORRECTION_COEFFS_F,
};

/// Adjust `gravity` measured at `measured_c` °C to `calibration_c` °C
///
/// ```rust
/// use hydrometer_core::correction::gravity_temperature_correction_c;
///
/// let sg = gravity_temperature_correction_c(1.020, 45.0, 20.0);
/// assert!((sg - 1.028).abs() < 0.001);
/// ```
pub fn gravity_temperature_correction_c(gravity: f64, measured_c: f64, calibration_c: f64) -> f64 {
    gravity_temperature_correction_f(gravity, c_to_f(measured_c), c_to_f(calibration_c))
}

/// Same as [`gravity_temperature_correction_c`] with temperatures in °F
pub fn gravity_temperature_correction_f(gravity: f64, measured_f: f64, calibration_f: f64) -> f64 {
    gravity * (density_factor(measured_f) / density_factor(calibration_f))
}

fn c_to_f(c: f64) -> f64 {
    c * f64::from(FAHRENHEIT_PER_CELSIUS) + f64::from(FAHRENHEIT_FREEZING_POINT)
}

fn density_factor(t_f: f64) -> f64 {
    GRAVITY_CORRECTION_COEFFS_F
        .iter()
        .rev()
        .fold(0.0, |acc, &c| acc * t_f + c)
}
