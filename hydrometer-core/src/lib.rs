//! Calibration and signal processing core for tilt hydrometers
//!
//! Turns raw tilt readings from a floating hydrometer into calibrated
//! gravity values. Designed for battery powered microcontrollers that wake
//! up, take one reading and go back to deep sleep.
//!
//! Key constraints:
//! - `no_std`, no heap allocation
//! - Filter and velocity state are plain data that survive deep sleep
//! - Formula text stays compatible with formulas stored by earlier firmware
//!
//! ```no_run
//! use hydrometer_core::{calculate_gravity, FormulaFitter, RawFormulaData};
//!
//! let mut data = RawFormulaData::new();
//! data.tilt = [25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0, 65.0, 70.0];
//! data.gravity = [1.0, 1.01, 1.02, 1.03, 1.04, 1.05, 1.06, 1.07, 1.08, 1.1];
//!
//! // Calibrate once
//! let formula = FormulaFitter::default().create_formula(&data, 2).unwrap();
//!
//! // Evaluate on every reading
//! let sg = calculate_gravity(formula.as_str(), 30.0, 20.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod logging;

pub mod config;
pub mod constants;
pub mod correction;
pub mod errors;
pub mod filter;
pub mod formula;
pub mod linalg;
pub mod measurement;
pub mod sensor;
pub mod traits;
pub mod units;
pub mod velocity;

// Public API
pub use config::{ConfigStore, GravityConfig};
pub use correction::gravity_temperature_correction_c;
pub use errors::{ConfigError, ConfigResult, FormulaError, FormulaResult};
pub use filter::{FilterData, MovingAverageFilter, TrimmedMovingAverageFilter};
pub use formula::{
    calculate_gravity, try_calculate_gravity, FitReport, Formula, FormulaEvaluator,
    FormulaFitter, RawFormulaData,
};
pub use measurement::{Measurement, MeasurementCycle};
pub use traits::{Filter, RawSample, TiltSensor};
pub use units::{GravityUnit, TemperatureUnit};
pub use velocity::{GravityVelocity, GravityVelocityData};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
