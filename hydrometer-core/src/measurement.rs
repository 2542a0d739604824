//! Measurement Cycle
//!
//! ## Overview
//!
//! One wake-up of the device runs exactly one cycle, start to finish:
//!
//! ```text
//! TiltSensor → temperature offset → trimmed filter (angle)
//!            → formula (raw and filtered angle) → temperature correction
//!            → Measurement → push / display
//! ```
//!
//! Nothing here blocks or keeps state of its own. The filter window lives in
//! a caller-owned [`FilterData`] so it can sit in retained memory between
//! cycles, and settings come from a [`GravityConfig`] passed in by reference.
//!
//! ## Reported Gravity
//!
//! | `gravity_temp_adjustment` | `gyro_filter` | reported gravity |
//! |---------------------------|---------------|------------------|
//! | on                        | any           | corrected        |
//! | off                       | on            | filtered         |
//! | off                       | off           | raw              |
//!
//! The correction itself starts from the filtered gravity when filtering is
//! enabled and from the raw gravity otherwise.
//!
//! ## Usage Example
//!
//! ```rust
//! use hydrometer_core::{
//!     config::GravityConfig,
//!     filter::FilterData,
//!     measurement::MeasurementCycle,
//!     traits::{RawSample, TiltSensor},
//! };
//!
//! struct Fixed(RawSample);
//!
//! impl TiltSensor for Fixed {
//!     fn read(&mut self) -> Option<RawSample> {
//!         Some(self.0)
//!     }
//! }
//!
//! let mut config = GravityConfig::default();
//! config.set_gravity_formula("0.00000909*tilt^2+0.00124545*tilt+0.96445455").unwrap();
//!
//! let mut sensor = Fixed(RawSample { angle: 30.0, temp_c: 20.0 });
//! let mut filter_data = FilterData::new();
//!
//! let m = MeasurementCycle::run(&mut sensor, &config, &mut filter_data).unwrap();
//! assert!((m.gravity_sg() - 1.01).abs() < 0.005);
//! ```

use crate::{
    config::GravityConfig,
    correction::gravity_temperature_correction_c,
    filter::{FilterData, TrimmedMovingAverageFilter},
    formula::calculate_gravity,
    traits::{Filter, RawSample, TiltSensor},
    units::{GravityUnit, TemperatureUnit},
    velocity::GravityVelocity,
};

/// Result of one measurement cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measurement {
    /// Tilt angle as read (degrees)
    pub angle: f32,
    /// Tilt angle after the trimmed moving average (degrees)
    pub filtered_angle: f32,
    /// Temperature including the configured offset (°C)
    pub temp_c: f32,
    /// Gravity from the raw angle (SG)
    pub raw_gravity_sg: f64,
    /// Gravity from the filtered angle (SG)
    pub filtered_gravity_sg: f64,
    /// Gravity corrected to the calibration temperature (SG)
    pub corrected_gravity_sg: f64,
    /// Angle is below the water reading of the calibration data
    pub below_water: bool,
    reported_gravity_sg: f64,
    gravity_unit: GravityUnit,
    temp_unit: TemperatureUnit,
}

impl Measurement {
    /// Gravity to report (SG), see the module docs for which one
    pub fn gravity_sg(&self) -> f64 {
        self.reported_gravity_sg
    }

    /// Reported gravity in the configured unit
    pub fn gravity(&self) -> f64 {
        self.gravity_unit.from_sg(self.reported_gravity_sg)
    }

    /// Temperature in the configured unit
    pub fn temperature(&self) -> f32 {
        self.temp_unit.from_celsius(self.temp_c)
    }

    /// Configured gravity unit
    pub fn gravity_unit(&self) -> GravityUnit {
        self.gravity_unit
    }

    /// Configured temperature unit
    pub fn temp_unit(&self) -> TemperatureUnit {
        self.temp_unit
    }

    /// Whether consumers should publish this measurement
    pub fn should_push(&self) -> bool {
        !self.below_water
    }

    /// Feed the reported gravity to `velocity`, returning points per day
    pub fn track_velocity(&self, velocity: &mut GravityVelocity<'_>) -> f32 {
        velocity.add_value(self.reported_gravity_sg as f32);
        velocity.velocity()
    }
}

/// Runs measurement cycles
#[derive(Debug, Clone, Copy)]
pub struct MeasurementCycle;

impl MeasurementCycle {
    /// Read `sensor` and turn the reading into a [`Measurement`]
    ///
    /// Returns `None` when the sensor has no valid reading this cycle (for
    /// example the float is still moving). The filter window is untouched in
    /// that case.
    pub fn run<S: TiltSensor + ?Sized>(
        sensor: &mut S,
        config: &GravityConfig,
        filter_data: &mut FilterData,
    ) -> Option<Measurement> {
        match sensor.read() {
            Some(sample) => Some(Self::process(sample, config, filter_data)),
            None => {
                log_debug!("No valid sensor reading this cycle");
                None
            }
        }
    }

    /// Turn an already taken sample into a [`Measurement`]
    pub fn process(
        sample: RawSample,
        config: &GravityConfig,
        filter_data: &mut FilterData,
    ) -> Measurement {
        let angle = sample.angle;
        let temp_c = sample.temp_c + config.temp_adjustment_c;

        let filtered_angle = TrimmedMovingAverageFilter::new(filter_data).filter(angle);
        log_debug!("Angle {} filtered to {}", angle, filtered_angle);

        let formula = config.gravity_formula.as_str();
        let raw_gravity_sg = calculate_gravity(formula, f64::from(angle), f64::from(temp_c));
        let filtered_gravity_sg =
            calculate_gravity(formula, f64::from(filtered_angle), f64::from(temp_c));

        let corrected_gravity_sg = gravity_temperature_correction_c(
            if config.gyro_filter { filtered_gravity_sg } else { raw_gravity_sg },
            f64::from(temp_c),
            f64::from(config.formula_calibration_temp_c),
        );

        let reported_gravity_sg = if config.gravity_temp_adjustment {
            corrected_gravity_sg
        } else if config.gyro_filter {
            filtered_gravity_sg
        } else {
            raw_gravity_sg
        };

        let below_water = config.ignore_low_angles
            && config
                .formula_data
                .water_angle()
                .is_some_and(|water| f64::from(angle) < water);

        if below_water {
            log_warn!("Angle {} is below the water reading, measurement flagged", angle);
        }

        Measurement {
            angle,
            filtered_angle,
            temp_c,
            raw_gravity_sg,
            filtered_gravity_sg,
            corrected_gravity_sg,
            below_water,
            reported_gravity_sg,
            gravity_unit: config.gravity_unit,
            temp_unit: config.temp_unit,
        }
    }
}
