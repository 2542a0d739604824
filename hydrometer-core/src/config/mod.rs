//! Device Configuration
//!
//! ## Overview
//!
//! [`GravityConfig`] holds every setting the measurement core reads: the
//! calibration formula, unit preferences, temperature handling and the
//! calibration points the formula was created from. It is passed explicitly
//! to whatever needs it; there is no global configuration object.
//!
//! ## Persistence
//!
//! Storage is behind the [`ConfigStore`] trait, a typed key/value interface.
//! Key names match the configuration files written by earlier firmware, so
//! an existing device configuration loads unchanged:
//!
//! | Key                         | Field                          |
//! |-----------------------------|--------------------------------|
//! | `gravity_formula`           | [`GravityConfig::gravity_formula`] |
//! | `gravity_format`            | [`GravityConfig::gravity_unit`] (`G`/`P`) |
//! | `temp_format`               | [`GravityConfig::temp_unit`] (`C`/`F`) |
//! | `gravity_temp_adjustment`   | [`GravityConfig::gravity_temp_adjustment`] |
//! | `temp_adjustment_value`     | [`GravityConfig::temp_adjustment_c`] |
//! | `formula_max_deviation`     | [`GravityConfig::formula_max_deviation`] |
//! | `formula_calibration_temp`  | [`GravityConfig::formula_calibration_temp_c`] |
//! | `gyro_filter`               | [`GravityConfig::gyro_filter`] |
//! | `ignore_low_angles`         | [`GravityConfig::ignore_low_angles`] |
//! | `sleep_interval`            | [`GravityConfig::sleep_interval_s`] |
//! | `formula_calculation_data`  | [`GravityConfig::formula_data`] |
//!
//! Missing keys keep their defaults. A key holding the wrong type is an
//! error rather than silently ignored.

#[cfg(feature = "json")]
mod json;

#[cfg(feature = "json")]
pub use json::JsonConfigStore;

use heapless::String;

use crate::{
    constants::{
        buffers::FORMULA_MAX_LEN,
        calibration::{DEFAULT_CALIBRATION_TEMP_C, DEVICE_MAX_DEVIATION_SG},
        time::DEFAULT_SLEEP_INTERVAL_S,
    },
    errors::{ConfigError, ConfigResult, FormulaResult},
    formula::{FitReport, FormulaEvaluator, FormulaFitter, RawFormulaData},
    units::{GravityUnit, TemperatureUnit},
};

/// Persisted key names
pub mod keys {
    /// Calibration formula text
    pub const GRAVITY_FORMULA: &str = "gravity_formula";
    /// Gravity unit code
    pub const GRAVITY_FORMAT: &str = "gravity_format";
    /// Temperature unit code
    pub const TEMP_FORMAT: &str = "temp_format";
    /// Temperature correction of gravity enabled
    pub const GRAVITY_TEMP_ADJUSTMENT: &str = "gravity_temp_adjustment";
    /// Temperature sensor offset (°C)
    pub const TEMP_ADJUSTMENT_VALUE: &str = "temp_adjustment_value";
    /// Maximum formula creation deviation (SG)
    pub const FORMULA_MAX_DEVIATION: &str = "formula_max_deviation";
    /// Calibration temperature (°C)
    pub const FORMULA_CALIBRATION_TEMP: &str = "formula_calibration_temp";
    /// Angle filtering enabled
    pub const GYRO_FILTER: &str = "gyro_filter";
    /// Flag readings below the water angle
    pub const IGNORE_LOW_ANGLES: &str = "ignore_low_angles";
    /// Deep sleep interval (s)
    pub const SLEEP_INTERVAL: &str = "sleep_interval";
    /// Calibration points
    pub const FORMULA_CALCULATION_DATA: &str = "formula_calculation_data";
}

/// Typed key/value storage
///
/// Getters return `Ok(None)` for a missing key and
/// [`ConfigError::InvalidValue`] for a key holding another type.
pub trait ConfigStore {
    /// Read a number
    fn get_float(&self, key: &'static str) -> ConfigResult<Option<f32>>;

    /// Read a flag
    fn get_bool(&self, key: &'static str) -> ConfigResult<Option<bool>>;

    /// Read a text value
    fn get_text(&self, key: &'static str) -> ConfigResult<Option<&str>>;

    /// Read calibration points
    fn get_formula_data(&self, key: &'static str) -> ConfigResult<Option<RawFormulaData>>;

    /// Write a number
    fn set_float(&mut self, key: &'static str, value: f32) -> ConfigResult<()>;

    /// Write a flag
    fn set_bool(&mut self, key: &'static str, value: bool) -> ConfigResult<()>;

    /// Write a text value
    fn set_text(&mut self, key: &'static str, value: &str) -> ConfigResult<()>;

    /// Write calibration points
    fn set_formula_data(&mut self, key: &'static str, value: &RawFormulaData) -> ConfigResult<()>;
}

/// Settings used by the measurement core
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GravityConfig {
    /// Formula converting tilt to SG, empty until calibrated
    pub gravity_formula: String<FORMULA_MAX_LEN>,
    /// Unit gravity is reported in
    pub gravity_unit: GravityUnit,
    /// Unit temperature is reported in
    pub temp_unit: TemperatureUnit,
    /// Correct gravity to the calibration temperature
    pub gravity_temp_adjustment: bool,
    /// Offset added to the measured temperature (°C)
    pub temp_adjustment_c: f32,
    /// Largest accepted deviation when creating a formula (SG)
    pub formula_max_deviation: f32,
    /// Temperature the calibration solutions were measured at (°C)
    pub formula_calibration_temp_c: f32,
    /// Smooth the angle with a trimmed moving average
    pub gyro_filter: bool,
    /// Flag readings with an angle below the water reading
    pub ignore_low_angles: bool,
    /// Deep sleep interval between measurements (s)
    pub sleep_interval_s: u32,
    /// Calibration points the formula is created from
    pub formula_data: RawFormulaData,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            gravity_formula: String::new(),
            gravity_unit: GravityUnit::SpecificGravity,
            temp_unit: TemperatureUnit::Celsius,
            gravity_temp_adjustment: false,
            temp_adjustment_c: 0.0,
            formula_max_deviation: DEVICE_MAX_DEVIATION_SG,
            formula_calibration_temp_c: DEFAULT_CALIBRATION_TEMP_C,
            gyro_filter: false,
            ignore_low_angles: false,
            sleep_interval_s: DEFAULT_SLEEP_INTERVAL_S,
            formula_data: RawFormulaData::new(),
        }
    }
}

impl GravityConfig {
    /// Defaults overlaid with whatever `store` holds
    pub fn load<S: ConfigStore + ?Sized>(store: &S) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(text) = store.get_text(keys::GRAVITY_FORMULA)? {
            config.set_gravity_formula(text)?;
        }
        if let Some(code) = store.get_text(keys::GRAVITY_FORMAT)? {
            config.gravity_unit = first_char(code)
                .and_then(GravityUnit::from_code)
                .ok_or(ConfigError::InvalidValue { key: keys::GRAVITY_FORMAT })?;
        }
        if let Some(code) = store.get_text(keys::TEMP_FORMAT)? {
            config.temp_unit = first_char(code)
                .and_then(TemperatureUnit::from_code)
                .ok_or(ConfigError::InvalidValue { key: keys::TEMP_FORMAT })?;
        }
        if let Some(v) = store.get_bool(keys::GRAVITY_TEMP_ADJUSTMENT)? {
            config.gravity_temp_adjustment = v;
        }
        if let Some(v) = store.get_float(keys::TEMP_ADJUSTMENT_VALUE)? {
            config.temp_adjustment_c = v;
        }
        if let Some(v) = store.get_float(keys::FORMULA_MAX_DEVIATION)? {
            if !v.is_finite() || v < 0.0 {
                return Err(ConfigError::InvalidValue { key: keys::FORMULA_MAX_DEVIATION });
            }
            config.formula_max_deviation = v;
        }
        if let Some(v) = store.get_float(keys::FORMULA_CALIBRATION_TEMP)? {
            config.formula_calibration_temp_c = v;
        }
        if let Some(v) = store.get_bool(keys::GYRO_FILTER)? {
            config.gyro_filter = v;
        }
        if let Some(v) = store.get_bool(keys::IGNORE_LOW_ANGLES)? {
            config.ignore_low_angles = v;
        }
        if let Some(v) = store.get_float(keys::SLEEP_INTERVAL)? {
            if !v.is_finite() || v < 1.0 || v > u32::MAX as f32 {
                return Err(ConfigError::InvalidValue { key: keys::SLEEP_INTERVAL });
            }
            config.sleep_interval_s = v as u32;
        }
        if let Some(data) = store.get_formula_data(keys::FORMULA_CALCULATION_DATA)? {
            config.formula_data = data;
        }

        Ok(config)
    }

    /// Write every setting to `store`
    pub fn save<S: ConfigStore + ?Sized>(&self, store: &mut S) -> ConfigResult<()> {
        let mut code = [0_u8; 4];

        store.set_text(keys::GRAVITY_FORMULA, self.gravity_formula.as_str())?;
        store.set_text(keys::GRAVITY_FORMAT, self.gravity_unit.code().encode_utf8(&mut code))?;
        store.set_text(keys::TEMP_FORMAT, self.temp_unit.code().encode_utf8(&mut code))?;
        store.set_bool(keys::GRAVITY_TEMP_ADJUSTMENT, self.gravity_temp_adjustment)?;
        store.set_float(keys::TEMP_ADJUSTMENT_VALUE, self.temp_adjustment_c)?;
        store.set_float(keys::FORMULA_MAX_DEVIATION, self.formula_max_deviation)?;
        store.set_float(keys::FORMULA_CALIBRATION_TEMP, self.formula_calibration_temp_c)?;
        store.set_bool(keys::GYRO_FILTER, self.gyro_filter)?;
        store.set_bool(keys::IGNORE_LOW_ANGLES, self.ignore_low_angles)?;
        store.set_float(keys::SLEEP_INTERVAL, self.sleep_interval_s as f32)?;
        store.set_formula_data(keys::FORMULA_CALCULATION_DATA, &self.formula_data)?;

        Ok(())
    }

    /// Replace the formula text
    pub fn set_gravity_formula(&mut self, text: &str) -> ConfigResult<()> {
        let mut formula = String::new();
        formula
            .push_str(text)
            .map_err(|_| ConfigError::ValueTooLong { key: keys::GRAVITY_FORMULA })?;
        self.gravity_formula = formula;
        Ok(())
    }

    /// Evaluator for the configured formula
    pub fn evaluator(&self) -> FormulaEvaluator<'_> {
        FormulaEvaluator::new(self.gravity_formula.as_str())
    }

    /// Fitter using the configured deviation limit
    pub fn formula_fitter(&self) -> FormulaFitter {
        FormulaFitter::new(f64::from(self.formula_max_deviation))
    }

    /// Create a formula of `order` from the stored calibration points
    ///
    /// On success the new formula replaces the configured one. On failure the
    /// configured formula is left as it was.
    pub fn create_formula(&mut self, order: usize) -> FormulaResult<FitReport> {
        let mut text: String<FORMULA_MAX_LEN> = String::new();
        let report = self
            .formula_fitter()
            .create_formula_into(&self.formula_data, order, &mut text)?;
        self.gravity_formula = text;
        Ok(report)
    }
}

fn first_char(s: &str) -> Option<char> {
    s.chars().next()
}
