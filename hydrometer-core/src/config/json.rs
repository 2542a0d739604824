//! JSON-backed configuration store
//!
//! Reads and writes the same document layout as the device's configuration
//! file, including the calibration points as an array of `{"a", "g"}`
//! objects (angle, gravity).

use serde_json::{json, Map, Value};

use super::ConfigStore;
use crate::{
    constants::buffers::FORMULA_DATA_SIZE,
    errors::{ConfigError, ConfigResult},
    formula::RawFormulaData,
};

/// Configuration held as a JSON object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonConfigStore {
    values: Map<String, Value>,
}

impl JsonConfigStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration document
    ///
    /// Anything other than a JSON object is a storage error.
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        match serde_json::from_str(text) {
            Ok(Value::Object(values)) => Ok(Self { values }),
            _ => {
                log_error!("Configuration is not a JSON object");
                Err(ConfigError::Storage)
            }
        }
    }

    /// Serialize the document
    pub fn to_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(&self.values).map_err(|_| ConfigError::Storage)
    }

    /// Raw value for `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|v| !v.is_null())
    }
}

impl ConfigStore for JsonConfigStore {
    fn get_float(&self, key: &'static str) -> ConfigResult<Option<f32>> {
        self.get(key)
            .map(|v| v.as_f64().map(|f| f as f32).ok_or(ConfigError::InvalidValue { key }))
            .transpose()
    }

    fn get_bool(&self, key: &'static str) -> ConfigResult<Option<bool>> {
        self.get(key)
            .map(|v| v.as_bool().ok_or(ConfigError::InvalidValue { key }))
            .transpose()
    }

    fn get_text(&self, key: &'static str) -> ConfigResult<Option<&str>> {
        self.get(key)
            .map(|v| v.as_str().ok_or(ConfigError::InvalidValue { key }))
            .transpose()
    }

    fn get_formula_data(&self, key: &'static str) -> ConfigResult<Option<RawFormulaData>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let points = value.as_array().ok_or(ConfigError::InvalidValue { key })?;

        if points.len() != FORMULA_DATA_SIZE {
            log_warn!("Expected {} calibration points, found {}", FORMULA_DATA_SIZE, points.len());
        }
        if points.len() > FORMULA_DATA_SIZE {
            return Err(ConfigError::InvalidValue { key });
        }

        let mut data = RawFormulaData::new();
        for (i, point) in points.iter().enumerate() {
            data.tilt[i] = point_field(point, "a").ok_or(ConfigError::InvalidValue { key })?;
            data.gravity[i] = point_field(point, "g").ok_or(ConfigError::InvalidValue { key })?;
        }

        Ok(Some(data))
    }

    fn set_float(&mut self, key: &'static str, value: f32) -> ConfigResult<()> {
        if !value.is_finite() {
            return Err(ConfigError::InvalidValue { key });
        }
        self.values.insert(key.into(), json!(f64::from(value)));
        Ok(())
    }

    fn set_bool(&mut self, key: &'static str, value: bool) -> ConfigResult<()> {
        self.values.insert(key.into(), Value::Bool(value));
        Ok(())
    }

    fn set_text(&mut self, key: &'static str, value: &str) -> ConfigResult<()> {
        self.values.insert(key.into(), Value::String(value.into()));
        Ok(())
    }

    fn set_formula_data(&mut self, key: &'static str, value: &RawFormulaData) -> ConfigResult<()> {
        let points: Vec<Value> = value
            .tilt
            .iter()
            .zip(&value.gravity)
            .map(|(a, g)| json!({ "a": a, "g": g }))
            .collect();
        self.values.insert(key.into(), Value::Array(points));
        Ok(())
    }
}

fn point_field(point: &Value, name: &str) -> Option<f64> {
    point.get(name).and_then(Value::as_f64).filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{keys, GravityConfig};
    use crate::units::GravityUnit;

    const DEVICE_CONFIG: &str = r#"{
        "gravity_formula": "0.00000909*tilt^2+0.00124545*tilt+0.96445455",
        "gravity_format": "P",
        "gravity_temp_adjustment": true,
        "temp_adjustment_value": 0.5,
        "formula_max_deviation": 0.02,
        "sleep_interval": 600,
        "mdns": "gravmon",
        "formula_calculation_data": [
            {"a": 25.0, "g": 1.0}, {"a": 30.0, "g": 1.01}, {"a": 35.0, "g": 1.02},
            {"a": 0, "g": 0}, {"a": 0, "g": 0}, {"a": 0, "g": 0}, {"a": 0, "g": 0},
            {"a": 0, "g": 0}, {"a": 0, "g": 0}, {"a": 0, "g": 0}
        ]
    }"#;

    #[test]
    fn loads_device_document() {
        let store = JsonConfigStore::from_json(DEVICE_CONFIG).unwrap();
        let config = GravityConfig::load(&store).unwrap();

        assert_eq!(config.gravity_unit, GravityUnit::Plato);
        assert!(config.gravity_temp_adjustment);
        assert_eq!(config.temp_adjustment_c, 0.5);
        assert_eq!(config.formula_max_deviation, 0.02);
        assert_eq!(config.sleep_interval_s, 600);
        assert_eq!(config.formula_data.len(), 3);
        assert!(!config.gyro_filter);
    }

    #[test]
    fn document_round_trip() {
        let store = JsonConfigStore::from_json(DEVICE_CONFIG).unwrap();
        let config = GravityConfig::load(&store).unwrap();

        let mut out = JsonConfigStore::new();
        config.save(&mut out).unwrap();
        let text = out.to_json().unwrap();

        let reloaded = GravityConfig::load(&JsonConfigStore::from_json(&text).unwrap()).unwrap();
        assert_eq!(reloaded, config);
        assert_eq!(out.get(keys::GRAVITY_FORMAT), Some(&Value::String("P".into())));
    }

    #[test]
    fn rejects_non_objects_and_bad_points() {
        assert_eq!(JsonConfigStore::from_json("[1, 2]"), Err(ConfigError::Storage));
        assert_eq!(JsonConfigStore::from_json("{"), Err(ConfigError::Storage));

        let store = JsonConfigStore::from_json(
            r#"{"formula_calculation_data": [{"a": 25.0}]}"#,
        )
        .unwrap();
        assert_eq!(
            store.get_formula_data(keys::FORMULA_CALCULATION_DATA),
            Err(ConfigError::InvalidValue { key: keys::FORMULA_CALCULATION_DATA })
        );
    }

    #[test]
    fn null_is_missing() {
        let store = JsonConfigStore::from_json(r#"{"gyro_filter": null}"#).unwrap();
        assert_eq!(store.get_bool(keys::GYRO_FILTER), Ok(None));
    }
}
