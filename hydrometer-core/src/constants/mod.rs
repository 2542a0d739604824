//! Constants for the Hydrometer Core
//!
//! Every numeric value used by the calibration and filtering code lives here,
//! grouped by domain, with its unit in the name and its source in the docs.
//!
//! ## Organization
//!
//! - **Physics**: unit conversion factors and the hydrometer correction polynomial
//! - **Calibration**: formula fitting limits and defaults
//! - **Sensors**: accelerometer/gyro characteristics
//! - **Time**: sleep and velocity window intervals
//! - **Buffers**: fixed capacities of retained-memory structures
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Include the unit in the name (`_C`, `_SG`, `_S`, ...)
//! 3. Reference the source of empirical values

/// Unit conversion factors and temperature correction coefficients.
pub mod physics;

/// Formula fitting limits, rendering precision and defaults.
pub mod calibration;

/// Tilt sensor characteristics.
pub mod sensors;

/// Sleep intervals and velocity windows.
pub mod time;

/// Fixed buffer capacities.
pub mod buffers;

// Re-export commonly used constants for convenience
pub use physics::{PLATO_SG_FACTOR, LBS_PER_KG};

pub use calibration::{
    MIN_FORMULA_ORDER, MAX_FORMULA_ORDER, FORMULA_DECIMALS,
    DEFAULT_MAX_DEVIATION_SG, DEFAULT_CALIBRATION_TEMP_C,
};

pub use buffers::{FILTER_BUFFER_SIZE, FORMULA_DATA_SIZE, FORMULA_MAX_LEN};

pub use time::{SECONDS_PER_HOUR, DEFAULT_SLEEP_INTERVAL_S};
