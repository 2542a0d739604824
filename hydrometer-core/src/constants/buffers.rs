//! Buffer Sizes and Memory Constraints
//!
//! Fixed capacities of the structures that live in RTC retained memory
//! across deep sleep. The RTC slow memory on an ESP32 is 8KB shared with
//! the Wi-Fi calibration data, so these stay small.

/// Samples held by the low-pass filters.
///
/// 5 × 4 bytes + 4 byte count = 24 bytes of retained memory.
pub const FILTER_BUFFER_SIZE: usize = 5;

/// Maximum number of (tilt, gravity) calibration points.
pub const FORMULA_DATA_SIZE: usize = 10;

/// Capacity of a rendered formula string.
///
/// A quartic formula with 8-decimal coefficients needs about 90 bytes.
pub const FORMULA_MAX_LEN: usize = 128;

/// Number of periods tracked for gravity velocity.
pub const VELOCITY_PERIODS: usize = 4;

/// Capacity of strings produced by float rendering helpers.
pub const FLOAT_STRING_LEN: usize = 24;
