//! Time-Related Constants
//!
//! Sleep intervals and the windows used for gravity velocity tracking.

/// Seconds per hour.
pub const SECONDS_PER_HOUR: u32 = 3600;

/// Hours per day.
pub const HOURS_PER_DAY: f32 = 24.0;

/// Default deep-sleep interval between measurements (seconds).
///
/// 15 minutes gives several weeks of battery life on an 18650 cell.
pub const DEFAULT_SLEEP_INTERVAL_S: u32 = 900;

/// Length of one velocity period (hours).
pub const VELOCITY_PERIOD_HOURS: u32 = 4;

/// Minimum coverage before a velocity is reported (hours).
pub const VELOCITY_MIN_HOURS: u32 = 1;

/// Scale from SG to gravity points (1.001 SG = 1 point).
pub const GRAVITY_POINTS_PER_SG: f32 = 1000.0;
