//! Calibration Constants
//!
//! Limits and defaults for creating gravity formulas from calibration data.

/// Lowest supported polynomial order (linear).
pub const MIN_FORMULA_ORDER: usize = 1;

/// Highest supported polynomial order (quartic).
pub const MAX_FORMULA_ORDER: usize = 4;

/// Extra calibration points required beyond `order + 1`.
///
/// A degree-n polynomial passes through any n+1 points, so the deviation
/// check would always succeed. One spare point keeps the check meaningful.
pub const EXTRA_FORMULA_POINTS: usize = 1;

/// Decimals used when rendering formula coefficients.
///
/// Matches the formulas produced by earlier firmware releases, which are
/// stored on devices in the field and must keep evaluating identically.
pub const FORMULA_DECIMALS: usize = 8;

/// Default maximum deviation between the rendered formula and any
/// calibration point (SG).
pub const DEFAULT_MAX_DEVIATION_SG: f64 = 3.0;

/// Maximum deviation used by a freshly configured device (SG).
///
/// Source: firmware default for `formula_max_deviation`
pub const DEVICE_MAX_DEVIATION_SG: f32 = 0.01;

/// Temperature most hydrometers and calibration solutions are referenced to (°C).
pub const DEFAULT_CALIBRATION_TEMP_C: f32 = 20.0;

/// Pivot magnitude below which the normal equations are considered singular.
pub const SINGULAR_PIVOT_EPSILON: f64 = 1e-12;

/// Variable name bound to the tilt angle in formulas.
pub const TILT_VARIABLE: &str = "tilt";

/// Variable name bound to the temperature (°C) in formulas.
pub const TEMP_VARIABLE: &str = "temp";
