//! Physical Conversion Constants
//!
//! Conversion factors between the units a brewer sees on the display and the
//! units the calibration math works in.

// ===== TEMPERATURE =====

/// Fahrenheit degrees per Celsius degree.
pub const FAHRENHEIT_PER_CELSIUS: f32 = 1.8;

/// Fahrenheit reading at the freezing point of water (°F).
pub const FAHRENHEIT_FREEZING_POINT: f32 = 32.0;

// ===== GRAVITY =====

/// Factor of the simple SG/Plato approximation `P = 259 - 259 / SG`.
///
/// Accurate to roughly ±0.1 °P within normal wort gravities (1.000-1.120).
///
/// Source: brewing handbooks, used by iSpindel and compatible firmware
pub const PLATO_SG_FACTOR: f64 = 259.0;

// ===== MASS AND VOLUME =====

/// Pounds per kilogram.
pub const LBS_PER_KG: f32 = 2.204_622_6;

/// US fluid ounces per centilitre.
pub const US_OZ_PER_CL: f32 = 0.34;

/// Centilitres per UK fluid ounce.
pub const CL_PER_UK_OZ: f32 = 2.84;

// ===== HYDROMETER TEMPERATURE CORRECTION =====

/// Coefficients of the density-of-water ratio used for hydrometer temperature
/// correction, lowest power first, temperature in °F.
///
/// `f(t) = c0 + c1·t + c2·t² + c3·t³`, corrected = `sg · f(measured) / f(calibration)`
///
/// Source: Brewer's Friend / MoreBeer hydrometer correction formula
pub const GRAVITY_CORRECTION_COEFFS_F: [f64; 4] = [
    1.001_303_46,
    -0.000_134_722_124,
    0.000_002_040_525_96,
    -0.000_000_002_328_209_48,
];

/// Conversion from radians to degrees.
pub const DEGREES_PER_RADIAN: f64 = 180.0 / core::f64::consts::PI;
