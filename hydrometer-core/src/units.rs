//! Unit conversion helpers
//!
//! Pure, total functions shared by the calibration code and by whatever
//! consumes its output (push targets, displays). Gravity conversions are the
//! simple brewing approximation and only meaningful for normal wort gravities;
//! out-of-range inputs are not rejected.

use core::fmt::Write;

use heapless::String;

use crate::constants::{
    buffers::FLOAT_STRING_LEN,
    physics::{
        CL_PER_UK_OZ, FAHRENHEIT_FREEZING_POINT, FAHRENHEIT_PER_CELSIUS, LBS_PER_KG,
        PLATO_SG_FACTOR, US_OZ_PER_CL,
    },
};

/// Unit used to present gravity readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GravityUnit {
    /// Specific gravity, 1.000 = water
    #[default]
    SpecificGravity,
    /// Degrees Plato
    Plato,
}

impl GravityUnit {
    /// Single character code used in persisted configuration
    pub const fn code(self) -> char {
        match self {
            Self::SpecificGravity => 'G',
            Self::Plato => 'P',
        }
    }

    /// Parse the persisted character code
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'G' => Some(Self::SpecificGravity),
            'P' => Some(Self::Plato),
            _ => None,
        }
    }

    /// Express a specific gravity reading in this unit
    pub fn from_sg(self, sg: f64) -> f64 {
        match self {
            Self::SpecificGravity => sg,
            Self::Plato => convert_to_plato(sg),
        }
    }
}

/// Unit used to present temperature readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TemperatureUnit {
    /// Degrees Celsius
    #[default]
    Celsius,
    /// Degrees Fahrenheit
    Fahrenheit,
}

impl TemperatureUnit {
    /// Single character code used in persisted configuration
    pub const fn code(self) -> char {
        match self {
            Self::Celsius => 'C',
            Self::Fahrenheit => 'F',
        }
    }

    /// Parse the persisted character code
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'C' => Some(Self::Celsius),
            'F' => Some(Self::Fahrenheit),
            _ => None,
        }
    }

    /// Express a Celsius reading in this unit
    pub fn from_celsius(self, c: f32) -> f32 {
        match self {
            Self::Celsius => c,
            Self::Fahrenheit => convert_c_to_f(c),
        }
    }
}

/// Celsius to Fahrenheit
pub fn convert_c_to_f(c: f32) -> f32 {
    c * FAHRENHEIT_PER_CELSIUS + FAHRENHEIT_FREEZING_POINT
}

/// Fahrenheit to Celsius
pub fn convert_f_to_c(f: f32) -> f32 {
    (f - FAHRENHEIT_FREEZING_POINT) / FAHRENHEIT_PER_CELSIUS
}

/// Kilograms to pounds
pub fn convert_kg_to_lbs(kg: f32) -> f32 {
    kg * LBS_PER_KG
}

/// Pounds to kilograms, 0 stays 0
pub fn convert_lbs_to_kg(lbs: f32) -> f32 {
    if lbs == 0.0 {
        0.0
    } else {
        lbs / LBS_PER_KG
    }
}

/// Centilitres to US fluid ounces
pub fn convert_cl_to_us_oz(cl: f32) -> f32 {
    cl * US_OZ_PER_CL
}

/// Centilitres to UK fluid ounces, 0 stays 0
pub fn convert_cl_to_uk_oz(cl: f32) -> f32 {
    if cl == 0.0 {
        0.0
    } else {
        cl / CL_PER_UK_OZ
    }
}

/// US fluid ounces to centilitres, 0 stays 0
pub fn convert_us_oz_to_cl(us_oz: f32) -> f32 {
    if us_oz == 0.0 {
        0.0
    } else {
        us_oz / US_OZ_PER_CL
    }
}

/// UK fluid ounces to centilitres
pub fn convert_uk_oz_to_cl(uk_oz: f32) -> f32 {
    uk_oz * CL_PER_UK_OZ
}

/// Specific gravity to degrees Plato
///
/// A gravity of exactly 0 (no reading) maps to 0 °P instead of -inf.
pub fn convert_to_plato(sg: f64) -> f64 {
    if sg == 0.0 {
        return 0.0;
    }

    PLATO_SG_FACTOR - PLATO_SG_FACTOR / sg
}

/// Degrees Plato to specific gravity
pub fn convert_to_sg(plato: f64) -> f64 {
    PLATO_SG_FACTOR / (PLATO_SG_FACTOR - plato)
}

/// Round `f` to `decimals` digits, halves rounded away from zero
///
/// Used before values are displayed or pushed so consumers never see
/// artefacts like `1.0099999`.
pub fn reduce_float_precision(f: f32, decimals: u32) -> f32 {
    let scale = libm::pow(10.0, f64::from(decimals));
    (libm::round(f64::from(f) * scale) / scale) as f32
}

/// Render `f` with exactly `decimals` digits after the point
///
/// Non-finite values render as `nan`/`inf`. The buffer holds any finite `f32`
/// with up to 8 decimals; if it ever overflows the text is truncated.
pub fn convert_float_to_string(f: f32, decimals: usize) -> String<FLOAT_STRING_LEN> {
    let mut out = String::new();
    // Overflow truncates, which is acceptable for display text
    let _ = write!(out, "{:.*}", decimals, reduce_float_precision(f, decimals as u32));
    out
}
