//! Calibration data set
//!
//! Up to [`FORMULA_DATA_SIZE`] (tilt, gravity) pairs recorded by the brewer,
//! typically by dropping the hydrometer into sugar solutions of known gravity.
//! The layout matches what devices already persist: two parallel arrays where
//! unused slots are zero and the first zero ends the series.

use crate::{
    constants::buffers::FORMULA_DATA_SIZE,
    errors::{FormulaError, FormulaResult},
};

/// Calibration points for formula creation
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawFormulaData {
    /// Tilt angle of each point (degrees), zero marks an unused slot
    pub tilt: [f64; FORMULA_DATA_SIZE],
    /// Specific gravity of each point, zero marks an unused slot
    pub gravity: [f64; FORMULA_DATA_SIZE],
}

impl Default for RawFormulaData {
    fn default() -> Self {
        Self::new()
    }
}

impl RawFormulaData {
    /// Empty data set
    pub const fn new() -> Self {
        Self {
            tilt: [0.0; FORMULA_DATA_SIZE],
            gravity: [0.0; FORMULA_DATA_SIZE],
        }
    }

    /// Build a data set from explicit points
    ///
    /// Rejects more than [`FORMULA_DATA_SIZE`] points with
    /// [`FormulaError::BufferTooSmall`], and zero or non-finite values with
    /// [`FormulaError::InvalidPoint`] since zero is the end-of-series marker.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> FormulaResult<Self> {
        if pairs.len() > FORMULA_DATA_SIZE {
            return Err(FormulaError::BufferTooSmall);
        }

        let mut data = Self::new();
        for (index, &(tilt, gravity)) in pairs.iter().enumerate() {
            if !is_usable(tilt) || !is_usable(gravity) {
                return Err(FormulaError::InvalidPoint { index });
            }
            data.tilt[index] = tilt;
            data.gravity[index] = gravity;
        }

        Ok(data)
    }

    /// Number of valid points
    ///
    /// Counts from the start until the first slot where tilt or gravity is zero.
    /// Points after that slot are ignored even if non-zero.
    pub fn len(&self) -> usize {
        self.tilt
            .iter()
            .zip(&self.gravity)
            .take_while(|&(&t, &g)| t != 0.0 && g != 0.0)
            .count()
    }

    /// Check if there are no valid points
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Valid tilt values
    pub fn tilts(&self) -> &[f64] {
        &self.tilt[..self.len()]
    }

    /// Valid gravity values
    pub fn gravities(&self) -> &[f64] {
        &self.gravity[..self.len()]
    }

    /// Valid points as (tilt, gravity)
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.tilts().iter().copied().zip(self.gravities().iter().copied())
    }

    /// Tilt of the first point, by convention the reading in plain water
    pub fn water_angle(&self) -> Option<f64> {
        self.tilts().first().copied()
    }
}

fn is_usable(v: f64) -> bool {
    v.is_finite() && v != 0.0
}
