//! Gravity Formulas
//!
//! ## Overview
//!
//! A hydrometer is calibrated by recording its tilt in a handful of liquids of
//! known gravity. A polynomial is fitted through those points and stored as
//! text, for example:
//!
//! ```text
//! 0.00000909*tilt^2+0.00124545*tilt+0.96445455
//! ```
//!
//! The text is the calibration artifact: it is shown to the user, persisted in
//! the device configuration and evaluated on every measurement. Formulas
//! written by earlier firmware keep evaluating unchanged.
//!
//! ## Components
//!
//! - [`RawFormulaData`]: up to ten (tilt, gravity) calibration points
//! - [`FormulaFitter`]: least-squares fit, rendering and deviation check
//! - [`Formula`]: validated formula text with a fixed capacity
//! - [`calculate_gravity`] / [`FormulaEvaluator`]: evaluation at runtime
//!
//! ## Usage Example
//!
//! ```rust
//! use hydrometer_core::formula::{Formula, FormulaFitter, RawFormulaData};
//!
//! let mut data = RawFormulaData::new();
//! data.tilt = [25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0, 65.0, 70.0];
//! data.gravity = [1.0, 1.01, 1.02, 1.03, 1.04, 1.05, 1.06, 1.07, 1.08, 1.1];
//!
//! let formula = FormulaFitter::default().create_formula(&data, 2).unwrap();
//! assert_eq!(formula.as_str(), "0.00000909*tilt^2+0.00124545*tilt+0.96445455");
//!
//! // Stored text is read back later
//! let stored = Formula::parse(formula.as_str()).unwrap();
//! assert!((stored.evaluate(30.0, 20.0) - 1.01).abs() < 0.005);
//! ```

mod data;
mod eval;
mod fit;
mod render;

use core::fmt;

use heapless::String;

use crate::{
    constants::buffers::FORMULA_MAX_LEN,
    errors::{FormulaError, FormulaResult},
};

pub use data::RawFormulaData;
pub use eval::{calculate_gravity, try_calculate_gravity, FormulaEvaluator};
pub use fit::{FitReport, FormulaFitter, Polynomial};
pub use render::render_formula;

/// Formula text, checked to evaluate
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Formula {
    text: String<FORMULA_MAX_LEN>,
}

impl Formula {
    /// Validate and copy `text`
    ///
    /// Fails with [`FormulaError::BufferTooSmall`] if the text exceeds
    /// [`FORMULA_MAX_LEN`] bytes, or with the evaluator's error if it does not
    /// follow the formula grammar.
    pub fn parse(text: &str) -> FormulaResult<Self> {
        try_calculate_gravity(text, 0.0, 0.0)?;

        let mut owned = String::new();
        owned
            .push_str(text)
            .map_err(|_| FormulaError::BufferTooSmall)?;

        Ok(Self { text: owned })
    }

    pub(crate) fn from_rendered(text: String<FORMULA_MAX_LEN>) -> Self {
        Self { text }
    }

    /// The formula text
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Gravity (SG) at `tilt` degrees and `temp_c` °C
    pub fn evaluate(&self, tilt: f64, temp_c: f64) -> f64 {
        calculate_gravity(self.as_str(), tilt, temp_c)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Formula {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_legacy_text() {
        let f = Formula::parse("0.00000909*tilt^2+0.00124545*tilt+-0.96445455").unwrap();
        assert_eq!(f.as_ref(), "0.00000909*tilt^2+0.00124545*tilt+-0.96445455");
    }

    #[test]
    fn parse_rejects_bad_text() {
        assert_eq!(Formula::parse(""), Err(FormulaError::EmptyFormula));
        assert_eq!(
            Formula::parse("tilt*x"),
            Err(FormulaError::UnknownVariable { position: 5 })
        );

        let mut long: String<256> = String::new();
        while long.len() < 200 {
            long.push_str("1+").unwrap();
        }
        long.push('1').unwrap();
        assert_eq!(Formula::parse(&long), Err(FormulaError::BufferTooSmall));
    }

    #[cfg(feature = "std")]
    #[test]
    fn display_is_the_text() {
        let f = Formula::parse("tilt*0.002+0.95").unwrap();
        assert_eq!(f.to_string(), "tilt*0.002+0.95");
        assert!((f.evaluate(25.0, 20.0) - 1.0).abs() < 1e-12);
    }
}
