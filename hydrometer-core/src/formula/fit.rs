//! Formula creation from calibration data
//!
//! ## Algorithm
//!
//! 1. Check the order (1..=4) and that the data holds at least `order + 2`
//!    valid points. A degree-n polynomial can pass through any n+1 points, so
//!    the spare point is what makes the deviation check mean something.
//! 2. Least-squares fit of gravity against tilt (see [`crate::linalg`]).
//! 3. Render the coefficients with 8 decimals.
//! 4. Evaluate the *rendered* text at every calibration point. The largest
//!    absolute difference is the fit's deviation. Checking the text rather
//!    than the in-memory coefficients catches precision lost by rounding,
//!    which matters for quartic fits where `tilt^4` reaches 10⁷.
//! 5. Reject the formula if the deviation exceeds the fitter's limit.
//!
//! ## Example
//!
//! ```rust
//! use hydrometer_core::{FormulaFitter, RawFormulaData};
//!
//! let data = RawFormulaData::from_pairs(&[
//!     (25.0, 1.000), (30.0, 1.010), (35.0, 1.020),
//!     (40.0, 1.030), (45.0, 1.040), (50.0, 1.050),
//! ]).unwrap();
//!
//! let formula = FormulaFitter::new(0.01).create_formula(&data, 1).unwrap();
//! assert_eq!(formula.as_str(), "0.00200000*tilt+0.95000000");
//! ```

use heapless::String;

use crate::{
    constants::{
        buffers::FORMULA_MAX_LEN,
        calibration::{
            DEFAULT_CALIBRATION_TEMP_C, DEFAULT_MAX_DEVIATION_SG, EXTRA_FORMULA_POINTS,
            MAX_FORMULA_ORDER, MIN_FORMULA_ORDER,
        },
    },
    errors::{FormulaError, FormulaResult},
    linalg::{self, MAX_TERMS},
};

use super::{data::RawFormulaData, eval::try_calculate_gravity, render::render_formula, Formula};

/// Polynomial in tilt, coefficients stored lowest power first
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polynomial {
    coefficients: [f64; MAX_TERMS],
    order: usize,
}

impl Polynomial {
    /// Build from coefficients, lowest power first
    ///
    /// Returns `None` for an empty slice or more than five coefficients.
    pub fn from_coefficients(coefficients: &[f64]) -> Option<Self> {
        if coefficients.is_empty() || coefficients.len() > MAX_TERMS {
            return None;
        }

        let mut c = [0.0; MAX_TERMS];
        c[..coefficients.len()].copy_from_slice(coefficients);
        Some(Self {
            coefficients: c,
            order: coefficients.len() - 1,
        })
    }

    /// Polynomial order
    pub fn order(&self) -> usize {
        self.order
    }

    /// Coefficients, lowest power first
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients[..=self.order]
    }

    /// Value at `x` (Horner's scheme)
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients()
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + c)
    }
}

/// Outcome of a successful fit
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitReport {
    /// Fitted polynomial before rendering
    pub polynomial: Polynomial,
    /// Number of calibration points used
    pub points: usize,
    /// Largest |rendered formula - gravity| over the points (SG)
    pub max_deviation: f64,
}

impl FitReport {
    /// Polynomial order
    pub fn order(&self) -> usize {
        self.polynomial.order()
    }
}

/// Creates gravity formulas from calibration data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormulaFitter {
    max_deviation: f64,
}

impl Default for FormulaFitter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEVIATION_SG)
    }
}

impl FormulaFitter {
    /// Fitter rejecting formulas that miss any point by more than `max_deviation` SG
    pub const fn new(max_deviation: f64) -> Self {
        Self { max_deviation }
    }

    /// Deviation limit (SG)
    pub fn max_deviation(&self) -> f64 {
        self.max_deviation
    }

    /// Least-squares polynomial of `order` through the valid points of `data`
    ///
    /// Only checks the order and point count; no rendering, no deviation check.
    pub fn fit(&self, data: &RawFormulaData, order: usize) -> FormulaResult<Polynomial> {
        if !(MIN_FORMULA_ORDER..=MAX_FORMULA_ORDER).contains(&order) {
            return Err(FormulaError::InvalidOrder { order });
        }

        let available = data.len();
        let required = order + 1 + EXTRA_FORMULA_POINTS;
        if available < required {
            return Err(FormulaError::NotEnoughValues { required, available });
        }

        let coefficients = linalg::polyfit(data.tilts(), data.gravities(), order)
            .ok_or(FormulaError::InternalError)?;

        Polynomial::from_coefficients(&coefficients[..=order]).ok_or(FormulaError::InternalError)
    }

    /// Fit, render into `out` and verify the rendered text
    ///
    /// On any error `out` is left empty, so a caller persisting the buffer
    /// never stores a rejected formula.
    pub fn create_formula_into<const N: usize>(
        &self,
        data: &RawFormulaData,
        order: usize,
        out: &mut String<N>,
    ) -> FormulaResult<FitReport> {
        out.clear();

        let polynomial = match self.fit(data, order) {
            Ok(p) => p,
            Err(e) => {
                log_warn!("Formula fit of order {} failed: {}", order, e);
                return Err(e);
            }
        };

        render_formula(polynomial.coefficients(), out)?;

        let max_deviation = match rendered_deviation(out.as_str(), data) {
            Ok(d) => d,
            Err(e) => {
                out.clear();
                return Err(e);
            }
        };

        if max_deviation > self.max_deviation {
            log_warn!(
                "Formula '{}' deviates {} SG, limit {}",
                out.as_str(),
                max_deviation,
                self.max_deviation
            );
            out.clear();
            return Err(FormulaError::DeviationTooHigh {
                deviation: max_deviation,
                max_deviation: self.max_deviation,
            });
        }

        log_debug!(
            "Created formula '{}' from {} points, deviation {}",
            out.as_str(),
            data.len(),
            max_deviation
        );

        Ok(FitReport {
            polynomial,
            points: data.len(),
            max_deviation,
        })
    }

    /// Fit and render into an owned [`Formula`]
    pub fn create_formula(&self, data: &RawFormulaData, order: usize) -> FormulaResult<Formula> {
        self.create_formula_with_report(data, order)
            .map(|(formula, _)| formula)
    }

    /// Like [`create_formula`](Self::create_formula), also returning the fit report
    pub fn create_formula_with_report(
        &self,
        data: &RawFormulaData,
        order: usize,
    ) -> FormulaResult<(Formula, FitReport)> {
        let mut text: String<FORMULA_MAX_LEN> = String::new();
        let report = self.create_formula_into(data, order, &mut text)?;
        Ok((Formula::from_rendered(text), report))
    }
}

fn rendered_deviation(formula: &str, data: &RawFormulaData) -> FormulaResult<f64> {
    let mut max_deviation = 0.0_f64;

    for (tilt, gravity) in data.points() {
        let value = try_calculate_gravity(formula, tilt, f64::from(DEFAULT_CALIBRATION_TEMP_C))
            .map_err(|_| FormulaError::InternalError)?;
        let deviation = libm::fabs(value - gravity);

        if !deviation.is_finite() {
            return Err(FormulaError::InternalError);
        }
        max_deviation = max_deviation.max(deviation);
    }

    Ok(max_deviation)
}
