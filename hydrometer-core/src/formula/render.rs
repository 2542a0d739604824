//! Formula text rendering
//!
//! Terms are written from the highest degree down, each coefficient with
//! [`FORMULA_DECIMALS`] digits and its own sign:
//!
//! ```text
//! 0.00000909*tilt^2+0.00124545*tilt+0.96445455
//! -0.00000732*tilt^3+0.00046259*tilt^2-0.01051981*tilt+1.07220280
//! ```

use core::fmt::Write;

use heapless::String;

use crate::{
    constants::calibration::{FORMULA_DECIMALS, TILT_VARIABLE},
    errors::{FormulaError, FormulaResult},
};

/// Write `coefficients` (lowest power first) as formula text into `out`
///
/// `out` is cleared first. If the text does not fit, `out` is left empty and
/// [`FormulaError::BufferTooSmall`] is returned.
pub fn render_formula<const N: usize>(
    coefficients: &[f64],
    out: &mut String<N>,
) -> FormulaResult<()> {
    out.clear();

    if coefficients.is_empty() {
        return Err(FormulaError::EmptyFormula);
    }

    if write_terms(coefficients, out).is_err() {
        out.clear();
        return Err(FormulaError::BufferTooSmall);
    }

    Ok(())
}

fn write_terms<W: Write>(coefficients: &[f64], out: &mut W) -> core::fmt::Result {
    for (degree, &c) in coefficients.iter().enumerate().rev() {
        let first = degree == coefficients.len() - 1;

        // Sign follows the printed value so -0.000000001 renders as +0.00000000
        if is_negative_when_printed(c) {
            out.write_char('-')?;
        } else if !first {
            out.write_char('+')?;
        }

        write!(out, "{:.*}", FORMULA_DECIMALS, libm::fabs(c))?;

        match degree {
            0 => {}
            1 => write!(out, "*{}", TILT_VARIABLE)?,
            d => write!(out, "*{}^{}", TILT_VARIABLE, d)?,
        }
    }

    Ok(())
}

fn is_negative_when_printed(c: f64) -> bool {
    let scale = libm::pow(10.0, FORMULA_DECIMALS as f64);
    libm::round(c * scale) < 0.0
}
