//! Formula evaluation
//!
//! ## Grammar
//!
//! Only the grammar produced by the formula renderer (and by earlier firmware,
//! which could emit `+-` between terms) is accepted:
//!
//! ```text
//! expr    = term { ("+" | "-") term }
//! term    = unary { "*" unary }
//! unary   = { "+" | "-" } power
//! power   = primary [ "^" unary ]
//! primary = number | "tilt" | "temp"
//! ```
//!
//! Whitespace between tokens is ignored. Numbers may carry a fraction and an
//! exponent (`1.5e-3`). There are no parentheses and no functions.
//!
//! ## Failure Policy
//!
//! [`calculate_gravity`] returns `0.0` for any formula it cannot evaluate and
//! logs a warning. Callers that need to know why use
//! [`try_calculate_gravity`].

use crate::{
    constants::calibration::{TEMP_VARIABLE, TILT_VARIABLE},
    errors::{FormulaError, FormulaResult},
};

// Bounds recursion through chained powers
const MAX_NESTING: usize = 32;

/// Evaluate `formula` for a tilt angle (degrees) and temperature (°C)
pub fn try_calculate_gravity(formula: &str, tilt: f64, temp_c: f64) -> FormulaResult<f64> {
    let mut parser = Parser {
        src: formula.as_bytes(),
        pos: 0,
        depth: 0,
        tilt,
        temp_c,
    };

    parser.skip_whitespace();
    if parser.at_end() {
        return Err(FormulaError::EmptyFormula);
    }

    let value = parser.expr()?;

    parser.skip_whitespace();
    if !parser.at_end() {
        return Err(FormulaError::UnexpectedToken { position: parser.pos });
    }

    Ok(value)
}

/// Evaluate `formula`, returning `0.0` if it cannot be evaluated
pub fn calculate_gravity(formula: &str, tilt: f64, temp_c: f64) -> f64 {
    match try_calculate_gravity(formula, tilt, temp_c) {
        Ok(value) => value,
        Err(e) => {
            log_warn!("Failed to evaluate formula '{}': {}", formula, e);
            0.0
        }
    }
}

/// Evaluator bound to the device's configured formula
///
/// ```rust
/// use hydrometer_core::formula::FormulaEvaluator;
///
/// let evaluator = FormulaEvaluator::new("0.00000909*tilt^2+0.00124545*tilt+0.96445455");
/// let sg = evaluator.calculate_gravity(30.0, 20.0, None);
/// assert!((sg - 1.01).abs() < 0.005);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FormulaEvaluator<'a> {
    default_formula: &'a str,
}

impl<'a> FormulaEvaluator<'a> {
    /// Create an evaluator that falls back to `default_formula`
    pub const fn new(default_formula: &'a str) -> Self {
        Self { default_formula }
    }

    /// Formula used when none is passed
    pub fn default_formula(&self) -> &'a str {
        self.default_formula
    }

    /// Gravity for `tilt` and `temp_c`, using `formula` or the default
    pub fn calculate_gravity(&self, tilt: f64, temp_c: f64, formula: Option<&str>) -> f64 {
        calculate_gravity(formula.unwrap_or(self.default_formula), tilt, temp_c)
    }
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
    depth: usize,
    tilt: f64,
    temp_c: f64,
}

impl Parser<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    /// Consume `op` if it is the next token
    fn eat(&mut self, op: u8) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(op) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> FormulaResult<f64> {
        let mut value = self.term()?;

        loop {
            if self.eat(b'+') {
                value += self.term()?;
            } else if self.eat(b'-') {
                value -= self.term()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn term(&mut self) -> FormulaResult<f64> {
        let mut value = self.unary()?;

        while self.eat(b'*') {
            value *= self.unary()?;
        }

        Ok(value)
    }

    fn unary(&mut self) -> FormulaResult<f64> {
        let mut negative = false;

        loop {
            if self.eat(b'-') {
                negative = !negative;
            } else if !self.eat(b'+') {
                break;
            }
        }

        let value = self.power()?;
        Ok(if negative { -value } else { value })
    }

    fn power(&mut self) -> FormulaResult<f64> {
        let base = self.primary()?;

        if !self.eat(b'^') {
            return Ok(base);
        }

        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(FormulaError::UnexpectedToken { position: self.pos });
        }
        let exponent = self.unary()?;
        self.depth -= 1;

        Ok(libm::pow(base, exponent))
    }

    fn primary(&mut self) -> FormulaResult<f64> {
        self.skip_whitespace();

        match self.peek() {
            Some(c) if c.is_ascii_digit() || c == b'.' => self.number(),
            Some(c) if c.is_ascii_alphabetic() || c == b'_' => self.variable(),
            _ => Err(FormulaError::UnexpectedToken { position: self.pos }),
        }
    }

    fn number(&mut self) -> FormulaResult<f64> {
        let start = self.pos;

        self.skip_digits();
        if self.peek() == Some(b'.') {
            self.pos += 1;
            self.skip_digits();
        }

        // Exponent only when digits follow, so "2e" is left for the caller
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.skip_digits();
            } else {
                self.pos = mark;
            }
        }

        core::str::from_utf8(&self.src[start..self.pos])
            .ok()
            .and_then(|text| text.parse::<f64>().ok())
            .ok_or(FormulaError::UnexpectedToken { position: start })
    }

    fn variable(&mut self) -> FormulaResult<f64> {
        let start = self.pos;

        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'_') {
            self.pos += 1;
        }

        let name = &self.src[start..self.pos];
        if name == TILT_VARIABLE.as_bytes() {
            Ok(self.tilt)
        } else if name == TEMP_VARIABLE.as_bytes() {
            Ok(self.temp_c)
        } else {
            Err(FormulaError::UnknownVariable { position: start })
        }
    }

    fn skip_digits(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY: &str = "0.00000909*tilt^2+0.00124545*tilt+0.96445455";

    #[test]
    fn evaluates_legacy_formula() {
        let sg = calculate_gravity(LEGACY, 30.0, 20.0);
        assert!((sg - 1.00999905).abs() < 1e-9);
    }

    #[test]
    fn unknown_variable_is_zero() {
        assert_eq!(calculate_gravity("0.00000909*tilt2^2+0.96", 30.0, 20.0), 0.0);
        assert_eq!(
            try_calculate_gravity("1+angle", 30.0, 20.0),
            Err(FormulaError::UnknownVariable { position: 2 })
        );
    }

    #[test]
    fn empty_and_garbage() {
        assert_eq!(try_calculate_gravity("", 1.0, 1.0), Err(FormulaError::EmptyFormula));
        assert_eq!(try_calculate_gravity("   ", 1.0, 1.0), Err(FormulaError::EmptyFormula));
        assert_eq!(
            try_calculate_gravity("1+", 1.0, 1.0),
            Err(FormulaError::UnexpectedToken { position: 2 })
        );
        assert_eq!(
            try_calculate_gravity("2tilt", 1.0, 1.0),
            Err(FormulaError::UnexpectedToken { position: 1 })
        );
        assert_eq!(
            try_calculate_gravity("(tilt)", 1.0, 1.0),
            Err(FormulaError::UnexpectedToken { position: 0 })
        );
        assert_eq!(calculate_gravity("1/tilt", 2.0, 1.0), 0.0);
    }

    #[test]
    fn accepts_legacy_double_signs() {
        let v = try_calculate_gravity("1.5*tilt+-0.5", 2.0, 0.0).unwrap();
        assert_eq!(v, 2.5);
        let v = try_calculate_gravity("1--2", 0.0, 0.0).unwrap();
        assert_eq!(v, 3.0);
    }

    #[test]
    fn precedence_and_whitespace() {
        assert_eq!(try_calculate_gravity(" 2 * tilt ^ 2 + 1 ", 3.0, 0.0), Ok(19.0));
        assert_eq!(try_calculate_gravity("-2^2", 0.0, 0.0), Ok(-4.0));
        assert_eq!(try_calculate_gravity("2^-1", 0.0, 0.0), Ok(0.5));
        assert_eq!(try_calculate_gravity("2^3^2", 0.0, 0.0), Ok(512.0));
    }

    #[test]
    fn numbers_with_exponents() {
        assert_eq!(try_calculate_gravity("1.5e2", 0.0, 0.0), Ok(150.0));
        assert_eq!(try_calculate_gravity("2E-1*tilt", 10.0, 0.0), Ok(2.0));
        assert_eq!(try_calculate_gravity(".5+tilt", 1.0, 0.0), Ok(1.5));
        assert_eq!(
            try_calculate_gravity("2e", 0.0, 0.0),
            Err(FormulaError::UnexpectedToken { position: 1 })
        );
    }

    #[test]
    fn temperature_variable() {
        let v = try_calculate_gravity("tilt*0.01+temp*0.001", 40.0, 20.0).unwrap();
        assert!((v - 0.42).abs() < 1e-12);
    }

    #[test]
    fn deep_power_chain_is_rejected() {
        let mut text: heapless::String<128> = heapless::String::new();
        for _ in 0..40 {
            text.push_str("1^").unwrap();
        }
        text.push('1').unwrap();
        assert!(matches!(
            try_calculate_gravity(&text, 0.0, 0.0),
            Err(FormulaError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn evaluator_falls_back_to_default() {
        let evaluator = FormulaEvaluator::new("tilt*2");
        assert_eq!(evaluator.calculate_gravity(3.0, 0.0, None), 6.0);
        assert_eq!(evaluator.calculate_gravity(3.0, 0.0, Some("tilt+1")), 4.0);
        assert_eq!(evaluator.calculate_gravity(3.0, 0.0, Some("bogus")), 0.0);
    }
}
