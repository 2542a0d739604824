//! Error Types for Calibration and Configuration Failures
//!
//! ## Design Philosophy
//!
//! The error types follow the same rules as the rest of the core:
//!
//! 1. **Small Size**: every variant carries at most a couple of scalars, so errors
//!    can be returned from the calibration workflow and shown to the operator
//!    without allocating.
//!
//! 2. **No Heap Allocation**: messages are `&'static str`, never `String`.
//!
//! 3. **Copy Semantics**: errors are `Copy` and cheap to pass around.
//!
//! 4. **Actionable Information**: each variant tells the operator what to do next
//!    (add more calibration points, widen the spread, enlarge the buffer, ...).
//!
//! ## Error Categories
//!
//! ### Formula creation
//! - `InvalidOrder`: polynomial order outside 1..=4
//! - `NotEnoughValues`: too few calibration points for the requested order
//! - `DeviationTooHigh`: the rendered formula misses a calibration point by more
//!   than the configured threshold
//! - `InternalError`: the least-squares system could not be solved
//! - `BufferTooSmall`: the rendered formula does not fit the output buffer
//! - `InvalidPoint`: a calibration point is zero or not a number
//!
//! ### Formula evaluation
//! - `EmptyFormula`, `UnexpectedToken`, `UnknownVariable`
//!
//! Evaluation errors only surface through
//! [`try_calculate_gravity`](crate::formula::try_calculate_gravity); the plain
//! [`calculate_gravity`](crate::formula::calculate_gravity) collapses them to `0.0`.
//!
//! ## Handling Strategy
//!
//! ```rust
//! use hydrometer_core::{FormulaError, FormulaFitter, RawFormulaData};
//!
//! let data = RawFormulaData::from_pairs(&[(25.0, 1.000), (35.0, 1.020)]).unwrap();
//!
//! match FormulaFitter::default().create_formula(&data, 2) {
//!     Ok(formula) => { let _ = formula.as_str(); }
//!     Err(FormulaError::NotEnoughValues { required, available }) => {
//!         // ask the operator for more points
//!         assert_eq!((required, available), (4, 2));
//!     }
//!     Err(FormulaError::DeviationTooHigh { .. }) => {
//!         // the data does not follow a curve of this order
//!     }
//!     Err(_) => {}
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for formula creation and evaluation
pub type FormulaResult<T> = Result<T, FormulaError>;

/// Result type for configuration access
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Formula creation and evaluation errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum FormulaError {
    /// Polynomial order outside the supported range
    #[error("Formula order {order} not supported, use 1 to 4")]
    InvalidOrder {
        /// Requested order
        order: usize,
    },

    /// Not enough calibration points to fit the requested order
    #[error("Not enough values: need {required}, have {available}")]
    NotEnoughValues {
        /// Minimum number of valid points for the order
        required: usize,
        /// Valid points found in the calibration data
        available: usize,
    },

    /// The rendered formula deviates too much from a calibration point
    #[error("Deviation {deviation} exceeds limit {max_deviation}")]
    DeviationTooHigh {
        /// Largest absolute deviation found (SG)
        deviation: f64,
        /// Configured limit (SG)
        max_deviation: f64,
    },

    /// The least-squares system was singular or produced non-finite values
    #[error("Internal error: unable to solve the regression")]
    InternalError,

    /// Output buffer could not hold the rendered formula or data set
    #[error("Buffer too small for rendered formula")]
    BufferTooSmall,

    /// Calibration point is zero or not a finite number
    ///
    /// A zero marks the end of the calibration series, so a real point can
    /// never be zero.
    #[error("Calibration point {index} is zero or not a number")]
    InvalidPoint {
        /// Index of the rejected point
        index: usize,
    },

    /// Formula text contains no expression
    #[error("Formula is empty")]
    EmptyFormula,

    /// Formula text contains a character or token outside the grammar
    #[error("Unexpected token at position {position}")]
    UnexpectedToken {
        /// Byte offset into the formula text
        position: usize,
    },

    /// Formula references a variable other than `tilt` or `temp`
    #[error("Unknown variable at position {position}")]
    UnknownVariable {
        /// Byte offset into the formula text
        position: usize,
    },
}

/// Configuration store errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Text value does not fit the fixed-capacity field
    #[error("Value for '{key}' is too long")]
    ValueTooLong {
        /// Configuration key
        key: &'static str,
    },

    /// Stored value has the wrong type or an unsupported content
    #[error("Invalid value for '{key}'")]
    InvalidValue {
        /// Configuration key
        key: &'static str,
    },

    /// Backing storage rejected the write
    #[error("Configuration storage failure")]
    Storage,
}

#[cfg(feature = "defmt")]
impl defmt::Format for FormulaError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidOrder { order } =>
                defmt::write!(fmt, "Order {} not supported", order),
            Self::NotEnoughValues { required, available } =>
                defmt::write!(fmt, "Need {} values, have {}", required, available),
            Self::DeviationTooHigh { deviation, max_deviation } =>
                defmt::write!(fmt, "Deviation {} exceeds {}", deviation, max_deviation),
            Self::InternalError =>
                defmt::write!(fmt, "Regression failed"),
            Self::BufferTooSmall =>
                defmt::write!(fmt, "Buffer too small"),
            Self::InvalidPoint { index } =>
                defmt::write!(fmt, "Invalid calibration point {}", index),
            Self::EmptyFormula =>
                defmt::write!(fmt, "Empty formula"),
            Self::UnexpectedToken { position } =>
                defmt::write!(fmt, "Unexpected token at {}", position),
            Self::UnknownVariable { position } =>
                defmt::write!(fmt, "Unknown variable at {}", position),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ValueTooLong { key } => defmt::write!(fmt, "Value too long: {}", key),
            Self::InvalidValue { key } => defmt::write!(fmt, "Invalid value: {}", key),
            Self::Storage => defmt::write!(fmt, "Storage failure"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_are_small() {
        assert!(core::mem::size_of::<FormulaError>() <= 24);
        assert!(core::mem::size_of::<ConfigError>() <= 24);
    }

    #[cfg(feature = "std")]
    #[test]
    fn error_messages_name_the_problem() {
        let err = FormulaError::NotEnoughValues { required: 4, available: 2 };
        assert_eq!(err.to_string(), "Not enough values: need 4, have 2");

        let err = ConfigError::ValueTooLong { key: "gravity_formula" };
        assert_eq!(err.to_string(), "Value for 'gravity_formula' is too long");
    }
}
