//! Formula Creation Example
//!
//! Turns a set of calibration points into a gravity formula and shows how
//! well each polynomial order fits.
//!
//! ## What You'll Learn
//!
//! - Recording calibration points in `RawFormulaData`
//! - Creating formulas of different orders
//! - Reading the fit report
//! - Handling rejected formulas
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_create_formula
//! ```

use hydrometer_core::{
    calculate_gravity, constants::calibration::DEVICE_MAX_DEVIATION_SG, FormulaError,
    FormulaFitter, RawFormulaData,
};

fn main() {
    println!("Hydrometer Formula Creation Example");
    println!("===================================\n");

    // Readings taken in sugar solutions of known gravity
    let data = match RawFormulaData::from_pairs(&[
        (25.0, 1.000),
        (30.0, 1.010),
        (35.0, 1.020),
        (40.0, 1.030),
        (45.0, 1.040),
        (50.0, 1.050),
        (55.0, 1.060),
        (60.0, 1.070),
        (65.0, 1.080),
        (70.0, 1.100),
    ]) {
        Ok(data) => data,
        Err(e) => {
            println!("Invalid calibration data: {}", e);
            return;
        }
    };

    println!("Calibration points:");
    for (tilt, gravity) in data.points() {
        println!("  {:5.1}° → {:.3} SG", tilt, gravity);
    }
    println!();

    let fitter = FormulaFitter::new(f64::from(DEVICE_MAX_DEVIATION_SG));
    println!("Maximum deviation: {} SG\n", fitter.max_deviation());

    for order in 1..=4 {
        match fitter.create_formula_with_report(&data, order) {
            Ok((formula, report)) => {
                println!("Order {}: {}", order, formula);
                println!("  deviation {:.5} SG over {} points", report.max_deviation, report.points);
            }
            Err(FormulaError::DeviationTooHigh { deviation, .. }) => {
                println!("Order {}: rejected, deviation {:.5} SG", order, deviation);
            }
            Err(e) => println!("Order {}: {}", order, e),
        }
    }
    println!();

    // Too few points for a quadratic
    let sparse = RawFormulaData::from_pairs(&[(25.0, 1.0), (40.0, 1.03), (60.0, 1.07)])
        .unwrap_or_default();
    match fitter.create_formula(&sparse, 2) {
        Ok(formula) => println!("Unexpected success: {}", formula),
        Err(e) => println!("Three points, order 2: {}", e),
    }
    println!();

    // Formulas are evaluated from their text, as stored on the device
    if let Ok(formula) = fitter.create_formula(&data, 2) {
        println!("Evaluating '{}':", formula);
        for tilt in [28.0, 42.5, 61.0] {
            let sg = calculate_gravity(formula.as_str(), tilt, 20.0);
            println!("  {:5.1}° → {:.4} SG", tilt, sg);
        }
    }
}
