//! Calibration workflow tests
//!
//! Formula creation, evaluation and temperature correction against values
//! produced by earlier firmware releases.

mod common;

use hydrometer_core::{
    calculate_gravity,
    constants::calibration::DEVICE_MAX_DEVIATION_SG,
    formula::{render_formula, Formula},
    gravity_temperature_correction_c, try_calculate_gravity,
    units::{convert_to_plato, convert_to_sg, reduce_float_precision},
    FormulaError, FormulaFitter, RawFormulaData,
};

use common::{legacy_calibration, leading_gap_calibration, quadratic_calibration, LEGACY_FORMULA};

#[test]
fn leading_gap_is_not_enough_values() {
    let result = FormulaFitter::default().create_formula(&leading_gap_calibration(), 2);
    assert_eq!(
        result,
        Err(FormulaError::NotEnoughValues { required: 4, available: 0 })
    );
}

#[test]
fn legacy_series_gives_legacy_formula() {
    let formula = FormulaFitter::default()
        .create_formula(&legacy_calibration(), 2)
        .unwrap();
    assert_eq!(formula.as_str(), LEGACY_FORMULA);
}

#[test]
fn legacy_formula_evaluates() {
    let g = calculate_gravity(LEGACY_FORMULA, 30.0, 20.0);
    assert_eq!(reduce_float_precision(g as f32, 2), 1.01);
}

#[test]
fn unknown_variable_gives_exact_zero() {
    let g = calculate_gravity("0.00000909*tilt2^2+0.00124545*tilt+0.96445455", 30.0, 20.0);
    assert_eq!(g, 0.0);
    assert!(matches!(
        try_calculate_gravity("0.00000909*tilt2^2", 30.0, 20.0),
        Err(FormulaError::UnknownVariable { .. })
    ));
}

#[test]
fn temperature_correction_vector() {
    let g = gravity_temperature_correction_c(1.02, 45.0, 20.0);
    assert_eq!(reduce_float_precision(g as f32, 2), 1.03);
}

#[test]
fn plato_vectors() {
    assert_eq!(reduce_float_precision(convert_to_plato(1.008) as f32, 2), 2.06);
    assert_eq!(reduce_float_precision(convert_to_sg(2.06) as f32, 3), 1.008);
}

#[test]
fn every_order_renders_and_round_trips() {
    let data = legacy_calibration();
    let fitter = FormulaFitter::default();

    for order in 1..=4 {
        let (formula, report) = fitter.create_formula_with_report(&data, order).unwrap();
        assert_eq!(report.order(), order);
        assert!(!formula.as_str().contains("+-"));

        for (tilt, gravity) in data.points() {
            let g = formula.evaluate(tilt, 20.0);
            assert!((g - gravity).abs() <= report.max_deviation + 1e-12);
        }
    }
}

#[test]
fn cubic_and_quartic_rendering() {
    let fitter = FormulaFitter::default();

    let cubic = fitter.create_formula(&legacy_calibration(), 3).unwrap();
    assert_eq!(
        cubic.as_str(),
        "0.00000065*tilt^3-0.00008392*tilt^2+0.00542424*tilt+0.90586014"
    );

    let quartic = fitter.create_formula(&legacy_calibration(), 4).unwrap();
    assert_eq!(
        quartic.as_str(),
        "0.00000004*tilt^4-0.00000732*tilt^3+0.00046259*tilt^2-0.01051981*tilt+1.07220280"
    );
}

#[test]
fn device_limit_rejects_rounded_quartic() {
    // Rounding tilt^4 to 8 decimals costs ~0.05 SG at 70°
    let fitter = FormulaFitter::new(f64::from(DEVICE_MAX_DEVIATION_SG));
    assert!(matches!(
        fitter.create_formula(&legacy_calibration(), 4),
        Err(FormulaError::DeviationTooHigh { .. })
    ));
    assert!(fitter.create_formula(&legacy_calibration(), 2).is_ok());
}

#[test]
fn exact_quadratic_is_recovered() {
    let data = quadratic_calibration(
        [0.9, 0.0025, 0.00001],
        &[22.0, 31.0, 38.0, 47.0, 55.0, 68.0],
    );
    let formula = FormulaFitter::default().create_formula(&data, 2).unwrap();
    assert_eq!(formula.as_str(), "0.00001000*tilt^2+0.00250000*tilt+0.90000000");
}

#[test]
fn orphan_points_after_gap_are_ignored() {
    let mut data = legacy_calibration();
    data.tilt[3] = 0.0;

    // Only 25°, 30°, 35° remain
    assert_eq!(data.len(), 3);
    assert_eq!(
        FormulaFitter::default().create_formula(&data, 2),
        Err(FormulaError::NotEnoughValues { required: 4, available: 3 })
    );
}

#[test]
fn caller_buffer_overflow_is_checked() {
    let mut small: heapless::String<32> = heapless::String::new();
    assert_eq!(
        FormulaFitter::default().create_formula_into(&legacy_calibration(), 2, &mut small),
        Err(FormulaError::BufferTooSmall)
    );

    let mut exact: heapless::String<44> = heapless::String::new();
    assert!(FormulaFitter::default()
        .create_formula_into(&legacy_calibration(), 2, &mut exact)
        .is_ok());
    assert_eq!(exact.as_str(), LEGACY_FORMULA);
}

#[test]
fn stored_formula_reloads_unchanged() {
    let stored = Formula::parse(LEGACY_FORMULA).unwrap();
    assert_eq!(stored.as_str(), LEGACY_FORMULA);

    let mut rendered: heapless::String<64> = heapless::String::new();
    render_formula(&[0.96445455, 0.00124545, 0.00000909], &mut rendered).unwrap();
    assert_eq!(rendered.as_str(), stored.as_str());
}

#[test]
fn too_many_points_are_rejected() {
    let pairs: Vec<(f64, f64)> = (0..11).map(|i| (20.0 + i as f64, 1.0 + i as f64 / 100.0)).collect();
    assert_eq!(RawFormulaData::from_pairs(&pairs), Err(FormulaError::BufferTooSmall));
}
