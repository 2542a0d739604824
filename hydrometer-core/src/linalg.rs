//! Small dense linear algebra for polynomial regression
//!
//! ## Overview
//!
//! Fitting a polynomial of order n by least squares reduces to the
//! (n+1)×(n+1) normal equations
//!
//! ```text
//! (Vᵀ·V)·c = Vᵀ·y        V = Vandermonde matrix of the x values
//! ```
//!
//! With n ≤ 4 the system is at most 5×5, so it is solved in place on the stack
//! with Gauss-Jordan elimination and partial pivoting. No heap, no external
//! linear algebra crate.
//!
//! ## Conditioning
//!
//! Tilt angles sit between roughly 20° and 80°, and 80⁸ ≈ 1.7·10¹⁵ appears in
//! the quartic normal matrix. The x values are therefore scaled into [-1, 1]
//! before the matrix is built and the coefficients are unscaled afterwards,
//! which keeps the system well inside `f64` precision.

use crate::constants::calibration::{MAX_FORMULA_ORDER, SINGULAR_PIVOT_EPSILON};

/// Largest system handled (quartic fit)
pub const MAX_TERMS: usize = MAX_FORMULA_ORDER + 1;

/// Fixed-size square matrix, only the leading `n`×`n` block is used
pub type SquareMatrix = [[f64; MAX_TERMS]; MAX_TERMS];

/// Fixed-size vector, only the leading `n` entries are used
pub type Vector = [f64; MAX_TERMS];

/// Solve `a·x = b` for the leading `n`×`n` block
///
/// Returns `None` when the matrix is singular (relative to its largest entry)
/// or the solution is not finite. `a` and `b` are consumed as scratch space.
pub fn solve(a: &mut SquareMatrix, b: &mut Vector, n: usize) -> Option<Vector> {
    if n == 0 || n > MAX_TERMS {
        return None;
    }

    let scale = a[..n]
        .iter()
        .flat_map(|row| row[..n].iter())
        .fold(0.0_f64, |acc, &v| acc.max(libm::fabs(v)));

    if !scale.is_finite() || scale == 0.0 {
        return None;
    }

    for k in 0..n {
        // Find pivot
        let mut max_row = k;
        let mut max_val = libm::fabs(a[k][k]);

        for (i, row) in a.iter().enumerate().take(n).skip(k + 1) {
            if libm::fabs(row[k]) > max_val {
                max_val = libm::fabs(row[k]);
                max_row = i;
            }
        }

        if max_val < SINGULAR_PIVOT_EPSILON * scale {
            return None;
        }

        if max_row != k {
            a.swap(k, max_row);
            b.swap(k, max_row);
        }

        // Scale pivot row
        let pivot = a[k][k];
        for j in k..n {
            a[k][j] /= pivot;
        }
        b[k] /= pivot;

        // Eliminate column
        for i in 0..n {
            if i != k {
                let factor = a[i][k];
                if factor != 0.0 {
                    for j in k..n {
                        a[i][j] -= factor * a[k][j];
                    }
                    b[i] -= factor * b[k];
                }
            }
        }
    }

    let mut x = [0.0; MAX_TERMS];
    x[..n].copy_from_slice(&b[..n]);

    if x[..n].iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}

/// Least-squares polynomial coefficients, lowest power first
///
/// `xs` and `ys` must have the same length. Returns `None` when the points
/// cannot determine a polynomial of `order` (too few distinct x values,
/// non-finite input).
pub fn polyfit(xs: &[f64], ys: &[f64], order: usize) -> Option<Vector> {
    let n = order + 1;

    if n > MAX_TERMS || xs.len() != ys.len() || xs.len() < n {
        return None;
    }

    let x_scale = xs.iter().fold(0.0_f64, |acc, &x| acc.max(libm::fabs(x)));
    if !x_scale.is_finite() || x_scale == 0.0 {
        return None;
    }

    // Power sums Σ x^k for k in 0..=2n-2 and moments Σ y·x^k
    let mut power_sums = [0.0; 2 * MAX_TERMS - 1];
    let mut moments = [0.0; MAX_TERMS];

    for (&x, &y) in xs.iter().zip(ys) {
        let x = x / x_scale;
        let mut p = 1.0;
        for k in 0..(2 * n - 1) {
            power_sums[k] += p;
            if k < n {
                moments[k] += y * p;
            }
            p *= x;
        }
    }

    let mut a: SquareMatrix = [[0.0; MAX_TERMS]; MAX_TERMS];
    for (i, row) in a.iter_mut().enumerate().take(n) {
        for (j, cell) in row.iter_mut().enumerate().take(n) {
            *cell = power_sums[i + j];
        }
    }

    let mut coefficients = solve(&mut a, &mut moments, n)?;

    // Undo the x scaling: c_k · (x / s)^k = (c_k / s^k) · x^k
    let mut divisor = 1.0;
    for c in coefficients.iter_mut().take(n) {
        *c /= divisor;
        divisor *= x_scale;
    }

    Some(coefficients)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(c: &Vector, order: usize, x: f64) -> f64 {
        c[..=order].iter().rev().fold(0.0, |acc, &k| acc * x + k)
    }

    #[test]
    fn solves_small_system() {
        // 2x + y = 5, x - y = 1  ->  x = 2, y = 1
        let mut a = [[0.0; MAX_TERMS]; MAX_TERMS];
        a[0][0] = 2.0;
        a[0][1] = 1.0;
        a[1][0] = 1.0;
        a[1][1] = -1.0;
        let mut b = [5.0, 1.0, 0.0, 0.0, 0.0];

        let x = solve(&mut a, &mut b, 2).unwrap();
        assert!((x[0] - 2.0).abs() < 1e-12);
        assert!((x[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn singular_system_is_rejected() {
        let mut a = [[0.0; MAX_TERMS]; MAX_TERMS];
        a[0][0] = 1.0;
        a[0][1] = 2.0;
        a[1][0] = 2.0;
        a[1][1] = 4.0;
        let mut b = [1.0, 2.0, 0.0, 0.0, 0.0];

        assert!(solve(&mut a, &mut b, 2).is_none());
    }

    #[test]
    fn recovers_exact_quadratic() {
        let xs = [25.0, 30.0, 40.0, 50.0, 60.0, 70.0];
        let ys: [f64; 6] = xs.map(|x| 0.00001 * x * x + 0.0012 * x + 0.96);

        let c = polyfit(&xs, &ys, 2).unwrap();
        assert!((c[0] - 0.96).abs() < 1e-9);
        assert!((c[1] - 0.0012).abs() < 1e-10);
        assert!((c[2] - 0.00001).abs() < 1e-12);
    }

    #[test]
    fn quartic_fit_stays_accurate() {
        let xs = [22.0, 28.0, 35.0, 41.0, 47.0, 55.0, 63.0, 71.0, 78.0];
        let truth = [1.1, -0.01, 0.0004, -0.000006, 0.00000004];
        let ys = xs.map(|x| eval(&truth, 4, x));

        let c = polyfit(&xs, &ys, 4).unwrap();
        for &x in &xs {
            assert!((eval(&c, 4, x) - eval(&truth, 4, x)).abs() < 1e-7);
        }
    }

    #[test]
    fn identical_x_values_cannot_fit() {
        let xs = [30.0; 5];
        let ys = [1.0, 1.01, 1.02, 1.03, 1.04];
        assert!(polyfit(&xs, &ys, 1).is_none());
    }

    #[test]
    fn too_few_points() {
        assert!(polyfit(&[1.0, 2.0], &[1.0, 2.0], 2).is_none());
        assert!(polyfit(&[1.0, 2.0], &[1.0], 1).is_none());
    }
}
