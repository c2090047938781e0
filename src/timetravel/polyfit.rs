use ndarray::Array2;

use crate::error::{XsError, XsResult};

//=====================================================================
// Least-squares polynomial fitting reduced to sample weights.
//
// For a fit of order `k` through points `(t_i, y_i)` the fitted value
// at `t` is linear in the samples:
//
//     y(t) = phi(t)^T c,   c = R^-1 Q^T y   =>   y(t) = (Q R^-T phi(t))^T y
//
// where `V = Q R` is the thin QR factorization of the Vandermonde
// matrix. Computing the weight vector `w = Q R^-T phi(t)` once lets the
// caller evaluate every component of a multi-dimensional sample as
// `sum_i w_i y_i`, sharing a single factorization.
//
// Times are mapped onto [-1, 1] before building V. This spans the same
// polynomial space, so the least-squares solution is unchanged, but it
// keeps V well conditioned for times measured in seconds.
//
// No rank cutoff is applied. Closely spaced times give large weights,
// only an exactly singular system or non-finite weights are an error.
//=====================================================================

/// Weights `w` such that the order `order` least-squares fit through
/// `times` evaluated at `t` is `sum_i w_i y_i`
pub(crate) fn fit_weights(times: &[f64], order: usize, t: f64) -> XsResult<Vec<f64>> {
    let num_points = times.len();
    let num_coeffs = order + 1;
    if num_points < num_coeffs {
        return Err(XsError::SingularFit { order, points: num_points });
    }

    let (center, half_width) = scaling(times);
    let scaled = |x: f64| (x - center) / half_width;

    // Vandermonde matrix, column j holds s^j
    let mut vandermonde = Array2::<f64>::zeros((num_points, num_coeffs));
    for (i, &time) in times.iter().enumerate() {
        let s = scaled(time);
        let mut power = 1.0;
        for j in 0..num_coeffs {
            vandermonde[[i, j]] = power;
            power *= s;
        }
    }

    let reflectors = householder_qr(&mut vandermonde);

    // R now sits in the upper triangle of the factored matrix
    if (0..num_coeffs).any(|j| {
        let diagonal = vandermonde[[j, j]];
        diagonal == 0.0 || !diagonal.is_finite()
    }) {
        return Err(XsError::SingularFit { order, points: num_points });
    }

    // Forward substitution for R^T z = phi(t)
    let s = scaled(t);
    let mut z = vec![0.0; num_points];
    let mut power = 1.0;
    for j in 0..num_coeffs {
        let mut value = power;
        for i in 0..j {
            value -= vandermonde[[i, j]] * z[i];
        }
        z[j] = value / vandermonde[[j, j]];
        power *= s;
    }

    // w = Q [z; 0] = H_0 H_1 ... H_{k} [z; 0]
    for (k, reflector) in reflectors.iter().enumerate().rev() {
        apply_reflector(reflector, &mut z[k..]);
    }
    if z.iter().any(|weight| !weight.is_finite()) {
        return Err(XsError::SingularFit { order, points: num_points });
    }
    Ok(z)
}

// Center and half width of the time window, a single point maps onto zero
fn scaling(times: &[f64]) -> (f64, f64) {
    let lowest = times.iter().copied().fold(f64::INFINITY, f64::min);
    let highest = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let half_width = 0.5 * (highest - lowest);
    let center = 0.5 * (highest + lowest);
    if half_width > 0.0 { (center, half_width) } else { (center, 1.0) }
}

// In-place Householder QR. On return the upper triangle of `matrix` holds R and
// the reflector vectors are returned, reflector k acting on rows k.. .
fn householder_qr(matrix: &mut Array2<f64>) -> Vec<Vec<f64>> {
    let (num_rows, num_cols) = matrix.dim();
    let mut reflectors = Vec::with_capacity(num_cols);

    for k in 0..num_cols {
        let column: Vec<f64> = (k..num_rows).map(|i| matrix[[i, k]]).collect();
        let norm = column.iter().map(|x| x * x).sum::<f64>().sqrt();

        let mut reflector = column;
        if norm > 0.0 {
            // Reflect onto -sign(x0) * |x| e_0 to avoid cancellation
            let alpha = if reflector[0] >= 0.0 { -norm } else { norm };
            reflector[0] -= alpha;
        }

        for j in k..num_cols {
            let mut segment: Vec<f64> = (k..num_rows).map(|i| matrix[[i, j]]).collect();
            apply_reflector(&reflector, &mut segment);
            for (offset, value) in segment.into_iter().enumerate() {
                matrix[[k + offset, j]] = value;
            }
        }
        reflectors.push(reflector);
    }
    reflectors
}

// y <- (I - 2 v v^T / v^T v) y, a zero reflector is the identity
fn apply_reflector(reflector: &[f64], y: &mut [f64]) {
    let norm_squared: f64 = reflector.iter().map(|v| v * v).sum();
    if norm_squared == 0.0 {
        return;
    }
    let projection: f64 = reflector.iter().zip(y.iter()).map(|(v, y)| v * y).sum();
    let factor = 2.0 * projection / norm_squared;
    for (value, v) in y.iter_mut().zip(reflector) {
        *value -= factor * v;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn evaluate(times: &[f64], values: &[f64], order: usize, t: f64) -> f64 {
        let weights = fit_weights(times, order, t).unwrap();
        weights.iter().zip(values).map(|(w, y)| w * y).sum()
    }

    #[test]
    fn test_linear_extrapolation() {
        assert_abs_diff_eq!(evaluate(&[0.0, 1.0], &[1.0, 3.0], 1, 2.0), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(evaluate(&[0.0, 1.0], &[1.0, 3.0], 1, 0.5), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_fit_is_mean() {
        let values = [1.0, 2.0, 6.0];
        assert_abs_diff_eq!(evaluate(&[0.0, 1.0, 2.0], &values, 0, 10.0), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quadratic_is_reproduced() {
        let quadratic = |t: f64| 2.0 - 0.5 * t + 0.25 * t * t;
        let times = [0.0, 1.0, 3.0, 4.0];
        let values: Vec<f64> = times.iter().map(|&t| quadratic(t)).collect();
        for t in [2.0, 5.0, 7.5] {
            assert_abs_diff_eq!(evaluate(&times, &values, 2, t), quadratic(t), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_least_squares_line() {
        // Best fit through (0, 0), (1, 1), (2, 1) is y = 1/6 + t/2
        let values = [0.0, 1.0, 1.0];
        assert_abs_diff_eq!(evaluate(&[0.0, 1.0, 2.0], &values, 1, 3.0), 1.0 / 6.0 + 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_large_time_values() {
        // Depletion times in seconds, spaced by tens of days
        let day = 86400.0;
        let times = [100.0 * day, 130.0 * day, 160.0 * day];
        let line = |t: f64| 4.0 + 1e-7 * t;
        let values: Vec<f64> = times.iter().map(|&t| line(t)).collect();
        let t = 190.0 * day;
        assert_abs_diff_eq!(evaluate(&times, &values, 2, t), line(t), epsilon = 1e-9);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let weights = fit_weights(&[1.0, 2.0, 4.0, 8.0], 2, 9.0).unwrap();
        assert_abs_diff_eq!(weights.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_fits() {
        assert!(matches!(fit_weights(&[1.0], 1, 2.0), Err(XsError::SingularFit { .. })));
        assert!(matches!(fit_weights(&[1.0, 1.0], 1, 2.0), Err(XsError::SingularFit { .. })));
    }

    #[test]
    fn test_clustered_times_still_fit() {
        // Last two times nearly coincide, the fit is poorly conditioned but defined
        let weights = fit_weights(&[0.0, 1.0, 1.0 + 1e-14], 2, 2.0).unwrap();
        assert_eq!(weights.len(), 3);
        assert!(weights.iter().all(|weight| weight.is_finite()));

        // A line through the same times is still recovered
        let weights = fit_weights(&[0.0, 1.0, 1.0 + 1e-14], 1, 2.0).unwrap();
        let fitted: f64 = weights.iter().zip([1.0, 3.0, 3.0 + 2e-14]).map(|(w, y)| w * y).sum();
        assert_abs_diff_eq!(fitted, 5.0, epsilon = 1e-9);
    }
}
