use crate::error::PlotError;

/// Cumulative trapezoidal integral of `y` over `x`, anchored at `x[0]`.
///
/// `out[0] = 0` and `out[i] = out[i-1] + (x[i] - x[i-1]) * (y[i] + y[i-1]) / 2`.
/// Empty input gives empty output.
pub fn cumulative_integral(y: &[f64], x: &[f64]) -> Result<Vec<f64>, PlotError> {
    if y.len() != x.len() {
        return Err(PlotError::Shape {
            expected: x.len(),
            actual: y.len(),
        });
    }
    let mut out = Vec::with_capacity(y.len());
    if y.is_empty() {
        return Ok(out);
    }
    out.push(0.0);
    let mut acc = 0.0;
    for i in 1..y.len() {
        acc += (x[i] - x[i - 1]) * (y[i] + y[i - 1]) / 2.0;
        out.push(acc);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::utils::linspace;
    use approx::assert_relative_eq;

    #[test]
    fn test_starts_at_zero_and_keeps_length() {
        let x = linspace(-5.0, 5.0, 400);
        let y: Vec<f64> = x.iter().map(|v| v * v).collect();
        let integral = cumulative_integral(&y, &x).unwrap();
        assert_eq!(integral.len(), 400);
        assert_eq!(integral[0], 0.0);
    }

    #[test]
    fn test_non_decreasing_for_non_negative_integrand() {
        let x = linspace(0.0, 3.0, 50);
        let y: Vec<f64> = x.iter().map(|v| (v * 2.0).sin().abs()).collect();
        let integral = cumulative_integral(&y, &x).unwrap();
        assert!(integral.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_linear_integrand_is_exact() {
        // trapezoids integrate straight lines exactly: ∫_0^x (2t + 1) dt = x² + x
        let x = linspace(0.0, 2.0, 11);
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        let integral = cumulative_integral(&y, &x).unwrap();
        for (xi, ii) in x.iter().zip(integral) {
            assert_relative_eq!(ii, xi * xi + xi, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_empty_and_mismatched() {
        assert!(cumulative_integral(&[], &[]).unwrap().is_empty());
        assert!(matches!(
            cumulative_integral(&[1.0, 2.0], &[0.0]),
            Err(PlotError::Shape {
                expected: 1,
                actual: 2
            })
        ));
    }
}
