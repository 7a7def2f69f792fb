// small numeric helpers shared by the symbolic checks and the sampling grid

/// `num_values` evenly spaced values from `start` to `end` inclusive.
/// The last value is `end` exactly.
pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    match num_values {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num_values as f64 - 1.0);
            let mut values: Vec<f64> = (0..num_values).map(|i| start + i as f64 * step).collect();
            values[num_values - 1] = end;
            values
        }
    }
}

/// Root mean square of the element-wise difference of `x` and `y`.
/// `None` when the slices are empty or of different lengths.
pub fn norm(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.is_empty() || x.len() != y.len() {
        return None;
    }
    let sum_sq: f64 = x.iter().zip(y).map(|(a, b)| (a - b).powi(2)).sum();
    Some((sum_sq / x.len() as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints() {
        let values = linspace(-5.0, 5.0, 400);
        assert_eq!(values.len(), 400);
        assert_eq!(values[0], -5.0);
        assert_eq!(values[399], 5.0);
        assert!(values.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_linspace_degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
    }

    #[test]
    fn test_norm() {
        assert_eq!(norm(&[1.0, 2.0], &[1.0, 2.0]), Some(0.0));
        assert_eq!(norm(&[3.0, 1.0], &[0.0, 4.0]), Some(3.0));
    }

    #[test]
    fn test_norm_empty_or_mismatched() {
        assert_eq!(norm(&[], &[]), None);
        assert_eq!(norm(&[1.0, 2.0], &[1.0]), None);
    }
}
