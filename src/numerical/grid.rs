use crate::error::RangeError;
use crate::symbolic::utils::linspace;

/// Number of samples of every curve unless configured otherwise.
pub const DEFAULT_SAMPLES: usize = 400;

/// Checks an x-range: both bounds finite and `x_min < x_max`.
pub fn validate_range(x_min: f64, x_max: f64) -> Result<(), RangeError> {
    for value in [x_min, x_max] {
        if !value.is_finite() {
            return Err(RangeError::NotFinite { value });
        }
    }
    if x_min == x_max {
        return Err(RangeError::Empty { value: x_min });
    }
    if x_min > x_max {
        return Err(RangeError::Inverted { x_min, x_max });
    }
    Ok(())
}

/// Evenly spaced sample points from `x_min` to `x_max`, both included.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    x_min: f64,
    x_max: f64,
    points: Vec<f64>,
}

impl SampleGrid {
    /// Grid of `samples` points; fewer than 2 samples are raised to 2.
    pub fn new(x_min: f64, x_max: f64, samples: usize) -> Result<Self, RangeError> {
        validate_range(x_min, x_max)?;
        Ok(Self {
            x_min,
            x_max,
            points: linspace(x_min, x_max, samples.max(2)),
        })
    }

    pub fn with_default_samples(x_min: f64, x_max: f64) -> Result<Self, RangeError> {
        Self::new(x_min, x_max, DEFAULT_SAMPLES)
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Distance between neighbouring points.
    pub fn step(&self) -> f64 {
        (self.x_max - self.x_min) / (self.points.len() - 1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_grid() {
        let grid = SampleGrid::with_default_samples(-5.0, 5.0).unwrap();
        assert_eq!(grid.len(), 400);
        assert_eq!(grid.points()[0], -5.0);
        assert_eq!(grid.points()[399], 5.0);
        assert_relative_eq!(grid.step(), 10.0 / 399.0);
    }

    #[test]
    fn test_small_sample_count_is_raised() {
        let grid = SampleGrid::new(0.0, 1.0, 1).unwrap();
        assert_eq!(grid.points(), &[0.0, 1.0]);
    }

    #[test]
    fn test_invalid_ranges() {
        assert_eq!(
            SampleGrid::new(5.0, -5.0, 10).unwrap_err(),
            RangeError::Inverted {
                x_min: 5.0,
                x_max: -5.0
            }
        );
        assert_eq!(
            validate_range(1.0, 1.0).unwrap_err(),
            RangeError::Empty { value: 1.0 }
        );
        assert!(matches!(
            validate_range(f64::NEG_INFINITY, 1.0),
            Err(RangeError::NotFinite { .. })
        ));
        assert!(validate_range(f64::NAN, 1.0).is_err());
    }
}
