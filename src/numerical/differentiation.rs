//! Fixed-step central differences.
//!
//! `f'(x) ≈ (f(x + dx) - f(x - dx)) / (2*dx)`, truncation error O(dx²).

use crate::error::EvaluationError;
use crate::numerical::grid::SampleGrid;
use crate::numerical::sampler::sample_fn;
use crate::symbolic::symbolic_engine::Expr;

/// Step used for the numeric derivative track.
pub const DEFAULT_DX: f64 = 1e-5;

/// Central difference of `expr` at a single point.
pub fn derivative_at(expr: &Expr, var: &str, x: f64, dx: f64) -> Result<f64, EvaluationError> {
    let f_x_plus_h = expr.eval_at(var, x + dx)?;
    let f_x_minus_h = expr.eval_at(var, x - dx)?;
    Ok((f_x_plus_h - f_x_minus_h) / (2.0 * dx))
}

/// Central difference of a plain function at every value of `x_values`.
pub fn numerical_derivative<F>(f: F, x_values: &[f64], h: f64) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    x_values
        .iter()
        .map(|&x| (f(x + h) - f(x - h)) / (2.0 * h))
        .collect()
}

/// Central difference of `expr` over the grid, failing like the sampler does
/// when a value is not finite.
pub fn sample_central_difference(
    expr: &Expr,
    var: &str,
    grid: &SampleGrid,
    dx: f64,
) -> Result<Vec<f64>, EvaluationError> {
    let func = expr.lambdify1D(var)?;
    sample_fn(|x| (func(x + dx) - func(x - dx)) / (2.0 * dx), grid.points()).map_err(
        |(x, value)| EvaluationError::NonReal {
            expr: format!("d/d{} {}", var, expr),
            x,
            value,
        },
    )
}
