use crate::error::EvaluationError;
use crate::numerical::grid::SampleGrid;
use crate::symbolic::symbolic_engine::Expr;
use log::debug;

/// Values of `expr` at every grid point.
///
/// Fails with `UnboundSymbol` before evaluating anything when `expr` mentions
/// a variable other than `var`, and with `NonReal` at the first point where
/// the value, or any intermediate value, is NaN or infinite. Nothing partial
/// is returned.
pub fn sample(expr: &Expr, var: &str, grid: &SampleGrid) -> Result<Vec<f64>, EvaluationError> {
    let func = expr.lambdify1D(var)?;
    let values = sample_fn(func, grid.points()).map_err(|(x, value)| EvaluationError::NonReal {
        expr: expr.to_string(),
        x,
        value,
    })?;
    debug!("sampled {} at {} points", expr, values.len());
    Ok(values)
}

/// Applies `f` to every point; on a non-finite value returns the offending
/// `(x, value)` pair.
pub fn sample_fn<F>(f: F, points: &[f64]) -> Result<Vec<f64>, (f64, f64)>
where
    F: Fn(f64) -> f64,
{
    points
        .iter()
        .map(|&x| {
            let value = f(x);
            if value.is_finite() { Ok(value) } else { Err((x, value)) }
        })
        .collect()
}
