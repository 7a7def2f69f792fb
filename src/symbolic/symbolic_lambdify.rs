//! LAMBDIFICATION - converting symbolic expressions into executable closures.
//!
//! The sampler evaluates every curve at a few hundred grid points; walking the
//! tree once and composing closures avoids re-substituting the variable at
//! each point.

use crate::error::EvaluationError;
use crate::symbolic::symbolic_engine::{Expr, finite_or_nan, power};
use std::f64::consts::PI;

/// Compiled function of one real variable.
pub type Func1D = Box<dyn Fn(f64) -> f64 + Send + Sync>;

impl Expr {
    /// Converts a single-variable symbolic expression into a Rust closure.
    ///
    /// Fails with `UnboundSymbol` when the expression mentions any variable
    /// other than `var`. The closure itself never fails: a domain error, a
    /// zero denominator or an overflow anywhere in the tree makes it return
    /// NaN, and the caller reports it.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Expr::Var("x".to_string());
    /// let f = x.pow(Expr::Const(2.0)); // x^2
    /// let func = f.lambdify1D("x").unwrap();
    /// assert_eq!(func(3.0), 9.0);
    /// ```
    pub fn lambdify1D(&self, var: &str) -> Result<Func1D, EvaluationError> {
        self.check_bound_to(var)?;
        Ok(self.compile1D())
    }

    fn compile1D(&self) -> Func1D {
        match self {
            Expr::Var(_) => Box::new(|x| x),
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| val)
            }
            Expr::Add(lhs, rhs) => binary(lhs, rhs, |a, b| a + b),
            Expr::Sub(lhs, rhs) => binary(lhs, rhs, |a, b| a - b),
            Expr::Mul(lhs, rhs) => binary(lhs, rhs, |a, b| a * b),
            Expr::Div(lhs, rhs) => binary(lhs, rhs, |a, b| a / b),
            Expr::Pow(base, exp) => match exp.as_ref() {
                Expr::Const(n) => {
                    let n = *n;
                    unary(base, move |b| power(b, n))
                }
                _ => binary(base, exp, power),
            },
            Expr::Exp(expr) => unary(expr, f64::exp),
            Expr::Ln(expr) => unary(expr, f64::ln),
            Expr::sin(expr) => unary(expr, f64::sin),
            Expr::cos(expr) => unary(expr, f64::cos),
            Expr::tg(expr) => unary(expr, f64::tan),
            Expr::ctg(expr) => unary(expr, |v| 1.0 / v.tan()),
            Expr::arcsin(expr) => unary(expr, f64::asin),
            Expr::arccos(expr) => unary(expr, f64::acos),
            Expr::arctg(expr) => unary(expr, f64::atan),
            Expr::arcctg(expr) => unary(expr, |v| PI / 2.0 - v.atan()),
        } // end of match
    }
}

/// `op` applied to the compiled argument. A non-finite result turns into NaN
/// so that an enclosing node cannot map it back to a finite value.
fn unary<F>(arg: &Expr, op: F) -> Func1D
where
    F: Fn(f64) -> f64 + Send + Sync + 'static,
{
    let arg_fn = arg.compile1D();
    Box::new(move |x| finite_or_nan(op(arg_fn(x))))
}

fn binary<F>(lhs: &Expr, rhs: &Expr, op: F) -> Func1D
where
    F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
{
    let lhs_fn = lhs.compile1D();
    let rhs_fn = rhs.compile1D();
    Box::new(move |x| finite_or_nan(op(lhs_fn(x), rhs_fn(x))))
}
