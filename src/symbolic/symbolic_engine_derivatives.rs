//! # Symbolic Engine Derivatives Module
//!
//! Analytical differentiation of [`Expr`] trees and the helpers the plot
//! pipeline builds on it.
//!
//! ## Key Methods
//! - `diff(var)` - analytical derivative with respect to `var`
//! - `n_th_derivative1D(var, n)` - `n`-fold derivative, simplified after each step
//! - `derivative_chain(var, order)` - orders `1..=order`, each one the
//!   derivative of the previous one
//! - `compare_num1D(...)` - checks the analytical derivative against a
//!   central difference on a grid

use crate::error::EvaluationError;
use crate::numerical::differentiation::numerical_derivative;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{linspace, norm};

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// - Power rule: d/dx(u^n) = n*u^(n-1)*u' for a constant exponent,
    ///   d/dx(a^v) = a^v*ln(a)*v' for a constant base, the general rule
    ///   u^v*(v'*ln(u) + v*u'/u) otherwise
    /// - Product rule: d/dx(f*g) = f'*g + f*g'
    /// - Quotient rule: d/dx(f/g) = (f'*g - g'*f)/g^2
    /// - Chain rule for every elementary function
    ///
    /// The result is not simplified.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Expr::Var("x".to_string());
    /// let f = x.clone().pow(Expr::Const(2.0)); // x^2
    /// let df_dx = f.diff("x").simplify(); // 2*x
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(Box::new(rhs.diff(var)), lhs.clone())),
                )),
                Box::new(Expr::Pow(rhs.clone(), Box::new(Expr::Const(2.0)))),
            ),
            Expr::Pow(base, exp) => match (base.contains_variable(var), exp.as_ref()) {
                (_, Expr::Const(n)) => Expr::Mul(
                    Box::new(Expr::Mul(
                        Box::new(Expr::Const(*n)),
                        Box::new(Expr::Pow(base.clone(), Box::new(Expr::Const(n - 1.0)))),
                    )),
                    Box::new(base.diff(var)),
                ),
                (false, _) => Expr::Mul(
                    Box::new(Expr::Mul(
                        Box::new(self.clone()),
                        Box::new(Expr::Ln(base.clone())),
                    )),
                    Box::new(exp.diff(var)),
                ),
                (true, _) => Expr::Mul(
                    Box::new(self.clone()),
                    Box::new(Expr::Add(
                        Box::new(Expr::Mul(
                            Box::new(exp.diff(var)),
                            Box::new(Expr::Ln(base.clone())),
                        )),
                        Box::new(Expr::Div(
                            Box::new(Expr::Mul(exp.clone(), Box::new(base.diff(var)))),
                            base.clone(),
                        )),
                    )),
                ),
            },
            Expr::Exp(expr) => {
                Expr::Mul(Box::new(Expr::Exp(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::Ln(expr) => Expr::Div(Box::new(expr.diff(var)), expr.clone()),
            Expr::sin(expr) => {
                Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::sin(expr.clone())),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::tg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(
                    Box::new(Expr::cos(expr.clone())),
                    Box::new(Expr::Const(2.0)),
                )),
            ),
            Expr::ctg(expr) => Expr::Mul(
                Box::new(Expr::Const(-1.0)),
                Box::new(Expr::Div(
                    Box::new(expr.diff(var)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::sin(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
            ),
            Expr::arcsin(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arccos(expr) => Expr::Mul(
                Box::new(Expr::Const(-1.0)),
                Box::new(Expr::Div(
                    Box::new(expr.diff(var)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::Sub(
                            Box::new(Expr::Const(1.0)),
                            Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                        )),
                        Box::new(Expr::Const(0.5)),
                    )),
                )),
            ),
            Expr::arctg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
            Expr::arcctg(expr) => Expr::Mul(
                Box::new(Expr::Const(-1.0)),
                Box::new(Expr::Div(
                    Box::new(expr.diff(var)),
                    Box::new(Expr::Add(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                )),
            ),
        }
    } // end of diff

    /// `n`-th derivative, simplified after every step. `n = 0` returns the
    /// simplified expression itself.
    pub fn n_th_derivative1D(&self, var_name: &str, n: usize) -> Expr {
        let mut expr = self.simplify();
        for _ in 0..n {
            expr = expr.diff(var_name).simplify();
        }
        expr
    }

    /// Derivatives of orders `1..=order`, element `k-1` being the `k`-th
    /// derivative. Each order differentiates the previous one.
    pub fn derivative_chain(&self, var_name: &str, order: usize) -> Vec<Expr> {
        let mut chain = Vec::with_capacity(order);
        let mut current = self.simplify();
        for _ in 0..order {
            current = current.diff(var_name).simplify();
            chain.push(current.clone());
        }
        chain
    }

    /// Compares the analytical derivative with a central difference on
    /// `num_values` points of `[start, end]`. Returns the RMS distance and
    /// whether it is below `max_norm`.
    pub fn compare_num1D(
        &self,
        var: &str,
        start: f64,
        end: f64,
        num_values: usize,
        max_norm: f64,
    ) -> Result<(f64, bool), EvaluationError> {
        if num_values < 2 {
            return Err(EvaluationError::TooFewPoints { count: num_values });
        }
        let domain = linspace(start, end, num_values);
        let analytical_fn = self.diff(var).simplify().lambdify1D(var)?;
        let analytical_derivative: Vec<f64> = domain.iter().map(|&x| analytical_fn(x)).collect();

        let function = self.lambdify1D(var)?;
        let step = 1e-4 * (end - start) / (num_values as f64 - 1.0);
        let numerical = numerical_derivative(&function, &domain, step);

        let norma_val = norm(&analytical_derivative, &numerical)
            .ok_or(EvaluationError::TooFewPoints { count: num_values })?;
        Ok((norma_val, norma_val < max_norm))
    }
}
