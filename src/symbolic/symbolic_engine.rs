//! # Symbolic Engine Module
//!
//! Core expression tree of the algebra collaborator. A function typed by the
//! user is parsed into an [`Expr`], differentiated, integrated and simplified
//! symbolically, then evaluated numerically at grid points.
//!
//! ## Main structures and methods
//! - [`Expr`]: recursive tree over variables, constants, arithmetic and
//!   elementary functions
//! - `set_variable(var, value)`: substitute a number for a variable
//! - `free_variables()`: every variable name the tree mentions
//! - `eval_to_float()`: numeric value of a closed expression
//!
//! Display prints the tree in the same notation the parser accepts
//! (`**` for powers, minimal parentheses), so a printed derivative can be
//! pasted back into the function field.

#![allow(non_camel_case_types)]

use crate::error::EvaluationError;
use std::f64::consts::PI;
use std::fmt;

/// Symbolic expression tree.
///
/// # Examples
/// ```rust, ignore
/// use graphique::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = x.clone() * x + Expr::Const(2.0);
/// assert_eq!(expr.to_string(), "x*x + 2");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x")
    Var(String),
    /// Numerical constant value
    Const(f64),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ** exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm
    Ln(Box<Expr>),
    sin(Box<Expr>),
    cos(Box<Expr>),
    /// Tangent, printed as `tan`
    tg(Box<Expr>),
    /// Cotangent, printed as `cot`
    ctg(Box<Expr>),
    arcsin(Box<Expr>),
    arccos(Box<Expr>),
    /// Arctangent, printed as `atan`
    arctg(Box<Expr>),
    /// Arccotangent, printed as `acot`
    arcctg(Box<Expr>),
}

// binding strength used by Display
const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_NEG: u8 = 3;
const PREC_POW: u8 = 4;
const PREC_ATOM: u8 = 5;

/// Formats a constant without a trailing `.0` for integral values.
pub(crate) fn format_number(val: f64) -> String {
    if val.is_finite() && val.fract() == 0.0 && val.abs() < 1e15 {
        format!("{}", val as i64)
    } else {
        format!("{}", val)
    }
}

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Const(c) if *c < 0.0 => PREC_NEG,
            Expr::Var(_) | Expr::Const(_) => PREC_ATOM,
            Expr::Add(_, _) | Expr::Sub(_, _) => PREC_ADD,
            Expr::Mul(lhs, _) if matches!(lhs.as_ref(), Expr::Const(c) if *c == -1.0) => PREC_NEG,
            Expr::Mul(_, _) | Expr::Div(_, _) => PREC_MUL,
            Expr::Pow(_, _) => PREC_POW,
            _ => PREC_ATOM,
        }
    }

    /// Returns the positive counterpart of a term that prints with a leading
    /// minus sign, so that `a + (-b)` can be shown as `a - b`. The sign may
    /// sit on the leftmost factor of a product or of a numerator:
    /// `-2*x*sin(x)`, `-ln(x)/2`.
    fn negated_term(&self) -> Option<Expr> {
        match self {
            Expr::Const(c) if *c < 0.0 => Some(Expr::Const(-c)),
            Expr::Mul(lhs, rhs) => match lhs.as_ref() {
                Expr::Const(c) if *c == -1.0 => Some(rhs.as_ref().clone()),
                _ => lhs
                    .negated_term()
                    .map(|positive| Expr::Mul(Box::new(positive), rhs.clone())),
            },
            Expr::Div(lhs, rhs) => lhs
                .negated_term()
                .map(|positive| Expr::Div(Box::new(positive), rhs.clone())),
            _ => None,
        }
    }

    /// Operands of nested additions, left to right.
    fn sum_terms<'a>(&'a self, out: &mut Vec<&'a Expr>) {
        match self {
            Expr::Add(lhs, rhs) => {
                lhs.sum_terms(out);
                rhs.sum_terms(out);
            }
            _ => out.push(self),
        }
    }

    fn fmt_prec(&self, f: &mut fmt::Formatter, min_prec: u8) -> fmt::Result {
        let needs_parens = self.precedence() < min_prec;
        if needs_parens {
            write!(f, "(")?;
        }
        match self {
            Expr::Var(name) => write!(f, "{}", name)?,
            Expr::Const(val) => write!(f, "{}", format_number(*val))?,
            Expr::Add(_, _) => {
                let mut terms = Vec::new();
                self.sum_terms(&mut terms);
                for (i, term) in terms.into_iter().enumerate() {
                    match term.negated_term() {
                        Some(positive) if i > 0 => {
                            write!(f, " - ")?;
                            positive.fmt_prec(f, PREC_MUL)?;
                        }
                        _ => {
                            if i > 0 {
                                write!(f, " + ")?;
                            }
                            term.fmt_prec(f, PREC_ADD)?;
                        }
                    }
                }
            }
            Expr::Sub(lhs, rhs) => {
                lhs.fmt_prec(f, PREC_ADD)?;
                write!(f, " - ")?;
                rhs.fmt_prec(f, PREC_MUL)?;
            }
            Expr::Mul(lhs, rhs) if matches!(lhs.as_ref(), Expr::Const(c) if *c == -1.0) => {
                write!(f, "-")?;
                rhs.fmt_prec(f, PREC_POW)?;
            }
            Expr::Mul(lhs, rhs) => {
                lhs.fmt_prec(f, PREC_MUL)?;
                write!(f, "*")?;
                rhs.fmt_prec(f, PREC_POW)?;
            }
            Expr::Div(lhs, rhs) => {
                lhs.fmt_prec(f, PREC_MUL)?;
                write!(f, "/")?;
                rhs.fmt_prec(f, PREC_POW)?;
            }
            Expr::Pow(base, exp) => {
                base.fmt_prec(f, PREC_ATOM)?;
                write!(f, "**")?;
                exp.fmt_prec(f, PREC_POW)?;
            }
            Expr::Exp(expr) => write!(f, "exp({})", expr)?,
            Expr::Ln(expr) => write!(f, "ln({})", expr)?,
            Expr::sin(expr) => write!(f, "sin({})", expr)?,
            Expr::cos(expr) => write!(f, "cos({})", expr)?,
            Expr::tg(expr) => write!(f, "tan({})", expr)?,
            Expr::ctg(expr) => write!(f, "cot({})", expr)?,
            Expr::arcsin(expr) => write!(f, "asin({})", expr)?,
            Expr::arccos(expr) => write!(f, "acos({})", expr)?,
            Expr::arctg(expr) => write!(f, "atan({})", expr)?,
            Expr::arcctg(expr) => write!(f, "acot({})", expr)?,
        }
        if needs_parens {
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Pretty printing in parser-compatible notation.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_prec(f, 0)
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// Applies `f` to every direct child and rebuilds the node.
    fn map_children(&self, f: &impl Fn(&Expr) -> Expr) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(f(lhs)), Box::new(f(rhs))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(f(lhs)), Box::new(f(rhs))),
            Expr::Mul(lhs, rhs) => Expr::Mul(Box::new(f(lhs)), Box::new(f(rhs))),
            Expr::Div(lhs, rhs) => Expr::Div(Box::new(f(lhs)), Box::new(f(rhs))),
            Expr::Pow(base, exp) => Expr::Pow(Box::new(f(base)), Box::new(f(exp))),
            Expr::Exp(expr) => Expr::Exp(Box::new(f(expr))),
            Expr::Ln(expr) => Expr::Ln(Box::new(f(expr))),
            Expr::sin(expr) => Expr::sin(Box::new(f(expr))),
            Expr::cos(expr) => Expr::cos(Box::new(f(expr))),
            Expr::tg(expr) => Expr::tg(Box::new(f(expr))),
            Expr::ctg(expr) => Expr::ctg(Box::new(f(expr))),
            Expr::arcsin(expr) => Expr::arcsin(Box::new(f(expr))),
            Expr::arccos(expr) => Expr::arccos(Box::new(f(expr))),
            Expr::arctg(expr) => Expr::arctg(Box::new(f(expr))),
            Expr::arcctg(expr) => Expr::arcctg(Box::new(f(expr))),
        }
    }

    /// Substitutes a variable with a constant value throughout the expression.
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        match self {
            Expr::Var(name) if name == var => Expr::Const(value),
            _ => self.map_children(&|child| child.set_variable(var, value)),
        }
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => lhs.contains_variable(var_name) || rhs.contains_variable(var_name),
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tg(expr)
            | Expr::ctg(expr)
            | Expr::arcsin(expr)
            | Expr::arccos(expr)
            | Expr::arctg(expr)
            | Expr::arcctg(expr) => expr.contains_variable(var_name),
        }
    }

    /// Sorted, deduplicated names of all variables in the expression.
    pub fn free_variables(&self) -> Vec<String> {
        fn collect(expr: &Expr, out: &mut Vec<String>) {
            match expr {
                Expr::Var(name) => out.push(name.clone()),
                Expr::Const(_) => {}
                Expr::Add(lhs, rhs)
                | Expr::Sub(lhs, rhs)
                | Expr::Mul(lhs, rhs)
                | Expr::Div(lhs, rhs)
                | Expr::Pow(lhs, rhs) => {
                    collect(lhs, out);
                    collect(rhs, out);
                }
                Expr::Exp(inner)
                | Expr::Ln(inner)
                | Expr::sin(inner)
                | Expr::cos(inner)
                | Expr::tg(inner)
                | Expr::ctg(inner)
                | Expr::arcsin(inner)
                | Expr::arccos(inner)
                | Expr::arctg(inner)
                | Expr::arcctg(inner) => collect(inner, out),
            }
        }
        let mut vars = Vec::new();
        collect(self, &mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    /// Fails with `UnboundSymbol` if the expression mentions any variable
    /// other than `var`.
    pub fn check_bound_to(&self, var: &str) -> Result<(), EvaluationError> {
        match self.free_variables().into_iter().find(|name| name != var) {
            Some(symbol) => Err(EvaluationError::UnboundSymbol { symbol }),
            None => Ok(()),
        }
    }

    /// Numeric value of an expression with no free variables.
    ///
    /// Fails on the first variable met, or when the result is NaN or infinite.
    pub fn eval_to_float(&self) -> Result<f64, EvaluationError> {
        let value = self.eval_raw()?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvaluationError::NotFinite {
                expr: self.to_string(),
                value,
            })
        }
    }

    /// `set_variable` followed by `eval_to_float`, reporting the point on failure.
    pub fn eval_at(&self, var: &str, x: f64) -> Result<f64, EvaluationError> {
        self.set_variable(var, x)
            .eval_to_float()
            .map_err(|e| match e {
                EvaluationError::NotFinite { value, .. } => EvaluationError::NonReal {
                    expr: self.to_string(),
                    x,
                    value,
                },
                other => other,
            })
    }

    fn eval_raw(&self) -> Result<f64, EvaluationError> {
        let value = match self {
            Expr::Var(name) => {
                return Err(EvaluationError::UnboundSymbol {
                    symbol: name.clone(),
                });
            }
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => lhs.eval_raw()? + rhs.eval_raw()?,
            Expr::Sub(lhs, rhs) => lhs.eval_raw()? - rhs.eval_raw()?,
            Expr::Mul(lhs, rhs) => lhs.eval_raw()? * rhs.eval_raw()?,
            Expr::Div(lhs, rhs) => lhs.eval_raw()? / rhs.eval_raw()?,
            Expr::Pow(base, exp) => power(base.eval_raw()?, exp.eval_raw()?),
            Expr::Exp(expr) => expr.eval_raw()?.exp(),
            Expr::Ln(expr) => expr.eval_raw()?.ln(),
            Expr::sin(expr) => expr.eval_raw()?.sin(),
            Expr::cos(expr) => expr.eval_raw()?.cos(),
            Expr::tg(expr) => expr.eval_raw()?.tan(),
            Expr::ctg(expr) => 1.0 / expr.eval_raw()?.tan(),
            Expr::arcsin(expr) => expr.eval_raw()?.asin(),
            Expr::arccos(expr) => expr.eval_raw()?.acos(),
            Expr::arctg(expr) => expr.eval_raw()?.atan(),
            Expr::arcctg(expr) => PI / 2.0 - expr.eval_raw()?.atan(),
        };
        Ok(finite_or_nan(value))
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Checks if expression is exactly zero (constant 0.0).
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }
}

/// Non-finite node values (a zero denominator, a pole, an overflow) become
/// NaN, so they poison every enclosing node instead of being absorbed by it,
/// as `atan(1/0)` or `exp(-1/0)` would be.
pub(crate) fn finite_or_nan(value: f64) -> f64 {
    if value.is_finite() { value } else { f64::NAN }
}

/// Real power with integer exponents taken through `powi`, so that negative
/// bases with whole exponents stay real. NaN in, NaN out: `powi(NaN, 0)` is 1.
pub(crate) fn power(base: f64, exp: f64) -> f64 {
    if base.is_nan() || exp.is_nan() {
        f64::NAN
    } else if exp.fract() == 0.0 && exp.abs() <= i32::MAX as f64 {
        base.powi(exp as i32)
    } else {
        base.powf(exp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    #[test]
    fn test_display_minimal_parentheses() {
        let expr = Expr::Const(2.0) * x().pow(Expr::Const(2.0)) + Expr::Const(4.0) * x() + Expr::Const(1.0);
        assert_eq!(expr.to_string(), "2*x**2 + 4*x + 1");

        let expr = (x() + Expr::Const(1.0)) * (x() - Expr::Const(1.0));
        assert_eq!(expr.to_string(), "(x + 1)*(x - 1)");

        let expr = x() / (x() * Expr::Const(3.0));
        assert_eq!(expr.to_string(), "x/(x*3)");
    }

    #[test]
    fn test_display_negative_terms() {
        let expr = Expr::Add(Box::new(x()), Box::new(Expr::Const(-4.0)));
        assert_eq!(expr.to_string(), "x - 4");

        let expr = Expr::Add(
            Box::new(x().pow(Expr::Const(2.0))),
            Box::new(Expr::Mul(Box::new(Expr::Const(-3.0)), Box::new(x()))),
        );
        assert_eq!(expr.to_string(), "x**2 - 3*x");

        let expr = -Expr::sin(x().boxed());
        assert_eq!(expr.to_string(), "-sin(x)");

        let expr = Expr::Const(-2.0).pow(x());
        assert_eq!(expr.to_string(), "(-2)**x");

        let expr = x().pow(Expr::Const(-1.0));
        assert_eq!(expr.to_string(), "x**(-1)");

        // negative leading factor deep in a product or a numerator
        let neg_product = Expr::Mul(
            Box::new(Expr::Mul(Box::new(Expr::Const(-2.0)), Box::new(x()))),
            Box::new(Expr::sin(x().boxed())),
        );
        let expr = Expr::Add(Box::new(x().exp()), Box::new(neg_product));
        assert_eq!(expr.to_string(), "exp(x) - 2*x*sin(x)");
        let neg_quotient = Expr::Div(Box::new(-x().ln()), Box::new(Expr::Const(2.0)));
        let expr = Expr::Add(Box::new(x()), Box::new(neg_quotient));
        assert_eq!(expr.to_string(), "x - ln(x)/2");

        // a right-nested sum prints flat
        let expr = Expr::Add(
            Box::new(x()),
            Box::new(Expr::Add(Box::new(-Expr::sin(x().boxed())), Box::new(Expr::Const(1.0)))),
        );
        assert_eq!(expr.to_string(), "x - sin(x) + 1");
    }

    #[test]
    fn test_display_functions() {
        let expr = Expr::tg(Box::new(x())) + Expr::arctg(Box::new(x())) + x().exp().ln();
        assert_eq!(expr.to_string(), "tan(x) + atan(x) + ln(exp(x))");
        assert_eq!(Expr::Const(0.5).to_string(), "0.5");
    }

    #[test]
    fn test_set_variable_and_eval() {
        let expr = Expr::Const(3.0) * x().pow(Expr::Const(2.0)) - x();
        let value = expr.set_variable("x", 2.0).eval_to_float().unwrap();
        assert_relative_eq!(value, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_eval_unbound_symbol() {
        let expr = x() + Expr::Var("y".to_string());
        let err = expr.set_variable("x", 1.0).eval_to_float().unwrap_err();
        assert_eq!(
            err,
            EvaluationError::UnboundSymbol {
                symbol: "y".to_string()
            }
        );
        assert!(expr.check_bound_to("x").is_err());
        assert!(x().check_bound_to("x").is_ok());
    }

    #[test]
    fn test_eval_at_reports_point() {
        let expr = Expr::Const(1.0) / x();
        match expr.eval_at("x", 0.0) {
            Err(EvaluationError::NonReal { x, .. }) => assert_eq!(x, 0.0),
            other => panic!("expected NonReal, got {:?}", other),
        }
        let expr = x().ln();
        assert!(expr.eval_at("x", -1.0).is_err());
    }

    #[test]
    fn test_eval_inner_pole_is_not_absorbed() {
        // atan(±inf) and exp(-inf) are finite, the pole inside must still fail
        for text in ["atan(1/x)", "exp(-1/x**2)", "atan(cot(x))"] {
            let expr = crate::symbolic::parse_expr::parse(text).unwrap();
            assert!(
                matches!(expr.eval_at("x", 0.0), Err(EvaluationError::NonReal { x, .. }) if x == 0.0),
                "{}",
                text
            );
            assert!(expr.eval_at("x", 0.5).is_ok(), "{}", text);
        }
    }

    #[test]
    fn test_power_of_nan_stays_nan() {
        assert!(power(f64::NAN, 0.0).is_nan());
        assert!(power(1.0, f64::NAN).is_nan());
        assert_eq!(power(-2.0, 3.0), -8.0);
    }

    #[test]
    fn test_negative_base_integer_power() {
        let expr = x().pow(Expr::Const(3.0));
        assert_relative_eq!(expr.eval_at("x", -2.0).unwrap(), -8.0);
    }

    #[test]
    fn test_free_variables_sorted() {
        let expr = Expr::Var("y".to_string()) * x() + Expr::sin(x().boxed());
        assert_eq!(expr.free_variables(), vec!["x".to_string(), "y".to_string()]);
    }
}
