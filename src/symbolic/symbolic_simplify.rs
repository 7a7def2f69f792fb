//! # Symbolic Expression Simplification Module
//!
//! Algebraic clean-up applied to every derivative and antiderivative before it
//! is shown in the summary panel or sampled on the grid.
//!
//! ## Simplification Strategy
//!
//! 1. **Constant Folding**: arithmetic on numerical constants is evaluated
//! 2. **Algebraic Identities**: `x + 0 = x`, `x * 1 = x`, `x ** 1 = x`, `-(-x) = x`
//! 3. **Power Rules**: `x**a * x**b = x**(a+b)`, `x**a / x**b = x**(a-b)`
//! 4. **Quotients**: `f*(1/g) = f/g`, `c*(f/g) = (c*f)/g`, `f/(-1) = -f`,
//!    `f/0.5 = 2*f`
//! 5. **Like Terms**: terms of a sum that differ only in their numeric
//!    coefficient are collected, `3*x + 2*x = 5*x`,
//!    `2*exp(x)/x + exp(x)/x = 3*exp(x)/x`, keeping the order in which the
//!    terms first appear. Factor order does not matter: `sin(x)*cos(x)` and
//!    `cos(x)*sin(x)` cancel.
//!
//! Simplification never changes the value of an expression at points where
//! both forms are defined.

use crate::symbolic::symbolic_engine::{Expr, power};
use std::collections::BTreeMap;

impl Expr {
    //___________________________________SIMPLIFICATION____________________________________

    /// One bottom-up rewriting pass.
    pub fn simplify_(&self) -> Expr {
        match self {
            Expr::Var(_) => self.clone(),
            Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a + b), // (a) + (b) = (a + b)
                    (Expr::Const(0.0), _) => rhs,                           // 0 + x = x
                    (_, Expr::Const(0.0)) => lhs,                           // x + 0 = x
                    _ => {
                        let expr = Expr::Add(Box::new(lhs), Box::new(rhs));
                        Self::collect_like_terms(&expr).unwrap_or(expr)
                    }
                }
            }
            Expr::Sub(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a - b), // (a) - (b) = (a - b)
                    (_, Expr::Const(0.0)) => lhs,                           // x - 0 = x
                    (Expr::Const(0.0), _) => {
                        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(rhs)).simplify_()
                    }
                    _ if lhs == rhs => Expr::Const(0.0),
                    _ => {
                        // a - b = a + (-1)*b
                        let neg_rhs =
                            Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(rhs)).simplify_();
                        let add_expr = Expr::Add(Box::new(lhs), Box::new(neg_rhs));
                        Self::collect_like_terms(&add_expr).unwrap_or(add_expr)
                    }
                }
            }
            Expr::Mul(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a * b), // (a) * (b) = (a * b)
                    (Expr::Const(0.0), _) | (_, Expr::Const(0.0)) => Expr::Const(0.0), // 0 * x = 0
                    (Expr::Const(1.0), _) => rhs,                           // 1 * x = x
                    (_, Expr::Const(1.0)) => lhs,                           // x * 1 = x
                    // constants go to the left: x * c = c * x
                    (_, Expr::Const(c)) => {
                        Expr::Mul(Box::new(Expr::Const(*c)), Box::new(lhs)).simplify_()
                    }
                    // x^a * x^b = x^(a+b)
                    (Expr::Pow(base1, exp1), Expr::Pow(base2, exp2)) if base1 == base2 => {
                        let new_exp = Expr::Add(exp1.clone(), exp2.clone()).simplify_();
                        Expr::Pow(base1.clone(), Box::new(new_exp)).simplify_()
                    }
                    (Expr::Var(v1), Expr::Pow(base, exp)) | (Expr::Pow(base, exp), Expr::Var(v1)) => {
                        if let Expr::Var(v2) = base.as_ref() {
                            if v1 == v2 {
                                let new_exp =
                                    Expr::Add(Box::new(Expr::Const(1.0)), exp.clone()).simplify_();
                                return Expr::Pow(Box::new(Expr::Var(v1.clone())), Box::new(new_exp))
                                    .simplify_();
                            }
                        }
                        Expr::Mul(Box::new(lhs), Box::new(rhs))
                    }
                    (Expr::Var(v1), Expr::Var(v2)) if v1 == v2 => {
                        Expr::Pow(Box::new(Expr::Var(v1.clone())), Box::new(Expr::Const(2.0)))
                    }
                    // c2 * (c1 * expr) = (c1 * c2) * expr
                    (Expr::Const(c), Expr::Mul(inner_lhs, inner_rhs)) => {
                        match inner_lhs.as_ref() {
                            Expr::Const(c1) => {
                                Expr::Mul(Box::new(Expr::Const(c * c1)), inner_rhs.clone())
                                    .simplify_()
                            }
                            _ => Expr::Mul(Box::new(lhs), Box::new(rhs)),
                        }
                    }
                    // a * (expr / c) = (a / c) * expr when a/c is whole, (a * expr) / c otherwise
                    (Expr::Const(a), Expr::Div(num, den)) => match den.as_ref() {
                        Expr::Const(c) if *c != 0.0 && (a / c).fract() == 0.0 => {
                            Expr::Mul(Box::new(Expr::Const(a / c)), num.clone()).simplify_()
                        }
                        Expr::Const(_) => Expr::Div(
                            Box::new(Expr::Mul(Box::new(Expr::Const(*a)), num.clone()).simplify_()),
                            den.clone(),
                        ),
                        // a * (f / g) = (a * f) / g
                        _ => Expr::Div(
                            Box::new(Expr::Mul(Box::new(Expr::Const(*a)), num.clone()).simplify_()),
                            den.clone(),
                        )
                        .simplify_(),
                    },
                    // f * (1 / g) = f / g
                    (_, Expr::Div(num, den)) if is_one(num) => {
                        Expr::Div(Box::new(lhs.clone()), den.clone()).simplify_()
                    }
                    (Expr::Div(num, den), _) if is_one(num) => {
                        Expr::Div(Box::new(rhs.clone()), den.clone()).simplify_()
                    }
                    _ => Expr::Mul(Box::new(lhs), Box::new(rhs)),
                }
            }
            Expr::Div(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) if *b != 0.0 => Expr::Const(a / b), // (a) / (b) = (a / b)
                    (Expr::Const(0.0), _) => Expr::Const(0.0), // 0 / x = 0
                    (_, Expr::Const(1.0)) => lhs,              // x / 1 = x
                    // x / c = (1/c) * x when 1/c is whole: x/(-1) = -x, x/0.5 = 2*x
                    (_, Expr::Const(c)) if *c != 0.0 && (1.0 / c).fract() == 0.0 => {
                        Expr::Mul(Box::new(Expr::Const(1.0 / c)), Box::new(lhs.clone())).simplify_()
                    }
                    // x / (-c) = -(x / c)
                    (_, Expr::Const(c)) if *c < 0.0 => Expr::Mul(
                        Box::new(Expr::Const(-1.0)),
                        Box::new(Expr::Div(Box::new(lhs.clone()), Box::new(Expr::Const(-c)))),
                    )
                    .simplify_(),
                    // x^a / x^b = x^(a-b)
                    (Expr::Pow(base1, exp1), Expr::Pow(base2, exp2)) if base1 == base2 => {
                        let new_exp = Expr::Sub(exp1.clone(), exp2.clone()).simplify_();
                        Expr::Pow(base1.clone(), Box::new(new_exp)).simplify_()
                    }
                    (Expr::Var(v1), Expr::Pow(base, exp)) => {
                        if let Expr::Var(v2) = base.as_ref() {
                            if v1 == v2 {
                                let new_exp =
                                    Expr::Sub(Box::new(Expr::Const(1.0)), exp.clone()).simplify_();
                                return Expr::Pow(Box::new(Expr::Var(v1.clone())), Box::new(new_exp))
                                    .simplify_();
                            }
                        }
                        Expr::Div(Box::new(lhs), Box::new(rhs))
                    }
                    (Expr::Pow(base, exp), Expr::Var(v2)) => {
                        if let Expr::Var(v1) = base.as_ref() {
                            if v1 == v2 {
                                let new_exp =
                                    Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0))).simplify_();
                                return Expr::Pow(Box::new(Expr::Var(v1.clone())), Box::new(new_exp))
                                    .simplify_();
                            }
                        }
                        Expr::Div(Box::new(lhs), Box::new(rhs))
                    }
                    (Expr::Var(v1), Expr::Var(v2)) if v1 == v2 => Expr::Const(1.0),
                    // (c1 * expr) / c2 = (c1/c2) * expr, kept as a fraction unless c1/c2 is whole
                    (Expr::Mul(inner_lhs, inner_rhs), Expr::Const(c)) if *c != 0.0 => {
                        match inner_lhs.as_ref() {
                            Expr::Const(c1) if (c1 / c).fract() == 0.0 => {
                                Expr::Mul(Box::new(Expr::Const(c1 / c)), inner_rhs.clone())
                                    .simplify_()
                            }
                            _ => Expr::Div(Box::new(lhs), Box::new(rhs)),
                        }
                    }
                    // expr / (c1 * c2) = expr / (c1*c2)
                    (_, Expr::Mul(inner_lhs, inner_rhs)) => {
                        match (inner_lhs.as_ref(), inner_rhs.as_ref()) {
                            (Expr::Const(c1), Expr::Const(c2)) => {
                                Expr::Div(Box::new(lhs), Box::new(Expr::Const(c1 * c2))).simplify_()
                            }
                            _ => Expr::Div(Box::new(lhs), Box::new(rhs)),
                        }
                    }
                    _ => Expr::Div(Box::new(lhs), Box::new(rhs)),
                }
            }
            Expr::Pow(base, exp) => {
                let base = base.simplify_();
                let exp = exp.simplify_();
                match (&base, &exp) {
                    (Expr::Const(a), Expr::Const(b)) if power(*a, *b).is_finite() => {
                        Expr::Const(power(*a, *b))
                    }
                    (_, Expr::Const(0.0)) => Expr::Const(1.0), // x ^ 0 = 1
                    (_, Expr::Const(1.0)) => base,             // x ^ 1 = x
                    (Expr::Const(1.0), _) => Expr::Const(1.0), // 1 ^ x = 1
                    // (x^a)^b = x^(a*b), only for whole b
                    (Expr::Pow(inner_base, inner_exp), Expr::Const(b)) if b.fract() == 0.0 => {
                        let new_exp = Expr::Mul(inner_exp.clone(), Box::new(exp.clone())).simplify_();
                        Expr::Pow(inner_base.clone(), Box::new(new_exp))
                    }
                    _ => Expr::Pow(Box::new(base), Box::new(exp)),
                }
            }
            Expr::Exp(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(0.0) => Expr::Const(1.0),
                    Expr::Ln(inner) => inner.as_ref().clone(),
                    _ => Expr::Exp(Box::new(expr)),
                }
            }
            Expr::Ln(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(1.0) => Expr::Const(0.0),
                    Expr::Exp(inner) => inner.as_ref().clone(),
                    _ => Expr::Ln(Box::new(expr)),
                }
            } // ln

            Expr::sin(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(0.0) => Expr::Const(0.0),
                    _ => Expr::sin(Box::new(expr)),
                }
            } //sin

            Expr::cos(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(0.0) => Expr::Const(1.0),
                    _ => Expr::cos(Box::new(expr)),
                }
            } //cos
            Expr::tg(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(0.0) => Expr::Const(0.0),
                    _ => Expr::tg(Box::new(expr)),
                }
            } //tg
            Expr::ctg(expr) => Expr::ctg(Box::new(expr.simplify_())),

            Expr::arcsin(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(0.0) => Expr::Const(0.0),
                    _ => Expr::arcsin(Box::new(expr)),
                }
            } //arcsin
            Expr::arccos(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(1.0) => Expr::Const(0.0),
                    _ => Expr::arccos(Box::new(expr)),
                }
            } //arccos
            Expr::arctg(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(0.0) => Expr::Const(0.0),
                    _ => Expr::arctg(Box::new(expr)),
                }
            } //arctg

            Expr::arcctg(expr) => Expr::arcctg(Box::new(expr.simplify_())),
        }
    }

    /// Collects like terms of a sum.
    ///
    /// The sum is flattened into terms and every term is split into a numeric
    /// coefficient and its [`TermShape`]. Coefficients of terms with the same
    /// shape are added and the sum is rebuilt in order of first appearance.
    /// Returns `None` when nothing combines.
    ///
    /// - `3*x + 2*x` → `5*x`
    /// - `x**2 + 2*x**2 - x**2` → `2*x**2`
    /// - `2*sin(x)*cos(x) - 2*cos(x)*sin(x)` → `0`
    /// - `sin(x) + cos(x)` → `None`
    fn collect_like_terms(expr: &Expr) -> Option<Expr> {
        let mut terms = Vec::new();
        flatten_add(expr, &mut terms);
        if terms.len() < 2 {
            return None;
        }

        let collected = collect_add_terms(&terms);
        if collected.len() == terms.len() {
            return None;
        }

        let result = collected
            .into_iter()
            .filter(|term| !term.cancels())
            .map(|term| term.shape.rebuild(term.coeff))
            .reduce(|a, b| Expr::Add(Box::new(a), Box::new(b)));
        Some(result.unwrap_or(Expr::Const(0.0)))
    }

    /// Simplifies until a fixed point is reached (at most a few passes).
    pub fn simplify(&self) -> Expr {
        let mut current = self.simplify_();
        for _ in 0..4 {
            let next = current.simplify_();
            if next == current {
                break;
            }
            current = next;
        }
        current
    }
}

/// A term of a sum without its numeric coefficient.
///
/// `3*x**2*sin(x)/ln(x)` has monomial `{x: 2}`, factors `[sin(x)]`,
/// denominators `[ln(x)]` and coefficient 3. Factors and denominators are
/// compared regardless of their order.
#[derive(Clone, Debug, Default)]
struct TermShape {
    monomial: BTreeMap<String, u32>,
    factors: Vec<Expr>,
    denominators: Vec<Expr>,
}

type ShapeKey = (BTreeMap<String, u32>, Vec<String>, Vec<String>);

impl TermShape {
    fn split(term: &Expr) -> (TermShape, f64) {
        let mut shape = TermShape::default();
        let coeff = shape.absorb(term);
        shape.monomial.retain(|_, exp| *exp > 0);
        (shape, coeff)
    }

    /// Moves the factors of `expr` into the shape and returns their numeric part.
    fn absorb(&mut self, expr: &Expr) -> f64 {
        let mut factors = Vec::new();
        flatten_mul(expr, &mut factors);
        let mut coeff = 1.0;
        for factor in factors {
            match factor {
                Expr::Const(c) => coeff *= c,
                Expr::Var(v) => *self.monomial.entry(v).or_insert(0) += 1,
                Expr::Pow(base, exp) => match (*base, whole_exponent(&exp)) {
                    (Expr::Var(v), Some(n)) => *self.monomial.entry(v).or_insert(0) += n,
                    (base, _) => self.factors.push(Expr::Pow(Box::new(base), exp)),
                },
                Expr::Div(num, den) => {
                    coeff *= self.absorb(&num);
                    match *den {
                        Expr::Const(c) if c != 0.0 => coeff /= c,
                        den => self.denominators.push(den),
                    }
                }
                other => self.factors.push(other),
            }
        }
        coeff
    }

    fn key(&self) -> ShapeKey {
        let sorted = |exprs: &[Expr]| {
            let mut names: Vec<String> = exprs.iter().map(|e| e.to_string()).collect();
            names.sort();
            names
        };
        (
            self.monomial.clone(),
            sorted(self.factors.as_slice()),
            sorted(self.denominators.as_slice()),
        )
    }

    /// `coeff * shape`. A unit coefficient is omitted and a small rational one
    /// is written as a fraction: `{x: 3}`, 2/3 → `2*x**3/3`.
    fn rebuild(&self, coeff: f64) -> Expr {
        let (numer, denom) = as_fraction(coeff).unwrap_or((coeff, 1.0));

        let mut factors = self
            .monomial
            .iter()
            .map(|(var, exp)| {
                let var_expr = Expr::Var(var.clone());
                if *exp == 1 {
                    var_expr
                } else {
                    Expr::Pow(Box::new(var_expr), Box::new(Expr::Const(*exp as f64)))
                }
            })
            .chain(self.factors.iter().cloned());
        let numerator = match factors.next() {
            None => Expr::Const(numer),
            Some(first) if numer == 1.0 => first,
            Some(first) => Expr::Mul(Box::new(Expr::Const(numer)), Box::new(first)),
        };
        let numerator = factors.fold(numerator, |acc, f| Expr::Mul(Box::new(acc), Box::new(f)));

        let mut denominators = self.denominators.iter().cloned();
        let denominator = match denominators.next() {
            None if denom == 1.0 => return numerator,
            None => Expr::Const(denom),
            Some(first) if denom == 1.0 => first,
            Some(first) => Expr::Mul(Box::new(Expr::Const(denom)), Box::new(first)),
        };
        let denominator =
            denominators.fold(denominator, |acc, d| Expr::Mul(Box::new(acc), Box::new(d)));
        Expr::Div(Box::new(numerator), Box::new(denominator))
    }
}

/// `c` as `p/q` with `q <= 64`, up to rounding, when it is one.
fn as_fraction(c: f64) -> Option<(f64, f64)> {
    (1..=64).map(f64::from).find_map(|q| {
        let p = (c * q).round();
        (p != 0.0 && (c * q - p).abs() <= 1e-12 * p.abs()).then_some((p, q))
    })
}

fn is_one(expr: &Expr) -> bool {
    matches!(expr, Expr::Const(c) if *c == 1.0)
}

/// Flattens nested Add/Sub into a list of terms, distributing `-1 * (a + b)`.
///
/// - `a - b` → `[a, -1*b]`
/// - `(a + b) - (c + d)` → `[a, b, -1*c, -1*d]`
fn flatten_add(expr: &Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::Add(a, b) => {
            flatten_add(a, out);
            flatten_add(b, out);
        }
        Expr::Sub(a, b) => {
            flatten_add(a, out);
            let neg_b = Expr::Mul(Box::new(Expr::Const(-1.0)), b.clone());
            flatten_add(&neg_b, out);
        }
        Expr::Mul(lhs, rhs) if matches!(lhs.as_ref(), Expr::Const(c) if *c == -1.0) => {
            match rhs.as_ref() {
                Expr::Add(a, b) | Expr::Sub(a, b) => {
                    let neg_a = Expr::Mul(Box::new(Expr::Const(-1.0)), a.clone());
                    let b = if matches!(rhs.as_ref(), Expr::Sub(_, _)) {
                        b.as_ref().clone()
                    } else {
                        Expr::Mul(Box::new(Expr::Const(-1.0)), b.clone())
                    };
                    flatten_add(&neg_a, out);
                    flatten_add(&b, out);
                }
                _ => out.push(expr.clone()),
            }
        }
        _ => out.push(expr.clone()),
    }
}

/// Flattens nested multiplication: `(a * b) * c` → `[a, b, c]`.
fn flatten_mul(expr: &Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::Mul(a, b) => {
            flatten_mul(a, out);
            flatten_mul(b, out);
        }
        _ => out.push(expr.clone()),
    }
}

/// Terms of one shape summed up.
struct CollectedTerm {
    shape: TermShape,
    key: ShapeKey,
    coeff: f64,
    /// largest absolute coefficient that went into `coeff`
    scale: f64,
}

impl CollectedTerm {
    /// Exact cancellation, or a rounding residue of one: `0.1 + 0.2 - 0.3`.
    fn cancels(&self) -> bool {
        self.coeff.abs() <= 1e-12 * self.scale
    }
}

/// Sums coefficients per term shape, in order of first appearance.
fn collect_add_terms(terms: &[Expr]) -> Vec<CollectedTerm> {
    let mut collected: Vec<CollectedTerm> = Vec::new();
    for term in terms {
        let (shape, coeff) = TermShape::split(term);
        let key = shape.key();
        match collected.iter_mut().find(|seen| seen.key == key) {
            Some(seen) => {
                seen.coeff += coeff;
                seen.scale = seen.scale.max(coeff.abs());
            }
            None => collected.push(CollectedTerm {
                shape,
                key,
                coeff,
                scale: coeff.abs(),
            }),
        }
    }
    collected
}

fn whole_exponent(exp: &Expr) -> Option<u32> {
    match exp {
        Expr::Const(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= u32::MAX as f64 => Some(*n as u32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::parse_expr::parse;
    use approx::assert_relative_eq;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    #[test]
    fn test_constant_folding() {
        let expr = Expr::Const(2.0) * Expr::Const(3.0) + Expr::Const(1.0);
        assert_eq!(expr.simplify(), Expr::Const(7.0));
        let expr = Expr::Const(2.0).pow(Expr::Const(3.0));
        assert_eq!(expr.simplify(), Expr::Const(8.0));
    }

    #[test]
    fn test_identities() {
        assert_eq!((x() + Expr::Const(0.0)).simplify(), x());
        assert_eq!((x() * Expr::Const(1.0)).simplify(), x());
        assert_eq!((x() * Expr::Const(0.0)).simplify(), Expr::Const(0.0));
        assert_eq!(x().pow(Expr::Const(1.0)).simplify(), x());
        assert_eq!(x().pow(Expr::Const(0.0)).simplify(), Expr::Const(1.0));
        assert_eq!((x() - x()).simplify(), Expr::Const(0.0));
        assert_eq!(x().ln().exp().simplify(), x());
    }

    #[test]
    fn test_collect_like_terms() {
        let expr = Expr::Const(3.0) * x() + Expr::Const(2.0) * x();
        assert_eq!(expr.simplify(), Expr::Const(5.0) * x());

        let x2 = || x().pow(Expr::Const(2.0));
        let expr = x2() + Expr::Const(2.0) * x2() - x2();
        assert_eq!(expr.simplify(), Expr::Const(2.0) * x2());
    }

    #[test]
    fn test_collection_keeps_first_appearance_order() {
        let expr = Expr::Const(4.0) * x() + Expr::Const(1.0) + x() + Expr::Const(3.0);
        assert_eq!(expr.simplify().to_string(), "5*x + 4");
    }

    #[test]
    fn test_negative_exponents_collect_as_factors() {
        let inv = || x().pow(Expr::Const(-1.0));
        let expr = inv() + inv();
        assert_eq!(expr.simplify().to_string(), "2*x**(-1)");
    }

    fn simplified(text: &str) -> String {
        parse(text).unwrap().simplify().to_string()
    }

    #[test]
    fn test_collect_non_polynomial_terms() {
        assert_eq!(simplified("2*exp(2*x)*(1/x) + 2*exp(2*x)*(1/x)"), "4*exp(2*x)/x");
        assert_eq!(simplified("sin(x) + x + 3*sin(x)"), "4*sin(x) + x");
        assert_eq!(simplified("x**2 + 2*sin(x)*cos(x) - 2*cos(x)*sin(x)"), "x**2");
        assert_eq!(simplified("ln(x)/3 + ln(x)/3"), "2*ln(x)/3");
    }

    #[test]
    fn test_rounding_residue_cancels() {
        assert_eq!(simplified("0.1*sin(x) + 0.2*sin(x) - 0.3*sin(x) + x"), "x");
        assert_eq!(simplified("x/3 + x/3 + x/3"), "x");
    }

    #[test]
    fn test_quotient_rewrites() {
        assert_eq!(simplified("x**(-1)/(-1)"), "-x**(-1)");
        assert_eq!(simplified("sin(x)/0.5"), "2*sin(x)");
        assert_eq!(simplified("x/(-3)"), "-x/3");
        assert_eq!(simplified("cos(x)*(1/x)"), "cos(x)/x");
        assert_eq!(simplified("-(-2*x/(1 + x**2)**2)"), "2*x/(1 + x**2)**2");
    }

    #[test]
    fn test_negative_term_prints_as_subtraction() {
        assert_eq!(
            simplified("x*atan(x) - ln(1 + x**2)/2"),
            "x*atan(x) - ln(1 + x**2)/2"
        );
        assert_eq!(simplified("exp(x) - 3*x*sin(x)"), "exp(x) - 3*x*sin(x)");
    }

    #[test]
    fn test_simplification_keeps_values() {
        for text in [
            "2*exp(2*x)*(1/x) + 2*exp(2*x)*(1/x) - x",
            "x**2 + 2*sin(x)*cos(x) - 2*cos(x)*sin(x) + sin(x)**2/x",
            "-(-2*x/(1 + x**2)**2) + 3*(x/(x + 1))",
            "x/(-3) + x/0.5 + ln(x)/3",
        ] {
            let expr = parse(text).unwrap();
            let simple = expr.simplify();
            for x in [0.3, 1.0, 2.5] {
                assert_relative_eq!(
                    simple.eval_at("x", x).unwrap(),
                    expr.eval_at("x", x).unwrap(),
                    epsilon = 1e-12,
                    max_relative = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_power_rules() {
        let expr = x() * x();
        assert_eq!(expr.simplify(), x().pow(Expr::Const(2.0)));
        let expr = x().pow(Expr::Const(3.0)) / x();
        assert_eq!(expr.simplify(), x().pow(Expr::Const(2.0)));
        let expr = x() * x().pow(Expr::Const(2.0));
        assert_eq!(expr.simplify(), x().pow(Expr::Const(3.0)));
    }

    #[test]
    fn test_constant_times_quotient() {
        let expr = Expr::Const(4.0) * (x() / Expr::Const(2.0));
        assert_eq!(expr.simplify(), Expr::Const(2.0) * x());
    }

    #[test]
    fn test_fractional_coefficient_stays_a_fraction() {
        let expr = Expr::Const(2.0) * (x().pow(Expr::Const(3.0)) / Expr::Const(3.0));
        assert_eq!(expr.simplify().to_string(), "2*x**3/3");
    }

    #[test]
    fn test_double_negation() {
        let expr = -(-x());
        assert_eq!(expr.simplify(), x());
    }

    #[test]
    fn test_non_polynomial_untouched() {
        let expr = Expr::sin(x().boxed()) + Expr::cos(x().boxed());
        assert_eq!(expr.simplify(), expr);
    }
}
