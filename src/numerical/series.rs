//! The plot pipeline: one expression in, every numeric curve and the symbolic
//! summary out.
//!
//! Orders `1..=K` of the derivative come from repeated symbolic
//! differentiation, each sampled on its own. The integral curve is the
//! cumulative trapezoid of the sampled function, so it exists even when no
//! closed-form antiderivative is known.

use crate::error::VisualizerError;
use crate::numerical::differentiation::{DEFAULT_DX, sample_central_difference};
use crate::numerical::grid::{DEFAULT_SAMPLES, SampleGrid};
use crate::numerical::integration::cumulative_integral;
use crate::numerical::sampler::sample;
use crate::symbolic::symbolic_engine::Expr;
use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

/// How the first-derivative track is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum DerivativeMode {
    /// Sample the simplified symbolic derivative.
    #[default]
    Symbolic,
    /// Central difference of the function with step `DEFAULT_DX`.
    CentralDifference,
}

/// Everything needed to build one plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
    pub expression: Expr,
    pub variable: String,
    pub x_min: f64,
    pub x_max: f64,
    pub derivative_order: usize,
    pub samples: usize,
    pub mode: DerivativeMode,
}

impl PlotRequest {
    /// Request in `x` with first derivative, 400 samples, symbolic mode.
    pub fn new(expression: Expr, x_min: f64, x_max: f64) -> Self {
        Self {
            expression,
            variable: "x".to_string(),
            x_min,
            x_max,
            derivative_order: 1,
            samples: DEFAULT_SAMPLES,
            mode: DerivativeMode::default(),
        }
    }

    pub fn with_order(mut self, derivative_order: usize) -> Self {
        self.derivative_order = derivative_order;
        self
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_mode(mut self, mode: DerivativeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_variable(mut self, variable: &str) -> Self {
        self.variable = variable.to_string();
        self
    }
}

/// Which curve of a [`SeriesSet`] a value array belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveKind {
    Function,
    /// Derivative of the given order (1-based).
    Derivative(usize),
    Integral,
}

fn ordinal(n: usize) -> String {
    match n {
        1 => "First".to_string(),
        2 => "Second".to_string(),
        3 => "Third".to_string(),
        4 => "Fourth".to_string(),
        5 => "Fifth".to_string(),
        _ => {
            let suffix = match (n % 10, n % 100) {
                (_, 11..=13) => "th",
                (1, _) => "st",
                (2, _) => "nd",
                (3, _) => "rd",
                _ => "th",
            };
            format!("{}{}", n, suffix)
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CurveKind::Function => write!(f, "Function"),
            CurveKind::Derivative(order) => write!(f, "{} Derivative", ordinal(*order)),
            CurveKind::Integral => write!(f, "Integral"),
        }
    }
}

/// Sampled curves aligned index for index with `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSet {
    pub x: Vec<f64>,
    pub function: Vec<f64>,
    /// `derivatives[k-1]` holds the `k`-th derivative.
    pub derivatives: Vec<Vec<f64>>,
    pub integral: Vec<f64>,
}

impl SeriesSet {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Curves in drawing order: function, derivatives by order, integral.
    pub fn curves(&self) -> impl Iterator<Item = (CurveKind, &[f64])> {
        std::iter::once((CurveKind::Function, self.function.as_slice()))
            .chain(
                self.derivatives
                    .iter()
                    .enumerate()
                    .map(|(k, values)| (CurveKind::Derivative(k + 1), values.as_slice())),
            )
            .chain(std::iter::once((CurveKind::Integral, self.integral.as_slice())))
    }

    /// Column titles matching [`SeriesSet::to_matrix`].
    pub fn headers(&self) -> Vec<String> {
        self.curves().map(|(kind, _)| kind.to_string()).collect()
    }

    /// One column per curve, one row per grid point.
    pub fn to_matrix(&self) -> DMatrix<f64> {
        let columns: Vec<DVector<f64>> = self
            .curves()
            .map(|(_, values)| DVector::from_column_slice(values))
            .collect();
        DMatrix::from_columns(&columns)
    }

    pub fn x_vector(&self) -> DVector<f64> {
        DVector::from_column_slice(&self.x)
    }
}

/// Simplified symbolic forms shown next to the plot.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicSummary {
    pub variable: String,
    pub function: Expr,
    /// `derivatives[k-1]` is the simplified `k`-th derivative.
    pub derivatives: Vec<Expr>,
    /// `None` when no closed form was found.
    pub antiderivative: Option<Expr>,
}

impl SymbolicSummary {
    /// `f'(x)`, `f''(x)`, `f'''(x)`, then `f^(4)(x)` and up.
    fn derivative_name(&self, order: usize) -> String {
        if order <= 3 {
            format!("f{}({})", "'".repeat(order), self.variable)
        } else {
            format!("f^({})({})", order, self.variable)
        }
    }

    /// Text of the symbolic panel.
    pub fn panel_text(&self) -> String {
        let var = &self.variable;
        let mut text = format!("Original Function:\n  f({}) = {}\n", var, self.function);
        for (k, derivative) in self.derivatives.iter().enumerate() {
            let order = k + 1;
            text.push_str(&format!(
                "\n{}:\n  {} = {}\n",
                CurveKind::Derivative(order),
                self.derivative_name(order),
                derivative
            ));
        }
        match &self.antiderivative {
            Some(integral) => text.push_str(&format!(
                "\nIntegral:\n  ∫f({})d{} = {} + C\n",
                var, var, integral
            )),
            None => text.push_str(&format!(
                "\nIntegral:\n  ∫f({})d{} has no closed form\n",
                var, var
            )),
        }
        text
    }
}

impl fmt::Display for SymbolicSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.panel_text())
    }
}

/// Builds every curve and the symbolic summary of a request.
///
/// All-or-nothing: the first range, evaluation or shape error is returned and
/// nothing is produced.
pub fn build_series(request: &PlotRequest) -> Result<(SeriesSet, SymbolicSummary), VisualizerError> {
    let var = request.variable.as_str();
    let grid = SampleGrid::new(request.x_min, request.x_max, request.samples)?;
    let expr = &request.expression;
    expr.check_bound_to(var)?;
    info!(
        "plotting {} on [{}, {}] with {} samples, derivative order {} ({})",
        expr,
        grid.x_min(),
        grid.x_max(),
        grid.len(),
        request.derivative_order,
        request.mode
    );

    let function = sample(expr, var, &grid)?;
    let chain = expr.derivative_chain(var, request.derivative_order);
    let mut derivatives = Vec::with_capacity(chain.len());
    for (k, derivative) in chain.iter().enumerate() {
        debug!("derivative of order {}: {}", k + 1, derivative);
        let values = match (k, request.mode) {
            (0, DerivativeMode::CentralDifference) => {
                sample_central_difference(expr, var, &grid, DEFAULT_DX)?
            }
            _ => sample(derivative, var, &grid)?,
        };
        derivatives.push(values);
    }
    let integral = cumulative_integral(&function, grid.points())?;

    let antiderivative = expr.antiderivative(var);
    if antiderivative.is_none() {
        info!("no closed-form antiderivative for {}", expr);
    }
    let summary = SymbolicSummary {
        variable: request.variable.clone(),
        function: expr.simplify(),
        derivatives: chain,
        antiderivative,
    };
    let series = SeriesSet {
        x: grid.points().to_vec(),
        function,
        derivatives,
        integral,
    };
    Ok((series, summary))
}
