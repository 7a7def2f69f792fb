//! Error types for the function visualizer.
//!
//! Every failure of a Plot request falls into one of four user-facing
//! categories (parse, range, order, evaluation). Rendering, export and
//! task-file problems get their own variants and propagate to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Malformed function text. `position` is the 0-based character offset
/// where the parser gave up.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub position: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Invalid x-range input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    #[error("'{text}' is not a number")]
    NotANumber { text: String },

    #[error("range bound {value} is not finite")]
    NotFinite { value: f64 },

    #[error("x_min ({x_min}) is greater than x_max ({x_max})")]
    Inverted { x_min: f64, x_max: f64 },

    #[error("x_min and x_max are both {value}, the range is empty")]
    Empty { value: f64 },
}

/// Invalid derivative order input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    #[error("'{text}' is not an integer")]
    NotAnInteger { text: String },

    #[error("derivative order {order} is negative")]
    Negative { order: i64 },
}

/// Numeric evaluation failure at a sample point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    /// The expression mentions a variable other than the declared one.
    #[error("expression contains unbound symbol '{symbol}'")]
    UnboundSymbol { symbol: String },

    /// A closed expression evaluated to NaN or infinity.
    #[error("{expr} does not evaluate to a finite real number (got {value})")]
    NotFinite { expr: String, value: f64 },

    /// Division by zero, domain violation or overflow at a sample point.
    #[error("{expr} is not a real number at x = {x} (got {value})")]
    NonReal { expr: String, x: f64, value: f64 },

    /// A numerical comparison was asked for on fewer than two points.
    #[error("comparison needs at least two points, got {count}")]
    TooFewPoints { count: usize },
}

/// Symbolic integration failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    #[error("no closed-form antiderivative found for {expr}")]
    NoClosedForm { expr: String },

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// Rendering and export failures of the plot surface.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("nothing to draw: no series has been plotted")]
    NoSeries,

    #[error("rendering failed: {0}")]
    Render(String),

    #[error("failed to export plot to {path}: {message}")]
    Export { path: PathBuf, message: String },

    #[error("series length mismatch: expected {expected}, got {actual}")]
    Shape { expected: usize, actual: usize },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Task document problems.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("failed to read task file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("task document is malformed: {0}")]
    Syntax(String),

    #[error("task document has no '{0}' section")]
    MissingSection(String),

    #[error("invalid value '{value}' for {section}.{key}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },

    #[error("unknown loglevel '{0}', expected debug, info, warn, error or off")]
    LogLevel(String),
}

/// Umbrella error for a Plot request and the launcher.
#[derive(Debug, Error)]
pub enum VisualizerError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error(transparent)]
    Plot(#[from] PlotError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl VisualizerError {
    /// Category message shown to the user in the warning dialog.
    pub fn user_message(&self) -> String {
        match self {
            VisualizerError::Parse(_) => {
                "Invalid function syntax.\nExample: 3*x**2 + 2*x - 4".to_string()
            }
            VisualizerError::Range(_) => "Invalid range input.".to_string(),
            VisualizerError::Order(_) => {
                "Invalid derivative order.\nEnter a non-negative integer.".to_string()
            }
            VisualizerError::Evaluation(e) => {
                format!("Could not evaluate the function on this range.\n{}", e)
            }
            VisualizerError::Plot(e) => format!("Plot error.\n{}", e),
            VisualizerError::Config(e) => format!("Configuration error.\n{}", e),
        }
    }
}
