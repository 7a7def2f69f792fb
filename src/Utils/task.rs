//! Typed launcher task read from a task document.
//!
//! ```text
//! function
//!   expression: "2*x**2 + 4*x + 1"
//!   x_range: -5, 5
//!   derivative_order: 1
//! plot
//!   animate: true
//!   save_to: plot.png
//! logging
//!   loglevel: info
//! ```
//! Only `function` is required; every missing key keeps its default.

use crate::Utils::task_parser::{DocumentMap, Value, parse_document_as, template_from};
use crate::error::{ConfigError, VisualizerError};
use crate::numerical::grid::DEFAULT_SAMPLES;
use crate::numerical::series::{DerivativeMode, PlotRequest};
use crate::plotting::config::{CurveSelection, PlotConfig};
use crate::symbolic::parse_expr::parse;
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Task used by the launcher when no task file is found.
pub const DEFAULT_TASK: &str = r#"
// plot a parabola with its first derivative and integral
function
  expression: "2*x**2 + 4*x + 1"
  variable: x
  x_range: -5, 5
  derivative_order: 1
  derivative_mode: symbolic
plot
  samples: 400
  animate: true
  curves: function, derivatives, integral
logging
  loglevel: info
"#;

const FUNCTION_KEYS: &[&str] = &[
    "expression",
    "variable",
    "x_range",
    "derivative_order",
    "derivative_mode",
];
const PLOT_KEYS: &[&str] = &[
    "width", "height", "samples", "animate", "save_to", "csv_to", "curves", "title",
];
const LOGGING_KEYS: &[&str] = &["loglevel", "log_file"];

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub expression: String,
    pub variable: String,
    pub x_min: f64,
    pub x_max: f64,
    pub derivative_order: usize,
    pub derivative_mode: DerivativeMode,
    pub samples: usize,
    pub animate: bool,
    pub save_to: Option<PathBuf>,
    pub csv_to: Option<PathBuf>,
    pub selection: CurveSelection,
    pub plot_config: PlotConfig,
    pub loglevel: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            expression: "2*x**2 + 4*x + 1".to_string(),
            variable: "x".to_string(),
            x_min: -5.0,
            x_max: 5.0,
            derivative_order: 1,
            derivative_mode: DerivativeMode::Symbolic,
            samples: DEFAULT_SAMPLES,
            animate: false,
            save_to: None,
            csv_to: None,
            selection: CurveSelection::default(),
            plot_config: PlotConfig::default(),
            loglevel: "info".to_string(),
            log_file: None,
        }
    }
}

/// Values of `section.key`, `None` when the key is absent.
fn values<'a>(doc: &'a DocumentMap, section: &str, key: &str) -> Option<&'a [Value]> {
    doc.get(section)
        .and_then(|keys| keys.get(key))
        .and_then(|values| values.as_deref())
}

fn invalid(section: &str, key: &str, values: &[Value]) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// The single value of a scalar key
fn scalar<'a>(doc: &'a DocumentMap, section: &str, key: &str) -> Result<Option<&'a Value>, ConfigError> {
    match values(doc, section, key) {
        None => Ok(None),
        Some([value]) => Ok(Some(value)),
        Some(other) => Err(invalid(section, key, other)),
    }
}

fn get_string(doc: &DocumentMap, section: &str, key: &str) -> Result<Option<String>, ConfigError> {
    Ok(scalar(doc, section, key)?.map(|v| v.to_string()))
}

fn get_usize(doc: &DocumentMap, section: &str, key: &str) -> Result<Option<usize>, ConfigError> {
    scalar(doc, section, key)?
        .map(|v| {
            v.as_integer()
                .and_then(|i| usize::try_from(i).ok())
                .ok_or_else(|| invalid(section, key, std::slice::from_ref(v)))
        })
        .transpose()
}

fn get_bool(doc: &DocumentMap, section: &str, key: &str) -> Result<Option<bool>, ConfigError> {
    scalar(doc, section, key)?
        .map(|v| v.as_boolean().ok_or_else(|| invalid(section, key, std::slice::from_ref(v))))
        .transpose()
}

fn warn_unknown_keys(doc: &DocumentMap, known: &[(&str, &[&str])]) {
    for (section, keys) in doc {
        match known.iter().find(|(name, _)| *name == section.as_str()) {
            None => warn!("unknown task section '{}' ignored", section),
            Some((_, known_keys)) => {
                for key in keys.keys().filter(|key| !known_keys.contains(&key.as_str())) {
                    warn!("unknown key '{}.{}' ignored", section, key);
                }
            }
        }
    }
}

impl FromStr for Task {
    type Err = ConfigError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let sections: [(&str, &[&str]); 3] = [
            ("function", FUNCTION_KEYS),
            ("plot", PLOT_KEYS),
            ("logging", LOGGING_KEYS),
        ];
        let raw = parse_document_as(input, None)?;
        if !raw.contains_key("function") {
            return Err(ConfigError::MissingSection("function".to_string()));
        }
        warn_unknown_keys(&raw, &sections);
        let doc = parse_document_as(input, Some(&template_from(&sections)))?;

        let mut task = Task::default();
        if let Some(expression) = get_string(&doc, "function", "expression")? {
            task.expression = expression;
        }
        if let Some(variable) = get_string(&doc, "function", "variable")? {
            task.variable = variable;
        }
        if let Some(range) = values(&doc, "function", "x_range") {
            match range {
                [a, b] => match (a.as_float(), b.as_float()) {
                    (Some(x_min), Some(x_max)) => {
                        task.x_min = x_min;
                        task.x_max = x_max;
                    }
                    _ => return Err(invalid("function", "x_range", range)),
                },
                _ => return Err(invalid("function", "x_range", range)),
            }
        }
        if let Some(order) = get_usize(&doc, "function", "derivative_order")? {
            task.derivative_order = order;
        }
        if let Some(mode) = get_string(&doc, "function", "derivative_mode")? {
            task.derivative_mode = DerivativeMode::from_str(&mode).map_err(|_| ConfigError::InvalidValue {
                section: "function".to_string(),
                key: "derivative_mode".to_string(),
                value: mode.clone(),
            })?;
        }

        if let Some(width) = get_usize(&doc, "plot", "width")? {
            task.plot_config.width = width as u32;
        }
        if let Some(height) = get_usize(&doc, "plot", "height")? {
            task.plot_config.height = height as u32;
        }
        if let Some(title) = get_string(&doc, "plot", "title")? {
            task.plot_config.title = title;
        }
        if let Some(samples) = get_usize(&doc, "plot", "samples")? {
            task.samples = samples;
        }
        if let Some(animate) = get_bool(&doc, "plot", "animate")? {
            task.animate = animate;
        }
        task.save_to = get_string(&doc, "plot", "save_to")?.map(PathBuf::from);
        task.csv_to = get_string(&doc, "plot", "csv_to")?.map(PathBuf::from);
        if let Some(curves) = values(&doc, "plot", "curves") {
            let names: Vec<String> = curves.iter().map(|v| v.to_string()).collect();
            task.selection = CurveSelection::from_names(names.iter().map(String::as_str))
                .map_err(|_| invalid("plot", "curves", curves))?;
        }

        if let Some(loglevel) = get_string(&doc, "logging", "loglevel")? {
            task.loglevel = loglevel;
        }
        task.log_file = get_string(&doc, "logging", "log_file")?.map(PathBuf::from);
        Ok(task)
    }
}

impl Task {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        text.parse()
    }

    /// Parses the expression and builds the pipeline request.
    pub fn to_request(&self) -> Result<PlotRequest, VisualizerError> {
        let expression = parse(&self.expression)?;
        Ok(PlotRequest::new(expression, self.x_min, self.x_max)
            .with_variable(&self.variable)
            .with_order(self.derivative_order)
            .with_samples(self.samples)
            .with_mode(self.derivative_mode))
    }
}
