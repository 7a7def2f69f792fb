//! The Plot command: reads the four text fields, runs the pipeline and
//! pushes the result to the plot surface and the symbolic panel.

use crate::Utils::logger::save_series_to_csv;
use crate::Utils::task::Task;
use crate::error::{OrderError, PlotError, RangeError, VisualizerError};
use crate::numerical::grid::{DEFAULT_SAMPLES, validate_range};
use crate::numerical::series::{DerivativeMode, PlotRequest, SeriesSet, SymbolicSummary, build_series};
use crate::plotting::config::{CurveSelection, PlotConfig};
use crate::plotting::plot_surface::PlotSurface;
use crate::symbolic::parse_expr::parse;
use log::{info, warn};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct FunctionVisualizer {
    /// function text field, e.g. `2*x**2 + 4*x + 1`
    pub function_text: String,
    pub x_min_text: String,
    pub x_max_text: String,
    /// derivative order field; empty means 1
    pub order_text: String,
    pub variable: String,
    pub samples: usize,
    pub mode: DerivativeMode,
    /// start the reveal animation after every successful plot
    pub animate: bool,
    surface: PlotSurface,
    summary: Option<SymbolicSummary>,
    warning: Option<String>,
}

impl Default for FunctionVisualizer {
    fn default() -> Self {
        Self::new(PlotConfig::default())
    }
}

fn read_bound(text: &str) -> Result<f64, RangeError> {
    text.trim().parse::<f64>().map_err(|_| RangeError::NotANumber {
        text: text.to_string(),
    })
}

/// Range from the two text fields: both numbers, finite, `x_min < x_max`.
pub fn read_range(x_min: &str, x_max: &str) -> Result<(f64, f64), RangeError> {
    let (x_min, x_max) = (read_bound(x_min)?, read_bound(x_max)?);
    validate_range(x_min, x_max)?;
    Ok((x_min, x_max))
}

/// Derivative order from its text field; empty text is order 1.
pub fn read_order(text: &str) -> Result<usize, OrderError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(1);
    }
    let order = text.parse::<i64>().map_err(|_| OrderError::NotAnInteger {
        text: text.to_string(),
    })?;
    usize::try_from(order).map_err(|_| OrderError::Negative { order })
}

impl FunctionVisualizer {
    pub fn new(config: PlotConfig) -> Self {
        Self {
            function_text: String::new(),
            x_min_text: String::new(),
            x_max_text: String::new(),
            order_text: String::new(),
            variable: "x".to_string(),
            samples: DEFAULT_SAMPLES,
            mode: DerivativeMode::default(),
            animate: false,
            surface: PlotSurface::new(config),
            summary: None,
            warning: None,
        }
    }

    /// Visualizer with its fields, surface and selection taken from a launcher task.
    pub fn from_task(task: &Task) -> Self {
        let mut visualizer = Self::new(task.plot_config.clone());
        visualizer.set_inputs(
            &task.expression,
            &task.x_min.to_string(),
            &task.x_max.to_string(),
            &task.derivative_order.to_string(),
        );
        visualizer.variable = task.variable.clone();
        visualizer.samples = task.samples;
        visualizer.mode = task.derivative_mode;
        visualizer.animate = task.animate;
        visualizer.set_selection(task.selection);
        visualizer
    }

    /// Fills the four text fields at once.
    pub fn set_inputs(&mut self, function: &str, x_min: &str, x_max: &str, order: &str) {
        self.function_text = function.to_string();
        self.x_min_text = x_min.to_string();
        self.x_max_text = x_max.to_string();
        self.order_text = order.to_string();
    }

    pub fn surface(&self) -> &PlotSurface {
        &self.surface
    }

    /// Gestures and the animation timer are forwarded through here.
    pub fn surface_mut(&mut self) -> &mut PlotSurface {
        &mut self.surface
    }

    pub fn series(&self) -> Option<&SeriesSet> {
        self.surface.series()
    }

    pub fn summary(&self) -> Option<&SymbolicSummary> {
        self.summary.as_ref()
    }

    /// Text of the symbolic panel, empty before the first plot.
    pub fn panel_text(&self) -> String {
        self.summary
            .as_ref()
            .map(SymbolicSummary::panel_text)
            .unwrap_or_default()
    }

    /// Warning of the last failed plot, cleared by a successful one.
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn set_selection(&mut self, selection: CurveSelection) {
        self.surface.set_selection(selection);
    }

    fn build(&self) -> Result<(SeriesSet, SymbolicSummary), VisualizerError> {
        let (x_min, x_max) = read_range(&self.x_min_text, &self.x_max_text)?;
        let order = read_order(&self.order_text)?;
        let expression = parse(&self.function_text)?;
        let request = PlotRequest::new(expression, x_min, x_max)
            .with_variable(&self.variable)
            .with_order(order)
            .with_samples(self.samples)
            .with_mode(self.mode);
        build_series(&request)
    }

    /// Runs the Plot command. On failure nothing on the surface or the panel
    /// changes; the category warning is stored and the error returned.
    pub fn plot(&mut self) -> Result<(), VisualizerError> {
        match self.build() {
            Ok((series, summary)) => {
                info!("plotted f({}) = {}", summary.variable, summary.function);
                self.surface.set_series(series);
                if self.animate {
                    self.surface.start_reveal();
                }
                self.summary = Some(summary);
                self.warning = None;
                Ok(())
            }
            Err(e) => {
                warn!("plot of '{}' failed: {}", self.function_text, e);
                self.warning = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Drops the plot, the panel text and any pending warning.
    pub fn clear(&mut self) {
        self.surface.clear();
        self.summary = None;
        self.warning = None;
    }

    pub fn save_plot(&self, path: &Path) -> Result<(), PlotError> {
        self.surface.save_plot(path)
    }

    /// Grid and every curve as CSV columns.
    pub fn save_series_csv(&self, path: &Path) -> Result<(), PlotError> {
        let series = self.surface.series().ok_or(PlotError::NoSeries)?;
        save_series_to_csv(series, &self.variable, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvaluationError;

    fn visualizer(function: &str, x_min: &str, x_max: &str, order: &str) -> FunctionVisualizer {
        let mut visualizer = FunctionVisualizer::default();
        visualizer.set_inputs(function, x_min, x_max, order);
        visualizer
    }

    #[test]
    fn test_read_range() {
        assert_eq!(read_range(" -5 ", "5").unwrap(), (-5.0, 5.0));
        assert!(matches!(read_range("a", "5"), Err(RangeError::NotANumber { .. })));
        assert!(matches!(read_range("5", "-5"), Err(RangeError::Inverted { .. })));
        assert!(matches!(read_range("2", "2"), Err(RangeError::Empty { .. })));
        assert!(matches!(read_range("inf", "5"), Err(RangeError::NotFinite { .. })));
    }

    #[test]
    fn test_read_order() {
        assert_eq!(read_order("").unwrap(), 1);
        assert_eq!(read_order(" 3 ").unwrap(), 3);
        assert_eq!(read_order("0").unwrap(), 0);
        assert_eq!(read_order("-2").unwrap_err(), OrderError::Negative { order: -2 });
        assert!(matches!(read_order("1.5"), Err(OrderError::NotAnInteger { .. })));
    }

    #[test]
    fn test_successful_plot_updates_panel() {
        let mut v = visualizer("2*x**2 + 4*x + 1", "-5", "5", "1");
        v.plot().unwrap();
        assert!(v.warning().is_none());
        assert_eq!(v.series().unwrap().len(), 400);
        assert!(v.panel_text().contains("f'(x) = 4*x + 4"));
        assert!(v.panel_text().starts_with("Original Function:\n  f(x) = 2*x**2 + 4*x + 1"));
    }

    #[test]
    fn test_failed_plot_keeps_previous_state() {
        let mut v = visualizer("sin(x)", "0", "3", "1");
        v.plot().unwrap();
        let series_before = v.series().unwrap().clone();
        let panel_before = v.panel_text();

        v.function_text = "x +* 2".to_string();
        let err = v.plot().unwrap_err();
        assert!(matches!(err, VisualizerError::Parse(_)));
        assert_eq!(
            v.warning(),
            Some("Invalid function syntax.\nExample: 3*x**2 + 2*x - 4")
        );
        assert_eq!(v.series().unwrap(), &series_before);
        assert_eq!(v.panel_text(), panel_before);

        v.function_text = "sin(x)".to_string();
        v.x_min_text = "5".to_string();
        v.x_max_text = "-5".to_string();
        assert!(matches!(
            v.plot(),
            Err(VisualizerError::Range(RangeError::Inverted { .. }))
        ));
        assert_eq!(v.warning(), Some("Invalid range input."));
        assert_eq!(v.series().unwrap(), &series_before);
    }

    #[test]
    fn test_range_is_checked_before_the_function() {
        let mut v = visualizer("x +* 2", "a", "5", "1");
        assert!(matches!(v.plot(), Err(VisualizerError::Range(_))));
    }

    #[test]
    fn test_evaluation_failure_and_recovery() {
        let mut v = visualizer("ln(x)", "-1", "1", "1");
        assert!(matches!(
            v.plot(),
            Err(VisualizerError::Evaluation(EvaluationError::NonReal { .. }))
        ));
        assert!(v.series().is_none());
        assert!(v.warning().is_some());

        v.x_min_text = "0.5".to_string();
        v.plot().unwrap();
        assert!(v.warning().is_none());
        assert!(v.panel_text().contains("f'(x) = 1/x"));
    }

    #[test]
    fn test_clear_drops_warning() {
        let mut v = visualizer("sin(x)", "0", "3", "1");
        v.plot().unwrap();
        v.function_text = "x +* 2".to_string();
        assert!(v.plot().is_err());
        assert!(v.warning().is_some());

        v.clear();
        assert!(v.warning().is_none());
        assert!(v.series().is_none());
        assert_eq!(v.panel_text(), "");
    }

    #[test]
    fn test_animate_starts_reveal() {
        let mut v = visualizer("x", "0", "1", "0");
        v.animate = true;
        v.plot().unwrap();
        assert!(v.surface().is_animating());
        assert_eq!(v.surface().revealed_len(), 0);
        while v.surface_mut().on_timer_tick() {}
        assert_eq!(v.surface().revealed_len(), 400);
    }

    #[test]
    fn test_from_task() {
        let task: Task = "function\n  expression: \"x**2\"\n  x_range: 0, 2\n  derivative_order: 2\nplot\n  samples: 21\n  curves: function"
            .parse()
            .unwrap();
        let mut v = FunctionVisualizer::from_task(&task);
        assert_eq!(v.x_max_text, "2");
        assert_eq!(v.order_text, "2");
        v.plot().unwrap();
        assert_eq!(v.series().unwrap().len(), 21);
        assert_eq!(v.series().unwrap().derivatives.len(), 2);
        assert!(!v.surface().selection().integral);
    }

    #[test]
    fn test_save_without_plot() {
        let v = FunctionVisualizer::default();
        assert!(matches!(
            v.save_series_csv(Path::new("unused.csv")),
            Err(PlotError::NoSeries)
        ));
        assert!(matches!(
            v.save_plot(Path::new("unused.png")),
            Err(PlotError::NoSeries)
        ));
    }
}
