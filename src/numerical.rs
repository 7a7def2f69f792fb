//! Numeric side of the visualizer: sample grids, sampling of expressions,
//! central differences, cumulative integration and the full plot pipeline.
///  evenly spaced x-grid and range validation
/// Example#1
/// ```
/// use graphique::numerical::grid::SampleGrid;
/// let grid = SampleGrid::with_default_samples(-5.0, 5.0).unwrap();
/// assert_eq!(grid.len(), 400);
/// assert_eq!(grid.points()[399], 5.0);
/// // an inverted range is rejected
/// assert!(SampleGrid::new(5.0, -5.0, 400).is_err());
/// ```
pub mod grid;
/// evaluation of an expression at every point of a grid, all-or-nothing
/// ```
/// use graphique::numerical::grid::SampleGrid;
/// use graphique::numerical::sampler::sample;
/// use graphique::symbolic::parse_expr::parse;
/// let grid = SampleGrid::new(0.0, 2.0, 3).unwrap();
/// let values = sample(&parse("x**2 + 1").unwrap(), "x", &grid).unwrap();
/// assert_eq!(values, vec![1.0, 2.0, 5.0]);
/// ```
pub mod sampler;
/// central difference derivative with fixed step dx = 1e-5
pub mod differentiation;
/// cumulative trapezoidal integral anchored at the left end of the grid
pub mod integration;
///________________________________________________________________________________________________________________________________
/// the whole pipeline: parse -> derivative chain -> sampling -> integral
/// Example#1
/// ```
/// use graphique::numerical::series::{build_series, PlotRequest};
/// use graphique::symbolic::parse_expr::parse;
/// let request = PlotRequest::new(parse("2*x**2 + 4*x + 1").unwrap(), -5.0, 5.0);
/// let (series, summary) = build_series(&request).unwrap();
/// assert_eq!(series.len(), 400);
/// assert_eq!(summary.derivatives[0].to_string(), "4*x + 4");
/// println!("{}", summary.panel_text());
/// ```
pub mod series;
