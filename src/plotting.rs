//! Interactive plot surface: hover tooltips, scroll-zoom, drag-pan and the
//! reveal animation over a plotters-rendered figure.
/// sizes, gesture constants, colors and the curve selection
pub mod config;
/// axes rectangle in pixels and the data window shown in it
pub mod view;
/// view, hover annotation and drag state machine of the current plot
pub mod plot_state;
/// finite, non-looping reveal of the curves
pub mod animation;
///________________________________________________________________________________________________________________________________
/// the surface itself. The host forwards pointer events in image pixels and calls
/// `on_timer_tick` every `timer_interval` while an animation runs.
/// Example#1
/// ```
/// use graphique::numerical::series::{build_series, PlotRequest};
/// use graphique::plotting::plot_state::ScrollDirection;
/// use graphique::plotting::plot_surface::PlotSurface;
/// use graphique::symbolic::parse_expr::parse;
/// let (series, _) = build_series(&PlotRequest::new(parse("sin(x)").unwrap(), -5.0, 5.0)).unwrap();
/// let mut surface = PlotSurface::default();
/// surface.set_series(series);
/// let width_before = surface.view().unwrap().width();
/// surface.on_scroll(400.0, 300.0, ScrollDirection::Up);
/// assert!(surface.view().unwrap().width() < width_before);
/// // reveal the curves frame by frame
/// surface.start_reveal();
/// while surface.on_timer_tick() {
///     // a host would render here and wait surface.timer_interval()
/// }
/// assert_eq!(surface.revealed_len(), 400);
/// ```
pub mod plot_surface;
