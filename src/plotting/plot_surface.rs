//! The interactive figure: owns the plotted series, the view and the gesture
//! state, and draws itself through plotters.
//!
//! The surface never talks to a windowing system. The host forwards pointer
//! events in image pixels and drives the reveal timer by calling
//! [`PlotSurface::on_timer_tick`] every [`PlotSurface::timer_interval`].

use crate::error::PlotError;
use crate::numerical::series::SeriesSet;
use crate::plotting::animation::RevealAnimation;
use crate::plotting::config::{CurveSelection, PlotConfig};
use crate::plotting::plot_state::{DragState, HoverAnnotation, MouseButton, PlotState, ScrollDirection};
use crate::plotting::view::{PlotArea, ViewWindow};
use crate::Utils::plots::{Figure, render_rgb, save_figure};
use log::debug;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PlotSurface {
    config: PlotConfig,
    area: PlotArea,
    selection: CurveSelection,
    series: Option<SeriesSet>,
    state: Option<PlotState>,
    reveal: RevealAnimation,
}

impl Default for PlotSurface {
    fn default() -> Self {
        Self::new(PlotConfig::default())
    }
}

impl PlotSurface {
    pub fn new(config: PlotConfig) -> Self {
        let area = PlotArea::from_config(&config);
        let reveal = RevealAnimation::new(config.reveal_frames, config.reveal_interval);
        Self {
            config,
            area,
            selection: CurveSelection::default(),
            series: None,
            state: None,
            reveal,
        }
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn area(&self) -> &PlotArea {
        &self.area
    }

    pub fn series(&self) -> Option<&SeriesSet> {
        self.series.as_ref()
    }

    pub fn selection(&self) -> CurveSelection {
        self.selection
    }

    pub fn state(&self) -> Option<&PlotState> {
        self.state.as_ref()
    }

    pub fn view(&self) -> Option<ViewWindow> {
        self.state.as_ref().map(|state| state.view)
    }

    pub fn hover(&self) -> Option<&HoverAnnotation> {
        self.state.as_ref().and_then(|state| state.hover.as_ref())
    }

    pub fn is_dragging(&self) -> bool {
        self.state.as_ref().is_some_and(PlotState::is_dragging)
    }

    pub fn is_animating(&self) -> bool {
        self.reveal.is_running()
    }

    /// Replaces the plotted series: fresh view, no hover, no drag, animation stopped.
    pub fn set_series(&mut self, series: SeriesSet) {
        let view = ViewWindow::autoscale(&series, &self.selection, self.config.y_padding);
        debug!(
            "new series of {} points, view x [{}, {}] y [{}, {}]",
            series.len(),
            view.x_min,
            view.x_max,
            view.y_min,
            view.y_max
        );
        self.reveal.stop();
        self.state = Some(PlotState::new(view));
        self.series = Some(series);
    }

    /// Shows only the selected curves and rescales the view to them.
    pub fn set_selection(&mut self, selection: CurveSelection) {
        self.selection = selection;
        if let (Some(series), Some(state)) = (&self.series, &mut self.state) {
            state.view = ViewWindow::autoscale(series, &selection, self.config.y_padding);
            state.hover = None;
        }
    }

    /// Drops the series and all gesture state.
    pub fn clear(&mut self) {
        self.reveal.stop();
        self.series = None;
        self.state = None;
    }

    /// Samples of every curve currently drawn.
    pub fn revealed_len(&self) -> usize {
        self.series
            .as_ref()
            .map(|series| self.reveal.visible_len(series.len()))
            .unwrap_or(0)
    }

    /// Pans while dragging, otherwise updates the hover annotation.
    pub fn on_pointer_move(&mut self, px: f64, py: f64) {
        let area = self.area;
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if let DragState::Dragging { press_px, press_view } = state.drag {
            let (x0, y0) = press_view.pixel_to_data(&area, press_px.0, press_px.1);
            let (x1, y1) = press_view.pixel_to_data(&area, px, py);
            state.view = press_view.shifted(x0 - x1, y0 - y1);
            return;
        }
        if !area.contains(px, py) {
            state.hover = None;
            return;
        }
        let (x, y) = state.view.pixel_to_data(&area, px, py);
        let hover = self.nearest_sample(x, y);
        if let Some(state) = self.state.as_mut() {
            state.hover = hover;
        }
    }

    /// Closest revealed sample of a visible curve to `(x, y)`, if within the
    /// hover threshold (Euclidean, data units).
    fn nearest_sample(&self, x: f64, y: f64) -> Option<HoverAnnotation> {
        let series = self.series.as_ref()?;
        let visible = self.revealed_len();
        let mut best: Option<(f64, HoverAnnotation)> = None;
        for (kind, values) in series.curves().filter(|(kind, _)| self.selection.shows(*kind)) {
            for (index, (&sx, &sy)) in series.x.iter().zip(values.iter()).take(visible).enumerate() {
                let distance = ((sx - x).powi(2) + (sy - y).powi(2)).sqrt();
                if best.as_ref().is_none_or(|(d, _)| distance < *d) {
                    best = Some((
                        distance,
                        HoverAnnotation {
                            curve: kind,
                            index,
                            x: sx,
                            y: sy,
                        },
                    ));
                }
            }
        }
        best.filter(|(distance, _)| *distance <= self.config.hover_threshold)
            .map(|(_, annotation)| annotation)
    }

    /// Zooms about the pointer: `Up` divides the extents by the zoom factor,
    /// `Down` multiplies them. Ignored outside the axes.
    pub fn on_scroll(&mut self, px: f64, py: f64, direction: ScrollDirection) {
        let area = self.area;
        let factor = self.config.zoom_factor;
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if !area.contains(px, py) {
            return;
        }
        let (cx, cy) = state.view.pixel_to_data(&area, px, py);
        let scale = match direction {
            ScrollDirection::Up => 1.0 / factor,
            ScrollDirection::Down => factor,
        };
        state.view = state.view.zoomed(cx, cy, scale);
    }

    /// Left press inside the axes starts a pan.
    pub fn on_button_press(&mut self, px: f64, py: f64, button: MouseButton) {
        let area = self.area;
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if button != MouseButton::Left || !area.contains(px, py) {
            return;
        }
        state.drag = DragState::Dragging {
            press_px: (px, py),
            press_view: state.view,
        };
    }

    pub fn on_button_release(&mut self, _px: f64, _py: f64, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }
        if let Some(state) = self.state.as_mut() {
            state.drag = DragState::Idle;
        }
    }

    /// Starts the reveal from an empty figure. Does nothing without a series.
    pub fn start_reveal(&mut self) {
        if self.series.is_some() {
            self.reveal.start();
        }
    }

    /// One animation frame; `false` once the animation is over.
    pub fn on_timer_tick(&mut self) -> bool {
        self.reveal.tick()
    }

    pub fn timer_interval(&self) -> Duration {
        self.reveal.interval()
    }

    fn figure(&self) -> Result<Figure<'_>, PlotError> {
        let (Some(series), Some(state)) = (&self.series, &self.state) else {
            return Err(PlotError::NoSeries);
        };
        Ok(Figure {
            config: &self.config,
            series,
            selection: self.selection,
            view: state.view,
            visible_len: self.revealed_len(),
            hover: state.hover.as_ref(),
        })
    }

    /// The current figure as `width * height * 3` RGB bytes.
    pub fn render_rgb(&self) -> Result<Vec<u8>, PlotError> {
        render_rgb(&self.figure()?)
    }

    /// Writes the current figure to `path`; the extension picks PNG or JPEG.
    pub fn save_plot(&self, path: &Path) -> Result<(), PlotError> {
        save_figure(&self.figure()?, path)
    }
}
