//! Pixel rectangle of the axes and the data window shown in it.

use crate::numerical::series::SeriesSet;
use crate::plotting::config::{CurveSelection, PlotConfig};

/// Axes rectangle in image pixels, `y` growing downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    /// The rectangle left for the curves once the title band, margins and
    /// label areas are taken off the image.
    pub fn from_config(config: &PlotConfig) -> Self {
        let margin = config.margin as f64;
        Self {
            left: margin + config.y_label_area as f64,
            top: config.title_height as f64 + margin,
            right: (config.width as f64 - margin).max(margin + config.y_label_area as f64 + 1.0),
            bottom: (config.height as f64 - margin - config.x_label_area as f64)
                .max(config.title_height as f64 + margin + 1.0),
        }
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.left && px <= self.right && py >= self.top && py <= self.bottom
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Data limits currently shown on the axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewWindow {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl ViewWindow {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// x spans the grid; y spans the visible curves padded by `padding` of
    /// their extent. A flat (or empty) selection is padded by 1 instead.
    pub fn autoscale(series: &SeriesSet, selection: &CurveSelection, padding: f64) -> Self {
        let (x_min, x_max) = match (series.x.first(), series.x.last()) {
            (Some(&a), Some(&b)) => (a, b),
            _ => (0.0, 1.0),
        };
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for (_, values) in series.curves().filter(|(kind, _)| selection.shows(*kind)) {
            for &y in values {
                y_min = y_min.min(y);
                y_max = y_max.max(y);
            }
        }
        if !y_min.is_finite() || !y_max.is_finite() {
            return Self::new(x_min, x_max, -1.0, 1.0);
        }
        let extent = y_max - y_min;
        if extent == 0.0 {
            Self::new(x_min, x_max, y_min - 1.0, y_max + 1.0)
        } else {
            Self::new(x_min, x_max, y_min - padding * extent, y_max + padding * extent)
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn pixel_to_data(&self, area: &PlotArea, px: f64, py: f64) -> (f64, f64) {
        let x = self.x_min + (px - area.left) / area.width() * self.width();
        let y = self.y_max - (py - area.top) / area.height() * self.height();
        (x, y)
    }

    pub fn data_to_pixel(&self, area: &PlotArea, x: f64, y: f64) -> (f64, f64) {
        let px = area.left + (x - self.x_min) / self.width() * area.width();
        let py = area.top + (self.y_max - y) / self.height() * area.height();
        (px, py)
    }

    /// Extents multiplied by `scale` about `(cx, cy)`; the center keeps its
    /// relative position inside the window.
    pub fn zoomed(&self, cx: f64, cy: f64, scale: f64) -> Self {
        Self::new(
            cx - (cx - self.x_min) * scale,
            cx + (self.x_max - cx) * scale,
            cy - (cy - self.y_min) * scale,
            cy + (self.y_max - cy) * scale,
        )
    }

    pub fn shifted(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x_min + dx, self.x_max + dx, self.y_min + dy, self.y_max + dy)
    }
}
