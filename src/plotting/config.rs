//! Plot surface configuration: sizes, gesture constants, reveal timing and colors.

use crate::numerical::series::CurveKind;
use plotters::style::RGBColor;
use std::time::Duration;

/// Color enumeration for plot lines with predefined color palette
/// Each variant maps to specific RGB values for consistent plotting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotColor {
    Black,
    Red,
    Green,
    Blue,
    Cyan,
    Magenta,
    DarkRed,
    DarkGreen,
    DarkBlue,
    Orange,
    Purple,
    Brown,
    Pink,
    Gray,
    LightGray,
}

impl PlotColor {
    pub fn to_rgb(self) -> RGBColor {
        match self {
            PlotColor::Black => RGBColor(0, 0, 0),
            PlotColor::Red => RGBColor(255, 0, 0),
            PlotColor::Green => RGBColor(0, 204, 0),
            PlotColor::Blue => RGBColor(0, 0, 255),
            PlotColor::Cyan => RGBColor(0, 204, 204),
            PlotColor::Magenta => RGBColor(255, 0, 255),
            PlotColor::DarkRed => RGBColor(128, 0, 0),
            PlotColor::DarkGreen => RGBColor(0, 128, 0),
            PlotColor::DarkBlue => RGBColor(0, 0, 128),
            PlotColor::Orange => RGBColor(255, 128, 0),
            PlotColor::Purple => RGBColor(128, 0, 128),
            PlotColor::Brown => RGBColor(153, 77, 26),
            PlotColor::Pink => RGBColor(255, 179, 204),
            PlotColor::Gray => RGBColor(128, 128, 128),
            PlotColor::LightGray => RGBColor(204, 204, 204),
        }
    }

    /// Colors handed out to derivative curves, in order of derivative order
    pub fn derivative_sequence() -> Vec<PlotColor> {
        vec![
            PlotColor::Red,
            PlotColor::Green,
            PlotColor::Orange,
            PlotColor::Purple,
            PlotColor::Cyan,
            PlotColor::Brown,
            PlotColor::DarkRed,
            PlotColor::DarkGreen,
        ]
    }
}

/// Which curves are drawn. Hidden curves are neither hovered nor autoscaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveSelection {
    pub function: bool,
    pub derivatives: bool,
    pub integral: bool,
}

impl Default for CurveSelection {
    fn default() -> Self {
        Self {
            function: true,
            derivatives: true,
            integral: true,
        }
    }
}

impl CurveSelection {
    pub fn none() -> Self {
        Self {
            function: false,
            derivatives: false,
            integral: false,
        }
    }

    pub fn shows(&self, kind: CurveKind) -> bool {
        match kind {
            CurveKind::Function => self.function,
            CurveKind::Derivative(_) => self.derivatives,
            CurveKind::Integral => self.integral,
        }
    }

    /// Selection from names such as `function`, `derivatives`, `integral`.
    /// Returns the first unknown name as the error.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self, String> {
        let mut selection = Self::none();
        for name in names {
            match name.trim().to_lowercase().as_str() {
                "function" => selection.function = true,
                "derivative" | "derivatives" => selection.derivatives = true,
                "integral" => selection.integral = true,
                other => return Err(other.to_string()),
            }
        }
        Ok(selection)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// height of the band above the chart holding the title
    pub title_height: u32,
    pub margin: u32,
    pub x_label_area: u32,
    pub y_label_area: u32,
    /// maximum hover distance in data units
    pub hover_threshold: f64,
    pub zoom_factor: f64,
    pub reveal_frames: usize,
    pub reveal_interval: Duration,
    /// relative y padding of the initial view
    pub y_padding: f64,
    pub function_color: PlotColor,
    pub integral_color: PlotColor,
    pub derivative_colors: Vec<PlotColor>,
    pub axis_color: PlotColor,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Function Visualization".to_string(),
            title_height: 40,
            margin: 10,
            x_label_area: 40,
            y_label_area: 60,
            hover_threshold: 0.1,
            zoom_factor: 1.1,
            reveal_frames: 20,
            reveal_interval: Duration::from_millis(50),
            y_padding: 0.05,
            function_color: PlotColor::Blue,
            integral_color: PlotColor::Magenta,
            derivative_colors: PlotColor::derivative_sequence(),
            axis_color: PlotColor::Black,
        }
    }
}

impl PlotConfig {
    pub fn color_of(&self, kind: CurveKind) -> RGBColor {
        match kind {
            CurveKind::Function => self.function_color.to_rgb(),
            CurveKind::Integral => self.integral_color.to_rgb(),
            CurveKind::Derivative(order) => {
                if self.derivative_colors.is_empty() {
                    PlotColor::Red.to_rgb()
                } else {
                    let i = (order.max(1) - 1) % self.derivative_colors.len();
                    self.derivative_colors[i].to_rgb()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlotConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.hover_threshold, 0.1);
        assert_eq!(config.zoom_factor, 1.1);
        assert_eq!(config.reveal_frames, 20);
        assert_eq!(config.reveal_interval, Duration::from_millis(50));
        assert_eq!(config.title, "Function Visualization");
    }

    #[test]
    fn test_derivative_colors_cycle() {
        let config = PlotConfig::default();
        let n = config.derivative_colors.len();
        assert_eq!(
            config.color_of(CurveKind::Derivative(1)),
            config.color_of(CurveKind::Derivative(n + 1))
        );
        assert_ne!(
            config.color_of(CurveKind::Derivative(1)),
            config.color_of(CurveKind::Derivative(2))
        );
    }

    #[test]
    fn test_selection_from_names() {
        let selection = CurveSelection::from_names(["function", "integral"]).unwrap();
        assert!(selection.shows(CurveKind::Function));
        assert!(!selection.shows(CurveKind::Derivative(3)));
        assert!(selection.shows(CurveKind::Integral));
        assert_eq!(
            CurveSelection::from_names(["function", "area"]).unwrap_err(),
            "area"
        );
    }
}
