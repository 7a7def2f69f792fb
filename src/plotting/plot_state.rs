use crate::numerical::series::CurveKind;
use crate::plotting::view::ViewWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// zoom in
    Up,
    /// zoom out
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Pan gesture state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// Left button held since `press_px`, when the view was `press_view`.
    Dragging {
        press_px: (f64, f64),
        press_view: ViewWindow,
    },
}

/// Tooltip at a sample of one curve.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverAnnotation {
    pub curve: CurveKind,
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

impl HoverAnnotation {
    pub fn text(&self) -> String {
        format!("{}: ({:.4}, {:.4})", self.curve, self.x, self.y)
    }
}

/// Everything the gestures change between two plots.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotState {
    pub view: ViewWindow,
    pub hover: Option<HoverAnnotation>,
    pub drag: DragState,
}

impl PlotState {
    pub fn new(view: ViewWindow) -> Self {
        Self {
            view,
            hover: None,
            drag: DragState::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }
}
