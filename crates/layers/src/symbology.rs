use serde::Serialize;

use crate::layer::PaintKind;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct LayerStyle {
    pub color: [f32; 4],
    /// Line width or circle radius in pixels; unused for fills.
    pub size_px: f32,
    /// Color used for highlighted or isolated features.
    pub highlight_color: [f32; 4],
}

impl LayerStyle {
    pub const fn new(color: [f32; 4], size_px: f32) -> Self {
        Self {
            color,
            size_px,
            highlight_color: [1.0, 0.84, 0.0, 1.0],
        }
    }

    pub fn for_layer(id: &str, kind: PaintKind) -> Self {
        match (id, kind) {
            ("field", _) => Self::new([0.85, 0.55, 0.2, 0.35], 0.0),
            ("lu", _) => Self::new([0.2, 0.45, 0.85, 0.25], 0.0),
            (_, PaintKind::Circle) => Self::new([0.8, 0.1, 0.1, 1.0], 4.0),
            (_, PaintKind::Line) => Self::new([0.1, 0.5, 0.1, 1.0], 2.0),
            (_, PaintKind::Fill) => Self::new([0.5, 0.2, 0.6, 0.3], 0.0),
        }
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self::new([1.0, 1.0, 1.0, 1.0], 1.0)
    }
}
