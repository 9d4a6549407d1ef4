//! Drawing tool selection and stroke settings.

use crate::color::Color;
use serde::{Deserialize, Serialize};

/// Smallest stroke width offered by the width control.
pub const MIN_STROKE_WIDTH: u32 = 1;
/// Largest stroke width offered by the width control.
pub const MAX_STROKE_WIDTH: u32 = 40;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
}

/// Line cap used when stroking a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
}

/// Resolved style for a single stroked segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    pub cap: LineCap,
}

/// Current tool configuration, read at event time by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSettings {
    /// Currently selected tool.
    pub tool: Tool,
    /// Color used by the pen.
    pub stroke_color: Color,
    /// Stroke width in pixels, always within the control range.
    stroke_width: u32,
    /// Color painted by the eraser.
    pub eraser_color: Color,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: Tool::Pen,
            stroke_color: Color::BLACK,
            stroke_width: 3,
            eraser_color: Color::WHITE,
        }
    }
}

impl ToolSettings {
    pub fn new(stroke_color: Color, stroke_width: u32, eraser_color: Color) -> Self {
        Self {
            tool: Tool::Pen,
            stroke_color,
            stroke_width: clamp_stroke_width(stroke_width),
            eraser_color,
        }
    }

    pub fn stroke_width(&self) -> u32 {
        self.stroke_width
    }

    /// Set the stroke width, clamped to the control range.
    pub fn set_stroke_width(&mut self, width: u32) {
        self.stroke_width = clamp_stroke_width(width);
    }

    pub fn is_erasing(&self) -> bool {
        self.tool == Tool::Eraser
    }

    /// The style the next segment is drawn with.
    pub fn stroke_style(&self) -> StrokeStyle {
        let color = if self.is_erasing() {
            self.eraser_color
        } else {
            self.stroke_color
        };
        StrokeStyle {
            color,
            width: f64::from(self.stroke_width),
            cap: LineCap::Round,
        }
    }
}

/// Clamp a requested width into `MIN_STROKE_WIDTH..=MAX_STROKE_WIDTH`.
fn clamp_stroke_width(width: u32) -> u32 {
    width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
}
