//! Pointer input translation and the stroke state machine.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Raw pointer event in client (page) coordinates.
///
/// Mouse and touch events share the same transition table once translated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerInput {
    MouseDown { client: Point },
    MouseMove { client: Point },
    MouseUp,
    MouseLeave,
    /// Active touches; only the first is used.
    TouchStart { touches: Vec<Point> },
    TouchMove { touches: Vec<Point> },
    TouchEnd,
}

/// Top-left corner of the surface's bounding box in client coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceBounds {
    pub left: f64,
    pub top: f64,
}

impl SurfaceBounds {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    /// Convert a client-space point to surface-local coordinates.
    pub fn to_local(&self, client: Point) -> Point {
        Point::new(client.x - self.left, client.y - self.top)
    }
}

/// A pointer event reduced to what the stroke state machine consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    Down(Point),
    Move(Point),
    /// Pointer released or left the surface.
    Release,
}

impl PointerInput {
    /// Translate into surface-local coordinates.
    ///
    /// Returns `None` for touch start/move events that carry no touches.
    pub fn to_action(&self, bounds: SurfaceBounds) -> Option<PointerAction> {
        match self {
            PointerInput::MouseDown { client } => Some(PointerAction::Down(bounds.to_local(*client))),
            PointerInput::MouseMove { client } => Some(PointerAction::Move(bounds.to_local(*client))),
            PointerInput::TouchStart { touches } => touches
                .first()
                .map(|touch| PointerAction::Down(bounds.to_local(*touch))),
            PointerInput::TouchMove { touches } => touches
                .first()
                .map(|touch| PointerAction::Move(bounds.to_local(*touch))),
            PointerInput::MouseUp | PointerInput::MouseLeave | PointerInput::TouchEnd => {
                Some(PointerAction::Release)
            }
        }
    }
}

/// Per-stroke state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StrokeState {
    #[default]
    Idle,
    /// A stroke is in progress; `last` is the end of the path so far.
    Drawing { last: Point },
}

impl StrokeState {
    pub fn is_drawing(&self) -> bool {
        matches!(self, StrokeState::Drawing { .. })
    }

    /// Begin a path at `at`.
    pub fn begin(&mut self, at: Point) {
        *self = StrokeState::Drawing { last: at };
    }

    /// Extend the path to `to`, returning the segment to draw. Idle state
    /// ignores stray moves.
    pub fn extend(&mut self, to: Point) -> Option<(Point, Point)> {
        match self {
            StrokeState::Drawing { last } => {
                let from = *last;
                *last = to;
                Some((from, to))
            }
            StrokeState::Idle => None,
        }
    }

    pub fn end(&mut self) {
        *self = StrokeState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_translation() {
        let bounds = SurfaceBounds::new(10.0, 20.0);
        let event = PointerInput::MouseDown {
            client: Point::new(15.0, 30.0),
        };
        assert_eq!(
            event.to_action(bounds),
            Some(PointerAction::Down(Point::new(5.0, 10.0)))
        );
    }

    #[test]
    fn test_touch_uses_first_touch() {
        let bounds = SurfaceBounds::new(1.0, 1.0);
        let event = PointerInput::TouchMove {
            touches: vec![Point::new(4.0, 5.0), Point::new(100.0, 100.0)],
        };
        assert_eq!(
            event.to_action(bounds),
            Some(PointerAction::Move(Point::new(3.0, 4.0)))
        );
    }

    #[test]
    fn test_touch_without_touches_is_ignored() {
        let event = PointerInput::TouchStart { touches: vec![] };
        assert_eq!(event.to_action(SurfaceBounds::default()), None);
        assert_eq!(
            PointerInput::TouchEnd.to_action(SurfaceBounds::default()),
            Some(PointerAction::Release)
        );
    }

    #[test]
    fn test_stroke_state_transitions() {
        let mut state = StrokeState::default();
        assert!(state.extend(Point::new(1.0, 1.0)).is_none());

        state.begin(Point::new(0.0, 0.0));
        assert!(state.is_drawing());
        assert_eq!(
            state.extend(Point::new(2.0, 0.0)),
            Some((Point::new(0.0, 0.0), Point::new(2.0, 0.0)))
        );
        assert_eq!(
            state.extend(Point::new(2.0, 3.0)),
            Some((Point::new(2.0, 0.0), Point::new(2.0, 3.0)))
        );

        state.end();
        assert!(!state.is_drawing());
    }

    #[test]
    fn test_pointer_input_json() {
        let json = r#"{"kind":"touch_start","touches":[{"x":1.0,"y":2.0}]}"#;
        let event: PointerInput = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            PointerInput::TouchStart {
                touches: vec![Point::new(1.0, 2.0)]
            }
        );
    }
}
