// Rectangle and circle tools.
// A shape is drawn while its key is held. The first tick of the gesture takes
// a snapshot of the canvas and records the anchor; every following tick
// restores that snapshot and draws the whole shape again from the anchor to
// the current point. Whatever was drawn on the last held tick stays on the
// canvas.

use crate::canvas::Canvas;
use crate::types::Point;
use image::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Circle,
}

/// Observable phase of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Anchoring,
    Previewing,
}

struct Gesture {
    kind: ShapeKind,
    snapshot: Canvas,
    anchor: Point,
}

enum State {
    Idle,
    Anchoring(Gesture),
    Previewing(Gesture),
}

pub struct ShapeTool {
    state: State,
}

impl Default for ShapeTool {
    fn default() -> Self {
        Self { state: State::Idle }
    }
}

impl ShapeTool {
    pub fn phase(&self) -> Phase {
        match self.state {
            State::Idle => Phase::Idle,
            State::Anchoring(_) => Phase::Anchoring,
            State::Previewing(_) => Phase::Previewing,
        }
    }

    pub fn anchor(&self) -> Option<Point> {
        match &self.state {
            State::Idle => None,
            State::Anchoring(g) | State::Previewing(g) => Some(g.anchor),
        }
    }

    /// Drop the gesture; the canvas keeps whatever was last drawn.
    pub fn end(&mut self) {
        self.state = State::Idle;
    }

    /// Feed one held tick.
    ///
    /// `continuing` is true when the previous tick carried the same command.
    /// Without a point nothing happens.
    pub fn apply(
        &mut self,
        canvas: &mut Canvas,
        kind: ShapeKind,
        point: Option<Point>,
        continuing: bool,
        color: Rgb<u8>,
        thickness: u32,
    ) {
        let Some(point) = point else { return };

        let state = std::mem::replace(&mut self.state, State::Idle);
        self.state = match state {
            State::Anchoring(g) | State::Previewing(g) if continuing && g.kind == kind => {
                canvas.restore(&g.snapshot);
                draw_shape(canvas, kind, g.anchor, point, color, thickness);
                State::Previewing(g)
            }
            _ => State::Anchoring(Gesture { kind, snapshot: canvas.snapshot(), anchor: point }),
        };
    }
}

pub fn circle_radius(center: Point, edge: Point) -> u32 {
    center.distance(edge).round() as u32
}

fn draw_shape(canvas: &mut Canvas, kind: ShapeKind, anchor: Point, point: Point, color: Rgb<u8>, thickness: u32) {
    match kind {
        ShapeKind::Rectangle => canvas.draw_rectangle(anchor, point, color, thickness),
        ShapeKind::Circle => canvas.draw_circle(anchor, circle_radius(anchor, point), color, thickness),
    }
}
