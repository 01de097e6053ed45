// Paint session: every piece of state the paint loop mutates, plus the
// per-tick update that routes commands and pointers into the canvas.

use crate::canvas::Canvas;
use crate::pointer::{PointerEvent, PointerState};
use crate::shape::{ShapeKind, ShapeTool};
use crate::stroke::{ShakeFilter, Stroke};
use crate::types::{Centroid, PaintColor, Point, PointerMode};
use tracing::info;

pub const DEFAULT_PEN_SIZE: u32 = 6;

/// Keyboard commands, one per tick at most.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SelectColor(PaintColor),
    IncreasePen,
    DecreasePen,
    SetMode(PointerMode),
    ToggleMode,
    Clear,
    Save,
    /// Held: draw a rectangle
    Rectangle,
    /// Held: draw a circle
    Circle,
    Quit,
}

impl Command {
    fn shape(self) -> Option<ShapeKind> {
        match self {
            Command::Rectangle => Some(ShapeKind::Rectangle),
            Command::Circle => Some(ShapeKind::Circle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub mode: PointerMode,
    pub color: PaintColor,
    pub pen_size: u32,
    /// Applied to the blob pointer when set
    pub shake: Option<ShakeFilter>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: PointerMode::Mouse,
            color: PaintColor::Blue,
            pen_size: DEFAULT_PEN_SIZE,
            shake: None,
        }
    }
}

/// What the caller has to do after a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub quit: bool,
    pub save: bool,
}

/// Per-mode pointer, stroke and shape tool.
struct Lane {
    pointer: PointerState,
    stroke: Stroke,
    shapes: ShapeTool,
}

impl Lane {
    fn new(filter: Option<ShakeFilter>) -> Self {
        Self { pointer: PointerState::default(), stroke: Stroke::new(filter), shapes: ShapeTool::default() }
    }
}

pub struct PaintSession {
    canvas: Canvas,
    color: PaintColor,
    pen_size: u32,
    mode: PointerMode,
    last_command: Option<Command>,
    mouse: Lane,
    blob: Lane,
}

impl PaintSession {
    pub fn new(width: u32, height: u32, config: SessionConfig) -> Self {
        Self {
            canvas: Canvas::new(width, height),
            color: config.color,
            pen_size: config.pen_size,
            mode: config.mode,
            last_command: None,
            mouse: Lane::new(None),
            blob: Lane::new(config.shake),
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn color(&self) -> PaintColor {
        self.color
    }

    pub fn pen_size(&self) -> u32 {
        self.pen_size
    }

    pub fn mode(&self) -> PointerMode {
        self.mode
    }

    /// Point of the pointer currently driving the brush.
    pub fn active_point(&self) -> Option<Point> {
        self.lane(self.mode).pointer.current_point()
    }

    fn lane(&self, mode: PointerMode) -> &Lane {
        match mode {
            PointerMode::Blob => &self.blob,
            PointerMode::Mouse => &self.mouse,
        }
    }

    /// Mouse input from the window, posted between ticks.
    pub fn pointer_event(&mut self, event: PointerEvent) {
        self.mouse.pointer.handle(event);
        if event == PointerEvent::Release {
            self.mouse.stroke.lift();
        }
    }

    /// One loop iteration: apply `command`, track the blob, draw.
    pub fn tick(&mut self, command: Option<Command>, centroid: Option<Centroid>) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if let Some(cmd) = command {
            self.dispatch(cmd, &mut outcome);
        }

        self.blob.pointer.track(centroid);

        let continuing = command.is_some() && command == self.last_command;
        let color = self.color.rgb();
        let thickness = self.pen_size;
        let lane = match self.mode {
            PointerMode::Blob => &mut self.blob,
            PointerMode::Mouse => &mut self.mouse,
        };

        match command.and_then(Command::shape) {
            Some(kind) => {
                // Freehand resumes as a new stroke once the shape key is released.
                lane.stroke.lift();
                let point = lane.pointer.current_point();
                lane.shapes.apply(&mut self.canvas, kind, point, continuing, color, thickness);
            }
            None => {
                lane.shapes.end();
                if thickness > 0 && lane.pointer.is_active() {
                    if let Some(p) = lane.pointer.current_point() {
                        if let Some((a, b)) = lane.stroke.advance(p) {
                            self.canvas.draw_line(Some(a), Some(b), color, thickness);
                        }
                    }
                }
            }
        }

        self.last_command = command;
        outcome
    }

    fn dispatch(&mut self, cmd: Command, outcome: &mut TickOutcome) {
        match cmd {
            Command::SelectColor(c) => {
                if self.color != c {
                    info!(color = c.name(), "color selected");
                }
                self.color = c;
            }
            Command::IncreasePen => {
                self.pen_size += 1;
                info!(size = self.pen_size, "pencil size");
            }
            Command::DecreasePen => {
                self.pen_size = self.pen_size.saturating_sub(1);
                info!(size = self.pen_size, "pencil size");
            }
            Command::SetMode(mode) => self.set_mode(mode),
            Command::ToggleMode => self.set_mode(self.mode.toggled()),
            Command::Clear => {
                self.canvas.clear();
                self.mouse.shapes.end();
                self.blob.shapes.end();
                info!("canvas cleared");
            }
            Command::Save => outcome.save = true,
            Command::Quit => outcome.quit = true,
            Command::Rectangle | Command::Circle => {}
        }
    }

    fn set_mode(&mut self, mode: PointerMode) {
        if self.mode != mode {
            info!(mode = mode.name(), "painting pointer changed");
        }
        self.mode = mode;
    }
}
