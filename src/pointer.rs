// The two pointers that can drive the brush: the mouse on the canvas window
// and the centroid of the tracked blob.
use crate::types::{Centroid, Point};

/// Mouse input as delivered by the window between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Press(Point),
    Drag(Point),
    Release,
}

/// Current point (if any) and whether the pointer is pressed/active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerState {
    point: Option<Point>,
    active: bool,
}

impl PointerState {
    pub fn current_point(&self) -> Option<Point> {
        self.point
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Mouse semantics: press grabs, drag moves only while pressed, release drops the point.
    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Press(p) => {
                self.point = Some(p);
                self.active = true;
            }
            PointerEvent::Drag(p) => {
                if self.active {
                    self.point = Some(p);
                }
            }
            PointerEvent::Release => {
                self.point = None;
                self.active = false;
            }
        }
    }

    /// Blob semantics: active whenever a centroid was found this tick.
    pub fn track(&mut self, centroid: Option<Centroid>) {
        self.point = centroid.map(Centroid::to_point);
        self.active = self.point.is_some();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_without_press_is_ignored() {
        let mut m = PointerState::default();
        m.handle(PointerEvent::Drag(Point::new(4, 4)));
        assert_eq!(m.current_point(), None);
        assert!(!m.is_active());
    }

    #[test]
    fn press_drag_release_cycle() {
        let mut m = PointerState::default();
        m.handle(PointerEvent::Press(Point::new(1, 2)));
        assert!(m.is_active());
        m.handle(PointerEvent::Drag(Point::new(3, 4)));
        assert_eq!(m.current_point(), Some(Point::new(3, 4)));
        m.handle(PointerEvent::Release);
        assert_eq!(m.current_point(), None);
        assert!(!m.is_active());
    }

    #[test]
    fn blob_pointer_follows_centroid() {
        let mut b = PointerState::default();
        b.track(Some(Centroid { x: 7.6, y: 2.2 }));
        assert_eq!(b.current_point(), Some(Point::new(8, 2)));
        assert!(b.is_active());
        b.track(None);
        assert!(!b.is_active());
    }
}
