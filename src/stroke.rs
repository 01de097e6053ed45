// Freehand stroke tracking with optional shake prevention.
use crate::types::Point;

pub const DEFAULT_SHAKE_THRESHOLD: f64 = 50.0;

/// Treats any jump longer than `threshold` as tracking noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakeFilter {
    pub threshold: f64,
}

impl Default for ShakeFilter {
    fn default() -> Self {
        Self { threshold: DEFAULT_SHAKE_THRESHOLD }
    }
}

impl ShakeFilter {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn admits(&self, previous: Point, candidate: Point) -> bool {
        previous.distance(candidate) <= self.threshold
    }
}

/// Remembers the last point of the running stroke and turns each new point
/// into the segment that should be painted.
#[derive(Debug, Clone, Default)]
pub struct Stroke {
    previous: Option<Point>,
    filter: Option<ShakeFilter>,
}

impl Stroke {
    pub fn new(filter: Option<ShakeFilter>) -> Self {
        Self { previous: None, filter }
    }

    pub fn previous(&self) -> Option<Point> {
        self.previous
    }

    /// Segment to paint for `candidate`, if any.
    ///
    /// The first point of a stroke paints a dot. A point rejected by the shake
    /// filter paints nothing but still becomes the new `previous`.
    pub fn advance(&mut self, candidate: Point) -> Option<(Point, Point)> {
        let previous = self.previous.replace(candidate);
        let Some(previous) = previous else {
            return Some((candidate, candidate));
        };
        match self.filter {
            Some(f) if !f.admits(previous, candidate) => {
                tracing::trace!(?previous, ?candidate, "shake filter rejected jump");
                None
            }
            _ => Some((previous, candidate)),
        }
    }

    /// End the stroke; the next point starts a new one.
    pub fn lift(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filtered_from(p: Point) -> Stroke {
        let mut s = Stroke::new(Some(ShakeFilter::new(50.0)));
        s.advance(p);
        s
    }

    #[test]
    fn large_jump_is_rejected_but_becomes_baseline() {
        let mut s = filtered_from(Point::new(0, 0));
        assert_eq!(s.advance(Point::new(100, 0)), None);
        assert_eq!(s.previous(), Some(Point::new(100, 0)));
        assert_eq!(
            s.advance(Point::new(110, 0)),
            Some((Point::new(100, 0), Point::new(110, 0)))
        );
        assert_eq!(s.previous(), Some(Point::new(110, 0)));
    }

    #[test]
    fn threshold_distance_itself_is_accepted() {
        let mut s = filtered_from(Point::new(0, 0));
        assert_eq!(s.advance(Point::new(30, 40)), Some((Point::new(0, 0), Point::new(30, 40))));
        assert_eq!(s.advance(Point::new(30, 91)), None);
    }

    #[test]
    fn unfiltered_stroke_connects_any_jump() {
        let mut s = Stroke::new(None);
        assert_eq!(s.advance(Point::new(5, 5)), Some((Point::new(5, 5), Point::new(5, 5))));
        assert_eq!(s.advance(Point::new(500, 5)), Some((Point::new(5, 5), Point::new(500, 5))));
    }

    #[test]
    fn lift_starts_a_new_stroke() {
        let mut s = Stroke::new(None);
        s.advance(Point::new(1, 1));
        s.lift();
        assert_eq!(s.previous(), None);
        assert_eq!(s.advance(Point::new(9, 9)), Some((Point::new(9, 9), Point::new(9, 9))));
    }
}
