// src/ui/core.rs
//! Core pointer types and the action dispatch seam

use embedded_graphics::prelude::*;

/// One frame of normalized pointer input.
///
/// Hosts build exactly one of these per loop iteration (usually through
/// [`PointerTracker`]) before any button is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerFrame {
    /// Current pointer position
    pub position: Point,
    /// Position recorded when the pointer last went from up to down
    pub press_origin: Point,
    /// Pointer is held down at the end of this frame
    pub is_down: bool,
    /// Pointer went down during this frame
    pub was_pressed: bool,
    /// Pointer went up during this frame
    pub was_released: bool,
    /// Seconds elapsed since the previous frame
    pub delta_seconds: f32,
}

impl PointerFrame {
    /// A frame with the pointer resting (not down) at `position`.
    pub fn hover(position: Point, delta_seconds: f32) -> Self {
        Self {
            position,
            press_origin: position,
            delta_seconds,
            ..Self::default()
        }
    }

    /// A frame where the pointer went down at `position`.
    pub fn press(position: Point, delta_seconds: f32) -> Self {
        Self {
            position,
            press_origin: position,
            is_down: true,
            was_pressed: true,
            was_released: false,
            delta_seconds,
        }
    }

    /// A frame where the pointer, pressed at `origin`, is still down at `position`.
    pub fn held(origin: Point, position: Point, delta_seconds: f32) -> Self {
        Self {
            position,
            press_origin: origin,
            is_down: true,
            was_pressed: false,
            was_released: false,
            delta_seconds,
        }
    }

    /// A frame where the pointer, pressed at `origin`, was let go at `position`.
    pub fn release(origin: Point, position: Point, delta_seconds: f32) -> Self {
        Self {
            position,
            press_origin: origin,
            is_down: false,
            was_pressed: false,
            was_released: true,
            delta_seconds,
        }
    }

    /// Squared distance travelled since the press began.
    pub fn travel_squared(&self) -> i64 {
        let delta = self.position - self.press_origin;
        let (dx, dy) = (delta.x as i64, delta.y as i64);
        dx * dx + dy * dy
    }
}

/// Accumulates raw host pointer events between frames.
///
/// Window systems report presses, releases and motion as separate events,
/// possibly several per frame. The tracker records the press origin and the
/// edges and hands out one [`PointerFrame`] per frame.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    position: Point,
    press_origin: Point,
    is_down: bool,
    pressed: bool,
    released: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer moved (hover or drag).
    pub fn move_to(&mut self, position: Point) {
        self.position = position;
    }

    /// Pointer went down at `position`.
    pub fn press(&mut self, position: Point) {
        self.position = position;
        if !self.is_down {
            self.is_down = true;
            self.press_origin = position;
            self.pressed = true;
        }
    }

    /// Pointer went up at `position`.
    pub fn release(&mut self, position: Point) {
        self.position = position;
        if self.is_down {
            self.is_down = false;
            self.released = true;
        }
    }

    /// Produce this frame's snapshot and clear the edge flags.
    pub fn frame(&mut self, delta_seconds: f32) -> PointerFrame {
        let frame = PointerFrame {
            position: self.position,
            press_origin: self.press_origin,
            is_down: self.is_down,
            was_pressed: self.pressed,
            was_released: self.released,
            delta_seconds,
        };
        self.pressed = false;
        self.released = false;
        frame
    }
}

/// Receives the actions of activated buttons.
///
/// The engine calls [`ActionSink::dispatch`] exactly once per qualifying
/// activation; hosts never fire a button's action themselves.
pub trait ActionSink<A> {
    fn dispatch(&mut self, action: A);
}

impl<A, F> ActionSink<A> for F
where
    F: FnMut(A),
{
    fn dispatch(&mut self, action: A) {
        self(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_records_press_origin_and_edges() {
        let mut tracker = PointerTracker::new();
        tracker.move_to(Point::new(3, 3));
        tracker.press(Point::new(10, 12));
        tracker.move_to(Point::new(14, 12));

        let frame = tracker.frame(0.016);
        assert!(frame.is_down && frame.was_pressed && !frame.was_released);
        assert_eq!(frame.press_origin, Point::new(10, 12));
        assert_eq!(frame.position, Point::new(14, 12));
        assert_eq!(frame.travel_squared(), 16);

        let frame = tracker.frame(0.016);
        assert!(frame.is_down && !frame.was_pressed);

        tracker.release(Point::new(15, 12));
        let frame = tracker.frame(0.016);
        assert!(!frame.is_down && frame.was_released);
        assert_eq!(frame.press_origin, Point::new(10, 12));
    }

    #[test]
    fn test_click_within_one_frame_keeps_both_edges() {
        let mut tracker = PointerTracker::new();
        tracker.press(Point::new(5, 5));
        tracker.release(Point::new(5, 6));

        let frame = tracker.frame(0.016);
        assert!(frame.was_pressed && frame.was_released && !frame.is_down);
        assert_eq!(frame.press_origin, Point::new(5, 5));
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = 0;
        {
            let mut sink = |value: u32| seen += value;
            sink.dispatch(2);
            sink.dispatch(3);
        }
        assert_eq!(seen, 5);
    }
}
