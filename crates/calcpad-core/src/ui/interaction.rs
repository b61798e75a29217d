// src/ui/interaction.rs
//! Button interaction state machine
//!
//! Button states are not stored. Every frame, [`evaluate`] re-derives the
//! state of one button rectangle from the current [`PointerFrame`] and the
//! shared [`PressTracker`], which is the only interaction state that lives
//! across frames.
//!
//! Buttons must be evaluated in row-major, then column order. The first
//! button to activate claims the frame; later buttons are still hit-tested
//! for hover but cannot activate until the next frame.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

use crate::config::EngineConfig;
use crate::ui::core::PointerFrame;

/// When a button fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressMode {
    /// Fires when a press that started on the button is released on it
    #[default]
    Once,
    /// Fires on release, and repeatedly at an accelerating rate while held
    HoldToRepeat,
    /// Fires once after being held for the configured duration
    HoldToPress,
}

impl PressMode {
    pub fn name(self) -> &'static str {
        match self {
            PressMode::Once => "once",
            PressMode::HoldToRepeat => "hold-to-repeat",
            PressMode::HoldToPress => "hold-to-press",
        }
    }
}

/// Visual and behavioral state of a button for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Idle,
    Hovered,
    /// Pressed inside, no hold trigger reached yet
    ArmedForHold,
    /// Hold-to-repeat has fired at least once and is still held
    Repeating,
    /// Hold-to-press has fired and is still held
    Held,
    /// The button fires this frame
    JustActivated,
}

impl ButtonState {
    /// The button is drawn pressed down.
    pub fn is_pressed(self) -> bool {
        matches!(
            self,
            ButtonState::ArmedForHold
                | ButtonState::Repeating
                | ButtonState::Held
                | ButtonState::JustActivated
        )
    }
}

/// Result of evaluating one button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Response {
    pub state: ButtonState,
    /// The button's action must be dispatched once
    pub activated: bool,
    /// Hold-to-press progress in `[0, 1]` while the button is pressed
    pub hold_progress: Option<f32>,
}

impl Response {
    fn new(state: ButtonState) -> Self {
        Self {
            state,
            activated: false,
            hold_progress: None,
        }
    }

    fn activated() -> Self {
        Self {
            state: ButtonState::JustActivated,
            activated: true,
            hold_progress: None,
        }
    }

    fn with_progress(mut self, progress: f32) -> Self {
        self.hold_progress = Some(progress.clamp(0.0, 1.0));
        self
    }
}

/// Press tracking shared by every button on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PressTracker {
    /// A button already activated this frame
    claimed: bool,
    /// Hold time was already accumulated this frame
    hold_ticked: bool,
    /// A hold-to-press button fired and waits for the release
    held_locked: bool,
    held_elapsed: f32,
    repeat_interval: f32,
    /// Repeats fired during the current hold
    repeats: u32,
    dragging: bool,
}

impl PressTracker {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            claimed: false,
            hold_ticked: false,
            held_locked: false,
            held_elapsed: 0.0,
            repeat_interval: config.initial_repeat_interval,
            repeats: 0,
            dragging: false,
        }
    }

    /// Start a frame: clear the per-frame flags, reset the hold once the
    /// pointer is up and follow the drag state.
    pub fn begin_frame(&mut self, pointer: &PointerFrame, config: &EngineConfig) {
        self.claimed = false;
        self.hold_ticked = false;

        if pointer.was_pressed {
            self.dragging = false;
        }

        if pointer.is_down {
            let threshold = config.drag_threshold_px as i64;
            if !self.dragging && pointer.travel_squared() > threshold * threshold {
                debug!("drag started at {:?}", pointer.position);
                self.dragging = true;
            }
        } else {
            self.reset_hold(config);
            // Dragging stays visible for the release frame
            if !pointer.was_released {
                self.dragging = false;
            }
        }
    }

    fn reset_hold(&mut self, config: &EngineConfig) {
        self.held_locked = false;
        self.held_elapsed = 0.0;
        self.repeat_interval = config.initial_repeat_interval;
        self.repeats = 0;
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    pub fn is_locked(&self) -> bool {
        self.held_locked
    }

    /// The current press moved further than the drag threshold.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn held_elapsed(&self) -> f32 {
        self.held_elapsed
    }

    pub fn repeat_interval(&self) -> f32 {
        self.repeat_interval
    }

    pub fn repeats(&self) -> u32 {
        self.repeats
    }

    /// Hold-to-press progress in `[0, 1]`.
    fn hold_progress(&self, config: &EngineConfig) -> f32 {
        self.held_elapsed / config.hold_to_press_seconds
    }
}

/// Decide the state of the button at `rect` for this frame.
///
/// At most one call per frame returns `activated`, see the module docs for
/// ordering.
pub fn evaluate(
    rect: Rectangle,
    mode: PressMode,
    pointer: &PointerFrame,
    tracker: &mut PressTracker,
    config: &EngineConfig,
) -> Response {
    let inside = rect.contains(pointer.position);
    let press_inside = inside && rect.contains(pointer.press_origin);

    // Release on the button that was pressed
    if !tracker.claimed && pointer.was_released && press_inside && mode != PressMode::HoldToPress
    {
        tracker.claimed = true;
        tracker.reset_hold(config);
        return Response::activated();
    }

    if pointer.is_down && press_inside && !tracker.claimed {
        if tracker.held_locked {
            if mode == PressMode::HoldToPress {
                return Response::new(ButtonState::Held).with_progress(1.0);
            }
        } else {
            if !tracker.hold_ticked {
                tracker.held_elapsed += pointer.delta_seconds;
                tracker.hold_ticked = true;
            }
            return hold(mode, tracker, config);
        }
    }

    // A press anywhere else puts every other button in the hovered look
    if inside || pointer.is_down {
        Response::new(ButtonState::Hovered)
    } else {
        Response::new(ButtonState::Idle)
    }
}

/// Hold rules for a button pressed and held inside its rectangle.
fn hold(mode: PressMode, tracker: &mut PressTracker, config: &EngineConfig) -> Response {
    match mode {
        PressMode::Once => Response::new(ButtonState::ArmedForHold),
        PressMode::HoldToRepeat => {
            if tracker.held_elapsed >= tracker.repeat_interval {
                tracker.claimed = true;
                tracker.held_elapsed = 0.0;
                tracker.repeat_interval =
                    (tracker.repeat_interval * config.repeat_acceleration).max(config.repeat_floor);
                tracker.repeats += 1;
                Response::activated()
            } else if tracker.repeats > 0 {
                Response::new(ButtonState::Repeating)
            } else {
                Response::new(ButtonState::ArmedForHold)
            }
        }
        PressMode::HoldToPress => {
            if tracker.held_elapsed >= config.hold_to_press_seconds {
                tracker.claimed = true;
                tracker.held_locked = true;
                debug!("hold-to-press fired after {}s", tracker.held_elapsed);
                Response::activated().with_progress(1.0)
            } else {
                Response::new(ButtonState::ArmedForHold)
                    .with_progress(tracker.hold_progress(config))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn rect(x: i32) -> Rectangle {
        Rectangle::new(Point::new(x, 0), Size::new(20, 20))
    }

    fn run(
        frame: PointerFrame,
        mode: PressMode,
        tracker: &mut PressTracker,
        config: &EngineConfig,
    ) -> Response {
        tracker.begin_frame(&frame, config);
        evaluate(rect(0), mode, &frame, tracker, config)
    }

    #[test]
    fn test_once_fires_on_release_inside() {
        let config = EngineConfig::default();
        let mut tracker = PressTracker::new(&config);
        let at = Point::new(5, 5);

        let pressed = run(PointerFrame::press(at, 0.016), PressMode::Once, &mut tracker, &config);
        assert_eq!(pressed.state, ButtonState::ArmedForHold);
        assert!(!pressed.activated);

        let released = run(
            PointerFrame::release(at, Point::new(15, 15), 0.016),
            PressMode::Once,
            &mut tracker,
            &config,
        );
        assert_eq!(released.state, ButtonState::JustActivated);
        assert!(released.activated);

        let after = run(PointerFrame::hover(at, 0.016), PressMode::Once, &mut tracker, &config);
        assert_eq!(after.state, ButtonState::Hovered);
        assert!(!after.activated);
    }

    #[test]
    fn test_release_needs_press_origin_inside() {
        let config = EngineConfig::default();
        let mut tracker = PressTracker::new(&config);

        let response = run(
            PointerFrame::release(Point::new(50, 5), Point::new(5, 5), 0.016),
            PressMode::Once,
            &mut tracker,
            &config,
        );
        assert_eq!(response.state, ButtonState::Hovered);
        assert!(!response.activated);

        let response = run(
            PointerFrame::release(Point::new(5, 5), Point::new(50, 5), 0.016),
            PressMode::Once,
            &mut tracker,
            &config,
        );
        assert_eq!(response.state, ButtonState::Idle);
    }

    #[test]
    fn test_single_activation_across_overlapping_buttons() {
        let config = EngineConfig::default();
        let mut tracker = PressTracker::new(&config);
        let at = Point::new(12, 5);
        let frame = PointerFrame::release(at, at, 0.016);
        tracker.begin_frame(&frame, &config);

        // Three overlapping rects all contain the release point
        let responses: Vec<Response> = [0, 5, 10]
            .into_iter()
            .map(|x| evaluate(rect(x), PressMode::Once, &frame, &mut tracker, &config))
            .collect();

        assert!(responses[0].activated);
        assert!(responses[1..].iter().all(|r| !r.activated));
        assert!(responses[1..].iter().all(|r| r.state == ButtonState::Hovered));
        assert!(tracker.is_claimed());

        tracker.begin_frame(&PointerFrame::hover(at, 0.016), &config);
        assert!(!tracker.is_claimed());
    }

    #[test]
    fn test_hold_to_press_fires_once_after_threshold() {
        let config = EngineConfig {
            hold_to_press_seconds: 0.5,
            ..EngineConfig::default()
        };
        let mut tracker = PressTracker::new(&config);
        let at = Point::new(5, 5);

        let hold = PressMode::HoldToPress;
        let first = run(PointerFrame::press(at, 0.125), hold, &mut tracker, &config);
        assert_eq!(first.state, ButtonState::ArmedForHold);
        assert_eq!(first.hold_progress, Some(0.25));

        let mut fired = 0;
        let mut states = Vec::new();
        for _ in 0..8 {
            let response = run(
                PointerFrame::held(at, at, 0.125),
                PressMode::HoldToPress,
                &mut tracker,
                &config,
            );
            fired += response.activated as u32;
            states.push(response.state);
        }

        assert_eq!(fired, 1);
        assert_eq!(states[2], ButtonState::JustActivated);
        assert!(states[3..].iter().all(|s| *s == ButtonState::Held));
        assert!(tracker.is_locked());

        // Releasing never fires a hold-to-press button and unlocks it
        let released = run(
            PointerFrame::release(at, at, 0.125),
            PressMode::HoldToPress,
            &mut tracker,
            &config,
        );
        assert!(!released.activated);
        assert_eq!(released.state, ButtonState::Hovered);
        assert!(!tracker.is_locked());
        assert_eq!(tracker.held_elapsed(), 0.0);
    }

    #[test]
    fn test_hold_to_press_released_early_does_not_fire() {
        let config = EngineConfig::default();
        let mut tracker = PressTracker::new(&config);
        let at = Point::new(5, 5);

        run(PointerFrame::press(at, 0.1), PressMode::HoldToPress, &mut tracker, &config);
        let released = run(
            PointerFrame::release(at, at, 0.1),
            PressMode::HoldToPress,
            &mut tracker,
            &config,
        );
        assert!(!released.activated);
    }

    #[test]
    fn test_hold_to_repeat_accelerates_to_floor() {
        let config = EngineConfig {
            initial_repeat_interval: 0.5,
            repeat_acceleration: 0.5,
            repeat_floor: 0.125,
            ..EngineConfig::default()
        };
        let mut tracker = PressTracker::new(&config);
        let at = Point::new(5, 5);
        let dt = 1.0 / 16.0;

        let mut fired_at = Vec::new();
        for frame in 1..=40 {
            let pointer = if frame == 1 {
                PointerFrame::press(at, dt)
            } else {
                PointerFrame::held(at, at, dt)
            };
            if run(pointer, PressMode::HoldToRepeat, &mut tracker, &config).activated {
                fired_at.push(frame);
            }
        }

        let mut expected = alloc::vec![8, 12];
        expected.extend((14..=40).step_by(2));
        assert_eq!(fired_at, expected);
        assert_eq!(tracker.repeat_interval(), 0.125);
        assert_eq!(tracker.repeats(), 16);

        let gaps: Vec<u32> = fired_at.windows(2).map(|w| w[1] - w[0]).collect();
        assert!(gaps.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn test_repeating_state_between_repeats() {
        let config = EngineConfig {
            initial_repeat_interval: 0.25,
            ..EngineConfig::default()
        };
        let mut tracker = PressTracker::new(&config);
        let at = Point::new(5, 5);

        run(PointerFrame::press(at, 0.25), PressMode::HoldToRepeat, &mut tracker, &config);
        let next = run(
            PointerFrame::held(at, at, 0.01),
            PressMode::HoldToRepeat,
            &mut tracker,
            &config,
        );
        assert_eq!(next.state, ButtonState::Repeating);
    }

    #[test]
    fn test_hold_time_accumulates_once_per_frame() {
        let config = EngineConfig::default();
        let mut tracker = PressTracker::new(&config);
        let at = Point::new(12, 5);
        let frame = PointerFrame::press(at, 0.1);
        tracker.begin_frame(&frame, &config);

        evaluate(rect(0), PressMode::HoldToPress, &frame, &mut tracker, &config);
        evaluate(rect(5), PressMode::HoldToPress, &frame, &mut tracker, &config);
        assert!((tracker.held_elapsed() - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_hover_and_idle() {
        let config = EngineConfig::default();
        let mut tracker = PressTracker::new(&config);
        let once = PressMode::Once;

        let hover = run(PointerFrame::hover(Point::new(5, 5), 0.016), once, &mut tracker, &config);
        assert_eq!(hover.state, ButtonState::Hovered);

        let idle = run(PointerFrame::hover(Point::new(50, 5), 0.016), once, &mut tracker, &config);
        assert_eq!(idle.state, ButtonState::Idle);

        // Pressed elsewhere and dragged over the button
        let dragged = run(
            PointerFrame::held(Point::new(50, 5), Point::new(5, 5), 0.016),
            once,
            &mut tracker,
            &config,
        );
        assert_eq!(dragged.state, ButtonState::Hovered);
    }

    #[test]
    fn test_pointer_down_outside_shows_hovered() {
        let config = EngineConfig::default();
        let mut tracker = PressTracker::new(&config);
        let outside = Point::new(50, 5);

        let press = PointerFrame::press(outside, 0.016);
        let pressed = run(press, PressMode::Once, &mut tracker, &config);
        assert_eq!(pressed.state, ButtonState::Hovered);

        let held = run(
            PointerFrame::held(outside, outside, 0.016),
            PressMode::HoldToPress,
            &mut tracker,
            &config,
        );
        assert_eq!(held.state, ButtonState::Hovered);
        assert!(!held.activated);
        assert_eq!(held.hold_progress, None);

        // Released outside: back to idle
        let released = run(
            PointerFrame::release(outside, outside, 0.016),
            PressMode::Once,
            &mut tracker,
            &config,
        );
        assert_eq!(released.state, ButtonState::Idle);
    }

    #[test]
    fn test_drag_flag_lifecycle() {
        let config = EngineConfig::default();
        let mut tracker = PressTracker::new(&config);
        let origin = Point::new(5, 5);

        tracker.begin_frame(&PointerFrame::press(origin, 0.016), &config);
        assert!(!tracker.is_dragging());

        tracker.begin_frame(&PointerFrame::held(origin, Point::new(5, 30), 0.016), &config);
        assert!(tracker.is_dragging());

        // Still visible on the release frame so lists can ignore the tap
        tracker.begin_frame(&PointerFrame::release(origin, Point::new(5, 30), 0.016), &config);
        assert!(tracker.is_dragging());

        tracker.begin_frame(&PointerFrame::hover(Point::new(5, 30), 0.016), &config);
        assert!(!tracker.is_dragging());
    }
}
