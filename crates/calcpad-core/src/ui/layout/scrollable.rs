// src/ui/layout/scrollable.rs
//! Vertical scroll area for lists taller than their viewport

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle};

use crate::ui::core::PointerFrame;
use crate::ui::interaction::PressTracker;

const SCROLLBAR_WIDTH: u32 = 4;
const SCROLLBAR_MIN_LENGTH: u32 = 12;

/// Scroll state of a vertical list.
///
/// The viewport rectangle comes from the layout every frame; only the offset
/// and the drag anchor are kept here. Content scrolls once the press that
/// began inside the viewport has become a drag.
#[derive(Debug, Clone, Default)]
pub struct ScrollArea {
    /// Current scroll offset, 0 = top
    offset: i32,
    /// Total content height
    content_height: u32,
    /// Viewport height seen by the last update
    viewport_height: u32,
    /// Pointer y at the previous dragged frame
    last_pointer_y: Option<i32>,
}

impl ScrollArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total content height, re-clamping the offset.
    pub fn set_content_height(&mut self, height: u32) {
        self.content_height = height;
        self.constrain_scroll();
    }

    pub fn content_height(&self) -> u32 {
        self.content_height
    }

    /// Current scroll offset
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Scroll by a delta amount
    pub fn scroll_by(&mut self, delta: i32) {
        self.offset = self.offset.saturating_add(delta);
        self.constrain_scroll();
    }

    fn max_offset(&self) -> i32 {
        self.content_height.saturating_sub(self.viewport_height) as i32
    }

    fn constrain_scroll(&mut self) {
        self.offset = self.offset.clamp(0, self.max_offset());
    }

    pub fn can_scroll(&self) -> bool {
        self.content_height > self.viewport_height
    }

    /// Follow this frame's pointer. Returns `true` while the area is being
    /// dragged, so callers can suppress taps on its items.
    pub fn update(
        &mut self,
        viewport: Rectangle,
        pointer: &PointerFrame,
        tracker: &PressTracker,
    ) -> bool {
        self.viewport_height = viewport.size.height;
        self.constrain_scroll();

        let dragging_here =
            pointer.is_down && tracker.is_dragging() && viewport.contains(pointer.press_origin);
        if !dragging_here {
            self.last_pointer_y = None;
            return false;
        }

        // Travel up to the drag threshold counts too
        let last = self.last_pointer_y.unwrap_or(pointer.press_origin.y);
        // Drag down = scroll up
        self.scroll_by(last - pointer.position.y);
        self.last_pointer_y = Some(pointer.position.y);
        true
    }

    /// Screen rectangle of item `index` in a list of `item_height` rows.
    ///
    /// The rectangle may lie partly or fully outside the viewport.
    pub fn item_rect(&self, viewport: Rectangle, index: usize, item_height: u32) -> Rectangle {
        let y = viewport.top_left.y + (index as u32 * item_height) as i32 - self.offset;
        Rectangle::new(
            Point::new(viewport.top_left.x, y),
            Size::new(viewport.size.width, item_height),
        )
    }

    /// Draw the scrollbar at the right edge of the viewport.
    pub fn draw_scrollbar<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        viewport: Rectangle,
        color: Rgb565,
    ) -> Result<(), D::Error> {
        if !self.can_scroll() {
            return Ok(());
        }

        let viewport_height = viewport.size.height;
        let scroll_ratio = self.offset as f32 / self.max_offset() as f32;
        let bar_height = ((viewport_height * viewport_height) / self.content_height)
            .max(SCROLLBAR_MIN_LENGTH)
            .min(viewport_height);
        let bar_y = viewport.top_left.y
            + ((viewport_height - bar_height) as f32 * scroll_ratio) as i32;

        let bar = Rectangle::new(
            Point::new(
                viewport.top_left.x + viewport.size.width as i32 - SCROLLBAR_WIDTH as i32,
                bar_y,
            ),
            Size::new(SCROLLBAR_WIDTH, bar_height),
        );

        bar.into_styled(PrimitiveStyleBuilder::new().fill_color(color).build())
            .draw(display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::framebuffer::FrameBuffer;

    fn viewport() -> Rectangle {
        Rectangle::new(Point::new(0, 10), Size::new(100, 40))
    }

    fn drag(origin: Point, position: Point, tracker: &mut PressTracker) -> PointerFrame {
        let config = EngineConfig::default();
        let frame = PointerFrame::held(origin, position, 0.016);
        tracker.begin_frame(&frame, &config);
        frame
    }

    #[test]
    fn test_drag_scrolls_and_clamps() {
        let mut area = ScrollArea::new();
        area.set_content_height(100);
        let mut tracker = PressTracker::new(&EngineConfig::default());

        let origin = Point::new(50, 45);
        let frame = drag(origin, Point::new(50, 25), &mut tracker);
        assert!(area.update(viewport(), &frame, &tracker));
        assert_eq!(area.offset(), 20);

        let frame = drag(origin, Point::new(50, -200), &mut tracker);
        area.update(viewport(), &frame, &tracker);
        assert_eq!(area.offset(), 60);

        let frame = drag(origin, Point::new(50, 400), &mut tracker);
        area.update(viewport(), &frame, &tracker);
        assert_eq!(area.offset(), 0);
    }

    #[test]
    fn test_small_motion_is_not_a_drag() {
        let mut area = ScrollArea::new();
        area.set_content_height(100);
        let mut tracker = PressTracker::new(&EngineConfig::default());

        let frame = drag(Point::new(50, 45), Point::new(50, 42), &mut tracker);
        assert!(!area.update(viewport(), &frame, &tracker));
        assert_eq!(area.offset(), 0);
    }

    #[test]
    fn test_drag_started_outside_is_ignored() {
        let mut area = ScrollArea::new();
        area.set_content_height(100);
        let mut tracker = PressTracker::new(&EngineConfig::default());

        let frame = drag(Point::new(50, 80), Point::new(50, 20), &mut tracker);
        assert!(!area.update(viewport(), &frame, &tracker));
        assert_eq!(area.offset(), 0);
    }

    #[test]
    fn test_item_rect_follows_offset() {
        let mut area = ScrollArea::new();
        area.set_content_height(200);
        let config = EngineConfig::default();
        let idle = PointerFrame::hover(Point::zero(), 0.0);
        area.update(viewport(), &idle, &PressTracker::new(&config));
        area.scroll_by(15);

        assert_eq!(
            area.item_rect(viewport(), 2, 20),
            Rectangle::new(Point::new(0, 35), Size::new(100, 20))
        );
    }

    #[test]
    fn test_scrollbar_only_when_content_overflows() {
        let mut display = FrameBuffer::new(Size::new(100, 60));
        let config = EngineConfig::default();
        let mut area = ScrollArea::new();
        area.set_content_height(30);
        let idle = PointerFrame::hover(Point::zero(), 0.0);
        area.update(viewport(), &idle, &PressTracker::new(&config));
        area.draw_scrollbar(&mut display, viewport(), Rgb565::WHITE).unwrap();
        assert_eq!(display.count(Rgb565::WHITE), 0);

        area.set_content_height(80);
        area.scroll_by(i32::MAX);
        area.draw_scrollbar(&mut display, viewport(), Rgb565::WHITE).unwrap();
        // 40 * 40 / 80 = 20 px bar at the bottom of the viewport
        assert_eq!(display.count(Rgb565::WHITE), (SCROLLBAR_WIDTH * 20) as usize);
        assert_eq!(display.pixel(Point::new(99, 49)), Some(Rgb565::WHITE));
    }
}
