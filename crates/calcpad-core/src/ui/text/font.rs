// src/ui/text/font.rs
//! Font metrics and glyph drawing
//!
//! The fitter only needs [`TextMetrics`]; drawing goes through
//! [`TextRenderer`]. [`MonoTypeface`] implements both on top of the
//! embedded-graphics ASCII mono fonts.

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, ascii};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};

/// Measures rendered text.
///
/// `font_size` is the nominal line height in pixels; `letter_spacing` is
/// extra space inserted between adjacent characters.
pub trait TextMetrics {
    fn measure(&self, text: &str, font_size: u32, letter_spacing: u32) -> Size;
}

impl<F> TextMetrics for F
where
    F: Fn(&str, u32, u32) -> Size,
{
    fn measure(&self, text: &str, font_size: u32, letter_spacing: u32) -> Size {
        self(text, font_size, letter_spacing)
    }
}

/// Draws text whose top-left corner is `position`.
pub trait TextRenderer: TextMetrics {
    fn draw_text<D: DrawTarget<Color = Rgb565>>(
        &self,
        target: &mut D,
        text: &str,
        position: Point,
        font_size: u32,
        letter_spacing: u32,
        color: Rgb565,
    ) -> Result<(), D::Error>;
}

/// Available fonts, ascending by height.
const FONTS: [&MonoFont<'static>; 11] = [
    &ascii::FONT_4X6,
    &ascii::FONT_5X7,
    &ascii::FONT_5X8,
    &ascii::FONT_6X9,
    &ascii::FONT_6X10,
    &ascii::FONT_6X12,
    &ascii::FONT_7X13,
    &ascii::FONT_7X14,
    &ascii::FONT_9X15,
    &ascii::FONT_9X18,
    &ascii::FONT_10X20,
];

/// Tallest font height; larger sizes are drawn with integer scaling.
const MAX_NATIVE_HEIGHT: u32 = 20;

/// Typeface backed by the embedded-graphics ASCII mono fonts.
///
/// A font size picks the tallest font not taller than it. Sizes above 20 px
/// scale a smaller font by an integer factor, so a size of 40 draws
/// `FONT_10X20` at 2x.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonoTypeface;

impl MonoTypeface {
    pub fn new() -> Self {
        Self
    }

    /// Font and integer scale used for `font_size`.
    pub fn font_for(&self, font_size: u32) -> (&'static MonoFont<'static>, u32) {
        let font_size = font_size.max(1);
        let scale = (font_size / MAX_NATIVE_HEIGHT).max(1);
        let base = font_size / scale;

        let font = FONTS
            .iter()
            .rev()
            .find(|font| font.character_size.height <= base)
            .copied()
            .unwrap_or(FONTS[0]);
        (font, scale)
    }

    /// Horizontal distance from one glyph origin to the next.
    fn advance(font: &MonoFont<'_>, scale: u32, letter_spacing: u32) -> u32 {
        (font.character_size.width + font.character_spacing) * scale + letter_spacing
    }
}

impl TextMetrics for MonoTypeface {
    fn measure(&self, text: &str, font_size: u32, letter_spacing: u32) -> Size {
        let (font, scale) = self.font_for(font_size);
        let height = font.character_size.height * scale;
        let count = text.chars().count() as u32;
        if count == 0 {
            return Size::new(0, height);
        }

        let width = font.character_size.width * scale
            + (count - 1) * Self::advance(font, scale, letter_spacing);
        Size::new(width, height)
    }
}

impl TextRenderer for MonoTypeface {
    fn draw_text<D: DrawTarget<Color = Rgb565>>(
        &self,
        target: &mut D,
        text: &str,
        position: Point,
        font_size: u32,
        letter_spacing: u32,
        color: Rgb565,
    ) -> Result<(), D::Error> {
        let (font, scale) = self.font_for(font_size);
        let style = MonoTextStyle::new(font, color);
        let advance = Self::advance(font, scale, letter_spacing) as i32;

        let mut buffer = [0u8; 4];
        let mut origin = position;
        for ch in text.chars() {
            let glyph: &str = ch.encode_utf8(&mut buffer);
            if scale == 1 {
                Text::with_baseline(glyph, origin, style, Baseline::Top).draw(target)?;
            } else {
                let mut scaled = Scaled {
                    parent: target,
                    origin,
                    scale,
                };
                Text::with_baseline(glyph, Point::zero(), style, Baseline::Top)
                    .draw(&mut scaled)?;
            }
            origin.x += advance;
        }
        Ok(())
    }
}

/// Draw target that blows every pixel up to a `scale` x `scale` block.
struct Scaled<'a, D> {
    parent: &'a mut D,
    origin: Point,
    scale: u32,
}

impl<D: DrawTarget<Color = Rgb565>> Dimensions for Scaled<'_, D> {
    fn bounding_box(&self) -> Rectangle {
        let parent = self.parent.bounding_box();
        let scale = self.scale as i32;
        let top_left = parent.top_left - self.origin;
        Rectangle::new(
            Point::new(top_left.x.div_euclid(scale), top_left.y.div_euclid(scale)),
            Size::new(
                parent.size.width.div_ceil(self.scale) + 1,
                parent.size.height.div_ceil(self.scale) + 1,
            ),
        )
    }
}

impl<D: DrawTarget<Color = Rgb565>> DrawTarget for Scaled<'_, D> {
    type Color = Rgb565;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let scale = self.scale as i32;
        for Pixel(point, color) in pixels {
            let block = Rectangle::new(
                self.origin + Point::new(point.x * scale, point.y * scale),
                Size::new(self.scale, self.scale),
            );
            self.parent.fill_solid(&block, color)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;

    #[test]
    fn test_font_selection() {
        let typeface = MonoTypeface::new();
        let height = |size| {
            let (font, scale) = typeface.font_for(size);
            (font.character_size.height, scale)
        };

        assert_eq!(height(1), (6, 1));
        assert_eq!(height(11), (10, 1));
        assert_eq!(height(20), (20, 1));
        assert_eq!(height(40), (20, 2));
        assert_eq!(height(50), (20, 2));
        assert_eq!(height(39), (20, 1));
        assert_eq!(height(60), (20, 3));
    }

    #[test]
    fn test_measure_includes_spacing() {
        let typeface = MonoTypeface::new();
        // FONT_6X10 has no built-in character spacing
        assert_eq!(typeface.measure("123", 10, 0), Size::new(18, 10));
        assert_eq!(typeface.measure("123", 10, 2), Size::new(22, 10));
        assert_eq!(typeface.measure("", 10, 2), Size::new(0, 10));
        assert_eq!(typeface.measure("12", 40, 1), Size::new(41, 40));
    }

    #[test]
    fn test_measure_is_monotonic_in_size() {
        let typeface = MonoTypeface::new();
        let mut previous = Size::zero();
        for size in 1..=64 {
            let measured = typeface.measure("12+3", size, 1);
            assert!(measured.width >= previous.width);
            assert!(measured.height >= previous.height);
            assert!(measured.height <= size.max(6));
            previous = measured;
        }
    }

    #[test]
    fn test_drawn_text_stays_inside_measured_box() {
        let typeface = MonoTypeface::new();
        let mut display = FrameBuffer::new(Size::new(120, 60));
        let position = Point::new(5, 5);
        let size = typeface.measure("8.8", 40, 1);

        typeface
            .draw_text(&mut display, "8.8", position, 40, 1, Rgb565::WHITE)
            .unwrap();

        let drawn = display.count(Rgb565::WHITE);
        assert!(drawn > 0);
        assert_eq!(
            display.count_in(&Rectangle::new(position, size), Rgb565::WHITE),
            drawn
        );
        // Scaled glyph pixels come in 2x2 blocks
        assert_eq!(drawn % 4, 0);
    }
}
