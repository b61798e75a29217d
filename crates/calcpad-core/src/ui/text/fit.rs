// src/ui/text/fit.rs
//! Fitting text into a rectangle
//!
//! [`fit`] applies a [`TextFormat`]'s overflow policy against a rectangle,
//! anchors the result according to its alignment and checks the contrast
//! against the background it will be drawn on.

use alloc::string::String;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::Vec as BoundedVec;

use super::font::{TextMetrics, TextRenderer};
use crate::config::EngineConfig;
use crate::diagnostics::Diagnostic;
use crate::ui::styling::colors::channel_distance;

const ELLIPSIS: &str = "...";

/// Where text sits inside its rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    TopLeft,
    Top,
    TopRight,
    Left,
    #[default]
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl TextAlign {
    pub const ALL: [TextAlign; 9] = [
        TextAlign::TopLeft,
        TextAlign::Top,
        TextAlign::TopRight,
        TextAlign::Left,
        TextAlign::Center,
        TextAlign::Right,
        TextAlign::BottomLeft,
        TextAlign::Bottom,
        TextAlign::BottomRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TextAlign::TopLeft => "top-left",
            TextAlign::Top => "top",
            TextAlign::TopRight => "top-right",
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::BottomLeft => "bottom-left",
            TextAlign::Bottom => "bottom",
            TextAlign::BottomRight => "bottom-right",
        }
    }

    /// Offset of a `text` sized box inside a `rect` sized box.
    fn offset(self, rect: Size, text: Size) -> Point {
        let free_x = rect.width as i32 - text.width as i32;
        let free_y = rect.height as i32 - text.height as i32;

        let x = match self {
            TextAlign::TopLeft | TextAlign::Left | TextAlign::BottomLeft => 0,
            TextAlign::Top | TextAlign::Center | TextAlign::Bottom => free_x / 2,
            TextAlign::TopRight | TextAlign::Right | TextAlign::BottomRight => free_x,
        };
        let y = match self {
            TextAlign::TopLeft | TextAlign::Top | TextAlign::TopRight => 0,
            TextAlign::Left | TextAlign::Center | TextAlign::Right => free_y / 2,
            TextAlign::BottomLeft | TextAlign::Bottom | TextAlign::BottomRight => free_y,
        };
        Point::new(x, y)
    }
}

/// What to do with text that does not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    /// Draw as is and flag the overflow
    #[default]
    Overflow,
    /// Step the font size down until the text fits
    Shrink,
    /// Cut characters and end with "..."
    Truncate,
}

impl Overflow {
    pub fn name(self) -> &'static str {
        match self {
            Overflow::Overflow => "overflow",
            Overflow::Shrink => "shrink",
            Overflow::Truncate => "truncate",
        }
    }
}

/// Text plus everything needed to fit and draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFormat {
    pub text: String,
    pub font_size: u32,
    pub color: Rgb565,
    pub letter_spacing: u32,
    pub alignment: TextAlign,
    pub overflow: Overflow,
}

impl TextFormat {
    /// Centered text with one pixel of letter spacing that may overflow.
    pub fn new(text: impl Into<String>, font_size: u32, color: Rgb565) -> Self {
        Self {
            text: text.into(),
            font_size,
            color,
            letter_spacing: 1,
            alignment: TextAlign::Center,
            overflow: Overflow::Overflow,
        }
    }

    pub fn with_alignment(mut self, alignment: TextAlign) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }
}

/// Outcome of [`fit`].
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    /// Text to draw, possibly truncated
    pub text: String,
    /// Font size to draw with, possibly shrunk
    pub font_size: u32,
    /// Measured size of `text` at `font_size`
    pub size: Size,
    /// Top-left corner of the text
    pub position: Point,
    /// The text is still larger than its rectangle
    pub overflowing: bool,
    /// Contrast distance, present only when below the threshold
    pub low_contrast: Option<u8>,
}

impl FittedText {
    /// Diagnostics this fit should raise for a rectangle of `available` size.
    pub fn diagnostics(&self, available: Size, threshold: u8) -> BoundedVec<Diagnostic, 2> {
        let mut issues = BoundedVec::new();
        if self.overflowing {
            issues
                .push(Diagnostic::TextOverflow {
                    snippet: Diagnostic::snippet(&self.text),
                    needed: self.size,
                    available,
                })
                .ok();
        }
        if let Some(distance) = self.low_contrast {
            issues
                .push(Diagnostic::LowContrast {
                    snippet: Diagnostic::snippet(&self.text),
                    distance,
                    threshold,
                })
                .ok();
        }
        issues
    }

    /// Draw the fitted text in `color`.
    pub fn draw<D, R>(
        &self,
        target: &mut D,
        renderer: &R,
        color: Rgb565,
        letter_spacing: u32,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
        R: TextRenderer,
    {
        if self.text.is_empty() {
            return Ok(());
        }
        renderer.draw_text(
            target,
            &self.text,
            self.position,
            self.font_size,
            letter_spacing,
            color,
        )
    }
}

fn exceeds(measured: Size, available: Size) -> bool {
    measured.width > available.width || measured.height > available.height
}

/// Characters of `font_size` text that fit in `width`, or `None` when the
/// metrics give no usable advance estimate.
fn char_budget<M: TextMetrics>(
    metrics: &M,
    width: u32,
    font_size: u32,
    letter_spacing: u32,
) -> Option<usize> {
    let wide = metrics.measure("W", font_size, letter_spacing).width;
    let pair = metrics.measure("WW", font_size, letter_spacing).width;
    let advance = pair.saturating_sub(wide);
    if wide == 0 || advance == 0 {
        return None;
    }
    if width < wide {
        return Some(0);
    }
    Some(((width - wide) / advance + 1) as usize)
}

/// Cut `text` to at most `budget` characters, ending in "..." when there is
/// room for more than the ellipsis itself.
fn truncate(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return String::from(text);
    }
    if budget <= ELLIPSIS.len() {
        return text.chars().take(budget).collect();
    }
    let mut cut: String = text.chars().take(budget - ELLIPSIS.len()).collect();
    cut.push_str(ELLIPSIS);
    cut
}

/// Fit `format` into `rect`.
///
/// `background` is the color the text will be drawn on; without one no
/// contrast check is made.
pub fn fit<M: TextMetrics>(
    rect: Rectangle,
    format: &TextFormat,
    background: Option<Rgb565>,
    metrics: &M,
    config: &EngineConfig,
) -> FittedText {
    let available = rect.size;
    let spacing = format.letter_spacing;
    let mut font_size = format.font_size;
    let mut text = format.text.clone();
    let mut size = metrics.measure(&text, font_size, spacing);

    match format.overflow {
        Overflow::Overflow => {}
        Overflow::Shrink => {
            while exceeds(size, available) && font_size > config.min_font_size {
                font_size -= 1;
                size = metrics.measure(&text, font_size, spacing);
            }
        }
        Overflow::Truncate => {
            if let Some(budget) = char_budget(metrics, available.width, font_size, spacing) {
                let cut = truncate(&text, budget);
                if cut != text {
                    text = cut;
                    size = metrics.measure(&text, font_size, spacing);
                }
            }
        }
    }

    let low_contrast = background
        .map(|background| channel_distance(format.color, background))
        .filter(|distance| *distance < config.contrast_threshold);

    FittedText {
        position: rect.top_left + format.alignment.offset(available, size),
        overflowing: exceeds(size, available),
        text,
        font_size,
        size,
        low_contrast,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::styling::colors::{COLOR_DIGIT, WHITE};
    use crate::ui::text::font::MonoTypeface;

    /// Half-square glyphs: width = chars * size / 2, height = size.
    fn half_width(text: &str, font_size: u32, _letter_spacing: u32) -> Size {
        Size::new(text.chars().count() as u32 * font_size / 2, font_size)
    }

    fn rect(width: u32, height: u32) -> Rectangle {
        Rectangle::new(Point::new(10, 20), Size::new(width, height))
    }

    fn format(text: &str, font_size: u32, overflow: Overflow) -> TextFormat {
        TextFormat::new(text, font_size, WHITE).with_overflow(overflow)
    }

    #[test]
    fn test_truncate_to_five_wide_chars() {
        let config = EngineConfig::default();
        let fitted = fit(
            rect(50, 20),
            &format("ABCDEFGH", 20, Overflow::Truncate),
            None,
            &half_width,
            &config,
        );

        assert_eq!(fitted.text, "AB...");
        assert_eq!(fitted.size, Size::new(50, 20));
        assert!(!fitted.overflowing);
    }

    #[test]
    fn test_truncate_is_idempotent() {
        let config = EngineConfig::default();
        let once = fit(
            rect(50, 20),
            &format("ABCDEFGH", 20, Overflow::Truncate),
            None,
            &half_width,
            &config,
        );
        let twice = fit(
            rect(50, 20),
            &format(&once.text, 20, Overflow::Truncate),
            None,
            &half_width,
            &config,
        );

        assert_eq!(once, twice);
    }

    #[test]
    fn test_truncate_keeps_text_within_budget() {
        let config = EngineConfig::default();
        let fitted = fit(
            rect(50, 20),
            &format("ABCDE", 20, Overflow::Truncate),
            None,
            &half_width,
            &config,
        );
        assert_eq!(fitted.text, "ABCDE");
    }

    #[test]
    fn test_small_budget_is_a_hard_slice() {
        let config = EngineConfig::default();
        let fitted = fit(
            rect(30, 20),
            &format("ABCDEFGH", 20, Overflow::Truncate),
            None,
            &half_width,
            &config,
        );
        assert_eq!(fitted.text, "ABC");

        let fitted = fit(
            rect(5, 20),
            &format("ABCDEFGH", 20, Overflow::Truncate),
            None,
            &half_width,
            &config,
        );
        assert_eq!(fitted.text, "");
    }

    #[test]
    fn test_shrink_terminates_and_fits() {
        let config = EngineConfig::default();
        let input = format("1234567890", 40, Overflow::Shrink);
        let fitted = fit(rect(100, 30), &input, None, &half_width, &config);

        assert_eq!(fitted.font_size, 20);
        assert_eq!(fitted.size, Size::new(100, 20));
        assert!(!fitted.overflowing);
    }

    #[test]
    fn test_shrink_checks_height_too() {
        let config = EngineConfig::default();
        let fitted = fit(
            rect(200, 12),
            &format("12", 40, Overflow::Shrink),
            None,
            &half_width,
            &config,
        );
        assert_eq!(fitted.font_size, 12);
    }

    #[test]
    fn test_shrink_stops_at_floor() {
        let config = EngineConfig {
            min_font_size: 8,
            ..EngineConfig::default()
        };
        let fitted = fit(
            rect(10, 10),
            &format("1234567890", 30, Overflow::Shrink),
            None,
            &half_width,
            &config,
        );

        assert_eq!(fitted.font_size, 8);
        assert!(fitted.overflowing);
        assert_eq!(fitted.diagnostics(Size::new(10, 10), 75).len(), 1);
    }

    #[test]
    fn test_shrink_with_real_typeface() {
        let config = EngineConfig::default();
        let typeface = MonoTypeface::new();
        for width in [30, 60, 90, 160] {
            let fitted = fit(
                rect(width, 40),
                &format("12345.678", 40, Overflow::Shrink),
                None,
                &typeface,
                &config,
            );
            assert!(fitted.font_size <= 40);
            assert!(!fitted.overflowing || fitted.font_size == config.min_font_size);
        }
    }

    #[test]
    fn test_overflow_only_flags() {
        let config = EngineConfig::default();
        let fitted = fit(
            rect(20, 20),
            &format("ABCDEFGH", 20, Overflow::Overflow),
            None,
            &half_width,
            &config,
        );

        assert_eq!(fitted.text, "ABCDEFGH");
        assert_eq!(fitted.font_size, 20);
        assert!(fitted.overflowing);
    }

    #[test]
    fn test_anchors() {
        let config = EngineConfig::default();
        // 40x10 text in a 100x50 rect at (10, 20)
        let expected = [
            (TextAlign::TopLeft, Point::new(10, 20)),
            (TextAlign::Top, Point::new(40, 20)),
            (TextAlign::TopRight, Point::new(70, 20)),
            (TextAlign::Left, Point::new(10, 40)),
            (TextAlign::Center, Point::new(40, 40)),
            (TextAlign::Right, Point::new(70, 40)),
            (TextAlign::BottomLeft, Point::new(10, 60)),
            (TextAlign::Bottom, Point::new(40, 60)),
            (TextAlign::BottomRight, Point::new(70, 60)),
        ];

        for (alignment, position) in expected {
            let input = format("12345678", 10, Overflow::Overflow).with_alignment(alignment);
            let fitted = fit(rect(100, 50), &input, None, &half_width, &config);
            assert_eq!(fitted.position, position, "{}", alignment.name());
        }
        assert_eq!(TextAlign::ALL.len(), expected.len());
    }

    #[test]
    fn test_contrast_check() {
        let config = EngineConfig::default();
        let readable = fit(
            rect(100, 50),
            &format("7", 10, Overflow::Overflow),
            Some(COLOR_DIGIT),
            &half_width,
            &config,
        );
        assert_eq!(readable.low_contrast, None);

        let muddy = TextFormat::new("7", 10, COLOR_DIGIT);
        let fitted = fit(rect(100, 50), &muddy, Some(COLOR_DIGIT), &half_width, &config);
        assert_eq!(fitted.low_contrast, Some(0));
        assert!(matches!(
            fitted.diagnostics(Size::new(100, 50), 75).as_slice(),
            [Diagnostic::LowContrast { distance: 0, .. }]
        ));

        let unchecked = fit(rect(100, 50), &muddy, None, &half_width, &config);
        assert_eq!(unchecked.low_contrast, None);
    }
}
