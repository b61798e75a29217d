// src/ui/components/text.rs
//! Text box component for displaying fitted text

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle, StrokeAlignment};

use crate::config::EngineConfig;
use crate::ui::compositor::{BoxLayers, Border, NoIcons, draw_box};
use crate::ui::text::{FittedText, TextFormat, TextRenderer, fit};

/// Non-interactive text on an optional background and border.
///
/// # Examples
/// ```ignore
/// let display = TextBox::new(
///     TextFormat::new("12+3", 40, WHITE)
///         .with_alignment(TextAlign::Right)
///         .with_overflow(Overflow::Shrink),
/// )
/// .with_background(palette.surface);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub format: TextFormat,
    pub background: Option<Rgb565>,
    pub border: Option<Border>,
}

impl TextBox {
    pub fn new(format: TextFormat) -> Self {
        Self {
            format,
            background: None,
            border: None,
        }
    }

    pub fn with_background(mut self, color: Rgb565) -> Self {
        self.background = Some(color);
        self
    }

    pub fn with_border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }

    /// Draw the box and its fitted text.
    pub fn draw<D, R>(
        &self,
        target: &mut D,
        rect: Rectangle,
        renderer: &R,
        config: &EngineConfig,
    ) -> Result<FittedText, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
        R: TextRenderer,
    {
        let content = match self.background {
            Some(background) => {
                let layers = BoxLayers {
                    background,
                    border: self.border,
                    shadow: None,
                    icon: None,
                };
                draw_box(target, rect, layers, &NoIcons, config)?.content
            }
            None => self.draw_border_only(target, rect)?,
        };

        let fitted = fit(content, &self.format, self.background, renderer, config);
        fitted.draw(target, renderer, self.format.color, self.format.letter_spacing)?;
        Ok(fitted)
    }

    fn draw_border_only<D>(&self, target: &mut D, rect: Rectangle) -> Result<Rectangle, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(border) = self.border.filter(|border| border.thickness > 0) else {
            return Ok(rect);
        };

        rect.into_styled(
            PrimitiveStyleBuilder::new()
                .stroke_color(border.color)
                .stroke_width(border.thickness)
                .stroke_alignment(StrokeAlignment::Inside)
                .build(),
        )
        .draw(target)?;

        let t = border.thickness;
        Ok(Rectangle::new(
            rect.top_left + Point::new(t as i32, t as i32),
            Size::new(
                rect.size.width.saturating_sub(2 * t),
                rect.size.height.saturating_sub(2 * t),
            ),
        ))
    }
}
