// src/ui/components/button.rs
//! Button component: a styled box with an optional label and an action

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use crate::config::EngineConfig;
use crate::ui::compositor::{BoxLayers, BoxReport, IconSource, draw_box};
use crate::ui::interaction::{PressMode, Response};
use crate::ui::styling::ButtonStyle;
use crate::ui::text::{FittedText, TextFormat, TextRenderer, fit};

/// Button description, rebuilt every frame.
///
/// The engine dispatches `action` when the button activates; callers never
/// run it themselves.
///
/// # Examples
/// ```ignore
/// let seven = Button::new(Key::Digit(7), ButtonVariant::Digit.to_style(&palette, kind))
///     .with_label(TextFormat::new("7", 20, palette.text_primary));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Button<A> {
    pub label: Option<TextFormat>,
    pub action: A,
    pub style: ButtonStyle,
    pub press_mode: PressMode,
}

/// Everything drawing a button produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonPaint {
    pub report: BoxReport,
    pub label: Option<FittedText>,
}

impl<A> Button<A> {
    pub fn new(action: A, style: ButtonStyle) -> Self {
        Self {
            label: None,
            action,
            style,
            press_mode: PressMode::Once,
        }
    }

    pub fn with_label(mut self, label: TextFormat) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_press_mode(mut self, press_mode: PressMode) -> Self {
        self.press_mode = press_mode;
        self
    }

    /// Draw the button in the state described by `response`.
    pub fn draw<D, R, S>(
        &self,
        target: &mut D,
        rect: Rectangle,
        response: &Response,
        renderer: &R,
        icons: &S,
        config: &EngineConfig,
    ) -> Result<ButtonPaint, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
        R: TextRenderer,
        S: IconSource + ?Sized,
    {
        let fill = self.style.color_for(response.state);
        let report = draw_box(
            target,
            rect,
            BoxLayers {
                background: fill,
                border: self.style.border,
                shadow: self.style.shadow,
                icon: self.style.icon.as_ref(),
            },
            icons,
            config,
        )?;

        if let Some(progress) = response.hold_progress.filter(|p| *p > 0.0) {
            self.draw_progress(target, rect, progress)?;
        }

        let label = match &self.label {
            Some(format) => {
                let fitted = fit(report.content, format, Some(fill), renderer, config);
                fitted.draw(target, renderer, format.color, format.letter_spacing)?;
                Some(fitted)
            }
            None => None,
        };

        Ok(ButtonPaint { report, label })
    }

    /// Bottom-up hold progress fill, pushed into the shadow.
    fn draw_progress<D>(
        &self,
        target: &mut D,
        rect: Rectangle,
        progress: f32,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let height = ((rect.size.height as f32 * progress) as u32).min(rect.size.height);
        let offset = self.style.shadow.map_or(0, |shadow| shadow.distance) as i32;
        let top = rect.top_left.y + (rect.size.height - height) as i32;

        Rectangle::new(
            Point::new(rect.top_left.x + offset, top + offset),
            Size::new(rect.size.width, height),
        )
        .into_styled(PrimitiveStyle::with_fill(self.style.progress_color()))
        .draw(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;
    use crate::ui::compositor::{NoIcons, Shadow, ShadowKind};
    use crate::ui::interaction::ButtonState;
    use crate::ui::text::MonoTypeface;

    const IDLE: Rgb565 = Rgb565::new(8, 16, 8);
    const PROGRESS: Rgb565 = Rgb565::GREEN;

    fn rect() -> Rectangle {
        Rectangle::new(Point::new(0, 0), Size::new(40, 20))
    }

    fn response(state: ButtonState, hold_progress: Option<f32>) -> Response {
        Response {
            state,
            activated: false,
            hold_progress,
        }
    }

    #[test]
    fn test_state_color_fills_box() {
        let button = Button::new((), ButtonStyle::new(IDLE).with_pressed(Rgb565::RED));
        let mut display = FrameBuffer::new(Size::new(64, 32));

        button
            .draw(
                &mut display,
                rect(),
                &response(ButtonState::Idle, None),
                &MonoTypeface,
                &NoIcons,
                &EngineConfig::default(),
            )
            .unwrap();
        assert_eq!(display.count(IDLE), 800);

        button
            .draw(
                &mut display,
                rect(),
                &response(ButtonState::ArmedForHold, None),
                &MonoTypeface,
                &NoIcons,
                &EngineConfig::default(),
            )
            .unwrap();
        assert_eq!(display.count(Rgb565::RED), 800);
    }

    #[test]
    fn test_progress_grows_from_bottom_into_shadow() {
        let style = ButtonStyle::new(IDLE)
            .with_progress(PROGRESS)
            .with_shadow(Shadow::new(Rgb565::BLUE, 2, ShadowKind::Float));
        let button = Button::new((), style).with_press_mode(PressMode::HoldToPress);
        let mut display = FrameBuffer::new(Size::new(64, 32));

        button
            .draw(
                &mut display,
                rect(),
                &response(ButtonState::ArmedForHold, Some(0.25)),
                &MonoTypeface,
                &NoIcons,
                &EngineConfig::default(),
            )
            .unwrap();

        // 5 of 20 rows, shifted by the 2px shadow distance
        assert_eq!(display.count(PROGRESS), 40 * 5);
        assert_eq!(display.pixel(Point::new(2, 17)), Some(PROGRESS));
        assert_eq!(display.pixel(Point::new(41, 21)), Some(PROGRESS));
        assert_ne!(display.pixel(Point::new(2, 16)), Some(PROGRESS));
    }

    #[test]
    fn test_label_is_fitted_against_state_color() {
        let button = Button::new((), ButtonStyle::new(IDLE))
            .with_label(TextFormat::new("12", 10, IDLE));
        let mut display = FrameBuffer::new(Size::new(64, 32));

        let paint = button
            .draw(
                &mut display,
                rect(),
                &response(ButtonState::Idle, None),
                &MonoTypeface,
                &NoIcons,
                &EngineConfig::default(),
            )
            .unwrap();

        let label = paint.label.unwrap();
        assert_eq!(label.low_contrast, Some(0));
        // 13x10 text centered in 40x20
        assert_eq!(label.position, Point::new(13, 5));
    }
}
