//! Button style configuration
//!
//! A [`ButtonStyle`] carries the colors for each interaction state plus the
//! optional border, shadow and icon layers drawn by the compositor.

use embedded_graphics::pixelcolor::Rgb565;

use super::colors::{ColorPalette, darken, lighten};
use crate::ui::compositor::{Border, Icon, Shadow, ShadowKind};
use crate::ui::interaction::ButtonState;

/// Shadow offset used by the predefined variants.
pub const DEFAULT_SHADOW_DISTANCE: u32 = 3;

// ============================================================================
// ButtonStyle
// ============================================================================

/// Visual style of a button.
///
/// # Examples
///
/// ```ignore
/// let style = ButtonStyle::new(palette.digit)
///     .with_border(Border::new(palette.border, 1))
///     .with_shadow(Shadow::new(palette.shadow, 3, ShadowKind::Cast));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonStyle {
    /// Fill while idle
    pub background: Rgb565,

    /// Fill while the button is pressed, held or repeating
    pub pressed: Rgb565,

    /// Fill while the pointer rests on the button
    pub hovered: Rgb565,

    /// Hold-to-press progress fill, falls back to `pressed`
    pub progress: Option<Rgb565>,

    pub border: Option<Border>,
    pub shadow: Option<Shadow>,
    pub icon: Option<Icon>,
}

impl ButtonStyle {
    /// Flat style with pressed and hover colors derived from `background`.
    pub fn new(background: Rgb565) -> Self {
        Self {
            background,
            pressed: darken(background, 3),
            hovered: lighten(background, 2),
            progress: None,
            border: None,
            shadow: None,
            icon: None,
        }
    }

    pub fn with_pressed(mut self, color: Rgb565) -> Self {
        self.pressed = color;
        self
    }

    pub fn with_hovered(mut self, color: Rgb565) -> Self {
        self.hovered = color;
        self
    }

    pub fn with_progress(mut self, color: Rgb565) -> Self {
        self.progress = Some(color);
        self
    }

    pub fn with_border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }

    pub fn with_shadow(mut self, shadow: Shadow) -> Self {
        self.shadow = Some(shadow);
        self
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Fill color for an interaction state.
    pub fn color_for(&self, state: ButtonState) -> Rgb565 {
        if state.is_pressed() {
            self.pressed
        } else if state == ButtonState::Hovered {
            self.hovered
        } else {
            self.background
        }
    }

    /// Progress fill color for hold-to-press buttons.
    pub fn progress_color(&self) -> Rgb565 {
        self.progress.unwrap_or(self.pressed)
    }
}

// ============================================================================
// Button Variants
// ============================================================================

/// Predefined calculator key styles.
///
/// Each variant adapts to the palette it is resolved against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ButtonVariant {
    /// Number and decimal point keys
    Digit,

    /// Arithmetic operators and parentheses
    Operator,

    /// Clear, backspace and clipboard keys
    Action,

    /// The equals key
    Accent,

    /// Borderless, shadowless button on the surface color (history rows)
    Plain,
}

impl ButtonVariant {
    /// Resolve the variant against a palette, using `shadow` for raised keys.
    pub fn to_style(&self, palette: &ColorPalette, shadow: ShadowKind) -> ButtonStyle {
        let raised = |background: Rgb565| {
            ButtonStyle::new(background)
                .with_border(Border::new(palette.border, 1))
                .with_shadow(Shadow::new(palette.shadow, DEFAULT_SHADOW_DISTANCE, shadow))
        };

        match self {
            ButtonVariant::Digit => raised(palette.digit),
            ButtonVariant::Operator => raised(palette.operator),
            ButtonVariant::Action => raised(palette.danger).with_progress(palette.accent),
            ButtonVariant::Accent => raised(palette.accent),
            ButtonVariant::Plain => {
                ButtonStyle::new(palette.surface).with_pressed(palette.background)
            }
        }
    }
}
