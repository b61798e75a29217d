//! Styling for calcpad screens
//!
//! - [`colors`] - Color constants, palettes and color arithmetic
//! - [`style`] - Button styles and the predefined key variants
//!
//! # Examples
//!
//! ```ignore
//! use ui::styling::*;
//!
//! let palette = ColorPalette::default();
//! let style = ButtonVariant::Operator.to_style(&palette, ShadowKind::Cast);
//! ```

pub mod colors;
pub mod style;

pub use colors::{
    COLOR_ACCENT, COLOR_BACKGROUND, COLOR_DANGER, COLOR_DIGIT, COLOR_OPERATOR, COLOR_SHADOW,
    COLOR_STROKE, COLOR_SURFACE, ColorPalette, DARK_GRAY, LIGHT_GRAY, WHITE, channel_distance,
    darken, lighten,
};
pub use style::{ButtonStyle, ButtonVariant, DEFAULT_SHADOW_DISTANCE};
