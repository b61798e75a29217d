//! Color definitions, palette management and color arithmetic
//!
//! Colors are RGB565, the native format of the displays calcpad targets.
//!
//! # RGB565 Format
//! - Red: 5 bits (0-31)
//! - Green: 6 bits (0-63)
//! - Blue: 5 bits (0-31)
//!
//! To convert from 8-bit RGB: R>>3, G>>2, B>>3

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

// ============================================================================
// Base Colors
// ============================================================================

/// Screen background - very dark gray-blue
pub const COLOR_BACKGROUND: Rgb565 = Rgb565::new(18 >> 3, 23 >> 2, 24 >> 3);

/// Panel surface - slightly lighter than background
pub const COLOR_SURFACE: Rgb565 = Rgb565::new(32 >> 3, 40 >> 2, 42 >> 3);

/// Border/stroke color - medium gray
pub const COLOR_STROKE: Rgb565 = Rgb565::new(70 >> 3, 84 >> 2, 88 >> 3);

/// Drop shadow - near black
pub const COLOR_SHADOW: Rgb565 = Rgb565::new(6 >> 3, 8 >> 2, 8 >> 3);

// ============================================================================
// Key Colors
// ============================================================================

/// Digit keys - slate
pub const COLOR_DIGIT: Rgb565 = Rgb565::new(52 >> 3, 64 >> 2, 70 >> 3);

/// Operator keys - teal-green
pub const COLOR_OPERATOR: Rgb565 = Rgb565::new(40 >> 3, 120 >> 2, 96 >> 3);

/// Equals key - warm orange
pub const COLOR_ACCENT: Rgb565 = Rgb565::new(200 >> 3, 120 >> 2, 40 >> 3);

/// Destructive keys and error text - muted red
pub const COLOR_DANGER: Rgb565 = Rgb565::new(220 >> 3, 80 >> 2, 80 >> 3);

// ============================================================================
// Text Colors
// ============================================================================

/// Pure white - maximum brightness in RGB565
pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);

/// Light gray - for secondary text
pub const LIGHT_GRAY: Rgb565 = Rgb565::new(21, 42, 21);

/// Dark gray - for text on light surfaces
pub const DARK_GRAY: Rgb565 = Rgb565::new(6, 12, 6);

// ============================================================================
// Color arithmetic
// ============================================================================

/// Expand an RGB565 color to 8-bit channels.
pub fn to_rgb888(color: Rgb565) -> [u8; 3] {
    let (r, g, b) = (color.r(), color.g(), color.b());
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
}

/// Mean absolute 8-bit channel difference between two colors.
pub fn channel_distance(a: Rgb565, b: Rgb565) -> u8 {
    let (a, b) = (to_rgb888(a), to_rgb888(b));
    let total: u32 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| x.abs_diff(*y) as u32)
        .sum();
    (total / 3) as u8
}

/// Darken a color by `steps` on the 5-bit scale (green moves twice as far).
pub fn darken(color: Rgb565, steps: u8) -> Rgb565 {
    Rgb565::new(
        color.r().saturating_sub(steps),
        color.g().saturating_sub(steps * 2),
        color.b().saturating_sub(steps),
    )
}

/// Lighten a color by `steps` on the 5-bit scale (green moves twice as far).
pub fn lighten(color: Rgb565, steps: u8) -> Rgb565 {
    Rgb565::new(
        color.r().saturating_add(steps).min(Rgb565::MAX_R),
        color.g().saturating_add(steps * 2).min(Rgb565::MAX_G),
        color.b().saturating_add(steps).min(Rgb565::MAX_B),
    )
}

// ============================================================================
// Color Palette
// ============================================================================

/// A cohesive color palette for the calculator screen.
///
/// # Examples
///
/// ```ignore
/// let palette = ColorPalette::default();
/// let light_palette = ColorPalette::light();
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPalette {
    /// Screen background
    pub background: Rgb565,

    /// Display and history panels
    pub surface: Rgb565,

    /// Digit key background
    pub digit: Rgb565,

    /// Operator key background
    pub operator: Rgb565,

    /// Equals key background
    pub accent: Rgb565,

    /// Clear keys and error text
    pub danger: Rgb565,

    /// Primary text color - high contrast
    pub text_primary: Rgb565,

    /// Secondary text color - history and hints
    pub text_secondary: Rgb565,

    /// Border color for outlines and shadow edges
    pub border: Rgb565,

    /// Drop shadow color
    pub shadow: Rgb565,
}

impl Default for ColorPalette {
    /// Returns the default dark palette
    fn default() -> Self {
        Self::dark()
    }
}

impl ColorPalette {
    /// Light text on dark keys.
    pub fn dark() -> Self {
        Self {
            background: COLOR_BACKGROUND,
            surface: COLOR_SURFACE,
            digit: COLOR_DIGIT,
            operator: COLOR_OPERATOR,
            accent: COLOR_ACCENT,
            danger: COLOR_DANGER,
            text_primary: WHITE,
            text_secondary: LIGHT_GRAY,
            border: COLOR_STROKE,
            shadow: COLOR_SHADOW,
        }
    }

    /// Dark text on light keys.
    pub fn light() -> Self {
        Self {
            background: WHITE,
            surface: Rgb565::new(29, 58, 29),
            digit: Rgb565::new(27, 54, 27),
            operator: Rgb565::new(20, 50, 26),
            accent: Rgb565::new(31, 44, 12),
            danger: Rgb565::new(24, 16, 16),
            text_primary: DARK_GRAY,
            text_secondary: Rgb565::new(12, 24, 12),
            border: Rgb565::new(16, 32, 16),
            shadow: Rgb565::new(20, 40, 20),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb888_expansion_covers_full_range() {
        assert_eq!(to_rgb888(WHITE), [255, 255, 255]);
        assert_eq!(to_rgb888(Rgb565::BLACK), [0, 0, 0]);
    }

    #[test]
    fn test_channel_distance() {
        assert_eq!(channel_distance(WHITE, Rgb565::BLACK), 255);
        assert_eq!(channel_distance(COLOR_DIGIT, COLOR_DIGIT), 0);
        // Red alone differs: 255 / 3
        assert_eq!(channel_distance(Rgb565::RED, Rgb565::BLACK), 85);
    }

    #[test]
    fn test_darken_and_lighten_saturate() {
        assert_eq!(darken(Rgb565::BLACK, 4), Rgb565::BLACK);
        assert_eq!(lighten(WHITE, 4), WHITE);
        assert_eq!(darken(Rgb565::new(10, 20, 10), 2), Rgb565::new(8, 16, 8));
    }

    #[test]
    fn test_default_palette_is_readable() {
        for palette in [ColorPalette::dark(), ColorPalette::light()] {
            for key in [palette.digit, palette.operator, palette.accent, palette.danger] {
                assert!(channel_distance(palette.text_primary, key) >= 75);
            }
            assert!(channel_distance(palette.text_secondary, palette.surface) >= 75);
            assert!(channel_distance(palette.danger, palette.surface) >= 75);
        }
    }
}
