//! Text measurement, fitting and drawing

pub mod fit;
pub mod font;

pub use fit::{FittedText, Overflow, TextAlign, TextFormat, fit};
pub use font::{MonoTypeface, TextMetrics, TextRenderer};
