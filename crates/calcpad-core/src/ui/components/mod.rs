// src/ui/components/mod.rs
//! Grid cell contents

pub mod button;
pub mod text;

pub use button::{Button, ButtonPaint};
pub use text::TextBox;

/// What a grid cell shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell<A> {
    Button(Button<A>),
    Text(TextBox),
    /// Reserves space only
    Empty,
}

impl<A> From<Button<A>> for Cell<A> {
    fn from(button: Button<A>) -> Self {
        Cell::Button(button)
    }
}

impl<A> From<TextBox> for Cell<A> {
    fn from(text: TextBox) -> Self {
        Cell::Text(text)
    }
}
