//! The calculator page built on the UI engine

pub mod icons;
pub mod keys;
pub mod page;

pub use icons::CalculatorIcons;
pub use keys::{KEYPAD, Key, Operator};
pub use page::{CalculatorPage, HISTORY_LIMIT, HISTORY_LIST, Outcome, format_number};
