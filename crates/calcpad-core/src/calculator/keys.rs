//! Calculator keys and the keypad layout

use crate::ui::interaction::PressMode;
use crate::ui::styling::ButtonVariant;

/// Binary and postfix operators understood by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Percent,
}

impl Operator {
    /// Text shown on the key and typed into the expression.
    pub fn label(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Power => "^",
            Operator::Percent => "%",
        }
    }

    pub fn symbol(self) -> char {
        self.label().chars().next().unwrap_or('?')
    }
}

/// Everything a calculator button can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Decimal,
    Operator(Operator),
    OpenParen,
    CloseParen,
    Equals,
    /// Clear the current expression and result
    Clear,
    /// Clear everything including the saved history
    AllClear,
    Backspace,
    Copy,
    Paste,
    /// Put a history entry back on the display
    Recall(usize),
}

const DIGIT_LABELS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

impl Key {
    /// Text shown on the key; icon keys have none.
    pub fn label(self) -> Option<&'static str> {
        match self {
            Key::Digit(digit) => DIGIT_LABELS.get(digit as usize).copied(),
            Key::Decimal => Some("."),
            Key::Operator(op) => Some(op.label()),
            Key::OpenParen => Some("("),
            Key::CloseParen => Some(")"),
            Key::Equals => Some("="),
            Key::Clear => Some("C"),
            Key::AllClear => Some("AC"),
            Key::Backspace | Key::Copy | Key::Paste | Key::Recall(_) => None,
        }
    }

    pub fn press_mode(self) -> PressMode {
        match self {
            Key::AllClear => PressMode::HoldToPress,
            Key::Backspace => PressMode::HoldToRepeat,
            _ => PressMode::Once,
        }
    }

    pub fn variant(self) -> ButtonVariant {
        match self {
            Key::Digit(_) | Key::Decimal => ButtonVariant::Digit,
            Key::Operator(_)
            | Key::OpenParen
            | Key::CloseParen
            | Key::Backspace
            | Key::Copy
            | Key::Paste => ButtonVariant::Operator,
            Key::Clear | Key::AllClear => ButtonVariant::Action,
            Key::Equals => ButtonVariant::Accent,
            Key::Recall(_) => ButtonVariant::Plain,
        }
    }

    /// Text the key appends to the expression, if it is an input key.
    pub fn input(self) -> Option<char> {
        match self {
            Key::Digit(digit) => char::from_digit(digit as u32, 10),
            Key::Decimal => Some('.'),
            Key::Operator(op) => Some(op.symbol()),
            Key::OpenParen => Some('('),
            Key::CloseParen => Some(')'),
            _ => None,
        }
    }
}

/// Keypad rows, top to bottom.
pub const KEYPAD: [[Key; 5]; 5] = [
    [
        Key::AllClear,
        Key::Clear,
        Key::Backspace,
        Key::OpenParen,
        Key::CloseParen,
    ],
    [
        Key::Digit(7),
        Key::Digit(8),
        Key::Digit(9),
        Key::Operator(Operator::Divide),
        Key::Operator(Operator::Power),
    ],
    [
        Key::Digit(4),
        Key::Digit(5),
        Key::Digit(6),
        Key::Operator(Operator::Multiply),
        Key::Operator(Operator::Percent),
    ],
    [
        Key::Digit(1),
        Key::Digit(2),
        Key::Digit(3),
        Key::Operator(Operator::Subtract),
        Key::Copy,
    ],
    [
        Key::Digit(0),
        Key::Decimal,
        Key::Equals,
        Key::Operator(Operator::Add),
        Key::Paste,
    ],
];
