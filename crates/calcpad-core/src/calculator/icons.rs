//! Built-in 8x8 icons for the calculator keys

use crate::ui::compositor::{IconId, IconMask, IconSource};

pub const BACKSPACE: IconId = IconId(1);
pub const COPY: IconId = IconId(2);
pub const PASTE: IconId = IconId(3);

const BACKSPACE_MASK: [u8; 8] = [
    0b0001_1111,
    0b0011_0001,
    0b0110_1011,
    0b1100_0101,
    0b1100_0101,
    0b0110_1011,
    0b0011_0001,
    0b0001_1111,
];

const COPY_MASK: [u8; 8] = [
    0b1111_0000,
    0b1001_0000,
    0b1011_1110,
    0b1111_0010,
    0b0010_0010,
    0b0010_0010,
    0b0011_1110,
    0b0000_0000,
];

const PASTE_MASK: [u8; 8] = [
    0b0011_1100,
    0b1110_0111,
    0b1000_0001,
    0b1011_1101,
    0b1000_0001,
    0b1011_1101,
    0b1000_0001,
    0b1111_1111,
];

/// Icon set used by the calculator keypad.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalculatorIcons;

impl IconSource for CalculatorIcons {
    fn icon(&self, id: IconId) -> Option<IconMask<'_>> {
        let data: &'static [u8] = match id {
            BACKSPACE => &BACKSPACE_MASK,
            COPY => &COPY_MASK,
            PASTE => &PASTE_MASK,
            _ => return None,
        };
        Some(IconMask::new(8, 8, data))
    }
}
