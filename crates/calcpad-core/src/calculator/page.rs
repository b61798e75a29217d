//! The calculator screen
//!
//! Rows from top to bottom: a scrollable history strip, the expression
//! display, the result line and the five keypad rows. Every frame the page
//! rebuilds its grid description from its own state, hands it to the
//! [`Engine`] and applies the keys that fired once drawing is done.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::{debug, info, warn};

use crate::calculator::icons::{BACKSPACE, COPY, PASTE};
use crate::calculator::keys::{KEYPAD, Key};
use crate::services::{Clipboard, EvalError, Evaluator, ListStore, Services, StoreError};
use crate::ui::components::{Button, Cell, TextBox};
use crate::ui::compositor::{Icon, IconId, IconSource, ShadowKind};
use crate::ui::engine::Engine;
use crate::ui::layout::{RowSpec, ScrollArea, allocate};
use crate::ui::styling::{ButtonVariant, ColorPalette};
use crate::ui::text::{Overflow, TextAlign, TextFormat, TextRenderer};

/// Name of the persisted history list.
pub const HISTORY_LIST: &str = "history";
/// Oldest entries are dropped beyond this many.
pub const HISTORY_LIMIT: usize = 50;

const PAGE_MARGIN_PX: u32 = 4;
const GUTTER_PX: u32 = 4;

const HISTORY_ROW: usize = 0;
const KEYPAD_FIRST_ROW: usize = 3;

const HISTORY_HEIGHT_PCT: u8 = 22;
const DISPLAY_HEIGHT_PCT: u8 = 14;
const RESULT_HEIGHT_PCT: u8 = 9;
const KEY_HEIGHT_PCT: u8 = 11;
const KEY_WIDTH_PCT: u8 = 20;

const HISTORY_ITEM_PX: u32 = 16;
const HISTORY_FONT_PX: u32 = 10;
const DISPLAY_FONT_PX: u32 = 40;
const RESULT_FONT_PX: u32 = 20;
const KEY_FONT_PX: u32 = 20;
const KEY_ICON_PX: u32 = 16;

/// What the result line shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Empty,
    Value(String),
    Error(String),
}

/// Format an evaluation result for display: at most ten decimals, without
/// trailing zeros.
pub fn format_number(value: f64) -> String {
    let mut text = format!("{:.10}", value);
    if text.contains('.') {
        let kept = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(kept);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

/// Characters a pasted expression may contain.
fn is_expression_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | '*' | '/' | '^' | '%' | '(' | ')')
}

fn key_icon(key: Key) -> Option<IconId> {
    match key {
        Key::Backspace => Some(BACKSPACE),
        Key::Copy => Some(COPY),
        Key::Paste => Some(PASTE),
        _ => None,
    }
}

/// Calculator state plus the screen built from it.
#[derive(Debug, Clone)]
pub struct CalculatorPage {
    expression: String,
    outcome: Outcome,
    /// The expression holds the last result; the next digit starts over
    fresh: bool,
    /// Oldest first
    history: Vec<String>,
    history_scroll: ScrollArea,
    palette: ColorPalette,
    shadow: ShadowKind,
}

impl CalculatorPage {
    pub fn new(palette: ColorPalette) -> Self {
        Self {
            expression: String::new(),
            outcome: Outcome::Empty,
            fresh: false,
            history: Vec::new(),
            history_scroll: ScrollArea::new(),
            palette,
            shadow: ShadowKind::default(),
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn shadow_kind(&self) -> ShadowKind {
        self.shadow
    }

    pub fn set_shadow_kind(&mut self, kind: ShadowKind) {
        info!("Key shadows set to {}", kind.name());
        self.shadow = kind;
    }

    /// Replace the in-memory history with the saved list, if there is one.
    pub fn load_history<S: ListStore + ?Sized>(&mut self, store: &mut S) {
        match store.load_list(HISTORY_LIST) {
            Ok(mut entries) => {
                if entries.len() > HISTORY_LIMIT {
                    let excess = entries.len() - HISTORY_LIMIT;
                    entries.drain(..excess);
                }
                info!("Loaded {} history entries", entries.len());
                self.history = entries;
            }
            Err(StoreError::NotFound(_)) => debug!("No saved history"),
            Err(err) => warn!("Failed to load history: {}", err),
        }
    }

    /// Lay out, evaluate and draw one frame, then apply every key that fired.
    pub fn frame<D, T, I, E, S, C>(
        &mut self,
        engine: &mut Engine<T, I>,
        target: &mut D,
        services: &mut Services<E, S, C>,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
        T: TextRenderer,
        I: IconSource,
        E: Evaluator,
        S: ListStore,
        C: Clipboard,
    {
        target.clear(self.palette.background)?;

        let (origin, extent) = Self::content_area(engine.viewport());
        let rows = self.layout();
        let mut fired = Vec::new();

        // Row 0 goes first so taps are resolved in row-major order; the grid
        // leaves its empty cell alone.
        let history_area = allocate(origin, extent, GUTTER_PX, &rows).get(HISTORY_ROW, 0);
        if let Some(area) = history_area {
            self.draw_history(engine, target, area, &mut fired)?;
        }
        engine.grid(target, origin, extent, GUTTER_PX, &rows, &mut |key: Key| {
            fired.push(key)
        })?;

        for key in fired {
            self.apply(key, services);
        }
        Ok(())
    }

    /// Apply one key press.
    pub fn apply<E, S, C>(&mut self, key: Key, services: &mut Services<E, S, C>)
    where
        E: Evaluator,
        S: ListStore,
        C: Clipboard,
    {
        debug!("Key {:?}", key);
        match key {
            Key::Digit(_)
            | Key::Decimal
            | Key::Operator(_)
            | Key::OpenParen
            | Key::CloseParen => {
                if let Some(c) = key.input() {
                    self.input(c);
                }
            }
            Key::Equals => self.evaluate(services),
            Key::Clear => self.clear(),
            Key::AllClear => {
                self.clear();
                self.history.clear();
                self.history_scroll = ScrollArea::new();
                self.persist_history(&mut services.store);
                info!("History cleared");
            }
            Key::Backspace => {
                self.expression.pop();
                self.fresh = false;
            }
            Key::Copy => {
                let text = match &self.outcome {
                    Outcome::Value(value) => value.as_str(),
                    _ => self.expression.as_str(),
                };
                if !text.is_empty() {
                    services.clipboard.set_text(text);
                }
            }
            Key::Paste => {
                let Some(text) = services.clipboard.text() else {
                    return;
                };
                let pasted: String = text.chars().filter(|c| is_expression_char(*c)).collect();
                if pasted.is_empty() {
                    return;
                }
                if self.fresh {
                    self.expression.clear();
                    self.fresh = false;
                }
                self.expression.push_str(&pasted);
            }
            Key::Recall(index) => {
                let Some(entry) = self.history.get(index) else {
                    return;
                };
                match entry.rsplit_once(" = ") {
                    Some((expression, value)) => {
                        self.expression = expression.to_string();
                        self.outcome = Outcome::Value(value.to_string());
                    }
                    None => self.expression = entry.clone(),
                }
                self.fresh = false;
            }
        }
    }

    fn input(&mut self, c: char) {
        if self.fresh {
            self.fresh = false;
            // Operators continue from the previous result
            if c.is_ascii_digit() || c == '.' || c == '(' {
                self.expression.clear();
            }
        }
        self.expression.push(c);
    }

    fn clear(&mut self) {
        self.expression.clear();
        self.outcome = Outcome::Empty;
        self.fresh = false;
    }

    fn evaluate<E, S, C>(&mut self, services: &mut Services<E, S, C>)
    where
        E: Evaluator,
        S: ListStore,
        C: Clipboard,
    {
        let expression = self.expression.trim().to_string();
        if expression.is_empty() {
            return;
        }

        let result = services.evaluator.evaluate(&expression).and_then(|value| {
            if value.is_finite() {
                Ok(value)
            } else {
                Err(EvalError::NotFinite)
            }
        });

        match result {
            Ok(value) => {
                let value = format_number(value);
                self.history.push(format!("{} = {}", expression, value));
                if self.history.len() > HISTORY_LIMIT {
                    let excess = self.history.len() - HISTORY_LIMIT;
                    self.history.drain(..excess);
                }
                self.persist_history(&mut services.store);
                // Newest entry is listed first
                self.history_scroll.scroll_by(-self.history_scroll.offset());

                self.expression = value.clone();
                self.outcome = Outcome::Value(value);
                self.fresh = true;
            }
            Err(err) => {
                warn!("Evaluating '{}' failed: {}", expression, err);
                self.outcome = Outcome::Error(err.to_string());
            }
        }
    }

    fn persist_history<S: ListStore + ?Sized>(&self, store: &mut S) {
        if let Err(err) = store.save_list(HISTORY_LIST, &self.history) {
            warn!("Failed to save history: {}", err);
        }
    }

    fn content_area(viewport: Rectangle) -> (Point, Size) {
        let margin = PAGE_MARGIN_PX;
        let origin = viewport.top_left + Point::new(margin as i32, margin as i32);
        let extent = viewport.size.saturating_sub(Size::new(margin * 2, margin * 2));
        (origin, extent)
    }

    fn layout(&self) -> Vec<RowSpec<Cell<Key>>> {
        let mut rows = Vec::with_capacity(KEYPAD_FIRST_ROW + KEYPAD.len());
        // The history strip is drawn separately so it can scroll
        rows.push(RowSpec::new(HISTORY_HEIGHT_PCT).cell(100, Cell::Empty));
        rows.push(RowSpec::new(DISPLAY_HEIGHT_PCT).cell(100, Cell::Text(self.display_box())));
        rows.push(RowSpec::new(RESULT_HEIGHT_PCT).cell(100, Cell::Text(self.result_box())));
        for keys in KEYPAD.iter() {
            let row = keys.iter().fold(RowSpec::new(KEY_HEIGHT_PCT), |row, key| {
                row.cell(KEY_WIDTH_PCT, Cell::Button(self.key_button(*key)))
            });
            rows.push(row);
        }
        rows
    }

    fn display_box(&self) -> TextBox {
        let text = if self.expression.is_empty() {
            "0"
        } else {
            self.expression.as_str()
        };
        TextBox::new(
            TextFormat::new(text, DISPLAY_FONT_PX, self.palette.text_primary)
                .with_alignment(TextAlign::Right)
                .with_overflow(Overflow::Shrink),
        )
        .with_background(self.palette.surface)
    }

    fn result_box(&self) -> TextBox {
        let (text, color) = match &self.outcome {
            Outcome::Empty => (String::new(), self.palette.text_secondary),
            Outcome::Value(value) => (format!("= {}", value), self.palette.text_secondary),
            Outcome::Error(message) => (message.clone(), self.palette.danger),
        };
        TextBox::new(
            TextFormat::new(text, RESULT_FONT_PX, color)
                .with_alignment(TextAlign::Right)
                .with_overflow(Overflow::Truncate),
        )
        .with_background(self.palette.surface)
    }

    fn key_button(&self, key: Key) -> Button<Key> {
        let mut style = key.variant().to_style(&self.palette, self.shadow);
        if let Some(id) = key_icon(key) {
            style = style.with_icon(
                Icon::new(id, self.palette.text_primary)
                    .with_size(Size::new(KEY_ICON_PX, KEY_ICON_PX)),
            );
        }

        let mut button = Button::new(key, style).with_press_mode(key.press_mode());
        if let Some(label) = key.label() {
            button = button.with_label(
                TextFormat::new(label, KEY_FONT_PX, self.palette.text_primary)
                    .with_overflow(Overflow::Shrink),
            );
        }
        button
    }

    /// Newest entry first; tapping an entry recalls it unless the strip is
    /// being dragged.
    fn draw_history<D, T, I>(
        &mut self,
        engine: &mut Engine<T, I>,
        target: &mut D,
        area: Rectangle,
        fired: &mut Vec<Key>,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
        T: TextRenderer,
        I: IconSource,
    {
        target.fill_solid(&area, self.palette.surface)?;

        let count = self.history.len();
        self.history_scroll
            .set_content_height(count as u32 * HISTORY_ITEM_PX);
        self.history_scroll
            .update(area, engine.pointer(), engine.tracker());
        // Still set on the release frame that ends a drag
        let suppress = engine.tracker().is_dragging();

        let style = ButtonVariant::Plain.to_style(&self.palette, self.shadow);
        for slot in 0..count {
            let item = self.history_scroll.item_rect(area, slot, HISTORY_ITEM_PX);
            if item.intersection(&area).is_zero_sized() {
                continue;
            }

            let index = count - 1 - slot;
            let label = TextFormat::new(
                self.history[index].as_str(),
                HISTORY_FONT_PX,
                self.palette.text_secondary,
            )
            .with_alignment(TextAlign::Right)
            .with_overflow(Overflow::Truncate);
            let button = Button::new(Key::Recall(index), style).with_label(label);

            engine.button_clipped(target, item, area, &button, &mut |key: Key| {
                if !suppress {
                    fired.push(key);
                }
            })?;
        }

        self.history_scroll
            .draw_scrollbar(target, area, self.palette.border)
    }
}

impl Default for CalculatorPage {
    fn default() -> Self {
        Self::new(ColorPalette::default())
    }
}
