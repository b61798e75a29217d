// src/ui/engine.rs
//! Frame-level entry point tying layout, interaction and drawing together
//!
//! A host frame looks like:
//!
//! ```ignore
//! engine.begin_frame(tracker.frame(dt), screen);
//! engine.grid(&mut fb, origin, extent, gutter, &rows, &mut |action| actions.push(action))?;
//! engine.end_frame(&mut fb)?;
//! fb.flush(&mut display)?;
//! ```

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::{debug, info};

use crate::config::EngineConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::ui::components::{Button, Cell, TextBox};
use crate::ui::compositor::IconSource;
use crate::ui::core::{ActionSink, PointerFrame};
use crate::ui::interaction::{PressTracker, Response, evaluate};
use crate::ui::layout::{Allocation, RowSpec, allocate};
use crate::ui::text::{FittedText, TextRenderer};

/// `inner` lies entirely within `outer`.
fn encloses(outer: &Rectangle, inner: &Rectangle) -> bool {
    let outer_far = outer.top_left + outer.size;
    let inner_far = inner.top_left + inner.size;
    inner.top_left.x >= outer.top_left.x
        && inner.top_left.y >= outer.top_left.y
        && inner_far.x <= outer_far.x
        && inner_far.y <= outer_far.y
}

/// Immediate-mode UI engine.
///
/// Owns everything that outlives a single call: the tuning config, text and
/// icon resources, the shared press tracker and the diagnostic buffers.
pub struct Engine<T, I> {
    config: EngineConfig,
    typeface: T,
    icons: I,
    tracker: PressTracker,
    diagnostics: Diagnostics,
    pointer: PointerFrame,
    viewport: Rectangle,
}

impl<T, I> Engine<T, I>
where
    T: TextRenderer,
    I: IconSource,
{
    pub fn new(config: EngineConfig, typeface: T, icons: I, viewport: Rectangle) -> Self {
        info!(
            "UI engine started: {}x{} viewport, hold {}s, repeat {}s",
            viewport.size.width,
            viewport.size.height,
            config.hold_to_press_seconds,
            config.initial_repeat_interval
        );
        Self {
            tracker: PressTracker::new(&config),
            config,
            typeface,
            icons,
            diagnostics: Diagnostics::new(),
            pointer: PointerFrame::default(),
            viewport,
        }
    }

    /// Start a frame with this frame's pointer sample and screen area.
    pub fn begin_frame(&mut self, pointer: PointerFrame, viewport: Rectangle) {
        self.diagnostics.begin_frame();
        self.tracker.begin_frame(&pointer, &self.config);
        self.pointer = pointer;
        if self.viewport != viewport {
            debug!(
                "viewport resized to {}x{}",
                viewport.size.width, viewport.size.height
            );
        }
        self.viewport = viewport;
    }

    /// Allocate a grid and record its layout diagnostics.
    pub fn allocate<C>(
        &mut self,
        origin: Point,
        extent: Size,
        gutter: u32,
        rows: &[RowSpec<C>],
    ) -> Allocation {
        let allocation = allocate(origin, extent, gutter, rows);
        for issue in &allocation.issues {
            self.diagnostics.push(issue.clone());
        }

        let bounds = Rectangle::new(origin, extent);
        if !encloses(&self.viewport, &bounds) {
            self.diagnostics.push(Diagnostic::OutsideViewport {
                bounds,
                viewport: self.viewport,
            });
        }
        allocation
    }

    /// Allocate, evaluate and draw a whole grid, row by row and left to right.
    ///
    /// Returns the allocation so callers can place more content relative to
    /// the cells.
    pub fn grid<A, D, K>(
        &mut self,
        target: &mut D,
        origin: Point,
        extent: Size,
        gutter: u32,
        rows: &[RowSpec<Cell<A>>],
        sink: &mut K,
    ) -> Result<Allocation, D::Error>
    where
        A: Clone,
        D: DrawTarget<Color = Rgb565>,
        K: ActionSink<A> + ?Sized,
    {
        let allocation = self.allocate(origin, extent, gutter, rows);

        for (row, rects) in rows.iter().zip(&allocation.rects) {
            for (cell, rect) in row.cells.iter().zip(rects) {
                match &cell.content {
                    Cell::Button(button) => {
                        self.button(target, *rect, button, sink)?;
                    }
                    Cell::Text(text_box) => {
                        self.text_box(target, *rect, text_box)?;
                    }
                    Cell::Empty => {}
                }
            }
        }

        Ok(allocation)
    }

    /// Evaluate and draw one button, dispatching its action on activation.
    pub fn button<A, D, K>(
        &mut self,
        target: &mut D,
        rect: Rectangle,
        button: &Button<A>,
        sink: &mut K,
    ) -> Result<Response, D::Error>
    where
        A: Clone,
        D: DrawTarget<Color = Rgb565>,
        K: ActionSink<A> + ?Sized,
    {
        let response = self.interact(rect, button, sink);
        self.paint_button(target, rect, button, &response)?;
        Ok(response)
    }

    /// Like [`Engine::button`] for a button that may be partly scrolled out
    /// of `clip`: only the visible part reacts to the pointer and drawing is
    /// clipped.
    pub fn button_clipped<A, D, K>(
        &mut self,
        target: &mut D,
        rect: Rectangle,
        clip: Rectangle,
        button: &Button<A>,
        sink: &mut K,
    ) -> Result<Response, D::Error>
    where
        A: Clone,
        D: DrawTarget<Color = Rgb565>,
        K: ActionSink<A> + ?Sized,
    {
        let visible = rect.intersection(&clip);
        let response = self.interact(visible, button, sink);
        if !visible.is_zero_sized() {
            let mut clipped = target.clipped(&clip);
            self.paint_button(&mut clipped, rect, button, &response)?;
        }
        Ok(response)
    }

    fn interact<A, K>(&mut self, rect: Rectangle, button: &Button<A>, sink: &mut K) -> Response
    where
        A: Clone,
        K: ActionSink<A> + ?Sized,
    {
        let response = evaluate(
            rect,
            button.press_mode,
            &self.pointer,
            &mut self.tracker,
            &self.config,
        );
        if response.activated {
            debug!(
                "{} button at ({}, {}) activated",
                button.press_mode.name(),
                rect.top_left.x,
                rect.top_left.y
            );
            sink.dispatch(button.action.clone());
        }
        response
    }

    fn paint_button<A, D>(
        &mut self,
        target: &mut D,
        rect: Rectangle,
        button: &Button<A>,
        response: &Response,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let paint = button.draw(
            target,
            rect,
            response,
            &self.typeface,
            &self.icons,
            &self.config,
        )?;

        if let Some(id) = paint.report.missing_icon {
            self.diagnostics.push(Diagnostic::MissingIcon { id });
        }
        if let Some(label) = &paint.label {
            self.record_fit(label, paint.report.content.size);
        }
        Ok(())
    }

    /// Draw a text box and record its fitting diagnostics.
    pub fn text_box<D>(
        &mut self,
        target: &mut D,
        rect: Rectangle,
        text_box: &TextBox,
    ) -> Result<FittedText, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let fitted = text_box.draw(target, rect, &self.typeface, &self.config)?;
        let inner = text_box
            .border
            .map_or(rect.size, |border| {
                rect.size.saturating_sub(Size::new(border.thickness * 2, border.thickness * 2))
            });
        self.record_fit(&fitted, inner);
        Ok(fitted)
    }

    fn record_fit(&mut self, fitted: &FittedText, available: Size) {
        for issue in fitted.diagnostics(available, self.config.contrast_threshold) {
            self.diagnostics.push(issue);
        }
    }

    /// Record a diagnostic raised outside the engine.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Finish the frame by drawing the previous frame's diagnostics on top.
    pub fn end_frame<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.diagnostics.draw_overlay(target)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pointer(&self) -> &PointerFrame {
        &self.pointer
    }

    pub fn tracker(&self) -> &PressTracker {
        &self.tracker
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn viewport(&self) -> Rectangle {
        self.viewport
    }

    pub fn typeface(&self) -> &T {
        &self.typeface
    }
}
