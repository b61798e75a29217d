//! Per-frame diagnostic channel.
//!
//! Layout and legibility problems never interrupt rendering. They are pushed
//! into [`Diagnostics`] while a frame is built, shown as a text overlay on the
//! following frame, and then dropped.

use core::fmt::{self, Write};

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{MonoTextStyle, ascii::FONT_6X10};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::{String, Vec};
use log::{debug, warn};

use crate::ui::compositor::IconId;

/// Diagnostics kept per frame; anything beyond is counted but not stored.
pub const MAX_DIAGNOSTICS: usize = 16;

/// Characters of offending text kept in text-related diagnostics.
const SNIPPET_LEN: usize = 16;

/// Overlay line height for `FONT_6X10`.
const OVERLAY_LINE_PX: i32 = 10;

/// Overlay text color - amber
const OVERLAY_TEXT: Rgb565 = Rgb565::new(255 >> 3, 191 >> 2, 0);

/// Overlay backdrop color
const OVERLAY_BACKDROP: Rgb565 = Rgb565::BLACK;

/// Layout axis a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn span_name(self) -> &'static str {
        match self {
            Axis::Horizontal => "width",
            Axis::Vertical => "height",
        }
    }
}

/// A non-fatal problem noticed while building a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A grid's bounding box is not inside the host viewport.
    OutsideViewport {
        bounds: Rectangle,
        viewport: Rectangle,
    },
    /// Gutters alone need more room than the extent provides.
    GutterOverflow {
        axis: Axis,
        gutters: u32,
        extent: u32,
    },
    /// Percentages of a span add up to more than the span (row `None` means
    /// the row heights of the grid).
    OverAllocated {
        axis: Axis,
        row: Option<usize>,
        taken: u32,
        available: u32,
    },
    /// Fitted text is still larger than its box.
    TextOverflow {
        snippet: String<SNIPPET_LEN>,
        needed: Size,
        available: Size,
    },
    /// Text color too close to its background.
    LowContrast {
        snippet: String<SNIPPET_LEN>,
        distance: u8,
        threshold: u8,
    },
    /// An icon reference could not be resolved.
    MissingIcon { id: IconId },
}

impl Diagnostic {
    /// Truncated copy of `text` for embedding in a diagnostic.
    pub fn snippet(text: &str) -> String<SNIPPET_LEN> {
        let mut snippet = String::new();
        for ch in text.chars() {
            if snippet.push(ch).is_err() {
                break;
            }
        }
        snippet
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::OutsideViewport { bounds, viewport } => write!(
                f,
                "grid {}x{}@{},{} outside viewport {}x{}",
                bounds.size.width,
                bounds.size.height,
                bounds.top_left.x,
                bounds.top_left.y,
                viewport.size.width,
                viewport.size.height
            ),
            Diagnostic::GutterOverflow {
                axis,
                gutters,
                extent,
            } => write!(
                f,
                "gutters need {}px of {} {}px",
                gutters,
                axis.span_name(),
                extent
            ),
            Diagnostic::OverAllocated {
                axis,
                row: Some(row),
                taken,
                available,
            } => write!(
                f,
                "row {} cells take {}px of {} {}px",
                row,
                taken,
                axis.span_name(),
                available
            ),
            Diagnostic::OverAllocated {
                axis,
                row: None,
                taken,
                available,
            } => write!(
                f,
                "rows take {}px of {} {}px",
                taken,
                axis.span_name(),
                available
            ),
            Diagnostic::TextOverflow {
                snippet,
                needed,
                available,
            } => write!(
                f,
                "\"{}\" needs {}x{}, box {}x{}",
                snippet, needed.width, needed.height, available.width, available.height
            ),
            Diagnostic::LowContrast {
                snippet,
                distance,
                threshold,
            } => write!(
                f,
                "\"{}\" contrast {} < {}",
                snippet, distance, threshold
            ),
            Diagnostic::MissingIcon { id } => write!(f, "icon #{} missing", id.0),
        }
    }
}

/// Double-buffered diagnostic accumulator.
///
/// Diagnostics pushed during frame N are returned by [`Diagnostics::overlay`]
/// during frame N+1 and discarded when frame N+2 begins.
#[derive(Debug, Default)]
pub struct Diagnostics {
    current: Vec<Diagnostic, MAX_DIAGNOSTICS>,
    previous: Vec<Diagnostic, MAX_DIAGNOSTICS>,
    dropped: usize,
    previous_dropped: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rotate buffers: this frame's diagnostics become the overlay and a
    /// fresh buffer starts collecting.
    pub fn begin_frame(&mut self) {
        self.previous = core::mem::take(&mut self.current);
        self.previous_dropped = core::mem::replace(&mut self.dropped, 0);
    }

    /// Record a diagnostic for the current frame.
    ///
    /// Duplicates within a frame are ignored. A diagnostic that was not
    /// present in the previous frame is logged as a warning, repeats are only
    /// logged at debug level.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if self.current.contains(&diagnostic) {
            return;
        }

        if self.previous.contains(&diagnostic) {
            debug!("diagnostic persists: {}", diagnostic);
        } else {
            warn!("diagnostic: {}", diagnostic);
        }

        if self.current.push(diagnostic).is_err() {
            self.dropped += 1;
        }
    }

    /// Diagnostics collected so far in the current frame.
    pub fn current(&self) -> &[Diagnostic] {
        &self.current
    }

    /// Diagnostics from the previous frame, shown as this frame's overlay.
    pub fn overlay(&self) -> &[Diagnostic] {
        &self.previous
    }

    /// Draw the previous frame's diagnostics in the top-left corner.
    pub fn draw_overlay<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let text_style = MonoTextStyle::new(&FONT_6X10, OVERLAY_TEXT);
        let char_width = FONT_6X10.character_size.width;
        let mut y = 0;

        let mut line = String::<96>::new();
        for diagnostic in self.previous.iter() {
            line.clear();
            // A line longer than the buffer is cut, the overlay is best-effort.
            write!(&mut line, "! {}", diagnostic).ok();
            Self::draw_line(display, &line, y, char_width, text_style)?;
            y += OVERLAY_LINE_PX;
        }

        if self.previous_dropped > 0 {
            line.clear();
            write!(&mut line, "! +{} more", self.previous_dropped).ok();
            Self::draw_line(display, &line, y, char_width, text_style)?;
        }

        Ok(())
    }

    fn draw_line<D: DrawTarget<Color = Rgb565>>(
        display: &mut D,
        line: &str,
        y: i32,
        char_width: u32,
        text_style: MonoTextStyle<'_, Rgb565>,
    ) -> Result<(), D::Error> {
        let width = line.chars().count() as u32 * char_width;
        Rectangle::new(Point::new(0, y), Size::new(width, OVERLAY_LINE_PX as u32))
            .into_styled(PrimitiveStyle::with_fill(OVERLAY_BACKDROP))
            .draw(display)?;
        Text::with_baseline(line, Point::new(0, y), text_style, Baseline::Top).draw(display)?;
        Ok(())
    }
}
