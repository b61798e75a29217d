// src/ui/compositor.rs
//! Box compositing: shadow, background, border and icon
//!
//! [`draw_box`] paints the layers under a button's text in a fixed order:
//! the shadow offset by `(distance, distance)`, then the background, then
//! the border stroked inside the box, then the tinted icon.

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, StrokeAlignment, Triangle,
};
use embedded_layout::align::{Align, horizontal, vertical};

use crate::config::EngineConfig;
use crate::ui::styling::colors::darken;

/// Handle of an icon in an [`IconSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconId(pub u16);

/// 1-bit icon bitmap, row-major, most significant bit first, every row
/// padded to whole bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconMask<'a> {
    pub width: u32,
    pub height: u32,
    pub data: &'a [u8],
}

impl<'a> IconMask<'a> {
    pub const fn new(width: u32, height: u32, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    fn stride(&self) -> usize {
        self.width.div_ceil(8) as usize
    }

    /// Whether the pixel at `x`, `y` is set. Out of range reads as unset.
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y as usize * self.stride() + x as usize / 8;
        self.data
            .get(index)
            .is_some_and(|byte| byte & (0x80 >> (x % 8)) != 0)
    }
}

/// Looks up icon bitmaps by id.
pub trait IconSource {
    fn icon(&self, id: IconId) -> Option<IconMask<'_>>;
}

/// An icon source without icons.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIcons;

impl IconSource for NoIcons {
    fn icon(&self, _id: IconId) -> Option<IconMask<'_>> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub color: Rgb565,
    pub thickness: u32,
}

impl Border {
    pub fn new(color: Rgb565, thickness: u32) -> Self {
        Self { color, thickness }
    }
}

/// How the shadow joins the box it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowKind {
    /// Offset rectangle only; the box seems to hover
    Float,
    /// Gap between box and shadow closed, no outlines
    #[default]
    Cast,
    /// Cast plus diagonal seams from the box corners
    Pillar,
    /// Cast plus solid far edges
    Cube,
    /// Cast plus an outline around the whole shadow
    TransparentCube,
}

impl ShadowKind {
    pub const ALL: [ShadowKind; 5] = [
        ShadowKind::Float,
        ShadowKind::Cast,
        ShadowKind::Pillar,
        ShadowKind::Cube,
        ShadowKind::TransparentCube,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShadowKind::Float => "float",
            ShadowKind::Cast => "cast",
            ShadowKind::Pillar => "pillar",
            ShadowKind::Cube => "cube",
            ShadowKind::TransparentCube => "transparent cube",
        }
    }

    /// The following kind, wrapping around.
    pub fn next(self) -> Self {
        match self {
            ShadowKind::Float => ShadowKind::Cast,
            ShadowKind::Cast => ShadowKind::Pillar,
            ShadowKind::Pillar => ShadowKind::Cube,
            ShadowKind::Cube => ShadowKind::TransparentCube,
            ShadowKind::TransparentCube => ShadowKind::Float,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Rgb565,
    /// Offset along both axes
    pub distance: u32,
    pub kind: ShadowKind,
}

impl Shadow {
    pub fn new(color: Rgb565, distance: u32, kind: ShadowKind) -> Self {
        Self {
            color,
            distance,
            kind,
        }
    }
}

/// Icon drawn centered on a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Icon {
    pub id: IconId,
    pub tint: Rgb565,
    /// Fixed drawing size; without one the icon fills the box inside its
    /// border
    pub size: Option<Size>,
}

impl Icon {
    pub fn new(id: IconId, tint: Rgb565) -> Self {
        Self {
            id,
            tint,
            size: None,
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }
}

/// What [`draw_box`] produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxReport {
    /// Box area inside the border
    pub content: Rectangle,
    /// Icon that could not be resolved and was replaced by a placeholder
    pub missing_icon: Option<IconId>,
}

/// Layers of one box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxLayers<'a> {
    pub background: Rgb565,
    pub border: Option<Border>,
    pub shadow: Option<Shadow>,
    pub icon: Option<&'a Icon>,
}

/// Draw the shadow, background, border and icon of `rect`.
///
/// # Panics
///
/// Panics on an unknown icon when `config.strict_resources` is set.
pub fn draw_box<D, S>(
    target: &mut D,
    rect: Rectangle,
    layers: BoxLayers<'_>,
    icons: &S,
    config: &EngineConfig,
) -> Result<BoxReport, D::Error>
where
    D: DrawTarget<Color = Rgb565>,
    S: IconSource + ?Sized,
{
    let content = match layers.border {
        Some(border) => inset(rect, border.thickness),
        None => rect,
    };
    let mut report = BoxReport {
        content,
        missing_icon: None,
    };
    if rect.is_zero_sized() {
        return Ok(report);
    }

    if let Some(shadow) = layers.shadow {
        let edge = layers
            .border
            .map(|border| border.color)
            .unwrap_or_else(|| darken(shadow.color, 4));
        draw_shadow(target, rect, shadow, edge)?;
    }

    rect.into_styled(PrimitiveStyle::with_fill(layers.background))
        .draw(target)?;

    if let Some(border) = layers.border.filter(|border| border.thickness > 0) {
        let style = PrimitiveStyleBuilder::new()
            .stroke_color(border.color)
            .stroke_width(border.thickness)
            .stroke_alignment(StrokeAlignment::Inside)
            .build();
        rect.into_styled(style).draw(target)?;
    }

    if let Some(icon) = layers.icon {
        let area = match icon.size {
            Some(size) => Rectangle::new(Point::zero(), size.component_min(content.size))
                .align_to(&content, horizontal::Center, vertical::Center),
            None => content,
        };

        match icons.icon(icon.id) {
            Some(mask) => draw_mask(target, area, &mask, icon.tint)?,
            None => {
                if config.strict_resources {
                    panic!("icon #{} is not available", icon.id.0);
                }
                draw_placeholder(target, area, icon.tint)?;
                report.missing_icon = Some(icon.id);
            }
        }
    }

    Ok(report)
}

/// `rect` shrunk by `amount` on every side.
fn inset(rect: Rectangle, amount: u32) -> Rectangle {
    Rectangle::new(
        rect.top_left + Point::new(amount as i32, amount as i32),
        Size::new(
            rect.size.width.saturating_sub(amount * 2),
            rect.size.height.saturating_sub(amount * 2),
        ),
    )
}

fn draw_shadow<D>(
    target: &mut D,
    rect: Rectangle,
    shadow: Shadow,
    edge: Rgb565,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let d = shadow.distance as i32;
    let shadow_rect = rect.translate(Point::new(d, d));
    shadow_rect
        .into_styled(PrimitiveStyle::with_fill(shadow.color))
        .draw(target)?;

    if shadow.kind == ShadowKind::Float || d == 0 {
        return Ok(());
    }

    let fill = PrimitiveStyle::with_fill(shadow.color);
    let (x, y) = (rect.top_left.x, rect.top_left.y);
    let (w, h) = (rect.size.width as i32, rect.size.height as i32);

    // Close the gaps next to the top-right and bottom-left corners
    Triangle::new(
        Point::new(x + w, y),
        Point::new(x + w + d, y + d),
        Point::new(x + w, y + d),
    )
    .into_styled(fill)
    .draw(target)?;
    Triangle::new(
        Point::new(x, y + h),
        Point::new(x + d, y + h),
        Point::new(x + d, y + h + d),
    )
    .into_styled(fill)
    .draw(target)?;

    let stroke = PrimitiveStyle::with_stroke(edge, 1);
    let (right, bottom) = (x + w - 1, y + h - 1);
    match shadow.kind {
        ShadowKind::Float | ShadowKind::Cast => {}
        ShadowKind::Pillar => {
            for corner in [
                Point::new(right, y),
                Point::new(right, bottom),
                Point::new(x, bottom),
            ] {
                Line::new(corner, corner + Point::new(d, d))
                    .into_styled(stroke)
                    .draw(target)?;
            }
        }
        ShadowKind::Cube => {
            let far = Point::new(right + d, bottom + d);
            Line::new(Point::new(right + d, y + d), far)
                .into_styled(stroke)
                .draw(target)?;
            Line::new(Point::new(x + d, bottom + d), far)
                .into_styled(stroke)
                .draw(target)?;
        }
        ShadowKind::TransparentCube => {
            let outline = PrimitiveStyleBuilder::new()
                .stroke_color(edge)
                .stroke_width(1)
                .stroke_alignment(StrokeAlignment::Inside)
                .build();
            shadow_rect.into_styled(outline).draw(target)?;
        }
    }
    Ok(())
}

/// Nearest-neighbour scale `mask` onto `area`.
fn draw_mask<D>(
    target: &mut D,
    area: Rectangle,
    mask: &IconMask<'_>,
    tint: Rgb565,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    if area.is_zero_sized() || mask.width == 0 || mask.height == 0 {
        return Ok(());
    }
    let (width, height) = (area.size.width, area.size.height);
    let pixels = area.points().filter_map(|point| {
        let local = point - area.top_left;
        let sx = local.x as u32 * mask.width / width;
        let sy = local.y as u32 * mask.height / height;
        mask.is_set(sx, sy).then_some(Pixel(point, tint))
    });
    target.draw_iter(pixels)
}

/// Crossed-out frame drawn in place of a missing icon.
fn draw_placeholder<D>(target: &mut D, area: Rectangle, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let Some(bottom_right) = area.bottom_right() else {
        return Ok(());
    };
    let stroke = PrimitiveStyle::with_stroke(color, 1);
    let outline = PrimitiveStyleBuilder::new()
        .stroke_color(color)
        .stroke_width(1)
        .stroke_alignment(StrokeAlignment::Inside)
        .build();

    area.into_styled(outline).draw(target)?;
    Line::new(area.top_left, bottom_right)
        .into_styled(stroke)
        .draw(target)?;
    Line::new(
        Point::new(bottom_right.x, area.top_left.y),
        Point::new(area.top_left.x, bottom_right.y),
    )
    .into_styled(stroke)
    .draw(target)
}
