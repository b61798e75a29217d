// src/ui/layout/grid.rs
//! Percentage grid allocation
//!
//! Rows take a percentage of the height left after gutters, cells take a
//! percentage of their row's width left after gutters. The last row and the
//! last cell of every row absorb the rounding remainder, so rows plus gutters
//! tile the extent exactly.

use alloc::vec::Vec;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::diagnostics::{Axis, Diagnostic};

/// One cell of a row: a width weight and whatever the cell shows.
#[derive(Debug, Clone, PartialEq)]
pub struct CellSpec<C> {
    /// Share of the row width, 0-100
    pub width_percentage: u8,
    pub content: C,
}

impl<C> CellSpec<C> {
    pub fn new(width_percentage: u8, content: C) -> Self {
        Self {
            width_percentage,
            content,
        }
    }
}

/// One grid row: a height weight and its cells, left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSpec<C> {
    /// Share of the grid height, 0-100
    pub height_percentage: u8,
    pub cells: Vec<CellSpec<C>>,
}

impl<C> RowSpec<C> {
    pub fn new(height_percentage: u8) -> Self {
        Self {
            height_percentage,
            cells: Vec::new(),
        }
    }

    /// Append a cell.
    pub fn cell(mut self, width_percentage: u8, content: C) -> Self {
        self.cells.push(CellSpec::new(width_percentage, content));
        self
    }
}

/// Result of [`allocate`]: one rectangle per cell, indexed like the specs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Allocation {
    pub rects: Vec<Vec<Rectangle>>,
    pub issues: Vec<Diagnostic>,
}

impl Allocation {
    /// Rectangle of the cell at `row`, `column`.
    pub fn get(&self, row: usize, column: usize) -> Option<Rectangle> {
        self.rects.get(row)?.get(column).copied()
    }
}

/// Split `available` pixels into spans by percentage weight.
///
/// The last span receives whatever the others left, saturating at zero.
/// Returns the spans and the nominal total before that correction.
fn split(available: u32, weights: impl ExactSizeIterator<Item = u8>) -> (Vec<u32>, u32) {
    let count = weights.len();
    let mut spans = Vec::with_capacity(count);
    let mut nominal: u32 = 0;
    let mut taken: u32 = 0;

    for (index, weight) in weights.enumerate() {
        let share = (available as u64 * weight as u64 / 100) as u32;
        nominal = nominal.saturating_add(share);
        if index + 1 == count {
            spans.push(available.saturating_sub(taken));
        } else {
            spans.push(share);
            taken = taken.saturating_add(share);
        }
    }

    (spans, nominal)
}

/// Total gutter space between `count` items.
fn gutters(gutter: u32, count: usize) -> u32 {
    gutter.saturating_mul(count.saturating_sub(1) as u32)
}

/// Move a cursor past a span and its gutter, pinning at `i32::MAX`.
fn advance(cursor: i32, span: u32, gutter: u32) -> i32 {
    let step = i32::try_from(span.saturating_add(gutter)).unwrap_or(i32::MAX);
    cursor.saturating_add(step)
}

/// Turn percentage rows into pixel rectangles inside `origin` + `extent`.
///
/// Never fails: gutter overflow and over-allocation are reported through
/// [`Allocation::issues`] and the affected spans shrink to zero.
pub fn allocate<C>(origin: Point, extent: Size, gutter: u32, rows: &[RowSpec<C>]) -> Allocation {
    let mut issues = Vec::new();

    let row_gutters = gutters(gutter, rows.len());
    if row_gutters > extent.height {
        issues.push(Diagnostic::GutterOverflow {
            axis: Axis::Vertical,
            gutters: row_gutters,
            extent: extent.height,
        });
    }
    let available_height = extent.height.saturating_sub(row_gutters);

    let (heights, nominal_height) =
        split(available_height, rows.iter().map(|row| row.height_percentage));
    if nominal_height > available_height {
        issues.push(Diagnostic::OverAllocated {
            axis: Axis::Vertical,
            row: None,
            taken: nominal_height,
            available: available_height,
        });
    }

    let mut rects = Vec::with_capacity(rows.len());
    let mut y = origin.y;

    for (row_index, (row, height)) in rows.iter().zip(heights).enumerate() {
        let cell_gutters = gutters(gutter, row.cells.len());
        if cell_gutters > extent.width {
            issues.push(Diagnostic::GutterOverflow {
                axis: Axis::Horizontal,
                gutters: cell_gutters,
                extent: extent.width,
            });
        }
        let available_width = extent.width.saturating_sub(cell_gutters);

        let (widths, nominal_width) =
            split(available_width, row.cells.iter().map(|cell| cell.width_percentage));
        if nominal_width > available_width {
            issues.push(Diagnostic::OverAllocated {
                axis: Axis::Horizontal,
                row: Some(row_index),
                taken: nominal_width,
                available: available_width,
            });
        }

        let mut x = origin.x;
        let mut cells = Vec::with_capacity(widths.len());
        for width in widths {
            cells.push(Rectangle::new(Point::new(x, y), Size::new(width, height)));
            x = advance(x, width, gutter);
        }
        rects.push(cells);

        y = advance(y, height, gutter);
    }

    Allocation { rects, issues }
}
