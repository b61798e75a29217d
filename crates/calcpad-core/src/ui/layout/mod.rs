//! Layout: percentage grids and scrolling

pub mod grid;
pub mod scrollable;

pub use grid::{Allocation, CellSpec, RowSpec, allocate};
pub use scrollable::ScrollArea;
