// src/ui/mod.rs
//! calcpad UI engine - an immediate-mode layout and interaction engine
//!
//! The screen is rebuilt every frame from declarative descriptions:
//! - Percentage grids turned into pixel rectangles ([`layout`])
//! - Text fitted into rectangles under an overflow policy ([`text`])
//! - Pointer samples turned into button semantics ([`interaction`])
//! - Layered box, border, shadow and icon visuals ([`compositor`])
//!
//! [`Engine`] ties the pieces together for a host frame loop. Only the press
//! tracking state survives from one frame to the next.

pub mod components;
pub mod compositor;
pub mod core;
pub mod engine;
pub mod interaction;
pub mod layout;
pub mod styling;
pub mod text;

// Re-export commonly used items
pub use components::{Button, Cell, TextBox};
pub use compositor::{Border, Icon, IconId, IconMask, IconSource, NoIcons, Shadow, ShadowKind};
pub use self::core::{ActionSink, PointerFrame, PointerTracker};
pub use engine::Engine;
pub use interaction::{ButtonState, PressMode, PressTracker, Response};
pub use layout::{Allocation, CellSpec, RowSpec, ScrollArea, allocate};
pub use styling::{ButtonStyle, ButtonVariant, ColorPalette};
pub use text::{
    FittedText, MonoTypeface, Overflow, TextAlign, TextFormat, TextMetrics, TextRenderer, fit,
};
