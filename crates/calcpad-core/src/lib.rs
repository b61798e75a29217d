//! Hardware-independent core library for calcpad
//!
//! This crate contains the layout-and-interaction engine behind the calcpad
//! calculator screen: percentage grid allocation, text fitting, per-frame
//! pointer interaction, and box/shadow compositing. The calculator page that
//! drives the engine lives here too, talking to its evaluator, list storage
//! and clipboard through the traits in [`services`].
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on embedded
//! targets as well as desktop hosts (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod calculator;
pub mod config;
pub mod diagnostics;
pub mod framebuffer;
pub mod services;
pub mod ui;
