//! Desktop simulator for the calcpad calculator UI.
//!
//! Renders the calculator page in an SDL2 window via
//! `embedded-graphics-simulator`, with a real expression evaluator, history
//! saved under `$CALCPAD_DATA_DIR` and an in-process clipboard.
//!
//! # Key bindings
//!
//! | Key              | Action                        |
//! |------------------|-------------------------------|
//! | 0-9 . + - * / ^ %| Type into the expression      |
//! | ( )              | Parentheses                   |
//! | Enter / =        | Evaluate                      |
//! | Backspace        | Delete last character         |
//! | Delete           | Clear                         |
//! | S                | Cycle key shadow style        |
//! | Q / Esc          | Quit                          |
//!
//! The mouse is the touch screen: click, hold and drag work as they would
//! on the device.
//!
//! Run with `--write-config` to write the default engine config to
//! `$CALCPAD_CONFIG` (or `engine.cfg`) for editing.

mod evaluator;
mod settings;
mod store;

use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
    sdl2::{Keycode, Mod},
};
use log::{error, info};

use calcpad_core::calculator::{CalculatorIcons, CalculatorPage, Key, Operator};
use calcpad_core::config::EngineConfig;
use calcpad_core::framebuffer::FrameBuffer;
use calcpad_core::services::{MemoryClipboard, Services};
use calcpad_core::ui::{ColorPalette, Engine, MonoTypeface, PointerTracker};

use crate::evaluator::ExpressionEvaluator;
use crate::store::FileStore;

// ---------------------------------------------------------------------------
// Display constants
// ---------------------------------------------------------------------------

const DISPLAY_WIDTH_PX: u32 = 240;
const DISPLAY_HEIGHT_PX: u32 = 320;

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 2;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Environment variable selecting the light palette when set to `light`.
const THEME_ENV: &str = "CALCPAD_THEME";

fn screen_bounds() -> Rectangle {
    Rectangle::new(
        Point::zero(),
        Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX),
    )
}

fn palette_from_env() -> ColorPalette {
    match std::env::var(THEME_ENV).as_deref() {
        Ok("light") => ColorPalette::light(),
        _ => ColorPalette::dark(),
    }
}

// ---------------------------------------------------------------------------
// Keyboard shortcuts
// ---------------------------------------------------------------------------

fn keycode_to_key(keycode: Keycode, keymod: Mod) -> Option<Key> {
    let shift = keymod.intersects(Mod::LSHIFTMOD | Mod::RSHIFTMOD);
    let key = match keycode {
        Keycode::Num8 if shift => Key::Operator(Operator::Multiply),
        Keycode::Num9 if shift => Key::OpenParen,
        Keycode::Num0 if shift => Key::CloseParen,
        Keycode::Num5 if shift => Key::Operator(Operator::Percent),
        Keycode::Num6 if shift => Key::Operator(Operator::Power),
        Keycode::Equals if shift => Key::Operator(Operator::Add),
        Keycode::Num0 | Keycode::Kp0 => Key::Digit(0),
        Keycode::Num1 | Keycode::Kp1 => Key::Digit(1),
        Keycode::Num2 | Keycode::Kp2 => Key::Digit(2),
        Keycode::Num3 | Keycode::Kp3 => Key::Digit(3),
        Keycode::Num4 | Keycode::Kp4 => Key::Digit(4),
        Keycode::Num5 | Keycode::Kp5 => Key::Digit(5),
        Keycode::Num6 | Keycode::Kp6 => Key::Digit(6),
        Keycode::Num7 | Keycode::Kp7 => Key::Digit(7),
        Keycode::Num8 | Keycode::Kp8 => Key::Digit(8),
        Keycode::Num9 | Keycode::Kp9 => Key::Digit(9),
        Keycode::Period | Keycode::KpPeriod => Key::Decimal,
        Keycode::KpPlus => Key::Operator(Operator::Add),
        Keycode::Minus | Keycode::KpMinus => Key::Operator(Operator::Subtract),
        Keycode::KpMultiply => Key::Operator(Operator::Multiply),
        Keycode::Slash | Keycode::KpDivide => Key::Operator(Operator::Divide),
        Keycode::Return | Keycode::KpEnter | Keycode::Equals => Key::Equals,
        Keycode::Backspace => Key::Backspace,
        Keycode::Delete => Key::Clear,
        _ => return None,
    };
    Some(key)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting calcpad simulator");
    info!(
        "Display: {}×{} (scale {}×)",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, WINDOW_SCALE
    );
    info!("Keys: type the expression, Enter=evaluate  S=shadow style  Q=Quit");

    if std::env::args().any(|arg| arg == "--write-config") {
        let path = settings::config_path();
        match settings::save(std::path::Path::new(&path), &EngineConfig::default()) {
            Ok(()) => info!("Wrote default config to {}", path),
            Err(e) => error!("{}", e),
        }
        return;
    }

    let config = settings::load_or_default();
    let screen = screen_bounds();

    let mut display = SimulatorDisplay::<Rgb565>::new(screen.size);
    let mut framebuffer = FrameBuffer::new(screen.size);
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("calcpad", &output_settings);

    let mut engine = Engine::new(config, MonoTypeface, CalculatorIcons, screen);
    let mut services = Services {
        evaluator: ExpressionEvaluator,
        store: FileStore::from_env(),
        clipboard: MemoryClipboard::new(),
    };
    info!("History directory: {}", services.store.dir().display());

    let mut page = CalculatorPage::new(palette_from_env());
    page.load_history(&mut services.store);

    let mut pointer = PointerTracker::new();

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    window.update(&display);
    let mut last_frame = Instant::now();

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------
    'running: loop {
        let frame_start = Instant::now();

        // --- SDL events ---------------------------------------------------
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown {
                    keycode, keymod, ..
                } => {
                    if keycode == Keycode::Q || keycode == Keycode::Escape {
                        break 'running;
                    }

                    if keycode == Keycode::S {
                        page.set_shadow_kind(page.shadow_kind().next());
                    } else if let Some(key) = keycode_to_key(keycode, keymod) {
                        page.apply(key, &mut services);
                    }
                }

                SimulatorEvent::MouseButtonDown { point, .. } => pointer.press(point),
                SimulatorEvent::MouseButtonUp { point, .. } => pointer.release(point),
                SimulatorEvent::MouseMove { point } => pointer.move_to(point),

                _ => {}
            }
        }

        // --- Frame --------------------------------------------------------
        let delta = last_frame.elapsed().as_secs_f32();
        last_frame = Instant::now();

        engine.begin_frame(pointer.frame(delta), screen);
        if let Err(e) = page.frame(&mut engine, &mut framebuffer, &mut services) {
            error!("Draw error: {:?}", e);
        }
        if let Err(e) = engine.end_frame(&mut framebuffer) {
            error!("Overlay error: {:?}", e);
        }
        if let Err(e) = framebuffer.flush(&mut display) {
            error!("Flush error: {:?}", e);
        }

        window.update(&display);

        // --- Frame pacing -------------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    info!("Simulator exiting");
}
