//! Bouncing-ball animation for RGB LED matrix panels.
//!
//! This crate provides:
//! - The animation itself (`bounce`, `canvas`, `animation`)
//! - A driver loop that pulls frames and pushes them to a sink (`player`)
//! - Sinks for the LED matrix (`render`) and for PNG files (`output`)
//! - An optional HTTP status API (`server`)
//! - Matrix configuration, colors and shutdown handling (this module)

pub mod animation;
pub mod bounce;
pub mod canvas;
pub mod output;
pub mod player;
#[cfg(feature = "hardware")]
pub mod render;
pub mod server;

#[cfg(feature = "hardware")]
use rpi_led_matrix::{LedMatrix, LedMatrixOptions, LedRuntimeOptions};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Boxed error used at every fallible edge of the crate.
///
/// `Send + Sync` so errors can cross from the render thread back to `main`.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Largest canvas side accepted from the command line, in pixels.
pub const MAX_CANVAS_SIDE: u32 = 4096;

/// Largest ball radius accepted from the command line, in pixels.
pub const MAX_RADIUS: u32 = 2048;

// ── Matrix configuration ───────────────────────────────────────────

/// Hardware settings for the LED matrix, built once at startup.
///
/// # Rust concept: explicit configuration
/// Instead of global flag variables, the CLI is parsed into this struct
/// and handed to `create_matrix`. Nothing else can change it afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatrixConfig {
    /// Rows per panel
    pub rows: u32,
    /// Columns per panel
    pub cols: u32,
    /// Number of parallel chains
    pub parallel: u32,
    /// Number of panels daisy-chained in each chain
    pub chain_length: u32,
    /// Brightness in percent (0-100)
    pub brightness: u8,
    /// GPIO mapping name, e.g. "regular" or "adafruit-hat"
    pub hardware_mapping: String,
    pub show_refresh_rate: bool,
    pub inverse_colors: bool,
    pub disable_hardware_pulsing: bool,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            rows: 32,
            cols: 32,
            parallel: 1,
            chain_length: 2,
            brightness: 100,
            hardware_mapping: "regular".to_string(),
            show_refresh_rate: false,
            inverse_colors: false,
            disable_hardware_pulsing: false,
        }
    }
}

// ── Color ──────────────────────────────────────────────────────────

/// Our own color type, decoupled from the hardware crate.
///
/// This lets us test rendering on any machine without `rpi-led-matrix`.
/// At the boundaries, we convert to `image::Rgb` or `LedColor`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<Color> for image::Rgb<u8> {
    fn from(c: Color) -> Self {
        image::Rgb([c.r, c.g, c.b])
    }
}

impl From<image::Rgb<u8>> for Color {
    fn from(p: image::Rgb<u8>) -> Self {
        Self::new(p[0], p[1], p[2])
    }
}

/// Convert our Color to the hardware crate's LedColor at the boundary.
#[cfg(feature = "hardware")]
impl From<Color> for rpi_led_matrix::LedColor {
    fn from(c: Color) -> Self {
        rpi_led_matrix::LedColor {
            red: c.r,
            green: c.g,
            blue: c.b,
        }
    }
}

// ── Matrix initialization ──────────────────────────────────────────

/// Create a matrix from the parsed configuration.
///
/// # Rust concept: Result and the ? operator
/// Matrix initialization can fail (not running as root, GPIO unavailable,
/// out-of-range option). Option setters that validate return
/// `Result<(), &str>`, which `?` converts into our boxed `Error`.
#[cfg(feature = "hardware")]
pub fn create_matrix(config: &MatrixConfig) -> Result<LedMatrix, Error> {
    let mut options = LedMatrixOptions::new();
    options.set_rows(config.rows);
    options.set_cols(config.cols);
    options.set_parallel(config.parallel);
    options.set_chain_length(config.chain_length);
    options.set_hardware_mapping(&config.hardware_mapping);
    options.set_brightness(config.brightness)?;
    options.set_refresh_rate(config.show_refresh_rate);
    options.set_inverse_colors(config.inverse_colors);
    options.set_hardware_pulsing(!config.disable_hardware_pulsing);

    let rt_options = LedRuntimeOptions::new();

    let matrix = LedMatrix::new(Some(options), Some(rt_options))?;

    Ok(matrix)
}

/// Set up a Ctrl+C handler that sets `running` to false.
///
/// # Rust concept: Arc and AtomicBool
/// The flag is shared between the driver loop, the signal handler and the
/// HTTP stop endpoint. `AtomicBool` needs no mutex for a single bool.
pub fn setup_signal_handler() -> Result<Arc<AtomicBool>, Error> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone(); // Clone the Arc, not the bool

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    Ok(running)
}

/// Check if the driver loop should keep running.
pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}

/// Ask the driver loop to stop after the current frame.
pub fn request_stop(running: &AtomicBool) {
    running.store(false, Ordering::SeqCst);
}

// ── Tests ──────────────────────────────────────────────────────────
