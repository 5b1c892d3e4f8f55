//! Bouncing-ball animation on an RGB LED matrix.
//!
//! Plays a red ball bouncing around a black canvas, either on the panel
//! (feature `hardware`) or into a directory of PNG frames.
//!
//! ## Architecture
//! - **Driver thread** (std::thread): owns the animation and the sink
//! - **HTTP server** (tokio/axum, optional): reports status, can stop playback
//!
//! ## Usage
//! ```sh
//! sudo ./target/release/led-matrix-bounce --led-rows 32 --led-cols 32 --led-chain 2
//! ./target/release/led-matrix-bounce --output-dir frames --frames 200
//! ```

use clap::Parser;
use led_matrix_bounce::animation::{AnimationConfig, BounceAnimation};
use led_matrix_bounce::output::PngSink;
use led_matrix_bounce::player::{FrameSink, PlayOptions, PlaybackStatus, play};
use led_matrix_bounce::server::{self, AppState};
use led_matrix_bounce::{
    Color, Error, MAX_CANVAS_SIDE, MAX_RADIUS, MatrixConfig, request_stop, setup_signal_handler,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Bouncing-ball animation for an RGB LED matrix
#[derive(Parser, Debug)]
#[command(name = "led-matrix-bounce")]
#[command(about = "Bouncing-ball animation for an RGB LED matrix")]
#[command(version)]
struct Args {
    /// Number of rows supported by each panel
    #[arg(long = "led-rows", default_value_t = 32)]
    rows: u32,

    /// Number of columns supported by each panel
    #[arg(long = "led-cols", default_value_t = 32)]
    cols: u32,

    /// Number of parallel panel chains
    #[arg(long = "led-parallel", default_value_t = 1)]
    parallel: u32,

    /// Number of panels daisy-chained
    #[arg(long = "led-chain", default_value_t = 2)]
    chain: u32,

    /// Brightness (0-100)
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u8).range(0..=100))]
    brightness: u8,

    /// Name of the GPIO mapping used
    #[arg(long = "led-gpio-mapping", default_value = "regular")]
    gpio_mapping: String,

    /// Show refresh rate
    #[arg(long = "led-show-refresh")]
    show_refresh: bool,

    /// Switch if your matrix has inverse colors on
    #[arg(long = "led-inverse")]
    inverse_colors: bool,

    /// Don't use hardware pin-pulse generation
    #[arg(long = "led-no-hardware-pulse")]
    no_hardware_pulse: bool,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 64, value_parser = clap::value_parser!(u32).range(1..=MAX_CANVAS_SIDE as i64))]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 32, value_parser = clap::value_parser!(u32).range(1..=MAX_CANVAS_SIDE as i64))]
    height: u32,

    /// Ball radius in pixels
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=MAX_RADIUS as i64))]
    radius: u32,

    /// Delay between frames in milliseconds
    #[arg(long = "delay-ms", default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..))]
    delay_ms: u64,

    /// Write frames as PNG files into this directory instead of the panel
    #[arg(long, requires = "frames")]
    output_dir: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Serve the HTTP status API on this port
    #[arg(long)]
    port: Option<u16>,
}

impl Args {
    fn matrix_config(&self) -> MatrixConfig {
        MatrixConfig {
            rows: self.rows,
            cols: self.cols,
            parallel: self.parallel,
            chain_length: self.chain,
            brightness: self.brightness,
            hardware_mapping: self.gpio_mapping.clone(),
            show_refresh_rate: self.show_refresh,
            inverse_colors: self.inverse_colors,
            disable_hardware_pulsing: self.no_hardware_pulse,
        }
    }

    fn animation_config(&self) -> AnimationConfig {
        AnimationConfig {
            width: self.width,
            height: self.height,
            radius: self.radius,
            delay: Duration::from_millis(self.delay_ms),
            foreground: Color::new(255, 0, 0),
            background: Color::BLACK,
        }
    }

    fn play_options(&self) -> PlayOptions {
        PlayOptions {
            max_frames: self.frames,
            // PNG export runs as fast as the disk allows
            pace: self.output_dir.is_none(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(false) // Disable ANSI color codes for systemd/journald
        .compact()
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(shown) => {
            tracing::info!("Done, {} frames shown", shown);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<u64, Error> {
    let matrix = args.matrix_config();
    let animation = args.animation_config();
    let options = args.play_options();

    tracing::info!("LED Matrix Bounce v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Canvas: {}x{}", animation.width, animation.height);
    tracing::info!(
        "Ball: radius {}, frame every {}ms",
        animation.radius,
        animation.delay.as_millis()
    );

    let running = setup_signal_handler()?;
    let status = Arc::new(Mutex::new(PlaybackStatus::new(
        animation.width,
        animation.height,
    )));

    // Bind before the driver starts so a taken port never leaves it running.
    let listener = match args.port {
        Some(port) => {
            let addr = format!("0.0.0.0:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            tracing::info!("API Documentation: http://localhost:{}/docs", port);
            Some(listener)
        }
        None => None,
    };

    let (done_tx, done_rx) = tokio::sync::oneshot::channel::<()>();

    // The LED library is not thread-safe: the sink is built on the driver thread.
    let driver_running = running.clone();
    let driver_status = status.clone();
    let output_dir = args.output_dir.clone();
    let driver = std::thread::spawn(move || {
        let result = drive(
            output_dir,
            &matrix,
            animation,
            &driver_running,
            &driver_status,
            options,
        );
        let _ = done_tx.send(());
        result
    });

    let served = match listener {
        Some(listener) => {
            let app = server::create_router(AppState {
                running: running.clone(),
                status,
            });
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = done_rx.await;
                })
                .await
        }
        None => {
            let _ = done_rx.await;
            Ok(())
        }
    };

    finish(driver, &running, served)
}

/// Wait for the driver thread, stopping it first if the server failed.
///
/// The driver owns the sink, so joining it is what blanks the panel.
fn finish(
    driver: JoinHandle<Result<u64, Error>>,
    running: &AtomicBool,
    served: std::io::Result<()>,
) -> Result<u64, Error> {
    if let Err(e) = &served {
        tracing::error!("HTTP server failed: {}", e);
        request_stop(running);
    }

    let played = driver
        .join()
        .map_err(|_| Error::from("driver thread panicked"))?;
    served?;
    played
}

/// Build the sink on the current thread and run the driver loop.
fn drive(
    output_dir: Option<PathBuf>,
    matrix: &MatrixConfig,
    animation: AnimationConfig,
    running: &AtomicBool,
    status: &Arc<Mutex<PlaybackStatus>>,
    options: PlayOptions,
) -> Result<u64, Error> {
    let mut sink = open_sink(output_dir, matrix)?;
    let mut source = BounceAnimation::new(animation);
    play(&mut source, sink.as_mut(), running, status, options)
}

fn open_sink(
    output_dir: Option<PathBuf>,
    matrix: &MatrixConfig,
) -> Result<Box<dyn FrameSink>, Error> {
    if let Some(dir) = output_dir {
        return Ok(Box::new(PngSink::create(dir)?));
    }
    open_matrix_sink(matrix)
}

#[cfg(feature = "hardware")]
fn open_matrix_sink(matrix: &MatrixConfig) -> Result<Box<dyn FrameSink>, Error> {
    use led_matrix_bounce::render::MatrixSink;

    Ok(Box::new(MatrixSink::new(matrix)?))
}

#[cfg(not(feature = "hardware"))]
fn open_matrix_sink(_matrix: &MatrixConfig) -> Result<Box<dyn FrameSink>, Error> {
    Err("built without the 'hardware' feature; use --output-dir to write PNG frames".into())
}
