//! Driver loop: pulls frames from a source and pushes them to a sink.
//!
//! This is the only place that waits. The source says how long to wait
//! after each frame and the loop sleeps for exactly that long, unless
//! pacing is turned off (headless export, tests).
//!
//! ## Rust concepts
//! - Generic functions with trait bounds (`S: FrameSource`, `K: FrameSink`)
//! - `Arc<Mutex<T>>` for status shared with the HTTP server
//! - Early return with `?` on the first failing frame

use crate::animation::FrameSource;
use crate::canvas::Frame;
use crate::{Error, is_running};
use serde::Serialize;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Where frames end up: the LED panel, a directory of PNGs, a test buffer.
pub trait FrameSink {
    fn show(&mut self, frame: &Frame) -> Result<(), Error>;
}

/// Whether the driver loop is currently pushing frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Playing,
    Stopped,
    /// The source or sink returned an error; see `last_error`.
    Failed,
}

/// Shared status that the HTTP server reads to report progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct PlaybackStatus {
    /// Current playback state
    pub state: PlaybackState,
    /// Frames handed to the sink so far
    pub frames_shown: u64,
    /// Delay requested after the most recent frame, in milliseconds
    pub delay_ms: Option<u64>,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Message of the error that ended playback, if any
    pub last_error: Option<String>,
    /// Program version
    pub version: String,
}

impl PlaybackStatus {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: PlaybackState::Idle,
            frames_shown: 0,
            delay_ms: None,
            width,
            height,
            last_error: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Knobs for a single run of [`play`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayOptions {
    /// Stop after this many frames. `None` plays until stopped.
    pub max_frames: Option<u64>,
    /// Sleep for each frame's delay. Off for headless export.
    pub pace: bool,
}

/// Run the animation until `running` is cleared, `max_frames` frames were
/// shown, or the source or sink fails.
///
/// Returns the number of frames shown. The status ends in
/// `PlaybackState::Stopped`, or `PlaybackState::Failed` with the error
/// message when the source or sink fails.
pub fn play<S, K>(
    source: &mut S,
    sink: &mut K,
    running: &AtomicBool,
    status: &Arc<Mutex<PlaybackStatus>>,
    options: PlayOptions,
) -> Result<u64, Error>
where
    S: FrameSource + ?Sized,
    K: FrameSink + ?Sized,
{
    set_state(status, PlaybackState::Playing);
    tracing::info!(
        max_frames = ?options.max_frames,
        pace = options.pace,
        "Playback started"
    );

    let result = run_frames(source, sink, running, status, options);

    match &result {
        Ok(shown) => {
            set_state(status, PlaybackState::Stopped);
            tracing::info!("Playback stopped after {} frames", shown);
        }
        Err(e) => {
            if let Ok(mut s) = status.lock() {
                s.state = PlaybackState::Failed;
                s.last_error = Some(e.to_string());
            }
            tracing::error!("Playback failed: {}", e);
        }
    }
    result
}

fn run_frames<S, K>(
    source: &mut S,
    sink: &mut K,
    running: &AtomicBool,
    status: &Arc<Mutex<PlaybackStatus>>,
    options: PlayOptions,
) -> Result<u64, Error>
where
    S: FrameSource + ?Sized,
    K: FrameSink + ?Sized,
{
    let mut shown: u64 = 0;

    while is_running(running) {
        if options.max_frames.is_some_and(|max| shown >= max) {
            break;
        }

        let (frame, delay) = source.next_frame()?;
        sink.show(&frame)?;
        shown += 1;

        if let Ok(mut s) = status.lock() {
            s.frames_shown = shown;
            s.delay_ms = Some(delay.as_millis() as u64);
        }

        if shown == 1 {
            tracing::debug!(
                "First frame: {}x{}, next in {}ms",
                frame.width(),
                frame.height(),
                delay.as_millis()
            );
        }

        if options.pace {
            pace(delay);
        }
    }

    Ok(shown)
}

fn set_state(status: &Mutex<PlaybackStatus>, state: PlaybackState) {
    if let Ok(mut s) = status.lock() {
        s.state = state;
    }
}

fn pace(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}
