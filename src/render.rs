//! Hardware sink: copies frames onto the LED matrix.
//!
//! The `rpi-led-matrix` C library is not thread-safe, so the sink (and the
//! matrix it owns) must be created and used on the driver thread only.
//!
//! ## Rust concepts
//! - Owning a resource in a struct so it is released on drop
//! - Double-buffering by moving the canvas in and out of `swap()`

use crate::canvas::Frame;
use crate::player::FrameSink;
use crate::{Color, Error, MatrixConfig, create_matrix};
use rpi_led_matrix::{LedCanvas, LedMatrix};

/// Shows frames on the panel via the offscreen canvas.
pub struct MatrixSink {
    matrix: LedMatrix,
    /// Always `Some` except during a swap.
    canvas: Option<LedCanvas>,
}

impl MatrixSink {
    pub fn new(config: &MatrixConfig) -> Result<Self, Error> {
        let matrix = create_matrix(config)?;
        let canvas = matrix.offscreen_canvas();
        tracing::info!(
            "Matrix ready: {}x{} panels, chain {}, parallel {}, mapping {}",
            config.cols,
            config.rows,
            config.chain_length,
            config.parallel,
            config.hardware_mapping
        );
        Ok(Self {
            matrix,
            canvas: Some(canvas),
        })
    }

    /// Blank the panel.
    pub fn clear(&mut self) {
        if let Some(mut canvas) = self.canvas.take() {
            canvas.clear();
            self.canvas = Some(self.matrix.swap(canvas));
        }
    }
}

/// Draw a frame onto the LED canvas pixel by pixel.
pub fn draw_frame_to_canvas(canvas: &mut LedCanvas, frame: &Frame) {
    for (x, y, pixel) in frame.as_image().enumerate_pixels() {
        let led_color = Color::from(*pixel);
        canvas.set(x as i32, y as i32, &led_color.into());
    }
}

impl FrameSink for MatrixSink {
    fn show(&mut self, frame: &Frame) -> Result<(), Error> {
        let mut canvas = self
            .canvas
            .take()
            .ok_or("matrix canvas lost during a previous swap")?;
        draw_frame_to_canvas(&mut canvas, frame);
        self.canvas = Some(self.matrix.swap(canvas));
        Ok(())
    }
}

impl Drop for MatrixSink {
    fn drop(&mut self) {
        self.clear();
        tracing::info!("Matrix cleared");
    }
}
