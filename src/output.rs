//! Headless sink: write every frame to a directory as a numbered PNG.
//!
//! Useful for checking the animation on a machine without a panel. The
//! files sort in playback order (`frame_00000.png`, `frame_00001.png`, ...).

use crate::Error;
use crate::canvas::Frame;
use crate::player::FrameSink;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes frames as `frame_NNNNN.png` into a directory.
pub struct PngSink {
    dir: PathBuf,
    next_index: u64,
}

impl PngSink {
    /// Create the sink, creating `dir` (and parents) if it does not exist.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        tracing::info!("Writing frames to {}", dir.display());
        Ok(Self { dir, next_index: 0 })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of frames written so far.
    pub fn written(&self) -> u64 {
        self.next_index
    }

    fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{index:05}.png"))
    }
}

impl FrameSink for PngSink {
    fn show(&mut self, frame: &Frame) -> Result<(), Error> {
        let path = self.frame_path(self.next_index);
        frame.as_image().save(&path)?;
        self.next_index += 1;
        tracing::trace!("Wrote {}", path.display());
        Ok(())
    }
}
