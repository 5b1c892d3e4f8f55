//! Frame sources: pull-based generators of frames and their display delays.
//!
//! A driver loop (see [`crate::player`]) repeatedly calls
//! [`FrameSource::next_frame`], shows the frame, and waits for the returned
//! delay before asking again. Sources never sleep or block themselves.
//!
//! ## Rust concepts
//! - Trait objects vs generics: `play` is generic over any `FrameSource`
//! - Default type parameters (`BounceAnimation<S = Canvas>`)
//! - `Duration` for time values instead of bare integers

use crate::bounce::BounceController;
use crate::canvas::{Canvas, DrawSurface, Frame};
use crate::{Color, Error};
use std::time::Duration;

/// Something that can produce an endless stream of frames.
pub trait FrameSource {
    /// Render the next frame and return it with the delay before the
    /// following call is due.
    fn next_frame(&mut self) -> Result<(Frame, Duration), Error>;
}

/// Immutable settings for the bouncing-ball animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationConfig {
    pub width: u32,
    pub height: u32,
    pub radius: u32,
    pub delay: Duration,
    pub foreground: Color,
    pub background: Color,
}

impl AnimationConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

impl Default for AnimationConfig {
    /// Red ball of radius 5 on black, 64x32, a frame every 50ms.
    fn default() -> Self {
        Self {
            width: 64,
            height: 32,
            radius: 5,
            delay: Duration::from_millis(50),
            foreground: Color::new(255, 0, 0),
            background: Color::BLACK,
        }
    }
}

/// A filled circle that bounces around the canvas.
pub struct BounceAnimation<S = Canvas> {
    surface: S,
    ball: BounceController,
    config: AnimationConfig,
}

impl BounceAnimation<Canvas> {
    pub fn new(config: AnimationConfig) -> Self {
        Self::with_surface(Canvas::new(config.width, config.height), config)
    }
}

impl<S: DrawSurface> BounceAnimation<S> {
    /// Draw onto a caller-provided surface. The surface's size wins over
    /// the size in `config`.
    pub fn with_surface(surface: S, config: AnimationConfig) -> Self {
        let ball = BounceController::new(surface.width(), surface.height(), config.radius);
        Self {
            surface,
            ball,
            config,
        }
    }

    pub fn ball(&self) -> &BounceController {
        &self.ball
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }
}

impl<S: DrawSurface> FrameSource for BounceAnimation<S> {
    /// Render the ball where it is now, then move it for the next call.
    fn next_frame(&mut self) -> Result<(Frame, Duration), Error> {
        self.surface.set_color(self.config.background);
        self.surface.clear();

        self.surface.set_color(self.config.foreground);
        self.surface
            .fill_circle(self.ball.position(), self.ball.radius());
        let frame = self.surface.snapshot();

        self.ball.advance();

        Ok((frame, self.config.delay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounce::Point;
    use pretty_assertions::assert_eq;

    const RED: Color = Color::new(255, 0, 0);

    #[test]
    fn default_config_matches_reference_animation() {
        let config = AnimationConfig::default();
        assert_eq!((config.width, config.height), (64, 32));
        assert_eq!(config.radius, 5);
        assert_eq!(config.delay, Duration::from_millis(50));
        assert_eq!(config.foreground, RED);
        assert_eq!(config.background, Color::BLACK);
    }

    #[test]
    fn first_frame_shows_ball_at_origin() {
        let mut anim = BounceAnimation::new(AnimationConfig::default());
        let (frame, delay) = anim.next_frame().unwrap();

        assert_eq!((frame.width(), frame.height()), (64, 32));
        assert_eq!(delay, Duration::from_millis(50));
        assert_eq!(frame.pixel(0, 0), Some(RED));
        assert_eq!(frame.pixel(63, 31), Some(Color::BLACK));
        assert_eq!(frame.pixel(10, 10), Some(Color::BLACK));
    }

    #[test]
    fn frame_reflects_position_before_advance() {
        let mut anim = BounceAnimation::new(AnimationConfig::default());

        anim.next_frame().unwrap();
        assert_eq!(anim.ball().position(), Point::new(1, 1));

        // Second frame is drawn at (1, 1): pixel (5, 1) is now inside.
        let (frame, _) = anim.next_frame().unwrap();
        assert_eq!(frame.pixel(5, 1), Some(RED));
        assert_eq!(anim.ball().position(), Point::new(2, 2));
    }

    #[test]
    fn delay_is_constant_and_positive() {
        let mut anim = BounceAnimation::new(AnimationConfig::default());
        for _ in 0..200 {
            let (_, delay) = anim.next_frame().unwrap();
            assert!(delay > Duration::ZERO);
            assert_eq!(delay, Duration::from_millis(50));
        }
    }

    #[test]
    fn split_runs_match_single_run() {
        let config = AnimationConfig::default();
        let mut whole = BounceAnimation::new(config);
        let mut split = BounceAnimation::new(config);

        for _ in 0..150 {
            whole.next_frame().unwrap();
        }
        for _ in 0..40 {
            split.next_frame().unwrap();
        }
        for _ in 0..110 {
            split.next_frame().unwrap();
        }

        assert_eq!(whole.ball(), split.ball());
        assert_eq!(whole.next_frame().unwrap(), split.next_frame().unwrap());
    }

    #[test]
    fn previous_frame_is_erased() {
        let mut anim = BounceAnimation::new(AnimationConfig::default());
        for _ in 0..30 {
            anim.next_frame().unwrap();
        }
        // Ball has moved well away from the corner.
        let (frame, _) = anim.next_frame().unwrap();
        assert_eq!(frame.pixel(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn custom_colors_are_used() {
        let config = AnimationConfig {
            foreground: Color::new(0, 255, 0),
            background: Color::new(0, 0, 40),
            ..AnimationConfig::new(16, 16)
        };
        let mut anim = BounceAnimation::new(config);
        let (frame, _) = anim.next_frame().unwrap();
        assert_eq!(frame.pixel(0, 0), Some(Color::new(0, 255, 0)));
        assert_eq!(frame.pixel(15, 15), Some(Color::new(0, 0, 40)));
    }
}
