//! Software drawing surface that frames are rendered onto.
//!
//! The animation never talks to the LED hardware directly. It draws into a
//! [`Canvas`] (an `image::RgbImage` underneath) and hands out immutable
//! [`Frame`] snapshots. Sinks decide where those frames end up.
//!
//! ## Rust concepts
//! - Traits as seams between components
//! - Newtype wrappers (`Frame`) to restrict what callers can do
//! - Integer-only geometry to keep rendering exact

use crate::Color;
use crate::bounce::Point;
use image::{Rgb, RgbImage};

/// One rendered image, handed to a sink. Read-only once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Color of a single pixel, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image.get_pixel_checked(x, y).map(|p| Color::from(*p))
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

/// The drawing operations the animation needs from a surface.
pub trait DrawSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Set the color used by `clear` and `fill_circle`.
    fn set_color(&mut self, color: Color);

    /// Paint every pixel with the current color.
    fn clear(&mut self);

    /// Fill a disc of `radius` around `center` with the current color.
    fn fill_circle(&mut self, center: Point, radius: i32);

    /// Copy the current contents into an immutable frame.
    fn snapshot(&self) -> Frame;
}

/// Fixed-size RGB canvas. Its size never changes after creation.
#[derive(Clone, Debug)]
pub struct Canvas {
    image: RgbImage,
    color: Color,
}

impl Canvas {
    /// Create a black canvas. Both dimensions must be non-zero.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "canvas must be at least 1x1");
        Self {
            image: RgbImage::new(width, height),
            color: Color::BLACK,
        }
    }
}

impl DrawSurface for Canvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn clear(&mut self) {
        let fill: Rgb<u8> = self.color.into();
        for pixel in self.image.pixels_mut() {
            *pixel = fill;
        }
    }

    /// A pixel is covered when its centre lies within `radius` of `center`.
    /// Working in doubled coordinates keeps the test in integers:
    /// `(2px + 1 - 2cx)² + (2py + 1 - 2cy)² <= (2r)²`.
    fn fill_circle(&mut self, center: Point, radius: i32) {
        if radius <= 0 {
            return;
        }

        let max_x = self.image.width() as i64 - 1;
        let max_y = self.image.height() as i64 - 1;
        let (cx, cy, r) = (center.x as i64, center.y as i64, radius as i64);
        let x0 = (cx - r).max(0);
        let x1 = (cx + r).min(max_x);
        let y0 = (cy - r).max(0);
        let y1 = (cy + r).min(max_y);
        // (2r)² does not fit in i64 for radii near i32::MAX
        let limit = 4 * (r as i128) * (r as i128);
        let fill: Rgb<u8> = self.color.into();

        for py in y0..=y1 {
            let dy = (2 * py + 1 - 2 * cy) as i128;
            for px in x0..=x1 {
                let dx = (2 * px + 1 - 2 * cx) as i128;
                if dx * dx + dy * dy <= limit {
                    self.image.put_pixel(px as u32, py as u32, fill);
                }
            }
        }
    }

    fn snapshot(&self) -> Frame {
        Frame::new(self.image.clone())
    }
}
