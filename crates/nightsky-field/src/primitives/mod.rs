//! Animated primitives: one module per collection.

pub mod lightning;
pub mod nebula;
pub mod particle;
pub mod star;

use rand::Rng;

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    /// Whether `(x, y)` lies in `[0, width) x [0, height)`.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && x < self.width && y >= 0.0 && y < self.height
    }

    /// Random point inside the bounds; the origin for empty bounds.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> (f32, f32) {
        (random_below(self.width, rng), random_below(self.height, rng))
    }
}

/// Uniform value in `[0, extent)`, or 0 when `extent` is not positive.
pub fn random_below<R: Rng + ?Sized>(extent: f32, rng: &mut R) -> f32 {
    if extent > 0.0 {
        rng.random::<f32>() * extent
    } else {
        0.0
    }
}
