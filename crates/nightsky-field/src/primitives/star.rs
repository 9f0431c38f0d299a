//! Falling, twinkling stars.

use std::f32::consts::PI;

use rand::Rng;

use super::{Bounds, random_below};
use crate::color::primitive_color;
use crate::config::StarConfig;
use crate::surface::DrawContext;

/// Height above the top edge where a star re-enters after leaving the bottom.
pub const RESET_Y: f32 = -10.0;

/// State for a single star.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Vertical speed in pixels per frame.
    pub speed: f32,
    pub opacity: f32,
    /// Twinkle phase; brightness follows it clamped to `[0, 1]`.
    pub twinkle: f32,
    pub twinkle_speed: f32,
    /// Direction of the twinkle oscillation, `1.0` or `-1.0`.
    pub twinkle_dir: f32,
    pub color: nightsky_core::Rgba,
}

impl Star {
    /// Random star inside the bounds.
    pub fn spawn<R: Rng + ?Sized>(config: &StarConfig, bounds: Bounds, rng: &mut R) -> Self {
        let layer = &config.layer;
        let (x, y) = bounds.random_point(rng);
        Self {
            x,
            y,
            radius: layer.size.lerp(rng.random()),
            speed: layer.speed * rng.random_range(0.5f32..=1.5),
            opacity: layer.opacity.lerp(rng.random()),
            twinkle: random_below(PI, rng),
            twinkle_speed: config.twinkle_speed.lerp(rng.random()),
            twinkle_dir: 1.0,
            color: primitive_color(&layer.palette, layer.color_variation, rng),
        }
    }

    /// Advance the twinkle oscillator, bouncing off the `[0, 1]` envelope.
    pub fn advance_twinkle(&mut self) {
        self.twinkle += self.twinkle_speed * self.twinkle_dir;
        if self.twinkle > 1.0 {
            self.twinkle_dir = -1.0;
        } else if self.twinkle < 0.0 {
            self.twinkle_dir = 1.0;
        }
    }

    /// Opacity this frame, always within `[0, opacity]`.
    pub fn alpha(&self) -> f32 {
        self.opacity * self.twinkle.clamp(0.0, 1.0)
    }

    /// Move down; stars leaving the bottom re-enter above the top at a new x.
    pub fn fall<R: Rng + ?Sized>(&mut self, bounds: Bounds, multiplier: f32, rng: &mut R) {
        self.y += self.speed * multiplier;
        if self.y > bounds.height {
            self.y = RESET_Y;
            self.x = random_below(bounds.width, rng);
        }
    }
}

/// Create `count` stars for the given bounds.
pub fn init<R: Rng + ?Sized>(
    config: &StarConfig,
    count: usize,
    bounds: Bounds,
    rng: &mut R,
) -> Vec<Star> {
    (0..count).map(|_| Star::spawn(config, bounds, rng)).collect()
}

/// Update twinkle and position of every star.
pub fn update<R: Rng + ?Sized>(stars: &mut [Star], bounds: Bounds, multiplier: f32, rng: &mut R) {
    for star in stars {
        star.advance_twinkle();
        star.fall(bounds, multiplier, rng);
    }
}

/// Draw stars; a few are enlarged for this frame only.
pub fn draw<C: DrawContext + ?Sized, R: Rng + ?Sized>(
    stars: &[Star],
    ctx: &mut C,
    sparkle_chance: f32,
    rng: &mut R,
) {
    for star in stars {
        let radius = if rng.random::<f32>() < sparkle_chance {
            star.radius * rng.random_range(1.5f32..=2.5)
        } else {
            star.radius
        };
        let color = star.color.with_alpha(star.color.a * star.alpha());
        ctx.fill_circle(star.x, star.y, radius, color);
    }
}
