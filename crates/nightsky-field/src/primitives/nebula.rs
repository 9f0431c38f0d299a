//! Slowly drifting nebula blobs.

use nightsky_core::Rgba;
use rand::Rng;

use super::Bounds;
use crate::color::primitive_color;
use crate::config::LayerConfig;
use crate::surface::{ColorStop, DrawContext};

/// State for a single nebula blob.
#[derive(Debug, Clone, PartialEq)]
pub struct NebulaBlob {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Horizontal drift in pixels per frame; either sign.
    pub drift: f32,
    pub opacity: f32,
    pub color: Rgba,
}

impl NebulaBlob {
    /// Random blob inside the bounds.
    pub fn spawn<R: Rng + ?Sized>(layer: &LayerConfig, bounds: Bounds, rng: &mut R) -> Self {
        let (x, y) = bounds.random_point(rng);
        let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        Self {
            x,
            y,
            radius: layer.size.lerp(rng.random()),
            drift: direction * layer.speed * rng.random_range(0.3f32..=1.0),
            opacity: layer.opacity.lerp(rng.random()),
            color: primitive_color(&layer.palette, layer.color_variation, rng),
        }
    }

    /// Drift horizontally, wrapping to the opposite edge once fully off-screen.
    pub fn advance(&mut self, bounds: Bounds, multiplier: f32) {
        self.x += self.drift * multiplier;
        if self.x - self.radius > bounds.width {
            self.x = -self.radius;
        } else if self.x + self.radius < 0.0 {
            self.x = bounds.width + self.radius;
        }
    }

    /// Gradient stops: bright core, base color, transparent rim.
    pub fn stops(&self) -> [ColorStop; 3] {
        let alpha = self.color.a * self.opacity;
        [
            ColorStop::new(0.0, self.color.lighten(0.4).with_alpha(alpha)),
            ColorStop::new(0.4, self.color.with_alpha(alpha * 0.6)),
            ColorStop::new(1.0, self.color.with_alpha(0.0)),
        ]
    }
}

/// Create `count` nebula blobs for the given bounds.
pub fn init<R: Rng + ?Sized>(
    layer: &LayerConfig,
    count: usize,
    bounds: Bounds,
    rng: &mut R,
) -> Vec<NebulaBlob> {
    (0..count)
        .map(|_| NebulaBlob::spawn(layer, bounds, rng))
        .collect()
}

pub fn update(nebulas: &mut [NebulaBlob], bounds: Bounds, multiplier: f32) {
    for nebula in nebulas {
        nebula.advance(bounds, multiplier);
    }
}

pub fn draw<C: DrawContext + ?Sized>(nebulas: &[NebulaBlob], ctx: &mut C) {
    for nebula in nebulas {
        ctx.radial_gradient(nebula.x, nebula.y, nebula.radius, &nebula.stops());
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn blob(x: f32, radius: f32, drift: f32) -> NebulaBlob {
        NebulaBlob {
            x,
            y: 50.0,
            radius,
            drift,
            opacity: 0.2,
            color: Rgba::rgb(139, 92, 246),
        }
    }

    #[test]
    fn test_wraps_left_to_right() {
        let bounds = Bounds::new(800, 600);
        let mut nebula = blob(-21.0, 20.0, 0.5);
        nebula.advance(bounds, 1.0);
        assert_eq!(nebula.x, 820.0);
    }

    #[test]
    fn test_wraps_right_to_left() {
        let bounds = Bounds::new(800, 600);
        let mut nebula = blob(819.5, 20.0, 0.6);
        nebula.advance(bounds, 1.0);
        assert_eq!(nebula.x, -20.0);
    }

    #[test]
    fn test_drifts_while_visible() {
        let bounds = Bounds::new(800, 600);
        let mut nebula = blob(100.0, 20.0, 0.5);
        nebula.advance(bounds, 2.0);
        assert_eq!(nebula.x, 101.0);
    }

    #[test]
    fn test_spawn_uses_layer_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let layer = LayerConfig {
            count: 8,
            speed: 0.2,
            size: nightsky_core::SizeRange::new(10.0, 30.0),
            ..LayerConfig::default()
        };
        for nebula in init(&layer, 8, Bounds::new(200, 100), &mut rng) {
            assert!(layer.size.contains(nebula.radius));
            assert!(nebula.drift.abs() <= 0.2 + f32::EPSILON);
            assert!(nebula.drift.abs() >= 0.06 - f32::EPSILON);
        }
    }

    #[test]
    fn test_stops_fade_to_transparent() {
        let stops = blob(0.0, 10.0, 0.1).stops();
        assert_eq!(stops[2].color.a, 0.0);
        assert!(stops[0].color.a > stops[1].color.a);
    }
}
