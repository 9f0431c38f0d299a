//! Short-lived particles that fade in, fade out and respawn in place.

use nightsky_core::Rgba;
use rand::Rng;

use super::Bounds;
use crate::color::primitive_color;
use crate::config::ParticleConfig;
use crate::surface::DrawContext;

/// State for a single particle slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub base_opacity: f32,
    /// Frames lived so far, `0..=lifespan`.
    pub life: u32,
    pub lifespan: u32,
    pub color: Rgba,
}

impl Particle {
    /// Fresh particle at a random position with `life == 0`.
    pub fn spawn<R: Rng + ?Sized>(config: &ParticleConfig, bounds: Bounds, rng: &mut R) -> Self {
        let layer = &config.layer;
        let (x, y) = bounds.random_point(rng);
        let speed = layer.speed;
        Self {
            x,
            y,
            vx: rng.random_range(-1.0f32..=1.0) * speed,
            vy: rng.random_range(-1.0f32..=1.0) * speed,
            radius: layer.size.lerp(rng.random()),
            base_opacity: layer.opacity.lerp(rng.random()),
            life: 0,
            lifespan: (config.lifespan.lerp(rng.random()).round() as u32).max(1),
            color: primitive_color(&layer.palette, layer.color_variation, rng),
        }
    }

    /// Reuse this slot for a brand new particle.
    pub fn respawn<R: Rng + ?Sized>(&mut self, config: &ParticleConfig, bounds: Bounds, rng: &mut R) {
        *self = Self::spawn(config, bounds, rng);
    }

    /// Triangular envelope: 0 at birth, `base_opacity` at mid-life, 0 at the end.
    pub fn opacity(&self) -> f32 {
        if self.lifespan == 0 {
            return 0.0;
        }
        let t = self.life as f32 / self.lifespan as f32;
        (self.base_opacity * (1.0 - (2.0 * t - 1.0).abs())).clamp(0.0, self.base_opacity)
    }

    /// Age by one frame, respawning when exhausted; otherwise move and bounce.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        config: &ParticleConfig,
        bounds: Bounds,
        multiplier: f32,
        rng: &mut R,
    ) {
        if self.life >= self.lifespan {
            self.respawn(config, bounds, rng);
            return;
        }
        self.life += 1;

        self.x += self.vx * multiplier;
        self.y += self.vy * multiplier;

        if self.x < 0.0 {
            self.x = 0.0;
            self.vx = self.vx.abs();
        } else if self.x > bounds.width {
            self.x = bounds.width;
            self.vx = -self.vx.abs();
        }
        if self.y < 0.0 {
            self.y = 0.0;
            self.vy = self.vy.abs();
        } else if self.y > bounds.height {
            self.y = bounds.height;
            self.vy = -self.vy.abs();
        }
    }
}

/// Create `count` particles with staggered ages so they do not pulse in sync.
pub fn init<R: Rng + ?Sized>(
    config: &ParticleConfig,
    count: usize,
    bounds: Bounds,
    rng: &mut R,
) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            let mut particle = Particle::spawn(config, bounds, rng);
            particle.life = rng.random_range(0..particle.lifespan);
            particle
        })
        .collect()
}

pub fn update<R: Rng + ?Sized>(
    particles: &mut [Particle],
    config: &ParticleConfig,
    bounds: Bounds,
    multiplier: f32,
    rng: &mut R,
) {
    for particle in particles {
        particle.advance(config, bounds, multiplier, rng);
    }
}

pub fn draw<C: DrawContext + ?Sized>(particles: &[Particle], ctx: &mut C) {
    for particle in particles {
        let alpha = particle.color.a * particle.opacity();
        ctx.fill_circle(
            particle.x,
            particle.y,
            particle.radius,
            particle.color.with_alpha(alpha),
        );
    }
}
