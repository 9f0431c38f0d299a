//! The particle-field animator.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::canvas::PixelCanvas;
use crate::clock::FrameClock;
use crate::config::FieldConfig;
use crate::primitives::lightning::{self, Flash};
use crate::primitives::nebula::{self, NebulaBlob};
use crate::primitives::particle::{self, Particle};
use crate::primitives::star::{self, Star};
use crate::primitives::Bounds;
use crate::surface::{DrawContext, Surface};

/// What a call to [`ParticleField::frame`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Primitives were updated and drawn.
    Drawn,
    /// Under the frame-rate cap; nothing changed.
    Skipped,
    /// The drawing context could not be acquired; nothing changed.
    NoSurface,
    /// The field is not attached to a viewport.
    Detached,
}

/// Every primitive collection of a field.
#[derive(Debug, Clone, Default)]
struct Layers {
    stars: Vec<Star>,
    nebulas: Vec<NebulaBlob>,
    particles: Vec<Particle>,
    flash: Option<Flash>,
}

impl Layers {
    fn seed(config: &FieldConfig, width: u32, bounds: Bounds, rng: &mut ChaCha8Rng) -> Self {
        let compact = config.compact_below_width;
        Self {
            stars: star::init(
                &config.stars,
                config.stars.layer.count_for(width, compact),
                bounds,
                rng,
            ),
            nebulas: nebula::init(
                &config.nebulas,
                config.nebulas.count_for(width, compact),
                bounds,
                rng,
            ),
            particles: particle::init(
                &config.particles,
                config.particles.layer.count_for(width, compact),
                bounds,
                rng,
            ),
            flash: None,
        }
    }

    fn update(&mut self, config: &FieldConfig, bounds: Bounds, rng: &mut ChaCha8Rng) {
        let multiplier = config.speed_multiplier;
        star::update(&mut self.stars, bounds, multiplier, rng);
        nebula::update(&mut self.nebulas, bounds, multiplier);
        particle::update(&mut self.particles, &config.particles, bounds, multiplier, rng);
        if lightning::update(&mut self.flash, &config.lightning, bounds, rng) {
            if let Some(flash) = &self.flash {
                trace!(
                    branches = flash.branches.len(),
                    depth = flash.depth(),
                    "lightning flash"
                );
            }
        }
    }

    fn draw<C: DrawContext + ?Sized>(
        &self,
        ctx: &mut C,
        config: &FieldConfig,
        rng: &mut ChaCha8Rng,
    ) {
        ctx.clear(config.background);
        nebula::draw(&self.nebulas, ctx);
        star::draw(&self.stars, ctx, config.stars.sparkle_chance, rng);
        particle::draw(&self.particles, ctx);
        if let Some(flash) = &self.flash {
            flash.draw(ctx);
        }
    }
}

/// A continuously animated field of stars, nebulas, particles and lightning
/// drawn onto a surface sized to the viewport.
///
/// The host calls [`attach`](Self::attach) once, [`resize`](Self::resize)
/// whenever the viewport changes, [`frame`](Self::frame) on every display
/// refresh, and [`detach`](Self::detach) on teardown.
#[derive(Debug)]
pub struct ParticleField<S: Surface = PixelCanvas> {
    surface: S,
    config: FieldConfig,
    rng: ChaCha8Rng,
    clock: FrameClock,
    layers: Layers,
    bounds: Bounds,
    attached: bool,
    /// Set while the drawing context is unavailable, so the loss is logged once.
    context_lost: bool,
}

impl<S: Surface> ParticleField<S> {
    /// Create a detached field with a random seed.
    pub fn new(surface: S, config: FieldConfig) -> Self {
        Self::with_seed(surface, config, rand::random())
    }

    /// Create a detached field whose randomness is fully determined by `seed`.
    pub fn with_seed(surface: S, config: FieldConfig, seed: u64) -> Self {
        log_if_invalid(&config);
        let clock = FrameClock::new(config.target_fps);
        Self {
            surface,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            clock,
            layers: Layers::default(),
            bounds: Bounds::default(),
            attached: false,
            context_lost: false,
        }
    }

    /// Bind to a viewport and seed every collection.
    pub fn attach(&mut self, width: u32, height: u32) {
        self.attached = true;
        self.clock.reset();
        self.resize(width, height);
        debug!(width, height, "particle field attached");
    }

    /// Stop animating and drop every primitive.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.layers = Layers::default();
        debug!("particle field detached");
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Resize the surface and regenerate every collection inside the new bounds.
    ///
    /// Safe to call repeatedly with the same size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
        self.bounds = Bounds::new(width, height);
        self.reseed();
    }

    /// Regenerate every collection at the current size.
    pub fn reseed(&mut self) {
        let (width, _) = self.surface.size();
        self.layers = Layers::seed(&self.config, width, self.bounds, &mut self.rng);
        debug!(
            width = self.bounds.width,
            height = self.bounds.height,
            stars = self.layers.stars.len(),
            nebulas = self.layers.nebulas.len(),
            particles = self.layers.particles.len(),
            "particle field seeded"
        );
    }

    /// Replace the configuration and reseed if attached.
    pub fn set_config(&mut self, config: FieldConfig) {
        log_if_invalid(&config);
        self.clock.set_target_fps(config.target_fps);
        self.config = config;
        if self.attached {
            self.reseed();
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Change the frame-rate cap; 0 removes it.
    pub fn set_target_fps(&mut self, target_fps: u32) {
        self.config.target_fps = target_fps;
        self.clock.set_target_fps(target_fps);
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Enable or disable lightning; disabling clears any active flash.
    pub fn set_lightning(&mut self, enabled: bool) {
        self.config.lightning.enabled = enabled;
        if !enabled {
            self.layers.flash = None;
        }
    }

    pub fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.config.speed_multiplier = multiplier;
    }

    /// Run one frame at `now_ms`: throttle, update every collection, draw.
    pub fn frame(&mut self, now_ms: f64) -> FrameOutcome {
        if !self.attached {
            return FrameOutcome::Detached;
        }
        if !self.clock.tick(now_ms) {
            return FrameOutcome::Skipped;
        }

        let ctx = match self.surface.context() {
            Ok(ctx) => ctx,
            Err(err) => {
                if !self.context_lost {
                    debug!(%err, "no drawing context, skipping frames");
                    self.context_lost = true;
                }
                return FrameOutcome::NoSurface;
            }
        };
        self.context_lost = false;

        self.layers.update(&self.config, self.bounds, &mut self.rng);
        self.layers.draw(ctx, &self.config, &mut self.rng);
        FrameOutcome::Drawn
    }

    /// Update every collection by one frame without drawing.
    pub fn step(&mut self) {
        if self.attached {
            self.layers.update(&self.config, self.bounds, &mut self.rng);
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn stars(&self) -> &[Star] {
        &self.layers.stars
    }

    pub fn nebulas(&self) -> &[NebulaBlob] {
        &self.layers.nebulas
    }

    pub fn particles(&self) -> &[Particle] {
        &self.layers.particles
    }

    /// The active lightning flash, if any.
    pub fn flash(&self) -> Option<&Flash> {
        self.layers.flash.as_ref()
    }
}

/// Invalid values are still animated, clamped where they would misbehave.
fn log_if_invalid(config: &FieldConfig) {
    if let Err(err) = config.validate() {
        debug!(%err, "animating unvalidated field config");
    }
}
