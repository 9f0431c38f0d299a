//! Layer parameters and the built-in presets.

use std::f32::consts::PI;

use nightsky_core::{FieldPreset, Rgba, SizeRange};
use serde::{Deserialize, Serialize};

/// A field configuration value that cannot be animated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidField {
    #[error("{layer}.{field} must be an ordered [min, max] pair")]
    Range {
        layer: &'static str,
        field: &'static str,
    },
    #[error("{layer}.{field} must be within [0, 1]")]
    Probability {
        layer: &'static str,
        field: &'static str,
    },
    #[error("{layer}.palette must not be empty when the layer has primitives")]
    EmptyPalette { layer: &'static str },
    #[error("lightning.max_depth must be between 1 and {max}, got {depth}")]
    Depth { depth: u8, max: u8 },
    #[error("{0} must be a positive finite number")]
    NotPositive(&'static str),
    #[error("lightning.spread must be within [0, π] radians, got {0}")]
    Spread(f32),
}

/// Settings shared by every primitive collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Number of primitives on regular viewports.
    pub count: usize,
    /// Number of primitives on viewports narrower than the compact breakpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compact_count: Option<usize>,
    /// Base speed in pixels per frame.
    pub speed: f32,
    /// Radius range in pixels.
    pub size: SizeRange,
    /// Base opacity range.
    pub opacity: SizeRange,
    /// Colors picked at random for each primitive.
    pub palette: Vec<Rgba>,
    /// Shift hue and lightness of the picked color once at creation.
    pub color_variation: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            count: 0,
            compact_count: None,
            speed: 0.1,
            size: SizeRange::new(0.5, 1.0),
            opacity: SizeRange::new(0.5, 1.0),
            palette: vec![Rgba::WHITE],
            color_variation: false,
        }
    }
}

impl LayerConfig {
    /// Primitive count for a viewport of the given width.
    pub fn count_for(&self, width: u32, compact_below_width: u32) -> usize {
        match self.compact_count {
            Some(compact) if width < compact_below_width => compact,
            _ => self.count,
        }
    }

    fn validate(&self, layer: &'static str) -> Result<(), InvalidField> {
        if !self.size.is_ordered() || self.size.min < 0.0 {
            return Err(InvalidField::Range {
                layer,
                field: "size",
            });
        }
        if !self.opacity.is_ordered() || self.opacity.min < 0.0 || self.opacity.max > 1.0 {
            return Err(InvalidField::Range {
                layer,
                field: "opacity",
            });
        }
        if !self.speed.is_finite() {
            return Err(InvalidField::NotPositive("speed"));
        }
        let populated = self.count > 0 || self.compact_count.is_some_and(|c| c > 0);
        if populated && self.palette.is_empty() {
            return Err(InvalidField::EmptyPalette { layer });
        }
        Ok(())
    }
}

/// Star layer: falling, twinkling points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    #[serde(flatten)]
    pub layer: LayerConfig,
    /// Twinkle phase advance per frame.
    pub twinkle_speed: SizeRange,
    /// Per-frame chance of drawing a star enlarged for a single frame.
    pub sparkle_chance: f32,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            layer: LayerConfig::default(),
            twinkle_speed: SizeRange::new(0.005, 0.025),
            sparkle_chance: 0.01,
        }
    }
}

/// Particle layer: short-lived bouncing dots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    #[serde(flatten)]
    pub layer: LayerConfig,
    /// Lifespan range in frames.
    pub lifespan: SizeRange,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            layer: LayerConfig::default(),
            lifespan: SizeRange::new(100.0, 250.0),
        }
    }
}

/// Lightning flashes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightningConfig {
    pub enabled: bool,
    /// Per-frame spawn chance while no flash is active.
    pub probability: f32,
    /// Scales `probability`.
    pub intensity: f32,
    /// Lifetime of a flash in frames.
    pub duration_frames: u32,
    /// Maximum nesting of the branch tree (top-level branches are depth 1).
    pub max_depth: u8,
    /// Length range of a top-level branch in pixels.
    pub length: SizeRange,
    /// Maximum deviation from straight down, in radians.
    pub spread: f32,
    /// Stroke width of a top-level branch.
    pub width: f32,
    pub color: Rgba,
    /// Opacity of the full-surface wash at the start of a flash.
    pub overlay_alpha: f32,
}

impl LightningConfig {
    pub const MAX_DEPTH: u8 = 6;
}

impl Default for LightningConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            probability: 0.004,
            intensity: 1.0,
            duration_frames: 12,
            max_depth: 3,
            length: SizeRange::new(8.0, 18.0),
            spread: 0.6,
            width: 1.2,
            color: Rgba::rgb(196, 181, 253),
            overlay_alpha: 0.08,
        }
    }
}

/// Complete parameter set of a particle field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Color the surface is cleared to every frame.
    pub background: Rgba,
    pub stars: StarConfig,
    pub nebulas: LayerConfig,
    pub particles: ParticleConfig,
    pub lightning: LightningConfig,
    /// Frame-rate cap; 0 disables throttling.
    pub target_fps: u32,
    /// Global motion multiplier.
    pub speed_multiplier: f32,
    /// Viewports narrower than this (in pixels) use each layer's `compact_count`.
    pub compact_below_width: u32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::preset(FieldPreset::default())
    }
}

impl FieldConfig {
    /// Build the parameter set for a preset.
    pub fn preset(preset: FieldPreset) -> Self {
        let violet = Rgba::rgb(139, 92, 246);
        let blue = Rgba::rgb(59, 130, 246);
        let pink = Rgba::rgb(236, 72, 153);
        let cyan = Rgba::rgb(6, 182, 212);
        let lavender = Rgba::rgb(196, 181, 253);
        let sky = Rgba::rgb(147, 197, 253);

        let base = Self {
            background: Rgba::rgb(5, 3, 15),
            stars: StarConfig::default(),
            nebulas: LayerConfig::default(),
            particles: ParticleConfig::default(),
            lightning: LightningConfig::default(),
            target_fps: 60,
            speed_multiplier: 1.0,
            compact_below_width: 96,
        };

        match preset {
            FieldPreset::Hero => Self {
                stars: StarConfig {
                    layer: LayerConfig {
                        count: 120,
                        compact_count: Some(50),
                        speed: 0.05,
                        size: SizeRange::new(0.3, 1.1),
                        opacity: SizeRange::new(0.4, 1.0),
                        palette: vec![Rgba::WHITE, lavender, sky],
                        color_variation: false,
                    },
                    ..StarConfig::default()
                },
                nebulas: LayerConfig {
                    count: 3,
                    compact_count: Some(2),
                    speed: 0.05,
                    size: SizeRange::new(12.0, 28.0),
                    opacity: SizeRange::new(0.15, 0.3),
                    palette: vec![violet, blue, pink],
                    color_variation: false,
                },
                lightning: LightningConfig {
                    enabled: true,
                    ..LightningConfig::default()
                },
                ..base
            },
            FieldPreset::Cosmic => Self {
                stars: StarConfig {
                    layer: LayerConfig {
                        count: 160,
                        compact_count: Some(70),
                        speed: 0.08,
                        size: SizeRange::new(0.3, 1.2),
                        opacity: SizeRange::new(0.5, 1.0),
                        palette: vec![Rgba::WHITE, lavender, sky, cyan],
                        color_variation: true,
                    },
                    sparkle_chance: 0.02,
                    ..StarConfig::default()
                },
                nebulas: LayerConfig {
                    count: 4,
                    compact_count: Some(2),
                    speed: 0.08,
                    size: SizeRange::new(14.0, 32.0),
                    opacity: SizeRange::new(0.12, 0.25),
                    palette: vec![violet, blue, pink, cyan],
                    color_variation: true,
                },
                particles: ParticleConfig {
                    layer: LayerConfig {
                        count: 40,
                        compact_count: Some(20),
                        speed: 0.3,
                        size: SizeRange::new(0.4, 1.0),
                        opacity: SizeRange::new(0.4, 0.9),
                        palette: vec![violet, cyan, pink],
                        color_variation: false,
                    },
                    lifespan: SizeRange::new(120.0, 300.0),
                },
                ..base
            },
            FieldPreset::Events => Self {
                background: Rgba::rgb(3, 7, 18),
                particles: ParticleConfig {
                    layer: LayerConfig {
                        count: 80,
                        compact_count: Some(40),
                        speed: 0.4,
                        size: SizeRange::new(0.5, 1.3),
                        opacity: SizeRange::new(0.3, 0.8),
                        palette: vec![cyan, violet, pink],
                        color_variation: false,
                    },
                    lifespan: SizeRange::new(100.0, 250.0),
                },
                ..base
            },
            FieldPreset::Starfield => Self {
                background: Rgba::BLACK,
                stars: StarConfig {
                    layer: LayerConfig {
                        count: 200,
                        compact_count: Some(80),
                        speed: 0.15,
                        size: SizeRange::new(0.3, 1.0),
                        opacity: SizeRange::new(0.3, 1.0),
                        palette: vec![Rgba::WHITE],
                        color_variation: false,
                    },
                    ..StarConfig::default()
                },
                ..base
            },
        }
    }

    /// Check every range, probability and depth.
    pub fn validate(&self) -> Result<(), InvalidField> {
        self.stars.layer.validate("stars")?;
        self.nebulas.validate("nebulas")?;
        self.particles.layer.validate("particles")?;

        if !self.stars.twinkle_speed.is_ordered() {
            return Err(InvalidField::Range {
                layer: "stars",
                field: "twinkle_speed",
            });
        }
        if !(0.0..=1.0).contains(&self.stars.sparkle_chance) {
            return Err(InvalidField::Probability {
                layer: "stars",
                field: "sparkle_chance",
            });
        }
        if !self.particles.lifespan.is_ordered() || self.particles.lifespan.min < 1.0 {
            return Err(InvalidField::Range {
                layer: "particles",
                field: "lifespan",
            });
        }

        let lightning = &self.lightning;
        if !(0.0..=1.0).contains(&lightning.probability) {
            return Err(InvalidField::Probability {
                layer: "lightning",
                field: "probability",
            });
        }
        if !(0.0..=1.0).contains(&lightning.overlay_alpha) {
            return Err(InvalidField::Probability {
                layer: "lightning",
                field: "overlay_alpha",
            });
        }
        if lightning.max_depth == 0 || lightning.max_depth > LightningConfig::MAX_DEPTH {
            return Err(InvalidField::Depth {
                depth: lightning.max_depth,
                max: LightningConfig::MAX_DEPTH,
            });
        }
        if !lightning.length.is_ordered() || lightning.length.min <= 0.0 {
            return Err(InvalidField::Range {
                layer: "lightning",
                field: "length",
            });
        }
        if !(lightning.intensity.is_finite() && lightning.intensity >= 0.0) {
            return Err(InvalidField::NotPositive("lightning.intensity"));
        }
        if !(0.0..=PI).contains(&lightning.spread) {
            return Err(InvalidField::Spread(lightning.spread));
        }
        if !(lightning.width.is_finite() && lightning.width > 0.0) {
            return Err(InvalidField::NotPositive("lightning.width"));
        }
        if lightning.duration_frames == 0 {
            return Err(InvalidField::NotPositive("lightning.duration_frames"));
        }
        if !(self.speed_multiplier.is_finite() && self.speed_multiplier > 0.0) {
            return Err(InvalidField::NotPositive("speed_multiplier"));
        }
        Ok(())
    }
}
