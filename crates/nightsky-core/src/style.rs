//! Animation speed and field preset selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Returned when a preset or speed name is not recognized.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown {kind} `{name}` (expected one of: {expected})")]
pub struct UnknownVariant {
    kind: &'static str,
    name: String,
    expected: &'static str,
}

/// Global animation speed applied on top of each layer's own speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl AnimationSpeed {
    /// Multiplier for per-frame motion.
    pub fn multiplier(self) -> f32 {
        match self {
            AnimationSpeed::Slow => 0.5,
            AnimationSpeed::Medium => 1.0,
            AnimationSpeed::Fast => 1.75,
        }
    }

    /// Cycle to the next speed.
    pub fn next(self) -> Self {
        match self {
            AnimationSpeed::Slow => AnimationSpeed::Medium,
            AnimationSpeed::Medium => AnimationSpeed::Fast,
            AnimationSpeed::Fast => AnimationSpeed::Slow,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AnimationSpeed::Slow => "slow",
            AnimationSpeed::Medium => "medium",
            AnimationSpeed::Fast => "fast",
        }
    }
}

impl fmt::Display for AnimationSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnimationSpeed {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slow" => Ok(AnimationSpeed::Slow),
            "medium" | "normal" => Ok(AnimationSpeed::Medium),
            "fast" => Ok(AnimationSpeed::Fast),
            _ => Err(UnknownVariant {
                kind: "speed",
                name: s.to_string(),
                expected: "slow, medium, fast",
            }),
        }
    }
}

/// Parameter sets for the particle field.
///
/// Each preset corresponds to one of the backgrounds the festival site used:
/// the landing-page hero, the enhanced cosmic background, the events page
/// particle system, and a plain starfield.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldPreset {
    /// Stars, nebulas and occasional lightning.
    #[default]
    Hero,
    /// Color-varied stars, nebulas and drifting particles.
    Cosmic,
    /// Bouncing particles only.
    Events,
    /// Falling, twinkling stars only.
    Starfield,
}

impl FieldPreset {
    pub const ALL: [FieldPreset; 4] = [
        FieldPreset::Hero,
        FieldPreset::Cosmic,
        FieldPreset::Events,
        FieldPreset::Starfield,
    ];

    /// Cycle to the next preset.
    pub fn next(self) -> Self {
        match self {
            FieldPreset::Hero => FieldPreset::Cosmic,
            FieldPreset::Cosmic => FieldPreset::Events,
            FieldPreset::Events => FieldPreset::Starfield,
            FieldPreset::Starfield => FieldPreset::Hero,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldPreset::Hero => "hero",
            FieldPreset::Cosmic => "cosmic",
            FieldPreset::Events => "events",
            FieldPreset::Starfield => "starfield",
        }
    }
}

impl fmt::Display for FieldPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldPreset {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        FieldPreset::ALL
            .into_iter()
            .find(|p| p.name() == lower)
            .ok_or_else(|| UnknownVariant {
                kind: "preset",
                name: s.to_string(),
                expected: "hero, cosmic, events, starfield",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_cycle_visits_all() {
        let mut preset = FieldPreset::default();
        let mut seen = Vec::new();
        for _ in 0..FieldPreset::ALL.len() {
            seen.push(preset);
            preset = preset.next();
        }
        assert_eq!(preset, FieldPreset::default());
        for p in FieldPreset::ALL {
            assert!(seen.contains(&p));
        }
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("Events".parse::<FieldPreset>(), Ok(FieldPreset::Events));
        let err = "galaxy".parse::<FieldPreset>().unwrap_err();
        assert!(err.to_string().contains("galaxy"));
    }

    #[test]
    fn test_speed_from_str_and_multiplier() {
        assert_eq!("fast".parse::<AnimationSpeed>(), Ok(AnimationSpeed::Fast));
        assert_eq!("normal".parse::<AnimationSpeed>(), Ok(AnimationSpeed::Medium));
        assert!("warp".parse::<AnimationSpeed>().is_err());
        assert!(AnimationSpeed::Slow.multiplier() < AnimationSpeed::Fast.multiplier());
        assert_eq!(AnimationSpeed::Fast.next(), AnimationSpeed::Slow);
    }
}
