//! Inclusive numeric ranges for randomized attributes.

use serde::{Deserialize, Serialize};

/// An inclusive `[min, max]` range, written as a two element array in config files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct SizeRange {
    pub min: f32,
    pub max: f32,
}

impl SizeRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A range holding a single value.
    pub const fn fixed(value: f32) -> Self {
        Self::new(value, value)
    }

    /// Map `t` in `[0, 1]` onto the range.
    pub fn lerp(&self, t: f32) -> f32 {
        self.min + (self.max - self.min) * t.clamp(0.0, 1.0)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Whether `min <= max` and both bounds are finite.
    pub fn is_ordered(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

impl From<[f32; 2]> for SizeRange {
    fn from([min, max]: [f32; 2]) -> Self {
        Self { min, max }
    }
}

impl From<SizeRange> for [f32; 2] {
    fn from(range: SizeRange) -> Self {
        [range.min, range.max]
    }
}
