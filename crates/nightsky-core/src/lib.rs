//! Core types shared by the nightsky crates.
//!
//! Colors and their CSS-style string syntax, numeric ranges used for
//! randomized per-primitive attributes, and the small enums that select
//! presets and overall animation speed.

mod color;
mod range;
mod style;

pub use color::{ColorParseError, Rgba, hsl_to_rgb};
pub use range::SizeRange;
pub use style::{AnimationSpeed, FieldPreset, UnknownVariant};
