//! Palette helpers for primitive creation and terminal output.

use nightsky_core::{Rgba, hsl_to_rgb};
use rand::Rng;
use ratatui::style::Color;

/// Pick a palette color at random, falling back to white for an empty palette.
pub(crate) fn pick_color<R: Rng + ?Sized>(palette: &[Rgba], rng: &mut R) -> Rgba {
    if palette.is_empty() {
        return Rgba::WHITE;
    }
    palette[rng.random_range(0..palette.len())]
}

/// Shift hue by up to ±20° and lightness by up to ±0.1, keeping alpha.
pub(crate) fn vary_color<R: Rng + ?Sized>(color: Rgba, rng: &mut R) -> Rgba {
    let (h, s, l) = color.to_hsl();
    let hue = h + rng.random_range(-20.0f32..=20.0);
    let lightness = (l + rng.random_range(-0.1f32..=0.1)).clamp(0.05, 0.95);
    hsl_to_rgb(hue, s, lightness).with_alpha(color.a)
}

/// Palette pick with optional variation, as done once per primitive.
pub(crate) fn primitive_color<R: Rng + ?Sized>(palette: &[Rgba], variation: bool, rng: &mut R) -> Rgba {
    let base = pick_color(palette, rng);
    if variation {
        vary_color(base, rng)
    } else {
        base
    }
}

/// Convert to a 24-bit terminal color, dropping alpha.
pub(crate) fn to_terminal_color(color: Rgba) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}
