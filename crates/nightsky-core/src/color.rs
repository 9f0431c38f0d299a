//! RGBA colors, CSS-style color parsing and HSL conversion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColorParseError {
    /// The string is not in any recognized color syntax.
    #[error("unrecognized color `{0}`")]
    Syntax(String),
    /// A numeric component is missing or not a number.
    #[error("invalid component `{component}` in color `{input}`")]
    Component { input: String, component: String },
    /// A component is outside its allowed range.
    #[error("component out of range in color `{0}`")]
    OutOfRange(String),
}

/// An 8-bit RGB color with a floating point alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Color with an explicit alpha, clamped to `[0, 1]`.
    pub fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r,
            g,
            b,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Mix towards white by `amount` (0.0 = unchanged, 1.0 = white).
    pub fn lighten(self, amount: f32) -> Self {
        self.lerp(Rgba::WHITE.with_alpha(self.a), amount)
    }

    /// Linear interpolation between two colors, alpha included.
    pub fn lerp(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self::rgba(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            self.a + (other.a - self.a) * t,
        )
    }

    /// Hue (degrees), saturation and lightness of this color.
    pub fn to_hsl(self) -> (f32, f32, f32) {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return (0.0, 0.0, l);
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        (h * 60.0, s, l)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::WHITE
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Rgba {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for Rgba {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();

        match input.as_str() {
            "white" => return Ok(Rgba::WHITE),
            "black" => return Ok(Rgba::BLACK),
            "transparent" => return Ok(Rgba::rgba(0, 0, 0, 0.0)),
            _ => {}
        }

        if let Some(hex) = input.strip_prefix('#') {
            return parse_hex(hex, s);
        }

        let (name, args) = input
            .strip_suffix(')')
            .and_then(|rest| rest.split_once('('))
            .ok_or_else(|| ColorParseError::Syntax(s.to_string()))?;
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();

        match (name.trim(), parts.len()) {
            ("rgb", 3) | ("rgba", 4) => {
                let channel = |p: &str| -> Result<u8, ColorParseError> {
                    let v = parse_number(p, s)?;
                    if !(0.0..=255.0).contains(&v) {
                        return Err(ColorParseError::OutOfRange(s.to_string()));
                    }
                    Ok(v.round() as u8)
                };
                let alpha = match parts.get(3) {
                    Some(p) => parse_alpha(p, s)?,
                    None => 1.0,
                };
                Ok(Rgba::rgba(
                    channel(parts[0])?,
                    channel(parts[1])?,
                    channel(parts[2])?,
                    alpha,
                ))
            }
            ("hsl", 3) | ("hsla", 4) => {
                let h = parse_number(parts[0].trim_end_matches("deg"), s)?;
                let sat = parse_percent(parts[1], s)?;
                let light = parse_percent(parts[2], s)?;
                let alpha = match parts.get(3) {
                    Some(p) => parse_alpha(p, s)?,
                    None => 1.0,
                };
                Ok(hsl_to_rgb(h, sat, light).with_alpha(alpha))
            }
            _ => Err(ColorParseError::Syntax(s.to_string())),
        }
    }
}

fn parse_hex(hex: &str, input: &str) -> Result<Rgba, ColorParseError> {
    let syntax = || ColorParseError::Syntax(input.to_string());
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(syntax());
    }

    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| syntax());
    let nibble = |i: usize| {
        u8::from_str_radix(&hex[i..i + 1], 16)
            .map(|v| v * 17)
            .map_err(|_| syntax())
    };

    match hex.len() {
        3 => Ok(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        6 => Ok(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Ok(Rgba::rgba(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            byte(6)? as f32 / 255.0,
        )),
        _ => Err(syntax()),
    }
}

fn parse_number(part: &str, input: &str) -> Result<f32, ColorParseError> {
    part.trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ColorParseError::Component {
            input: input.to_string(),
            component: part.to_string(),
        })
}

fn parse_percent(part: &str, input: &str) -> Result<f32, ColorParseError> {
    let value = parse_number(part.trim().trim_end_matches('%'), input)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(ColorParseError::OutOfRange(input.to_string()));
    }
    Ok(value / 100.0)
}

fn parse_alpha(part: &str, input: &str) -> Result<f32, ColorParseError> {
    let value = parse_number(part, input)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ColorParseError::OutOfRange(input.to_string()));
    }
    Ok(value)
}

/// Convert HSL (hue in degrees, saturation and lightness in `[0, 1]`) to RGB.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgba {
    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return Rgba::rgb(v, v, v);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let h = h.rem_euclid(360.0) / 360.0;

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    Rgba::rgb(
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
