//! In-memory RGB framebuffer.

use nightsky_core::Rgba;

use crate::surface::{ColorStop, DrawContext, Surface, SurfaceError};

/// A software canvas storing linear `[0, 1]` RGB per pixel.
///
/// Zero-sized canvases are valid and every drawing call on them is a no-op.
/// Canvases larger than [`PixelCanvas::MAX_PIXELS`] keep their nominal size
/// but refuse to hand out a drawing context.
#[derive(Debug, Clone, Default)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 3]>,
}

impl PixelCanvas {
    /// Largest pixel count a canvas will allocate.
    pub const MAX_PIXELS: u64 = 4096 * 4096;

    pub fn new(width: u32, height: u32) -> Self {
        let mut canvas = Self::default();
        canvas.resize(width, height);
        canvas
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color of the pixel at `(x, y)`, if it exists.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).map(|&[r, g, b]| {
            let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            Rgba::rgb(to_u8(r), to_u8(g), to_u8(b))
        })
    }

    fn is_allocated(&self) -> bool {
        !self.pixels.is_empty()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgba, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 || x >= self.width || y >= self.height {
            return;
        }
        let idx = self.index(x, y);
        if let Some(px) = self.pixels.get_mut(idx) {
            let src = [
                color.r as f32 / 255.0,
                color.g as f32 / 255.0,
                color.b as f32 / 255.0,
            ];
            for (dst, src) in px.iter_mut().zip(src) {
                *dst = *dst * (1.0 - alpha) + src * alpha;
            }
        }
    }

    /// Pixel rows and columns touched by a bounding box, clipped to the canvas.
    fn clip(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Option<(u32, u32, u32, u32)> {
        if !self.is_allocated() || !(min_x.is_finite() && min_y.is_finite()) {
            return None;
        }
        if !(max_x.is_finite() && max_y.is_finite()) {
            return None;
        }
        let x0 = min_x.floor().max(0.0) as u32;
        let y0 = min_y.floor().max(0.0) as u32;
        let x1 = (max_x.ceil() as i64).min(self.width as i64 - 1);
        let y1 = (max_y.ceil() as i64).min(self.height as i64 - 1);
        if x1 < 0 || y1 < 0 || x0 as i64 > x1 || y0 as i64 > y1 {
            return None;
        }
        Some((x0, y0, x1 as u32, y1 as u32))
    }
}

impl Surface for PixelCanvas {
    type Context = PixelCanvas;

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        let len = width as u64 * height as u64;
        self.pixels = if len <= Self::MAX_PIXELS {
            vec![[0.0; 3]; len as usize]
        } else {
            Vec::new()
        };
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn context(&mut self) -> Result<&mut Self::Context, SurfaceError> {
        let len = self.width as u64 * self.height as u64;
        if len > Self::MAX_PIXELS {
            return Err(SurfaceError::Unavailable(format!(
                "{}x{} exceeds the {} pixel limit",
                self.width,
                self.height,
                Self::MAX_PIXELS
            )));
        }
        Ok(self)
    }
}

impl DrawContext for PixelCanvas {
    fn clear(&mut self, color: Rgba) {
        let c = [
            color.r as f32 / 255.0,
            color.g as f32 / 255.0,
            color.b as f32 / 255.0,
        ];
        self.pixels.fill(c);
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        if radius <= 0.0 || color.a <= 0.0 {
            return;
        }
        let reach = radius + 0.5;
        let Some((x0, y0, x1, y1)) = self.clip(cx - reach, cy - reach, cx + reach, cy + reach)
        else {
            return;
        };

        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let distance = (dx * dx + dy * dy).sqrt();
                // Coverage falls off over one pixel at the rim; tiny discs
                // just dim the pixel they sit in.
                let coverage = (radius + 0.5 - distance).clamp(0.0, 1.0) * radius.min(1.0);
                self.blend(x, y, color, color.a * coverage);
            }
        }
    }

    fn radial_gradient(&mut self, cx: f32, cy: f32, radius: f32, stops: &[ColorStop]) {
        if radius <= 0.0 || stops.is_empty() {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.clip(cx - radius, cy - radius, cx + radius, cy + radius)
        else {
            return;
        };

        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let t = (dx * dx + dy * dy).sqrt() / radius;
                if t > 1.0 {
                    continue;
                }
                let color = sample_gradient(stops, t);
                self.blend(x, y, color, color.a);
            }
        }
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgba) {
        if width <= 0.0 || color.a <= 0.0 {
            return;
        }
        let half = width / 2.0;
        let reach = half + 0.5;
        let Some((x0, y0, x1, y1)) = self.clip(
            from.0.min(to.0) - reach,
            from.1.min(to.1) - reach,
            from.0.max(to.0) + reach,
            from.1.max(to.1) + reach,
        ) else {
            return;
        };

        let (vx, vy) = (to.0 - from.0, to.1 - from.1);
        let len_sq = vx * vx + vy * vy;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;
                let t = if len_sq > 0.0 {
                    (((px - from.0) * vx + (py - from.1) * vy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let dx = px - (from.0 + vx * t);
                let dy = py - (from.1 + vy * t);
                let distance = (dx * dx + dy * dy).sqrt();
                let coverage = (half + 0.5 - distance).clamp(0.0, 1.0) * width.min(1.0);
                self.blend(x, y, color, color.a * coverage);
            }
        }
    }

    fn overlay(&mut self, color: Rgba) {
        if color.a <= 0.0 {
            return;
        }
        for y in 0..self.height {
            for x in 0..self.width {
                self.blend(x, y, color, color.a);
            }
        }
    }
}

/// Interpolated color at `t` (fraction of the radius) between gradient stops.
fn sample_gradient(stops: &[ColorStop], t: f32) -> Rgba {
    let Some(first) = stops.first() else {
        return Rgba::rgba(0, 0, 0, 0.0);
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let local = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            return a.color.lerp(b.color, local);
        }
    }
    stops.last().unwrap_or(first).color.with_alpha(0.0)
}
