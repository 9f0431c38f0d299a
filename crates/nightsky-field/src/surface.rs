//! Drawing surface abstraction.
//!
//! The animator only needs a handful of 2D operations. [`Surface`] owns the
//! pixels and hands out a [`DrawContext`]; acquiring the context is the one
//! fallible step, and callers treat failure as "draw nothing this frame".

use nightsky_core::Rgba;

/// Why a drawing context could not be acquired.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    /// The environment cannot provide a drawing context.
    #[error("drawing context unavailable: {0}")]
    Unavailable(String),
}

/// One stop of a radial gradient. `offset` is a fraction of the radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

impl ColorStop {
    pub fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Alpha-blended drawing primitives. All coordinates are in pixels and the
/// alpha of every color argument is honored.
pub trait DrawContext {
    /// Overwrite every pixel with `color`.
    fn clear(&mut self, color: Rgba);

    /// Anti-aliased filled disc.
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba);

    /// Radial gradient centered on `(cx, cy)`; transparent beyond `radius`.
    fn radial_gradient(&mut self, cx: f32, cy: f32, radius: f32, stops: &[ColorStop]);

    /// Anti-aliased line segment of the given width.
    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgba);

    /// Translucent wash over the whole surface.
    fn overlay(&mut self, color: Rgba);
}

/// Owner of a drawing context whose size follows the viewport.
pub trait Surface {
    type Context: DrawContext;

    /// Set the pixel dimensions, discarding the current contents.
    fn resize(&mut self, width: u32, height: u32);

    /// Current `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);

    /// Acquire the drawing context for this frame.
    fn context(&mut self) -> Result<&mut Self::Context, SurfaceError>;
}
