//! Particle-field animation for the nightsky background.
//!
//! A [`ParticleField`] owns a drawing [`Surface`] sized to the viewport and a
//! set of independently animated primitives: falling, twinkling stars,
//! drifting nebula blobs, short-lived bouncing particles and occasional
//! lightning flashes. Every collection is re-seeded when the viewport is
//! resized, and each frame is optionally throttled by a [`FrameClock`].
//!
//! The bundled [`PixelCanvas`] is a software framebuffer; [`CanvasWidget`]
//! shows it in a terminal through ratatui.

mod canvas;
mod clock;
mod color;
mod config;
mod field;
pub mod primitives;
mod surface;
mod widget;

pub use canvas::PixelCanvas;
pub use clock::FrameClock;
pub use config::{
    FieldConfig, InvalidField, LayerConfig, LightningConfig, ParticleConfig, StarConfig,
};
pub use field::{FrameOutcome, ParticleField};
pub use surface::{ColorStop, DrawContext, Surface, SurfaceError};
pub use widget::{CanvasWidget, viewport_for};
