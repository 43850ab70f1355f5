//! # Starfield
//!
//! Interactive 3D star-field visualization rendered with wgpu.
//!
//! Five procedural patterns place a few thousand to a few hundred thousand
//! points in space: a random cloud, a radial burst, a spiral, an animated
//! wave surface and a spiral-arm galaxy with a color gradient. An orbit
//! camera and a settings panel let you explore and reshape them live.
//!
//! ## Quick Start
//!
//! ```ignore
//! use starfield::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     Starfield::new()
//!         .with_pattern(PatternKind::Spiral)
//!         .run()
//! }
//! ```
//!
//! ## Structure
//!
//! - [`params`]: every tunable value with its default.
//! - [`patterns`]: the point generators. Pure functions of parameters and a
//!   random source.
//! - [`scene`]: owns the single active visual and the camera. Switching
//!   patterns releases the previous GPU buffers before new ones are made.
//! - [`frame`]: per-frame animation (rotation, wave heights).
//! - [`panel`]: the settings panel as data; edits map to scene effects.
//!
//! Generation and animation are independent of the GPU, so everything but
//! the renderer can be driven headless through [`scene::VisualBackend`].
//!
//! ## Controls
//!
//! - Left drag: orbit
//! - Scroll: zoom
//! - `1`-`5`: switch pattern
//! - `R`: randomize colors
//! - `Space`: regenerate

mod app;
pub mod camera;
pub mod error;
pub mod frame;
mod gpu;
pub mod panel;
pub mod params;
pub mod patterns;
pub mod scene;
pub mod shaders;
pub mod textures;
pub mod time;
#[cfg(feature = "egui")]
mod ui;

pub use app::Starfield;
pub use error::{AppError, GpuError, TextureError};
pub use glam::{Vec2, Vec3};
pub use params::Params;
pub use patterns::PatternKind;

/// Convenient re-exports for building a visualization.
pub mod prelude {
    pub use crate::app::Starfield;
    pub use crate::camera::Camera;
    pub use crate::error::{AppError, GpuError, TextureError};
    pub use crate::panel::{Effect, Field, Value};
    pub use crate::params::{CenterParams, CloudParams, GalaxyParams, GlobalParams, Params, SpiralParams, WaveParams};
    pub use crate::patterns::{GeneratedPoints, Pattern, PatternKind, PointBuffer};
    pub use crate::scene::{Scene, VisualBackend};
    pub use crate::textures::SpriteTexture;
    pub use crate::{Vec2, Vec3};
}
