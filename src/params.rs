//! Parameter store for every pattern family.
//!
//! Each pattern owns one plain config struct; shared knobs (point count,
//! size, rotation speed, base color) live in [`GlobalParams`]. The
//! application owns a single [`Params`] and mutates it only through the
//! settings panel bindings in [`crate::panel`].
//!
//! Defaults match the values the visualization starts with on every launch.

use glam::{Vec2, Vec3};

/// Convert a packed `0xRRGGBB` value to an RGB color in `[0, 1]`.
pub fn rgb_from_hex(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(r, g, b)
}

/// Knobs shared by all patterns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalParams {
    /// Number of points for the four star patterns.
    pub point_count: u32,
    /// Point size in world units.
    pub point_size: f32,
    /// Per-frame rotation increment around the x and y axes (radians).
    pub rotation_speed: Vec2,
    /// Material color multiplied into every point.
    pub base_color: Vec3,
}

impl Default for GlobalParams {
    fn default() -> Self {
        Self {
            point_count: 10_000,
            point_size: 0.7,
            rotation_speed: Vec2::new(0.0005, 0.0005),
            base_color: Vec3::ONE,
        }
    }
}

/// Uniform cloud: a box of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudParams {
    /// Full extent of the box along each axis.
    pub extent: Vec3,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            extent: Vec3::new(300.0, 300.0, 200.0),
        }
    }
}

/// Center-attractor disk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterParams {
    pub max_radius: f32,
    /// Full depth of the disk along z.
    pub depth: f32,
}

impl Default for CenterParams {
    fn default() -> Self {
        Self {
            max_radius: 150.0,
            depth: 200.0,
        }
    }
}

/// Open-ended spiral / vortex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralParams {
    /// Multiplier on `sqrt(i)` for the planar radius.
    pub radius_scale: f32,
    /// Distance each successive point moves along z.
    pub spiral_power: f32,
    /// Angle increment per point.
    pub tightness: f32,
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self {
            radius_scale: 2.0,
            spiral_power: 0.1,
            tightness: 0.3,
        }
    }
}

/// Animated sine sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    pub extent_x: f32,
    pub extent_z: f32,
    pub frequency: f32,
    pub amplitude: f32,
}

impl WaveParams {
    /// Wave speed used by the frame loop.
    pub const SPEED: f32 = 0.5;

    /// Spatial period divisor used by the frame loop.
    pub fn width(&self) -> f32 {
        self.frequency * 300.0
    }
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            extent_x: 300.0,
            extent_z: 200.0,
            frequency: 0.05,
            amplitude: 20.0,
        }
    }
}

/// Shader-based spiral galaxy.
///
/// The galaxy has its own point count; the global count does not apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalaxyParams {
    pub count: u32,
    /// Point size factor passed to the galaxy shader.
    pub size: f32,
    /// Maximum radius of the disk.
    pub radius: f32,
    /// Number of spiral arms.
    pub branches: u32,
    /// Spin angle per unit radius.
    pub spin: f32,
    /// Exponent applied to random offsets; larger values pull points onto the arms.
    pub randomness_power: f32,
    pub inside_color: Vec3,
    pub outside_color: Vec3,
    /// Falloff exponent for the round point glow.
    pub strength_power: f32,
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            count: 30_000,
            size: 300.0,
            radius: 15.0,
            branches: 3,
            spin: 1.5,
            randomness_power: 7.5,
            inside_color: rgb_from_hex(0xb5f28d),
            outside_color: rgb_from_hex(0x1b3984),
            strength_power: 35.0,
        }
    }
}

/// Every parameter the visualization exposes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Params {
    pub global: GlobalParams,
    pub cloud: CloudParams,
    pub center: CenterParams,
    pub spiral: SpiralParams,
    pub wave: WaveParams,
    pub galaxy: GalaxyParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert_eq!(rgb_from_hex(0xffffff), Vec3::ONE);
        assert_eq!(rgb_from_hex(0x000000), Vec3::ZERO);
        assert_eq!(rgb_from_hex(0xff0000), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(rgb_from_hex(0x00ff00), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_galaxy_defaults() {
        let g = GalaxyParams::default();
        assert_eq!(g.count, 30_000);
        assert_eq!(g.branches, 3);
        assert_eq!(g.size, 300.0);
        assert!((g.inside_color - Vec3::new(181.0, 242.0, 141.0) / 255.0).length() < 1e-6);
        assert!((g.outside_color - Vec3::new(27.0, 57.0, 132.0) / 255.0).length() < 1e-6);
    }

    #[test]
    fn test_wave_width() {
        let w = WaveParams::default();
        assert!((w.width() - 15.0).abs() < 1e-5);
    }
}
