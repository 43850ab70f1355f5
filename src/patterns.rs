//! Procedural point patterns.
//!
//! Every pattern is a pure function of its parameter struct and a random
//! number generator. Generators never touch the GPU; the scene uploads the
//! resulting [`GeneratedPoints`] wholesale.
//!
//! # Example
//!
//! ```ignore
//! use rand::{rngs::SmallRng, SeedableRng};
//! use starfield::patterns::{generate, PatternKind};
//! use starfield::Params;
//!
//! let mut rng = SmallRng::seed_from_u64(7);
//! let out = generate(PatternKind::Spiral, &Params::default(), &mut rng);
//! assert_eq!(out.points.positions.len(), 3 * out.points.len());
//! ```

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::params::{CenterParams, CloudParams, GalaxyParams, Params, SpiralParams, WaveParams};

/// The five point-placement strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PatternKind {
    /// Points uniformly distributed in a box.
    #[default]
    Cloud,
    /// Loose disk biased toward its center.
    Center,
    /// Fermat spiral drifting along z.
    Spiral,
    /// Animated sine sheet.
    Wave,
    /// Shader-rendered spiral galaxy.
    Galaxy,
}

impl PatternKind {
    pub const ALL: [PatternKind; 5] = [
        PatternKind::Cloud,
        PatternKind::Center,
        PatternKind::Spiral,
        PatternKind::Wave,
        PatternKind::Galaxy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PatternKind::Cloud => "Basic Pattern",
            PatternKind::Center => "Center Pattern",
            PatternKind::Spiral => "Spiral Pattern",
            PatternKind::Wave => "Wave Pattern",
            PatternKind::Galaxy => "Galaxy Pattern",
        }
    }

    /// Whether the pattern renders through the galaxy pipeline.
    pub fn is_galaxy(&self) -> bool {
        matches!(self, PatternKind::Galaxy)
    }
}

/// Flat position and color arrays, three floats per point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointBuffer {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

impl PointBuffer {
    pub fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count * 3),
            colors: Vec::with_capacity(count * 3),
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn push(&mut self, position: Vec3, color: Vec3) {
        self.positions.extend_from_slice(&position.to_array());
        self.colors.extend_from_slice(&color.to_array());
    }

    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[i * 3..i * 3 + 3])
    }

    pub fn color(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.colors[i * 3..i * 3 + 3])
    }
}

/// Per-point anchors kept for the wave animation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveAnchors {
    /// Fixed `(x, z)` of every point.
    pub anchors: Vec<Vec2>,
    /// Position at generation time, jitter included.
    pub initial: Vec<Vec3>,
}

/// Extra per-point attributes consumed by the galaxy shader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GalaxyAttributes {
    /// Point size variation in `[0, 1)`.
    pub scales: Vec<f32>,
    /// Signed offsets added to the position in the vertex shader.
    pub randomness: Vec<f32>,
}

/// Output of a generator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedPoints {
    pub points: PointBuffer,
    pub galaxy: Option<GalaxyAttributes>,
    pub wave: Option<WaveAnchors>,
}

impl From<PointBuffer> for GeneratedPoints {
    fn from(points: PointBuffer) -> Self {
        Self {
            points,
            galaxy: None,
            wave: None,
        }
    }
}

/// A closed-form point placement strategy.
pub trait Pattern {
    const KIND: PatternKind;

    /// Generate `count` points.
    fn generate<R: Rng + ?Sized>(&self, count: u32, rng: &mut R) -> GeneratedPoints;
}

/// Run the generator for `kind` with the matching parameters.
///
/// The galaxy uses its own point count; all other patterns use the global one.
pub fn generate<R: Rng + ?Sized>(kind: PatternKind, params: &Params, rng: &mut R) -> GeneratedPoints {
    let count = params.global.point_count;
    match kind {
        PatternKind::Cloud => run(&params.cloud, count, rng),
        PatternKind::Center => run(&params.center, count, rng),
        PatternKind::Spiral => run(&params.spiral, count, rng),
        PatternKind::Wave => run(&params.wave, count, rng),
        PatternKind::Galaxy => run(&params.galaxy, params.galaxy.count, rng),
    }
}

fn run<P: Pattern, R: Rng + ?Sized>(pattern: &P, count: u32, rng: &mut R) -> GeneratedPoints {
    let out = pattern.generate(count, rng);
    log::debug!("generated {} points for {}", out.points.len(), P::KIND.name());
    out
}

/// Uniform random RGB triples for `count` points.
pub fn random_colors<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<f32> {
    (0..count * 3).map(|_| rng.gen::<f32>()).collect()
}

fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(rng.gen(), rng.gen(), rng.gen())
}

/// Uniform sample in `[-extent / 2, extent / 2)`.
fn centered<R: Rng + ?Sized>(rng: &mut R, extent: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * extent
}

impl Pattern for CloudParams {
    const KIND: PatternKind = PatternKind::Cloud;

    fn generate<R: Rng + ?Sized>(&self, count: u32, rng: &mut R) -> GeneratedPoints {
        let mut points = PointBuffer::with_capacity(count as usize);
        for _ in 0..count {
            let x = centered(rng, self.extent.x);
            let y = centered(rng, self.extent.y);
            let z = centered(rng, self.extent.z);
            let color = random_color(rng);
            points.push(Vec3::new(x, y, z), color);
        }
        points.into()
    }
}

impl Pattern for CenterParams {
    const KIND: PatternKind = PatternKind::Center;

    fn generate<R: Rng + ?Sized>(&self, count: u32, rng: &mut R) -> GeneratedPoints {
        let mut points = PointBuffer::with_capacity(count as usize);
        for i in 0..count {
            // Angle follows the index, not the RNG.
            let angle = i as f32 * 0.1;
            let radius = rng.gen::<f32>() * self.max_radius;
            let distance = rng.gen::<f32>().sqrt() * radius;
            let x = (angle + 2.0).cos() * distance;
            let y = (angle + 2.0).sin() * distance;
            let z = centered(rng, self.depth);
            let color = random_color(rng);
            points.push(Vec3::new(x, y, z), color);
        }
        points.into()
    }
}

impl SpiralParams {
    /// Planar radius of point `i`.
    pub fn radius_at(&self, i: u32) -> f32 {
        (i as f32).sqrt() * self.radius_scale
    }
}

impl Pattern for SpiralParams {
    const KIND: PatternKind = PatternKind::Spiral;

    fn generate<R: Rng + ?Sized>(&self, count: u32, rng: &mut R) -> GeneratedPoints {
        let mut points = PointBuffer::with_capacity(count as usize);
        for i in 0..count {
            let angle = i as f32 * self.tightness;
            let radius = self.radius_at(i);
            let position = Vec3::new(
                radius * angle.cos(),
                radius * angle.sin(),
                i as f32 * self.spiral_power,
            );
            let color = random_color(rng);
            points.push(position, color);
        }
        points.into()
    }
}

impl WaveParams {
    /// Height of the animated wave at `(x, z)` after `elapsed` seconds.
    pub fn height_at(&self, x: f32, z: f32, elapsed: f32) -> f32 {
        let width = self.width();
        ((elapsed + x / width + z / width) * Self::SPEED).sin() * self.amplitude
    }
}

impl Pattern for WaveParams {
    const KIND: PatternKind = PatternKind::Wave;

    fn generate<R: Rng + ?Sized>(&self, count: u32, rng: &mut R) -> GeneratedPoints {
        let n = count as usize;
        let mut points = PointBuffer::with_capacity(n);
        let mut wave = WaveAnchors {
            anchors: Vec::with_capacity(n),
            initial: Vec::with_capacity(n),
        };

        for _ in 0..count {
            let x = centered(rng, self.extent_x);
            let z = centered(rng, self.extent_z);
            let y = (x * self.frequency).sin() * self.amplitude + centered(rng, 20.0);
            let position = Vec3::new(x, y, z);
            points.push(position, random_color(rng));
            wave.anchors.push(Vec2::new(x, z));
            wave.initial.push(position);
        }

        GeneratedPoints {
            points,
            galaxy: None,
            wave: Some(wave),
        }
    }
}

/// Angle of the arm that point `i` belongs to.
///
/// Zero branches is treated as a single arm.
pub fn branch_angle(i: u32, branches: u32) -> f32 {
    let branches = branches.max(1);
    (i % branches) as f32 * TAU / branches as f32
}

impl GalaxyParams {
    /// Color of a point at `radius` from the center.
    pub fn color_at(&self, radius: f32) -> Vec3 {
        let t = if self.radius > 0.0 { radius / self.radius } else { 0.0 };
        self.inside_color.lerp(self.outside_color, t)
    }

    fn random_offset<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let magnitude = rng.gen::<f32>().powf(self.randomness_power);
        if rng.gen::<f32>() < 0.5 {
            -magnitude
        } else {
            magnitude
        }
    }
}

impl Pattern for GalaxyParams {
    const KIND: PatternKind = PatternKind::Galaxy;

    fn generate<R: Rng + ?Sized>(&self, count: u32, rng: &mut R) -> GeneratedPoints {
        let n = count as usize;
        let mut points = PointBuffer::with_capacity(n);
        let mut attrs = GalaxyAttributes {
            scales: Vec::with_capacity(n),
            randomness: Vec::with_capacity(n * 3),
        };

        for i in 0..count {
            let radius = rng.gen::<f32>() * self.radius;
            let spin_angle = radius * self.spin;
            let angle = branch_angle(i, self.branches) + spin_angle;
            let position = Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius);

            // Offsets stay out of the position; the vertex shader applies them.
            for _ in 0..3 {
                let offset = self.random_offset(rng);
                attrs.randomness.push(offset);
            }

            points.push(position, self.color_at(radius));
            attrs.scales.push(rng.gen());
        }

        GeneratedPoints {
            points,
            galaxy: Some(attrs),
            wave: None,
        }
    }
}
