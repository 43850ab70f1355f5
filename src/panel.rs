//! Declarative settings panel.
//!
//! [`describe`] lists the controls for a pattern; the UI layer draws them and
//! reports edits through [`apply`], which writes the bound parameter and says
//! what the edit requires: nothing, a material update, a full regeneration,
//! a pattern switch, or new random colors.
//!
//! The list is re-described from scratch whenever it is drawn, so the panel
//! always matches the active pattern's parameter set.

use glam::Vec3;

use crate::params::Params;
use crate::patterns::PatternKind;

/// A parameter (or action) a control is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    SelectPattern(PatternKind),
    Regenerate,
    RandomizeColors,

    PointCount,
    PointSize,
    RotationX,
    RotationY,
    BaseColor,

    CloudX,
    CloudY,
    CloudZ,

    CenterDepth,
    CenterSize,

    SpiralRadius,
    SpiralPower,
    SpiralTightness,

    WaveX,
    WaveZ,
    WaveFrequency,
    WaveAmplitude,

    GalaxyStrength,
    GalaxyCount,
    GalaxySize,
    GalaxyRadius,
    GalaxyBranches,
    GalaxySpin,
    GalaxyRandomnessPower,
    GalaxyInsideColor,
    GalaxyOutsideColor,
}

/// How a control is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    Slider {
        min: f32,
        max: f32,
        /// Round edits to whole numbers.
        integer: bool,
        logarithmic: bool,
    },
    Color,
    Button,
}

/// One entry of the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Control {
    pub label: &'static str,
    pub field: Field,
    pub kind: ControlKind,
}

/// A value produced by a control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f32),
    Color(Vec3),
    Trigger,
}

/// What an edit requires from the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Read live by the frame loop; nothing to do.
    None,
    /// Copy material fields onto the active visual.
    Material,
    /// Rebuild the active pattern.
    Regenerate,
    /// Switch to another pattern (and rebuild the panel).
    SwitchPattern(PatternKind),
    RandomizeColors,
}

const fn slider(min: f32, max: f32) -> ControlKind {
    ControlKind::Slider {
        min,
        max,
        integer: false,
        logarithmic: false,
    }
}

const fn count_slider(min: f32, max: f32) -> ControlKind {
    ControlKind::Slider {
        min,
        max,
        integer: true,
        logarithmic: true,
    }
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::SelectPattern(kind) => kind.name(),
            Field::Regenerate => "Regenerate",
            Field::RandomizeColors => "Randomize Colors",
            Field::PointCount => "Number of stars",
            Field::PointSize => "Size of stars",
            Field::RotationX => "Rotation Speed X",
            Field::RotationY => "Rotation Speed Y",
            Field::BaseColor => "Star Color",
            Field::CloudX | Field::WaveX => "Change X",
            Field::CloudY => "Change Y",
            Field::CloudZ | Field::CenterDepth | Field::WaveZ => "Change Z",
            Field::CenterSize => "Change Size",
            Field::SpiralRadius => "Radius",
            Field::SpiralPower => "Spiral Effect",
            Field::SpiralTightness => "Spiral Tightness",
            Field::WaveFrequency => "Frequency",
            Field::WaveAmplitude => "Amplitude",
            Field::GalaxyStrength => "Shader Power",
            Field::GalaxyCount => "Particle Count",
            Field::GalaxySize => "Size",
            Field::GalaxyRadius => "Radius",
            Field::GalaxyBranches => "Arm Count",
            Field::GalaxySpin => "Spin",
            Field::GalaxyRandomnessPower => "Randomness",
            Field::GalaxyInsideColor => "Inside Color",
            Field::GalaxyOutsideColor => "Outside Color",
        }
    }

    pub fn kind(&self) -> ControlKind {
        match self {
            Field::SelectPattern(_) | Field::Regenerate | Field::RandomizeColors => ControlKind::Button,
            Field::BaseColor | Field::GalaxyInsideColor | Field::GalaxyOutsideColor => ControlKind::Color,
            Field::PointCount => count_slider(100.0, 400_000.0),
            Field::PointSize => slider(0.2, 5.0),
            Field::RotationX | Field::RotationY => slider(0.0, 0.01),
            Field::CloudX | Field::CloudY | Field::CloudZ | Field::WaveX | Field::WaveZ => slider(10.0, 4000.0),
            Field::CenterDepth => slider(10.0, 1200.0),
            Field::CenterSize => slider(10.0, 700.0),
            Field::SpiralRadius => slider(0.5, 5.0),
            Field::SpiralPower => slider(0.05, 1.0),
            Field::SpiralTightness => slider(0.1, 5.0),
            Field::WaveFrequency => slider(0.01, 0.2),
            Field::WaveAmplitude => slider(5.0, 100.0),
            Field::GalaxyStrength => slider(7.0, 100.0),
            Field::GalaxyCount => count_slider(100.0, 100_000.0),
            Field::GalaxySize => slider(1.0, 400.0),
            Field::GalaxyRadius => slider(6.0, 60.0),
            Field::GalaxyBranches => ControlKind::Slider {
                min: 2.0,
                max: 20.0,
                integer: true,
                logarithmic: false,
            },
            Field::GalaxySpin => slider(-5.0, 5.0),
            Field::GalaxyRandomnessPower => slider(1.0, 20.0),
        }
    }

    /// Current value of the bound parameter.
    pub fn get(&self, params: &Params) -> Value {
        let number = match self {
            Field::SelectPattern(_) | Field::Regenerate | Field::RandomizeColors => return Value::Trigger,
            Field::BaseColor => return Value::Color(params.global.base_color),
            Field::GalaxyInsideColor => return Value::Color(params.galaxy.inside_color),
            Field::GalaxyOutsideColor => return Value::Color(params.galaxy.outside_color),
            Field::PointCount => params.global.point_count as f32,
            Field::PointSize => params.global.point_size,
            Field::RotationX => params.global.rotation_speed.x,
            Field::RotationY => params.global.rotation_speed.y,
            Field::CloudX => params.cloud.extent.x,
            Field::CloudY => params.cloud.extent.y,
            Field::CloudZ => params.cloud.extent.z,
            Field::CenterDepth => params.center.depth,
            Field::CenterSize => params.center.max_radius,
            Field::SpiralRadius => params.spiral.radius_scale,
            Field::SpiralPower => params.spiral.spiral_power,
            Field::SpiralTightness => params.spiral.tightness,
            Field::WaveX => params.wave.extent_x,
            Field::WaveZ => params.wave.extent_z,
            Field::WaveFrequency => params.wave.frequency,
            Field::WaveAmplitude => params.wave.amplitude,
            Field::GalaxyStrength => params.galaxy.strength_power,
            Field::GalaxyCount => params.galaxy.count as f32,
            Field::GalaxySize => params.galaxy.size,
            Field::GalaxyRadius => params.galaxy.radius,
            Field::GalaxyBranches => params.galaxy.branches as f32,
            Field::GalaxySpin => params.galaxy.spin,
            Field::GalaxyRandomnessPower => params.galaxy.randomness_power,
        };
        Value::Number(number)
    }

    /// What changing this field requires.
    pub fn effect(&self) -> Effect {
        match self {
            Field::SelectPattern(kind) => Effect::SwitchPattern(*kind),
            Field::RandomizeColors => Effect::RandomizeColors,
            Field::RotationX | Field::RotationY => Effect::None,
            Field::PointSize | Field::BaseColor | Field::GalaxyStrength | Field::GalaxySize => Effect::Material,
            _ => Effect::Regenerate,
        }
    }
}

impl Control {
    fn new(field: Field) -> Self {
        Self {
            label: field.label(),
            field,
            kind: field.kind(),
        }
    }
}

/// Controls for `active`: globals first, then the pattern's own knobs.
pub fn describe(active: PatternKind) -> Vec<Control> {
    let mut fields: Vec<Field> = PatternKind::ALL.iter().map(|k| Field::SelectPattern(*k)).collect();
    fields.extend([
        Field::PointCount,
        Field::PointSize,
        Field::RotationX,
        Field::RotationY,
        Field::BaseColor,
        Field::RandomizeColors,
    ]);

    match active {
        PatternKind::Cloud => fields.extend([Field::Regenerate, Field::CloudX, Field::CloudY, Field::CloudZ]),
        PatternKind::Center => fields.extend([Field::Regenerate, Field::CenterDepth, Field::CenterSize]),
        PatternKind::Spiral => fields.extend([
            Field::Regenerate,
            Field::SpiralRadius,
            Field::SpiralPower,
            Field::SpiralTightness,
        ]),
        PatternKind::Wave => fields.extend([
            Field::Regenerate,
            Field::WaveX,
            Field::WaveZ,
            Field::WaveFrequency,
            Field::WaveAmplitude,
        ]),
        PatternKind::Galaxy => fields.extend([
            Field::GalaxyStrength,
            Field::GalaxyCount,
            Field::GalaxySize,
            Field::GalaxyRadius,
            Field::GalaxyBranches,
            Field::GalaxySpin,
            Field::GalaxyRandomnessPower,
            Field::GalaxyInsideColor,
            Field::GalaxyOutsideColor,
        ]),
    }

    fields.into_iter().map(Control::new).collect()
}

/// Write `value` into the parameter bound to `field`.
///
/// Numbers are clamped to the control's range (and rounded for integer
/// controls). A value of the wrong shape leaves `params` untouched and
/// yields [`Effect::None`].
pub fn apply(params: &mut Params, field: Field, value: Value) -> Effect {
    match (field.kind(), value) {
        (ControlKind::Button, Value::Trigger) => field.effect(),
        (ControlKind::Color, Value::Color(color)) => {
            let color = color.clamp(Vec3::ZERO, Vec3::ONE);
            match field {
                Field::BaseColor => params.global.base_color = color,
                Field::GalaxyInsideColor => params.galaxy.inside_color = color,
                Field::GalaxyOutsideColor => params.galaxy.outside_color = color,
                _ => return Effect::None,
            }
            field.effect()
        }
        (ControlKind::Slider { min, max, integer, .. }, Value::Number(n)) if !n.is_nan() => {
            let mut n = n.clamp(min, max);
            if integer {
                n = n.round();
            }
            set_number(params, field, n);
            field.effect()
        }
        _ => Effect::None,
    }
}

fn set_number(params: &mut Params, field: Field, n: f32) {
    match field {
        Field::PointCount => params.global.point_count = n as u32,
        Field::PointSize => params.global.point_size = n,
        Field::RotationX => params.global.rotation_speed.x = n,
        Field::RotationY => params.global.rotation_speed.y = n,
        Field::CloudX => params.cloud.extent.x = n,
        Field::CloudY => params.cloud.extent.y = n,
        Field::CloudZ => params.cloud.extent.z = n,
        Field::CenterDepth => params.center.depth = n,
        Field::CenterSize => params.center.max_radius = n,
        Field::SpiralRadius => params.spiral.radius_scale = n,
        Field::SpiralPower => params.spiral.spiral_power = n,
        Field::SpiralTightness => params.spiral.tightness = n,
        Field::WaveX => params.wave.extent_x = n,
        Field::WaveZ => params.wave.extent_z = n,
        Field::WaveFrequency => params.wave.frequency = n,
        Field::WaveAmplitude => params.wave.amplitude = n,
        Field::GalaxyStrength => params.galaxy.strength_power = n,
        Field::GalaxyCount => params.galaxy.count = n as u32,
        Field::GalaxySize => params.galaxy.size = n,
        Field::GalaxyRadius => params.galaxy.radius = n,
        Field::GalaxyBranches => params.galaxy.branches = n as u32,
        Field::GalaxySpin => params.galaxy.spin = n,
        Field::GalaxyRandomnessPower => params.galaxy.randomness_power = n,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLOBALS: [Field; 6] = [
        Field::PointCount,
        Field::PointSize,
        Field::RotationX,
        Field::RotationY,
        Field::BaseColor,
        Field::RandomizeColors,
    ];

    #[test]
    fn test_globals_always_present() {
        for kind in PatternKind::ALL {
            let controls = describe(kind);
            for field in GLOBALS {
                assert!(controls.iter().any(|c| c.field == field), "{:?} missing {:?}", kind, field);
            }
            for other in PatternKind::ALL {
                assert!(controls.iter().any(|c| c.field == Field::SelectPattern(other)));
            }
        }
    }

    #[test]
    fn test_pattern_controls_do_not_leak() {
        let spiral = describe(PatternKind::Spiral);
        assert!(spiral.iter().any(|c| c.field == Field::SpiralTightness));
        assert!(!spiral.iter().any(|c| c.field == Field::WaveAmplitude));
        assert!(!spiral.iter().any(|c| c.field == Field::GalaxyBranches));

        let galaxy = describe(PatternKind::Galaxy);
        assert!(galaxy.iter().any(|c| c.field == Field::GalaxyInsideColor));
        assert!(!galaxy.iter().any(|c| c.field == Field::CloudX));
    }

    #[test]
    fn test_every_described_value_is_in_range() {
        let params = Params::default();
        for kind in PatternKind::ALL {
            for control in describe(kind) {
                if let (ControlKind::Slider { min, max, .. }, Value::Number(n)) = (control.kind, control.field.get(&params)) {
                    assert!((min..=max).contains(&n), "{} = {} outside {}..{}", control.label, n, min, max);
                }
            }
        }
    }

    #[test]
    fn test_apply_effects() {
        let mut params = Params::default();

        assert_eq!(apply(&mut params, Field::PointSize, Value::Number(2.0)), Effect::Material);
        assert_eq!(params.global.point_size, 2.0);

        assert_eq!(apply(&mut params, Field::PointCount, Value::Number(500.0)), Effect::Regenerate);
        assert_eq!(params.global.point_count, 500);

        assert_eq!(apply(&mut params, Field::RotationX, Value::Number(0.005)), Effect::None);
        assert_eq!(params.global.rotation_speed.x, 0.005);

        assert_eq!(
            apply(&mut params, Field::SelectPattern(PatternKind::Wave), Value::Trigger),
            Effect::SwitchPattern(PatternKind::Wave)
        );
        assert_eq!(apply(&mut params, Field::RandomizeColors, Value::Trigger), Effect::RandomizeColors);
        assert_eq!(apply(&mut params, Field::GalaxyStrength, Value::Number(50.0)), Effect::Material);
        assert_eq!(apply(&mut params, Field::GalaxySpin, Value::Number(-2.0)), Effect::Regenerate);
    }

    #[test]
    fn test_apply_clamps_and_rounds() {
        let mut params = Params::default();
        apply(&mut params, Field::PointCount, Value::Number(1e9));
        assert_eq!(params.global.point_count, 400_000);

        apply(&mut params, Field::GalaxyBranches, Value::Number(3.6));
        assert_eq!(params.galaxy.branches, 4);

        apply(&mut params, Field::GalaxyBranches, Value::Number(0.0));
        assert_eq!(params.galaxy.branches, 2);

        apply(&mut params, Field::BaseColor, Value::Color(Vec3::new(2.0, -1.0, 0.5)));
        assert_eq!(params.global.base_color, Vec3::new(1.0, 0.0, 0.5));
    }

    #[test]
    fn test_apply_rejects_mismatched_values() {
        let mut params = Params::default();
        let before = params;
        assert_eq!(apply(&mut params, Field::PointSize, Value::Color(Vec3::ONE)), Effect::None);
        assert_eq!(apply(&mut params, Field::BaseColor, Value::Number(1.0)), Effect::None);
        assert_eq!(apply(&mut params, Field::PointSize, Value::Number(f32::NAN)), Effect::None);
        assert_eq!(params, before);
    }

    #[test]
    fn test_round_trip_through_get() {
        let mut params = Params::default();
        apply(&mut params, Field::WaveFrequency, Value::Number(0.1));
        assert_eq!(Field::WaveFrequency.get(&params), Value::Number(0.1));
        apply(&mut params, Field::GalaxyOutsideColor, Value::Color(Vec3::new(0.1, 0.2, 0.3)));
        assert_eq!(Field::GalaxyOutsideColor.get(&params), Value::Color(Vec3::new(0.1, 0.2, 0.3)));
    }
}
