//! Per-frame update step.
//!
//! Once per display refresh the frame loop advances whatever is time-varying
//! in the active visual, then eases the camera. Rendering is issued by the
//! caller afterwards.

use crate::params::Params;
use crate::scene::Scene;

/// What the frame loop advanced this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStep {
    /// Wave heights were recomputed; positions need re-upload.
    Wave,
    /// The galaxy turned around the vertical axis.
    Galaxy,
    /// A star pattern turned around the x and y axes.
    Rotated,
    /// No visual is installed.
    Idle,
}

/// Advance the scene to `elapsed` seconds since start.
pub fn advance<H>(scene: &mut Scene<H>, params: &Params, elapsed: f32) -> FrameStep {
    let speed = params.global.rotation_speed;
    let step = match scene.active_mut() {
        None => FrameStep::Idle,
        Some(visual) => {
            if visual.animate_wave(params, elapsed) {
                FrameStep::Wave
            } else if visual.kind().is_galaxy() {
                visual.rotation.y += speed.y;
                FrameStep::Galaxy
            } else {
                visual.rotation.x += speed.x;
                visual.rotation.y += speed.y;
                FrameStep::Rotated
            }
        }
    };
    scene.camera.update();
    step
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{GeneratedPoints, PatternKind};
    use crate::scene::VisualBackend;
    use glam::Vec2;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    struct NullBackend;

    impl VisualBackend for NullBackend {
        type Handle = ();

        fn create(&mut self, _kind: PatternKind, _points: &GeneratedPoints) -> Self::Handle {}

        fn write_positions(&mut self, _handle: &mut (), _positions: &[f32]) {}

        fn write_colors(&mut self, _handle: &mut (), _colors: &[f32]) {}
    }

    fn scene_with(kind: PatternKind, params: &Params) -> Scene<()> {
        let mut scene = Scene::new();
        let mut rng = SmallRng::seed_from_u64(11);
        scene.set_active_pattern(kind, params, &mut rng, &mut NullBackend);
        scene
    }

    fn params() -> Params {
        let mut params = Params::default();
        params.global.point_count = 50;
        params.galaxy.count = 50;
        params.global.rotation_speed = Vec2::new(0.01, 0.02);
        params
    }

    #[test]
    fn test_empty_scene_is_idle() {
        let mut scene: Scene<()> = Scene::new();
        assert_eq!(advance(&mut scene, &params(), 1.0), FrameStep::Idle);
    }

    #[test]
    fn test_star_patterns_rotate_on_both_axes() {
        let params = params();
        let mut scene = scene_with(PatternKind::Spiral, &params);
        for _ in 0..3 {
            assert_eq!(advance(&mut scene, &params, 0.0), FrameStep::Rotated);
        }
        let rotation = scene.active().expect("visual").rotation;
        assert!((rotation - Vec2::new(0.03, 0.06)).length() < 1e-6);
    }

    #[test]
    fn test_galaxy_rotates_vertical_axis_only() {
        let params = params();
        let mut scene = scene_with(PatternKind::Galaxy, &params);
        assert_eq!(advance(&mut scene, &params, 0.0), FrameStep::Galaxy);
        let rotation = scene.active().expect("visual").rotation;
        assert_eq!(rotation.x, 0.0);
        assert!((rotation.y - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_wave_recomputes_heights_only() {
        let params = params();
        let mut scene = scene_with(PatternKind::Wave, &params);
        let t = 2.75;
        assert_eq!(advance(&mut scene, &params, t), FrameStep::Wave);

        let visual = scene.active().expect("visual");
        assert!(visual.needs_upload());
        assert_eq!(visual.rotation, Vec2::ZERO);
        let anchors = visual.wave().expect("anchors");
        for (i, anchor) in anchors.anchors.iter().enumerate() {
            let p = visual.points().position(i);
            assert_eq!(p.x, anchor.x);
            assert_eq!(p.z, anchor.y);
            assert_eq!(p.x, anchors.initial[i].x);
            assert_eq!(p.z, anchors.initial[i].z);
            let w = params.wave.frequency * 300.0;
            let expected = ((t + anchor.x / w + anchor.y / w) * 0.5).sin() * params.wave.amplitude;
            assert!((p.y - expected).abs() < 1e-4);
        }
    }
}
