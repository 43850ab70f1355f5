//! Scene manager: the single active visual and the camera.
//!
//! The scene never holds more than one visual. [`VisualSlot::replace_with`]
//! drops the previous visual (and with it every GPU buffer the backend handle
//! owns) before the replacement is built, so repeated pattern switches never
//! accumulate GPU memory.
//!
//! Backends are abstracted behind [`VisualBackend`]. The wgpu backend lives in
//! `gpu::points`; tests use a counting backend.

use glam::{EulerRot, Mat4, Vec2, Vec3};
use rand::Rng;

use crate::camera::{canonical_position, Camera};
use crate::params::Params;
use crate::patterns::{self, GeneratedPoints, PatternKind, PointBuffer, WaveAnchors};

/// Appearance of the active visual. Editing it never regenerates geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Point size in world units (star patterns).
    pub point_size: f32,
    /// Color multiplied into every point (star patterns).
    pub color: Vec3,
    /// Whether per-point colors are used (star patterns).
    pub vertex_colors: bool,
    /// Size factor for the galaxy shader.
    pub galaxy_size: f32,
    /// Glow falloff exponent for the galaxy shader.
    pub strength_power: f32,
}

impl Material {
    pub fn for_pattern(kind: PatternKind, params: &Params) -> Self {
        Self {
            point_size: params.global.point_size,
            color: params.global.base_color,
            vertex_colors: kind.is_galaxy(),
            galaxy_size: params.galaxy.size,
            strength_power: params.galaxy.strength_power,
        }
    }
}

/// Creates and updates GPU-resident point sets.
///
/// Dropping a [`VisualBackend::Handle`] must release everything it owns.
pub trait VisualBackend {
    type Handle;

    /// Upload a freshly generated point set.
    fn create(&mut self, kind: PatternKind, points: &GeneratedPoints) -> Self::Handle;

    /// Overwrite the position buffer in place.
    fn write_positions(&mut self, handle: &mut Self::Handle, positions: &[f32]);

    /// Overwrite the color buffer in place.
    fn write_colors(&mut self, handle: &mut Self::Handle, colors: &[f32]);
}

/// The displayed point set: CPU copy, animation state, material and GPU handle.
#[derive(Debug)]
pub struct ActiveVisual<H> {
    kind: PatternKind,
    points: PointBuffer,
    wave: Option<WaveAnchors>,
    /// Euler rotation around x and y in radians.
    pub rotation: Vec2,
    pub material: Material,
    positions_dirty: bool,
    colors_dirty: bool,
    handle: H,
}

impl<H> ActiveVisual<H> {
    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn points(&self) -> &PointBuffer {
        &self.points
    }

    /// Wave anchors, present only for the wave pattern.
    pub fn wave(&self) -> Option<&WaveAnchors> {
        self.wave.as_ref()
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0)
    }

    /// Recompute every wave point's height for `elapsed` seconds.
    ///
    /// x and z never move. Returns false when the visual has no wave anchors.
    pub fn animate_wave(&mut self, params: &Params, elapsed: f32) -> bool {
        let Some(wave) = &self.wave else {
            return false;
        };
        for (i, anchor) in wave.anchors.iter().enumerate() {
            self.points.positions[i * 3 + 1] = params.wave.height_at(anchor.x, anchor.y, elapsed);
        }
        self.positions_dirty = true;
        true
    }

    pub fn needs_upload(&self) -> bool {
        self.positions_dirty || self.colors_dirty
    }
}

/// Owned slot holding at most one visual.
#[derive(Debug)]
pub struct VisualSlot<H> {
    current: Option<ActiveVisual<H>>,
}

impl<H> VisualSlot<H> {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn get(&self) -> Option<&ActiveVisual<H>> {
        self.current.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut ActiveVisual<H>> {
        self.current.as_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Release the current visual. Returns whether one was installed.
    pub fn clear(&mut self) -> bool {
        self.current.take().is_some()
    }

    /// Release the current visual, then build and install a new one.
    pub fn replace_with<F>(&mut self, build: F) -> &mut ActiveVisual<H>
    where
        F: FnOnce() -> ActiveVisual<H>,
    {
        if self.clear() {
            log::debug!("released previous visual");
        }
        self.current.insert(build())
    }
}

impl<H> Default for VisualSlot<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// The visualization state: active pattern, its visual, and the camera.
#[derive(Debug)]
pub struct Scene<H> {
    slot: VisualSlot<H>,
    active_kind: PatternKind,
    pub camera: Camera,
}

impl<H> Scene<H> {
    pub fn new() -> Self {
        Self {
            slot: VisualSlot::new(),
            active_kind: PatternKind::default(),
            camera: Camera::new(),
        }
    }

    /// The selected pattern, whether or not a visual is installed.
    pub fn active_kind(&self) -> PatternKind {
        self.active_kind
    }

    pub fn active(&self) -> Option<&ActiveVisual<H>> {
        self.slot.get()
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveVisual<H>> {
        self.slot.get_mut()
    }

    /// Switch to `kind`: release the old visual, generate, install, reset the camera.
    pub fn set_active_pattern<B, R>(&mut self, kind: PatternKind, params: &Params, rng: &mut R, backend: &mut B)
    where
        B: VisualBackend<Handle = H>,
        R: Rng + ?Sized,
    {
        log::info!("switching to {}", kind.name());
        self.active_kind = kind;
        self.install(params, rng, backend);
    }

    /// Rebuild the active pattern from the current parameters.
    ///
    /// Same sequence as a switch: the camera returns to the canonical viewpoint.
    pub fn regenerate<B, R>(&mut self, params: &Params, rng: &mut R, backend: &mut B)
    where
        B: VisualBackend<Handle = H>,
        R: Rng + ?Sized,
    {
        self.install(params, rng, backend);
    }

    fn install<B, R>(&mut self, params: &Params, rng: &mut R, backend: &mut B)
    where
        B: VisualBackend<Handle = H>,
        R: Rng + ?Sized,
    {
        let kind = self.active_kind;
        let material = Material::for_pattern(kind, params);
        self.slot.replace_with(|| {
            let generated = patterns::generate(kind, params, rng);
            let handle = backend.create(kind, &generated);
            ActiveVisual {
                kind,
                points: generated.points,
                wave: generated.wave,
                rotation: Vec2::ZERO,
                material,
                positions_dirty: false,
                colors_dirty: false,
                handle,
            }
        });
        self.camera.reset_to(canonical_position(kind));
    }

    /// Give every point a fresh random color and switch to vertex colors.
    ///
    /// Does nothing without a visual or when the galaxy is shown.
    pub fn randomize_colors<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let Some(visual) = self.slot.get_mut() else {
            return false;
        };
        if visual.kind.is_galaxy() {
            return false;
        }
        visual.points.colors = patterns::random_colors(visual.points.len(), rng);
        visual.material.vertex_colors = true;
        visual.colors_dirty = true;
        true
    }

    /// Copy material fields from `params` onto the active visual.
    pub fn sync_material(&mut self, params: &Params) {
        if let Some(visual) = self.slot.get_mut() {
            visual.material.point_size = params.global.point_size;
            visual.material.color = params.global.base_color;
            visual.material.galaxy_size = params.galaxy.size;
            visual.material.strength_power = params.galaxy.strength_power;
        }
    }

    /// Upload buffers the frame loop or a panel action modified.
    pub fn flush<B: VisualBackend<Handle = H>>(&mut self, backend: &mut B) {
        let Some(visual) = self.slot.get_mut() else {
            return;
        };
        if visual.positions_dirty {
            backend.write_positions(&mut visual.handle, &visual.points.positions);
            visual.positions_dirty = false;
        }
        if visual.colors_dirty {
            backend.write_colors(&mut visual.handle, &visual.points.colors);
            visual.colors_dirty = false;
        }
    }

    /// Release the active visual, leaving the scene empty.
    pub fn clear(&mut self) -> bool {
        self.slot.clear()
    }
}

impl<H> Default for Scene<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Handle {
        live: Rc<Cell<usize>>,
        uploads: usize,
    }

    impl Drop for Handle {
        fn drop(&mut self) {
            self.live.set(self.live.get() - 1);
        }
    }

    #[derive(Default)]
    struct Backend {
        live: Rc<Cell<usize>>,
        created: usize,
    }

    impl VisualBackend for Backend {
        type Handle = Handle;

        fn create(&mut self, _kind: PatternKind, _points: &GeneratedPoints) -> Handle {
            self.live.set(self.live.get() + 1);
            self.created += 1;
            Handle {
                live: self.live.clone(),
                uploads: 0,
            }
        }

        fn write_positions(&mut self, handle: &mut Handle, _positions: &[f32]) {
            handle.uploads += 1;
        }

        fn write_colors(&mut self, handle: &mut Handle, _colors: &[f32]) {
            handle.uploads += 1;
        }
    }

    fn small_params() -> Params {
        let mut params = Params::default();
        params.global.point_count = 32;
        params.galaxy.count = 48;
        params
    }

    #[test]
    fn test_replace_releases_before_build() {
        let live = Rc::new(Cell::new(0usize));
        let mut slot: VisualSlot<Handle> = VisualSlot::new();
        let mut backend = Backend {
            live: live.clone(),
            created: 0,
        };
        let params = small_params();
        let mut rng = SmallRng::seed_from_u64(1);

        for _ in 0..3 {
            let seen = live.clone();
            slot.replace_with(|| {
                // The previous visual must already be gone.
                assert_eq!(seen.get(), 0);
                let generated = patterns::generate(PatternKind::Cloud, &params, &mut rng);
                ActiveVisual {
                    kind: PatternKind::Cloud,
                    handle: backend.create(PatternKind::Cloud, &generated),
                    points: generated.points,
                    wave: None,
                    rotation: Vec2::ZERO,
                    material: Material::for_pattern(PatternKind::Cloud, &params),
                    positions_dirty: false,
                    colors_dirty: false,
                }
            });
            assert_eq!(live.get(), 1);
        }
        assert_eq!(backend.created, 3);
    }

    #[test]
    fn test_switch_resets_camera() {
        let mut backend = Backend::default();
        let mut scene = Scene::new();
        let params = small_params();
        let mut rng = SmallRng::seed_from_u64(2);

        scene.set_active_pattern(PatternKind::Galaxy, &params, &mut rng, &mut backend);
        assert!((scene.camera.position() - canonical_position(PatternKind::Galaxy)).length() < 1e-3);

        scene.camera.orbit(300.0, 40.0);
        scene.camera.update();
        scene.set_active_pattern(PatternKind::Wave, &params, &mut rng, &mut backend);
        assert!((scene.camera.position() - Vec3::new(0.0, 0.0, 400.0)).length() < 1e-2);
    }

    #[test]
    fn test_regenerate_resets_camera() {
        let mut backend = Backend::default();
        let mut scene = Scene::new();
        let params = small_params();
        let mut rng = SmallRng::seed_from_u64(6);

        scene.set_active_pattern(PatternKind::Cloud, &params, &mut rng, &mut backend);
        for _ in 0..300 {
            scene.camera.zoom(-50.0);
            scene.camera.orbit(20.0, 5.0);
            scene.camera.update();
        }
        assert!((scene.camera.position() - canonical_position(PatternKind::Cloud)).length() > 100.0);

        scene.regenerate(&params, &mut rng, &mut backend);
        assert!((scene.camera.position() - Vec3::new(0.0, 0.0, 400.0)).length() < 1e-2);
        assert_eq!(backend.live.get(), 1);

        scene.set_active_pattern(PatternKind::Galaxy, &params, &mut rng, &mut backend);
        scene.camera.zoom(-30.0);
        scene.camera.update();
        scene.regenerate(&params, &mut rng, &mut backend);
        assert!((scene.camera.position() - Vec3::new(0.0, 10.0, 5.0)).length() < 1e-3);
    }

    #[test]
    fn test_material_defaults() {
        let params = small_params();
        assert!(!Material::for_pattern(PatternKind::Spiral, &params).vertex_colors);
        assert!(Material::for_pattern(PatternKind::Galaxy, &params).vertex_colors);
    }

    #[test]
    fn test_randomize_colors_marks_upload() {
        let mut backend = Backend::default();
        let mut scene = Scene::new();
        let params = small_params();
        let mut rng = SmallRng::seed_from_u64(3);

        assert!(!scene.randomize_colors(&mut rng));

        scene.set_active_pattern(PatternKind::Center, &params, &mut rng, &mut backend);
        let before = scene.active().map(|v| v.points().colors.clone());
        assert!(scene.randomize_colors(&mut rng));
        let visual = scene.active().expect("visual");
        assert!(visual.material.vertex_colors);
        assert!(visual.needs_upload());
        assert_eq!(visual.points().colors.len(), 3 * 32);
        assert_ne!(Some(visual.points().colors.clone()), before);

        scene.flush(&mut backend);
        let visual = scene.active().expect("visual");
        assert!(!visual.needs_upload());
        assert_eq!(visual.handle().uploads, 1);

        scene.set_active_pattern(PatternKind::Galaxy, &params, &mut rng, &mut backend);
        assert!(!scene.randomize_colors(&mut rng));
    }

    #[test]
    fn test_sync_material_keeps_geometry() {
        let mut backend = Backend::default();
        let mut scene = Scene::new();
        let mut params = small_params();
        let mut rng = SmallRng::seed_from_u64(4);

        scene.set_active_pattern(PatternKind::Spiral, &params, &mut rng, &mut backend);
        let positions = scene.active().map(|v| v.points().positions.clone());

        params.global.point_size = 3.0;
        params.global.base_color = Vec3::new(1.0, 0.0, 0.0);
        scene.sync_material(&params);

        let visual = scene.active().expect("visual");
        assert_eq!(visual.material.point_size, 3.0);
        assert_eq!(visual.material.color, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(Some(visual.points().positions.clone()), positions);
        assert_eq!(backend.created, 1);
    }

    #[test]
    fn test_clear_leaves_empty_scene() {
        let mut backend = Backend::default();
        let mut scene = Scene::new();
        let params = small_params();
        let mut rng = SmallRng::seed_from_u64(5);

        scene.set_active_pattern(PatternKind::Cloud, &params, &mut rng, &mut backend);
        assert!(scene.clear());
        assert!(scene.active().is_none());
        assert_eq!(backend.live.get(), 0);
        assert!(!scene.clear());
        scene.flush(&mut backend);
    }
}
