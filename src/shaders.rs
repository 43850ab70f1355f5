//! WGSL sources for the two point pipelines.
//!
//! Points are drawn as instanced camera-facing quads (six vertices per point).
//! Star patterns use world-sized square points, optionally masked by a sprite
//! texture. The galaxy uses round, additively blended points whose size and
//! glow come from per-point attributes.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Uniform block shared by both pipelines.
///
/// `params` packs `(size, aspect, viewport_height, strength_power)`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PointUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// RGB tint; `w > 0.5` enables per-point colors.
    pub color: [f32; 4],
    pub params: [f32; 4],
}

impl PointUniforms {
    pub fn new(view_proj: Mat4, model: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            color: [1.0; 4],
            params: [1.0, 1.0, 1.0, 1.0],
        }
    }

    pub fn with_color(mut self, color: Vec3, vertex_colors: bool) -> Self {
        let flag = if vertex_colors { 1.0 } else { 0.0 };
        self.color = [color.x, color.y, color.z, flag];
        self
    }

    pub fn with_params(mut self, size: f32, aspect: f32, viewport_height: f32, strength_power: f32) -> Self {
        self.params = [size, aspect, viewport_height, strength_power];
        self
    }
}

const UNIFORMS_WGSL: &str = r#"struct Uniforms {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    color: vec4<f32>,
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

fn quad_corner(vertex_index: u32) -> vec2<f32> {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );
    return corners[vertex_index];
}
"#;

/// Render shader for the four star patterns.
///
/// With `sprite`, bindings 1 and 2 hold the sprite texture and its sampler and
/// the texture masks each point.
pub fn star_shader(sprite: bool) -> String {
    let (sprite_bindings, fragment_body) = if sprite {
        (
            r#"
@group(0) @binding(1)
var sprite: texture_2d<f32>;
@group(0) @binding(2)
var sprite_sampler: sampler;
"#,
            r#"    let tex = textureSample(sprite, sprite_sampler, in.uv);
    if tex.a < 0.01 {
        discard;
    }
    return vec4<f32>(in.color * tex.rgb, tex.a);"#,
        )
    } else {
        ("", "    return vec4<f32>(in.color, 1.0);")
    };

    format!(
        r#"{UNIFORMS_WGSL}{sprite_bindings}
struct VertexOutput {{
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
}};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
) -> VertexOutput {{
    let corner = quad_corner(vertex_index);
    var clip = uniforms.view_proj * uniforms.model * vec4<f32>(position, 1.0);

    // World-sized points: the clip-space half extent is size / 2.
    let half_size = uniforms.params.x * 0.5;
    clip.x += corner.x * half_size / uniforms.params.y;
    clip.y += corner.y * half_size;

    let tint = uniforms.color.rgb;
    var out: VertexOutput;
    out.clip_position = clip;
    out.color = select(tint, tint * color, uniforms.color.w > 0.5);
    out.uv = vec2<f32>(corner.x, -corner.y) * 0.5 + 0.5;
    return out;
}}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {{
{fragment_body}
}}
"#
    )
}

/// Render shader for the galaxy.
pub fn galaxy_shader() -> String {
    format!(
        r#"{UNIFORMS_WGSL}
struct VertexOutput {{
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
}};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
    @location(2) scale: f32,
    @location(3) randomness: vec3<f32>,
) -> VertexOutput {{
    let corner = quad_corner(vertex_index);
    let model_position = uniforms.model * vec4<f32>(position, 1.0);
    let world = vec4<f32>(model_position.xyz + randomness, 1.0);
    var clip = uniforms.view_proj * world;

    // Pixel size shrinks with view depth (clip.w); convert back to clip units.
    let half_size = scale * uniforms.params.x / uniforms.params.z;
    clip.x += corner.x * half_size / uniforms.params.y;
    clip.y += corner.y * half_size;

    var out: VertexOutput;
    out.clip_position = clip;
    out.color = color;
    out.uv = corner;
    return out;
}}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {{
    let dist = length(in.uv) * 0.5;
    let strength = pow(clamp(1.0 - dist, 0.0, 1.0), uniforms.params.w);
    return vec4<f32>(in.color * strength, 1.0);
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates WGSL code using naga.
    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code).map_err(|e| format!("WGSL parse error: {}", e.emit_to_string(code)))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_star_shader_valid() {
        let shader = star_shader(false);
        assert!(!shader.contains("sprite"));
        validate_wgsl(&shader).expect("star shader should be valid");
    }

    #[test]
    fn test_star_sprite_shader_valid() {
        let shader = star_shader(true);
        assert!(shader.contains("textureSample(sprite"));
        validate_wgsl(&shader).expect("sprite star shader should be valid");
    }

    #[test]
    fn test_galaxy_shader_valid() {
        let shader = galaxy_shader();
        assert!(shader.contains("@location(3) randomness"));
        validate_wgsl(&shader).expect("galaxy shader should be valid");
    }

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<PointUniforms>(), 160);
        let u = PointUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY)
            .with_color(Vec3::new(0.5, 0.25, 1.0), true)
            .with_params(2.0, 1.5, 720.0, 35.0);
        assert_eq!(u.color, [0.5, 0.25, 1.0, 1.0]);
        assert_eq!(u.params, [2.0, 1.5, 720.0, 35.0]);
    }
}
