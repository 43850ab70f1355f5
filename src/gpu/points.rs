//! Point pipelines and per-visual GPU buffers.

use wgpu::util::DeviceExt;

use crate::camera::Camera;
use crate::patterns::{GeneratedPoints, PatternKind};
use crate::scene::{ActiveVisual, VisualBackend};
use crate::shaders::{galaxy_shader, star_shader, PointUniforms};
use crate::textures::SpriteTexture;

/// Vertices per point quad.
const QUAD_VERTICES: u32 = 6;

/// Buffers backing one visual. Dropping the handle frees them.
pub struct GpuVisual {
    count: u32,
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    scales: Option<wgpu::Buffer>,
    randomness: Option<wgpu::Buffer>,
}

impl Drop for GpuVisual {
    fn drop(&mut self) {
        self.positions.destroy();
        self.colors.destroy();
        if let Some(buffer) = &self.scales {
            buffer.destroy();
        }
        if let Some(buffer) = &self.randomness {
            buffer.destroy();
        }
        log::debug!("freed buffers for {} points", self.count);
    }
}

/// [`VisualBackend`] over a borrowed device and queue.
pub struct GpuBackend<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
}

impl<'a> GpuBackend<'a> {
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue) -> Self {
        Self { device, queue }
    }

    fn vertex_buffer(&self, label: &str, data: &[f32]) -> wgpu::Buffer {
        // Zero-sized vertex buffers cannot be bound.
        let padded = [0.0f32; 4];
        let contents: &[f32] = if data.is_empty() { &padded } else { data };
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(contents),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
    }
}

impl VisualBackend for GpuBackend<'_> {
    type Handle = GpuVisual;

    fn create(&mut self, kind: PatternKind, points: &GeneratedPoints) -> GpuVisual {
        log::debug!("uploading {} points for {}", points.points.len(), kind.name());
        let (scales, randomness) = match &points.galaxy {
            Some(attrs) => (
                Some(self.vertex_buffer("Galaxy Scales", &attrs.scales)),
                Some(self.vertex_buffer("Galaxy Randomness", &attrs.randomness)),
            ),
            None => (None, None),
        };
        GpuVisual {
            count: points.points.len() as u32,
            positions: self.vertex_buffer("Point Positions", &points.points.positions),
            colors: self.vertex_buffer("Point Colors", &points.points.colors),
            scales,
            randomness,
        }
    }

    fn write_positions(&mut self, handle: &mut GpuVisual, positions: &[f32]) {
        if !positions.is_empty() {
            self.queue
                .write_buffer(&handle.positions, 0, bytemuck::cast_slice(positions));
        }
    }

    fn write_colors(&mut self, handle: &mut GpuVisual, colors: &[f32]) {
        if !colors.is_empty() {
            self.queue
                .write_buffer(&handle.colors, 0, bytemuck::cast_slice(colors));
        }
    }
}

const VEC3_LAYOUT: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    offset: 0,
    shader_location: 0,
    format: wgpu::VertexFormat::Float32x3,
}];

fn instance_layout(attributes: &[wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout<'_> {
    let stride = attributes[0].format.size();
    wgpu::VertexBufferLayout {
        array_stride: stride,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes,
    }
}

/// Owns both point pipelines and the shared uniform bind group.
pub struct PointRenderer {
    star_pipeline: wgpu::RenderPipeline,
    galaxy_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    star_bind_group: wgpu::BindGroup,
    galaxy_bind_group: wgpu::BindGroup,
}

impl PointRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        sprite: Option<&SpriteTexture>,
    ) -> Self {
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Point Uniform Buffer"),
            size: std::mem::size_of::<PointUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_entry = wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let galaxy_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Galaxy Bind Group Layout"),
            entries: &[uniform_entry],
        });
        let galaxy_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Galaxy Bind Group"),
            layout: &galaxy_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let (star_layout, star_bind_group) = match sprite {
            Some(sprite) => {
                let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("Star Bind Group Layout (sprite)"),
                    entries: &[
                        uniform_entry,
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 2,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ],
                });
                let view = upload_sprite(device, queue, sprite);
                let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
                    label: Some("Sprite Sampler"),
                    address_mode_u: wgpu::AddressMode::ClampToEdge,
                    address_mode_v: wgpu::AddressMode::ClampToEdge,
                    address_mode_w: wgpu::AddressMode::ClampToEdge,
                    mag_filter: wgpu::FilterMode::Linear,
                    min_filter: wgpu::FilterMode::Linear,
                    mipmap_filter: wgpu::FilterMode::Nearest,
                    ..Default::default()
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Star Bind Group (sprite)"),
                    layout: &layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: uniform_buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(&view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::Sampler(&sampler),
                        },
                    ],
                });
                (layout, bind_group)
            }
            None => {
                let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("Star Bind Group Layout"),
                    entries: &[uniform_entry],
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Star Bind Group"),
                    layout: &layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    }],
                });
                (layout, bind_group)
            }
        };

        let star_pipeline = {
            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Star Shader"),
                source: wgpu::ShaderSource::Wgsl(star_shader(sprite.is_some()).into()),
            });
            let color_attr = [wgpu::VertexAttribute {
                offset: 0,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            }];
            let buffers = [instance_layout(&VEC3_LAYOUT), instance_layout(&color_attr)];
            let blend = sprite.map(|_| wgpu::BlendState::ALPHA_BLENDING);
            create_point_pipeline(
                device,
                "Star Pipeline",
                &star_layout,
                &shader,
                &buffers,
                color_format,
                depth_format,
                blend,
                true,
            )
        };

        let galaxy_pipeline = {
            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Galaxy Shader"),
                source: wgpu::ShaderSource::Wgsl(galaxy_shader().into()),
            });
            let color_attr = [wgpu::VertexAttribute {
                offset: 0,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            }];
            let scale_attr = [wgpu::VertexAttribute {
                offset: 0,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32,
            }];
            let randomness_attr = [wgpu::VertexAttribute {
                offset: 0,
                shader_location: 3,
                format: wgpu::VertexFormat::Float32x3,
            }];
            let buffers = [
                instance_layout(&VEC3_LAYOUT),
                instance_layout(&color_attr),
                instance_layout(&scale_attr),
                instance_layout(&randomness_attr),
            ];
            // Additive, no depth writes: overlapping glows accumulate.
            let additive = wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent::OVER,
            };
            create_point_pipeline(
                device,
                "Galaxy Pipeline",
                &galaxy_layout,
                &shader,
                &buffers,
                color_format,
                depth_format,
                Some(additive),
                false,
            )
        };

        Self {
            star_pipeline,
            galaxy_pipeline,
            uniform_buffer,
            star_bind_group,
            galaxy_bind_group,
        }
    }

    /// Upload camera, model transform and material for `visual`.
    pub fn write_uniforms(
        &self,
        queue: &wgpu::Queue,
        camera: &Camera,
        visual: &ActiveVisual<GpuVisual>,
        viewport: [u32; 2],
    ) {
        let material = &visual.material;
        let size = if visual.kind().is_galaxy() {
            material.galaxy_size
        } else {
            material.point_size
        };
        let uniforms = PointUniforms::new(camera.view_proj(), visual.model_matrix())
            .with_color(material.color, material.vertex_colors)
            .with_params(
                size,
                camera.aspect,
                viewport[1].max(1) as f32,
                material.strength_power,
            );
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, visual: &GpuVisual) {
        if visual.count == 0 {
            return;
        }
        match (&visual.scales, &visual.randomness) {
            (Some(scales), Some(randomness)) => {
                pass.set_pipeline(&self.galaxy_pipeline);
                pass.set_bind_group(0, &self.galaxy_bind_group, &[]);
                pass.set_vertex_buffer(0, visual.positions.slice(..));
                pass.set_vertex_buffer(1, visual.colors.slice(..));
                pass.set_vertex_buffer(2, scales.slice(..));
                pass.set_vertex_buffer(3, randomness.slice(..));
            }
            _ => {
                pass.set_pipeline(&self.star_pipeline);
                pass.set_bind_group(0, &self.star_bind_group, &[]);
                pass.set_vertex_buffer(0, visual.positions.slice(..));
                pass.set_vertex_buffer(1, visual.colors.slice(..));
            }
        }
        pass.draw(0..QUAD_VERTICES, 0..visual.count);
    }
}

#[allow(clippy::too_many_arguments)]
fn create_point_pipeline(
    device: &wgpu::Device,
    label: &str,
    bind_group_layout: &wgpu::BindGroupLayout,
    shader: &wgpu::ShaderModule,
    buffers: &[wgpu::VertexBufferLayout<'_>],
    color_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_write: bool,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: depth_format,
            depth_write_enabled: depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn upload_sprite(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    sprite: &SpriteTexture,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: sprite.width,
        height: sprite.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Sprite Texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &sprite.data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * sprite.width),
            rows_per_image: Some(sprite.height),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
