//! GPU renderer for the sky dome.
//!
//! Draws the inverted dome around the camera with a rotation-only view so the
//! sky sits at infinite distance, like the gradient background it replaces.
//! Rendered first, before scene geometry, with no depth attachment.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use aerostat_render::Camera;

use crate::dome::{DomeMesh, SKY_VERTEX_LAYOUT, generate_dome};
use crate::sky::SkyDome;

/// Sky uniform bundle. Scalars ride in the w components: `base_color.w` is the
/// horizon band, `ring_color.w` the ring height, `fog_close.w` the ring
/// falloff.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SkyUniforms {
    /// Projection × rotation-only view.
    pub view_proj: [[f32; 4]; 4],
    /// Zenith color rgb + horizon band fraction.
    pub base_color: [f32; 4],
    /// Ring color rgb + ring height.
    pub ring_color: [f32; 4],
    /// Close fog color rgb + ring falloff.
    pub fog_close: [f32; 4],
    /// Distant fog color rgb (the horizon tone) + unused.
    pub fog_distant: [f32; 4],
    /// size_min, size_max, density, fade_offset.
    pub star_params: [f32; 4],
}

impl SkyUniforms {
    /// Build the bundle from the sky state and the camera.
    pub fn new(sky: &SkyDome, camera: &Camera) -> Self {
        // Strip translation so the dome never recedes from the camera.
        let rotation_only = Mat4::from_quat(camera.rotation).inverse();
        let view_proj = camera.projection_matrix() * rotation_only;

        let ring_color = sky.ring.color();
        let close = sky.close_fog_color();
        let distant = sky.horizon_color();
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            base_color: [
                sky.base_color[0],
                sky.base_color[1],
                sky.base_color[2],
                sky.horizon_band,
            ],
            ring_color: [ring_color[0], ring_color[1], ring_color[2], sky.ring.height],
            fog_close: [close[0], close[1], close[2], sky.ring.falloff],
            fog_distant: [distant[0], distant[1], distant[2], 0.0],
            star_params: [
                sky.stars.size_min,
                sky.stars.size_max,
                sky.stars.density,
                sky.stars.fade_offset,
            ],
        }
    }
}

/// WGSL source for the sky pass.
///
/// The gradient blends the fog's distant color at the horizon into the zenith
/// base color; the equatorial ring smoothsteps in by `|normal.y|`; stars are
/// hashed per direction cell with uniform-driven size and density, fading
/// linearly through the horizon. No fog term is applied to the output — the
/// sky must never disappear into its own fog.
pub const SKY_SHADER_SOURCE: &str = r#"
struct SkyUniforms {
    view_proj: mat4x4<f32>,
    base_color: vec4<f32>,
    ring_color: vec4<f32>,
    fog_close: vec4<f32>,
    fog_distant: vec4<f32>,
    star_params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> sky: SkyUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) normal: vec3<f32>,
};

fn hash31(p: vec3<f32>) -> f32 {
    var q = fract(p * 0.1031);
    q = q + dot(q, q.yzx + 33.33);
    return fract((q.x + q.y) * q.z);
}

fn star_field(dir: vec3<f32>) -> f32 {
    let scaled = dir * sky.star_params.z;
    let cell = floor(scaled);
    let local = fract(scaled) - 0.5;

    // One candidate star per cell; most cells stay empty.
    if hash31(cell) < 0.92 {
        return 0.0;
    }
    let jitter = vec3<f32>(
        hash31(cell + 1.3),
        hash31(cell + 2.7),
        hash31(cell + 4.1),
    ) - 0.5;
    let radius = mix(sky.star_params.x, sky.star_params.y, hash31(cell + 7.7));
    let d = length(local - jitter * 0.7);
    return 1.0 - smoothstep(radius * 0.5, radius, d);
}

fn star_fade(y: f32) -> f32 {
    let fade = max(sky.star_params.w, 1e-4);
    return clamp((y + fade) / (2.0 * fade), 0.0, 1.0);
}

@vertex
fn vs_sky(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = sky.view_proj * vec4<f32>(in.position, 1.0);
    out.normal = in.normal;
    return out;
}

@fragment
fn fs_sky(in: VertexOutput) -> @location(0) vec4<f32> {
    let normal = normalize(in.normal);
    let up = clamp(normal.y, 0.0, 1.0);

    // Horizon-to-zenith gradient, anchored to the distant fog color.
    var color = mix(sky.fog_distant.rgb, sky.base_color.rgb,
                    smoothstep(0.0, sky.base_color.w, up));

    // Equatorial ring band by |normal.y|.
    let ring_height = sky.ring_color.w;
    let ring_falloff = sky.fog_close.w;
    let ring = 1.0 - smoothstep(ring_height - ring_falloff, ring_height, abs(normal.y));
    color = mix(color, sky.ring_color.rgb, ring);

    // Stars, fading linearly through the horizon.
    let star = star_field(normal) * star_fade(normal.y);
    color = color + vec3<f32>(star);

    return vec4<f32>(color, 1.0);
}
"#;

/// GPU sky dome renderer: pipeline, dome mesh, uniform buffer.
pub struct SkyDomeRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl SkyDomeRenderer {
    /// Dome tessellation: segments around the equator.
    const DOME_LONGITUDES: u32 = 48;
    /// Dome tessellation: rings pole to pole.
    const DOME_LATITUDES: u32 = 24;

    /// Create the renderer, uploading the dome mesh.
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, radius: f32) -> Self {
        use wgpu::util::DeviceExt;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sky-shader"),
            source: wgpu::ShaderSource::Wgsl(SKY_SHADER_SOURCE.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sky-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<SkyUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sky-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sky-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_sky"),
                buffers: &[SKY_VERTEX_LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: None, // sky is drawn first, behind everything
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_sky"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let dome: DomeMesh = generate_dome(radius, Self::DOME_LONGITUDES, Self::DOME_LATITUDES);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sky-dome-vertices"),
            contents: bytemuck::cast_slice(&dome.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sky-dome-indices"),
            contents: bytemuck::cast_slice(&dome.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniforms = SkyUniforms {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            base_color: [0.0; 4],
            ring_color: [0.0; 4],
            fog_close: [0.0; 4],
            fog_distant: [0.0; 4],
            star_params: [0.0; 4],
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sky-uniforms"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sky-bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        log::info!(
            "sky dome renderer initialized: {} triangles at radius {radius}",
            dome.triangle_count()
        );

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
            vertex_buffer,
            index_buffer,
            index_count: dome.indices.len() as u32,
        }
    }

    /// Push the current sky state and camera orientation to the GPU.
    pub fn update(&self, queue: &wgpu::Queue, sky: &SkyDome, camera: &Camera) {
        let uniforms = SkyUniforms::new(sky, camera);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    /// Render the sky. Must be the first pass of the frame.
    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
