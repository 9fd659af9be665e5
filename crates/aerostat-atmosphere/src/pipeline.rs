//! Fogged render pipeline for terrain geometry.
//!
//! Consumes [`TerrainVertex`](aerostat_mesh::TerrainVertex) geometry with the
//! camera at `@group(0)`, the per-draw model transform at `@group(1)`, and the
//! material's fog uniform bundle at `@group(2)`. The fragment math mirrors the
//! CPU functions in [`crate::fog`]; the two must stay in agreement.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

use aerostat_mesh::TERRAIN_VERTEX_LAYOUT;
use aerostat_render::MeshBuffer;

use crate::fog::{close_color, distant_color};
use crate::model::{FaceSide, MaterialFlags};
use crate::params::FogParams;

/// Per-material fog uniform bundle, mutated in place on parameter updates.
///
/// Scalars ride in the w components: `surface.w` is opacity, `color_close.w`
/// is the height-fog depth, `color_distant.w` is the vertex-color switch.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FogUniforms {
    /// View-space fog plane (normal.xyz, constant). Refreshed every frame.
    pub plane: [f32; 4],
    /// Material base color rgb + opacity.
    pub surface: [f32; 4],
    /// Close fog color rgb + fog depth.
    pub color_close: [f32; 4],
    /// Distant fog color rgb + vertex-color flag (1.0 = modulate by vertex color).
    pub color_distant: [f32; 4],
    /// start_distance, end_distance, color_start_distance, color_end_distance.
    pub distances: [f32; 4],
}

impl FogUniforms {
    /// Build the bundle from the live parameters and the current view-space plane.
    pub fn new(
        params: &FogParams,
        view_plane: Vec4,
        base_color: [f32; 3],
        flags: &MaterialFlags,
    ) -> Self {
        let close = close_color(params);
        let distant = distant_color(params);
        Self {
            plane: view_plane.to_array(),
            surface: [base_color[0], base_color[1], base_color[2], flags.opacity],
            color_close: [close[0], close[1], close[2], params.depth],
            color_distant: [
                distant[0],
                distant[1],
                distant[2],
                if flags.vertex_colors { 1.0 } else { 0.0 },
            ],
            distances: [
                params.start_distance,
                params.end_distance,
                params.color_start_distance,
                params.color_end_distance,
            ],
        }
    }

    /// Height-fog depth.
    pub fn depth(&self) -> f32 {
        self.color_close[3]
    }

    /// Distance-fog start.
    pub fn start_distance(&self) -> f32 {
        self.distances[0]
    }

    /// Distance-fog end.
    pub fn end_distance(&self) -> f32 {
        self.distances[1]
    }
}

/// Per-draw model transform uniform.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ModelUniform {
    /// Local-to-world transform of the drawn mesh.
    pub model: [[f32; 4]; 4],
}

impl ModelUniform {
    /// Build from a node transform matrix.
    pub fn new(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }
}

/// WGSL source for the fogged terrain pass.
///
/// The distance term ramps between the start and end distances and resurfaces
/// past the end; the height term smoothsteps the signed view-space distance to
/// the fog plane; the result is gated near the start distance. Same contract
/// as [`crate::fog`].
pub const FOG_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    position: vec4<f32>,
};

struct ModelUniform {
    model: mat4x4<f32>,
};

struct FogUniforms {
    plane: vec4<f32>,
    surface: vec4<f32>,
    color_close: vec4<f32>,
    color_distant: vec4<f32>,
    distances: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: CameraUniform;

@group(1) @binding(0)
var<uniform> node: ModelUniform;

@group(2) @binding(0)
var<uniform> fog: FogUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
    @location(2) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) view_position: vec3<f32>,
};

fn distance_fog(view_distance: f32) -> f32 {
    let start = fog.distances.x;
    let end = fog.distances.y;
    if view_distance <= start || view_distance >= end {
        return 0.0;
    }
    return smoothstep(start, end, view_distance);
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let world = node.model * vec4<f32>(in.position, 1.0);

    var out: VertexOutput;
    out.clip_position = camera.view_proj * world;
    out.color = in.color;
    out.normal = (node.model * vec4<f32>(in.normal, 0.0)).xyz;
    out.view_position = (camera.view * world).xyz;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let normal = normalize(in.normal);
    let light_dir = normalize(vec3<f32>(0.4, 0.8, 0.3));
    let shade = max(dot(normal, light_dir), 0.0) * 0.7 + 0.3;

    var surface = fog.surface.rgb;
    if fog.color_distant.w > 0.5 {
        surface = surface * in.color;
    }
    let lit = surface * shade;

    let view_distance = length(in.view_position);
    let d_fog = distance_fog(view_distance);
    let plane_distance = dot(fog.plane.xyz, in.view_position) + fog.plane.w;
    let h_fog = smoothstep(0.0, fog.color_close.w, plane_distance);
    let falloff = smoothstep(fog.distances.x * 0.7, fog.distances.x, view_distance);
    let intensity = max(d_fog, h_fog) * falloff;

    let color_t = smoothstep(fog.distances.z, fog.distances.w, view_distance);
    let fog_color = mix(fog.color_close.rgb, fog.color_distant.rgb, color_t);

    let final_color = mix(lit, fog_color, intensity);
    return vec4<f32>(final_color, fog.surface.w);
}
"#;

/// Fogged terrain pipeline: camera at group 0, model at group 1, fog at group 2.
pub struct FoggedPipeline {
    /// The underlying wgpu render pipeline.
    pub pipeline: wgpu::RenderPipeline,
    /// Camera uniform bind group layout (group 0).
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
    /// Model uniform bind group layout (group 1).
    pub model_bind_group_layout: wgpu::BindGroupLayout,
    /// Fog uniform bind group layout (group 2).
    pub fog_bind_group_layout: wgpu::BindGroupLayout,
}

impl FoggedPipeline {
    /// Create the pipeline for a given material side and flag set.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
        side: FaceSide,
        flags: &MaterialFlags,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("fogged-shader"),
            source: wgpu::ShaderSource::Wgsl(FOG_SHADER_SOURCE.into()),
        });

        let uniform_entry = |size: u64| wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(size),
            },
            count: None,
        };

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("fogged-camera-bgl"),
                entries: &[uniform_entry(144)], // CameraUniform: 2 × mat4x4 + vec4
            });

        let model_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("fogged-model-bgl"),
                entries: &[uniform_entry(64)], // ModelUniform: mat4x4
            });

        let fog_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("fogged-fog-bgl"),
                entries: &[uniform_entry(80)], // FogUniforms: 5 × vec4
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("fogged-pipeline-layout"),
            bind_group_layouts: &[
                &camera_bind_group_layout,
                &model_bind_group_layout,
                &fog_bind_group_layout,
            ],
            immediate_size: 0,
        });

        let depth_stencil = depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: !flags.transparent,
            depth_compare: wgpu::CompareFunction::GreaterEqual, // reverse-Z
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        let blend = if flags.transparent {
            Some(wgpu::BlendState::ALPHA_BLENDING)
        } else {
            None
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("fogged-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[TERRAIN_VERTEX_LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: side.cull_mode(),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            camera_bind_group_layout,
            model_bind_group_layout,
            fog_bind_group_layout,
        }
    }
}

/// Draw fogged geometry with camera, model, and fog bind groups.
pub fn draw_fogged<'a>(
    render_pass: &mut wgpu::RenderPass<'a>,
    pipeline: &FoggedPipeline,
    camera_bind_group: &'a wgpu::BindGroup,
    model_bind_group: &'a wgpu::BindGroup,
    fog_bind_group: &'a wgpu::BindGroup,
    mesh: &'a MeshBuffer,
) {
    render_pass.set_pipeline(&pipeline.pipeline);
    render_pass.set_bind_group(0, camera_bind_group, &[]);
    render_pass.set_bind_group(1, model_bind_group, &[]);
    render_pass.set_bind_group(2, fog_bind_group, &[]);
    mesh.bind(render_pass);
    mesh.draw(render_pass);
}

// Uniform sizes are load-bearing for the bind group layouts above.
const _: () = assert!(std::mem::size_of::<FogUniforms>() == 80);
const _: () = assert!(std::mem::size_of::<ModelUniform>() == 64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniforms_pack_params_into_w_components() {
        let params = FogParams::default();
        let flags = MaterialFlags::default();
        let uniforms = FogUniforms::new(&params, Vec4::new(0.0, -1.0, 0.0, 40.0), [0.2; 3], &flags);
        assert_eq!(uniforms.depth(), params.depth);
        assert_eq!(uniforms.start_distance(), params.start_distance);
        assert_eq!(uniforms.end_distance(), params.end_distance);
        assert_eq!(uniforms.distances[2], params.color_start_distance);
        assert_eq!(uniforms.distances[3], params.color_end_distance);
        assert_eq!(uniforms.surface[3], 1.0);
        assert_eq!(uniforms.color_distant[3], 1.0);
    }

    #[test]
    fn test_uniform_colors_match_cpu_reference() {
        let params = FogParams::default();
        let flags = MaterialFlags::default();
        let uniforms = FogUniforms::new(&params, Vec4::ZERO, [0.0; 3], &flags);
        let close = close_color(&params);
        let distant = distant_color(&params);
        assert_eq!(&uniforms.color_close[..3], &close[..]);
        assert_eq!(&uniforms.color_distant[..3], &distant[..]);
    }

    #[test]
    fn test_opacity_and_vertex_color_flags_forwarded() {
        let params = FogParams::default();
        let flags = MaterialFlags {
            transparent: true,
            opacity: 0.4,
            wireframe: false,
            vertex_colors: false,
        };
        let uniforms = FogUniforms::new(&params, Vec4::ZERO, [1.0, 0.5, 0.25], &flags);
        assert_eq!(uniforms.surface, [1.0, 0.5, 0.25, 0.4]);
        assert_eq!(uniforms.color_distant[3], 0.0);
    }

    #[test]
    fn test_shader_declares_fog_uniform_fields() {
        for field in ["plane", "surface", "color_close", "color_distant", "distances"] {
            assert!(
                FOG_SHADER_SOURCE.contains(field),
                "shader lost the `{field}` uniform field"
            );
        }
    }
}
