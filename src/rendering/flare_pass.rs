//! Lens flare pass: a screen-space sprite over the point light.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use super::{
    create_texture_bind_group, texture_bind_group_layout, uniform_bind_group_layout, DEPTH_FORMAT,
};
use crate::assets::TextureData;

/// Flare sprite placement in normalized device coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FlareUniforms {
    pub center: [f32; 2],
    pub half_size: [f32; 2],
    /// rgb tint, a = intensity
    pub color: [f32; 4],
}

/// Place a flare of `size_px` pixels over `world_position`.
///
/// Returns `None` when the light is behind the camera or its center is off
/// screen.
pub fn flare_placement(
    view_proj: Mat4,
    world_position: Vec3,
    size_px: f32,
    viewport: [f32; 2],
) -> Option<FlareUniforms> {
    let clip = view_proj * world_position.extend(1.0);
    if clip.w <= 0.0 || viewport[0] <= 0.0 || viewport[1] <= 0.0 {
        return None;
    }

    let ndc = clip.truncate().truncate() / clip.w;
    if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 {
        return None;
    }

    Some(FlareUniforms {
        center: ndc.to_array(),
        half_size: [size_px / viewport[0], size_px / viewport[1]],
        color: [1.0, 1.0, 1.0, 1.0],
    })
}

pub struct FlarePass {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    /// Flare sprite; nothing is drawn until it loads
    texture: Option<(wgpu::Texture, wgpu::BindGroup)>,
    visible: bool,
}

impl FlarePass {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Flare Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("flare.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Flare Uniform Buffer"),
            contents: bytemuck::cast_slice(&[FlareUniforms::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = uniform_bind_group_layout(device, "Flare Bind Group Layout");
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Flare Bind Group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = texture_bind_group_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Flare Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let additive = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Flare Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState {
                        color: additive,
                        alpha: additive,
                    }),
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
            // Always on top
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            texture_layout,
            texture: None,
            visible: false,
        }
    }

    pub fn set_texture(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &TextureData) {
        let next =
            create_texture_bind_group(device, queue, &self.texture_layout, data, "Flare Texture");
        if let Some((previous, _)) = self.texture.replace(next) {
            previous.destroy();
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, placement: Option<FlareUniforms>) {
        self.visible = placement.is_some();
        if let Some(uniforms) = placement {
            queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
        }
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        let Some((_, texture_bind_group)) = &self.texture else {
            return;
        };
        if !self.visible {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_bind_group(1, texture_bind_group, &[]);
        render_pass.draw(0..6, 0..1);
    }
}
