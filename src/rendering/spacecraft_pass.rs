//! Spacecraft pass: the loaded model with its baked texture and the scene lights.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use super::{
    create_texture_bind_group, texture_bind_group_layout, uniform_bind_group_layout, DEPTH_FORMAT,
};
use crate::assets::{MeshVertex, ModelData, TextureData};
use crate::scene::LightUniforms;

/// Uniforms for the spacecraft shader (matches `Spacecraft` in spacecraft.wgsl)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpacecraftUniforms {
    pub model: [[f32; 4]; 4],
    pub lights: LightUniforms,
}

impl SpacecraftUniforms {
    pub fn new(model: Mat4, lights: &LightUniforms) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            lights: *lights,
        }
    }
}

struct MeshGpu {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Spacecraft material; draws nothing until a mesh is installed and placed
pub struct SpacecraftPass {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    /// White until the baked texture arrives
    texture: wgpu::Texture,
    texture_bind_group: wgpu::BindGroup,
    mesh: Option<MeshGpu>,
    visible: bool,
}

impl SpacecraftPass {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Spacecraft Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("spacecraft.wgsl").into()),
        });

        let uniforms = SpacecraftUniforms::new(Mat4::IDENTITY, &LightUniforms::default());
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Spacecraft Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = uniform_bind_group_layout(device, "Spacecraft Bind Group Layout");
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Spacecraft Bind Group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = texture_bind_group_layout(device);
        let (texture, texture_bind_group) = create_texture_bind_group(
            device,
            queue,
            &texture_layout,
            &TextureData::solid([255, 255, 255, 255]),
            "Spacecraft Placeholder Texture",
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Spacecraft Pipeline Layout"),
            bind_group_layouts: &[camera_layout, &uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Spacecraft Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                        wgpu::VertexAttribute {
                            offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                        wgpu::VertexAttribute {
                            offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                            shader_location: 2,
                            format: wgpu::VertexFormat::Float32x2,
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
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
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
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
            texture,
            texture_bind_group,
            mesh: None,
            visible: false,
        }
    }

    pub fn install_mesh(&mut self, device: &wgpu::Device, model: &ModelData) {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Spacecraft Vertex Buffer"),
            contents: bytemuck::cast_slice(&model.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Spacecraft Index Buffer"),
            contents: bytemuck::cast_slice(&model.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let previous = self.mesh.replace(MeshGpu {
            vertex_buffer,
            index_buffer,
            index_count: model.indices.len() as u32,
        });
        if let Some(previous) = previous {
            previous.vertex_buffer.destroy();
            previous.index_buffer.destroy();
        }
    }

    /// Swap in the baked texture
    pub fn set_texture(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &TextureData) {
        let (texture, bind_group) = create_texture_bind_group(
            device,
            queue,
            &self.texture_layout,
            data,
            "Spacecraft Texture",
        );
        let previous = std::mem::replace(&mut self.texture, texture);
        self.texture_bind_group = bind_group;
        previous.destroy();
    }

    pub fn update(&mut self, queue: &wgpu::Queue, uniforms: Option<SpacecraftUniforms>) {
        self.visible = uniforms.is_some();
        if let Some(uniforms) = uniforms {
            queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
        }
    }

    /// Record the draw; expects the camera bound at group 0
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        let Some(mesh) = &self.mesh else {
            return;
        };
        if !self.visible {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(1, &self.uniform_bind_group, &[]);
        render_pass.set_bind_group(2, &self.texture_bind_group, &[]);
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}
