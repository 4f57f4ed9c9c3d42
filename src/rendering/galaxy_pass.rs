//! Galaxy pass: one instanced quad per particle, blended additively.

use wgpu::util::DeviceExt;

use super::{uniform_bind_group_layout, DEPTH_FORMAT};
use crate::audio::FrequencyBins;
use crate::galaxy::ParticleBuffer;
use crate::uniforms::ShaderUniforms;

/// Quad vertices per particle (two triangles)
const VERTICES_PER_PARTICLE: u32 = 6;

/// Particle attributes resident on the GPU, one buffer per attribute
struct ParticleGpu {
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    randomness: wgpu::Buffer,
    scales: wgpu::Buffer,
    count: u32,
}

impl ParticleGpu {
    fn upload(device: &wgpu::Device, particles: &ParticleBuffer) -> Self {
        let attribute = |label: &str, data: &[f32]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::VERTEX,
            })
        };

        Self {
            positions: attribute("Galaxy Positions", &particles.positions),
            colors: attribute("Galaxy Colors", &particles.colors),
            randomness: attribute("Galaxy Randomness", &particles.randomness),
            scales: attribute("Galaxy Scales", &particles.scales),
            count: particles.len() as u32,
        }
    }

    fn destroy(self) {
        self.positions.destroy();
        self.colors.destroy();
        self.randomness.destroy();
        self.scales.destroy();
    }
}

/// Per-instance layout for one tightly packed f32 attribute
fn instance_layout(
    attributes: &'static [wgpu::VertexAttribute],
    components: u64,
) -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: components * std::mem::size_of::<f32>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes,
    }
}

const POSITION_ATTRIBUTE: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    offset: 0,
    shader_location: 0,
    format: wgpu::VertexFormat::Float32x3,
}];
const COLOR_ATTRIBUTE: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    offset: 0,
    shader_location: 1,
    format: wgpu::VertexFormat::Float32x3,
}];
const RANDOMNESS_ATTRIBUTE: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    offset: 0,
    shader_location: 2,
    format: wgpu::VertexFormat::Float32x3,
}];
const SCALE_ATTRIBUTE: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    offset: 0,
    shader_location: 3,
    format: wgpu::VertexFormat::Float32,
}];

/// Galaxy material and its current particle buffers
pub struct GalaxyPass {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniforms: ShaderUniforms,
    particles: Option<ParticleGpu>,
    /// Generation of the buffer last installed
    generation: Option<u64>,
}

impl GalaxyPass {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Galaxy Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("galaxy.wgsl").into()),
        });

        let uniforms = ShaderUniforms::default();
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Galaxy Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = uniform_bind_group_layout(device, "Galaxy Bind Group Layout");
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Galaxy Bind Group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Galaxy Pipeline Layout"),
            bind_group_layouts: &[camera_layout, &uniform_layout],
            push_constant_ranges: &[],
        });

        // Glow adds up: src * alpha + dst
        let additive = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Galaxy Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    instance_layout(&POSITION_ATTRIBUTE, 3),
                    instance_layout(&COLOR_ATTRIBUTE, 3),
                    instance_layout(&RANDOMNESS_ATTRIBUTE, 3),
                    instance_layout(&SCALE_ATTRIBUTE, 1),
                ],
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
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
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
            uniforms,
            particles: None,
            generation: None,
        }
    }

    /// Upload a new particle buffer, then release the one it replaces.
    ///
    /// The material's uniforms start over with `point_size`.
    pub fn install(
        &mut self,
        device: &wgpu::Device,
        particles: &ParticleBuffer,
        generation: u64,
        point_size: f32,
    ) {
        let next = (!particles.is_empty()).then(|| ParticleGpu::upload(device, particles));
        let previous = std::mem::replace(&mut self.particles, next);
        if let Some(previous) = previous {
            previous.destroy();
        }

        self.uniforms = ShaderUniforms::new(point_size);
        self.generation = Some(generation);

        log::debug!(
            "Galaxy generation {} installed ({} particles)",
            generation,
            particles.len()
        );
    }

    pub fn generation(&self) -> Option<u64> {
        self.generation
    }

    /// Write this frame's uniforms and return them
    pub fn update(
        &mut self,
        queue: &wgpu::Queue,
        elapsed_s: f32,
        bins: FrequencyBins,
    ) -> ShaderUniforms {
        self.uniforms.update(elapsed_s, bins);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[self.uniforms]));
        self.uniforms
    }

    /// Record the draw; expects the camera bound at group 0
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        let Some(particles) = &self.particles else {
            return;
        };

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(1, &self.uniform_bind_group, &[]);
        render_pass.set_vertex_buffer(0, particles.positions.slice(..));
        render_pass.set_vertex_buffer(1, particles.colors.slice(..));
        render_pass.set_vertex_buffer(2, particles.randomness.slice(..));
        render_pass.set_vertex_buffer(3, particles.scales.slice(..));
        render_pass.draw(0..VERTICES_PER_PARTICLE, 0..particles.count);
    }
}
