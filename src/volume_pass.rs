//! The volume render pass: one pipeline, one indexed draw per volume.
//!
//! The pass owns the GPU side of the frame: two vertex streams (positions
//! in slot 0, colors in slot 1), the shared index buffer, a uniform buffer
//! with one aligned matrix slot per volume, and the depth texture. Each
//! frame [`VolumePass::upload`] rewrites the buffers from the assembled
//! scene data, then [`VolumePass::draw`] walks the spans in scene order,
//! binding each volume's uniform slot via dynamic offset strictly before
//! issuing its draw.
//!
//! Buffers start small and grow to the next power of two when a frame
//! outgrows them; they never shrink.

use crate::gpu::GpuContext;
use crate::scene::SceneBuffers;
use crate::shader::{self, ShaderSource};

/// Per-volume uniforms, one aligned slot per draw.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct VolumeUniforms {
    mvp: [[f32; 4]; 4],
}

const VEC3_STRIDE: wgpu::BufferAddress = (std::mem::size_of::<f32>() * 3) as wgpu::BufferAddress;

// First-frame capacities, in elements.
const INITIAL_VERTEX_CAPACITY: u64 = 1024;
const INITIAL_INDEX_CAPACITY: u64 = 4096;
const INITIAL_VOLUME_CAPACITY: u32 = 16;

const POSITION_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: VEC3_STRIDE,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    }],
};

const COLOR_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: VEC3_STRIDE,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32x3,
    }],
};

/// Rounds a slot size up to the device's uniform offset alignment.
fn aligned_stride(size: u64, align: u64) -> u64 {
    size.div_ceil(align) * align
}

/// Draws a scene's volumes with depth testing.
pub struct VolumePass {
    pipeline: wgpu::RenderPipeline,
    position_buffer: wgpu::Buffer,
    color_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniform_bind_group_layout: wgpu::BindGroupLayout,
    uniform_stride: u64,
    vertex_capacity: u64,
    index_capacity: u64,
    uniform_capacity: u32,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl VolumePass {
    /// Creates the pipeline and first-frame buffers.
    ///
    /// If `source` fails validation, the diagnostic is logged and the pass
    /// falls back to the builtin shader rather than aborting.
    pub fn new(gpu: &GpuContext, source: &ShaderSource) -> Self {
        let device = &gpu.device;

        let module = match shader::try_compile(gpu, source) {
            Some(module) => module,
            None => {
                eprintln!("[shader] falling back to the builtin shader");
                shader::try_compile(gpu, &ShaderSource::builtin())
                    .expect("builtin volume shader failed validation")
            }
        };

        let uniform_stride = aligned_stride(
            std::mem::size_of::<VolumeUniforms>() as u64,
            gpu.uniform_alignment(),
        );

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Volume Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<VolumeUniforms>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let vertex_capacity = INITIAL_VERTEX_CAPACITY * VEC3_STRIDE;
        let position_buffer = Self::create_vertex_buffer(device, "Volume Positions", vertex_capacity);
        let color_buffer = Self::create_vertex_buffer(device, "Volume Colors", vertex_capacity);

        let index_capacity = INITIAL_INDEX_CAPACITY * std::mem::size_of::<u32>() as u64;
        let index_buffer = Self::create_index_buffer(device, index_capacity);

        let uniform_buffer =
            Self::create_uniform_buffer(device, INITIAL_VOLUME_CAPACITY, uniform_stride);
        let uniform_bind_group =
            Self::create_uniform_bind_group(device, &uniform_bind_group_layout, &uniform_buffer);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Volume Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Volume Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs"),
                buffers: &[POSITION_LAYOUT, COLOR_LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // The cube index list has mixed winding; culling would
                // drop half its faces.
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let (depth_texture, depth_view) = Self::create_depth_texture(gpu);

        Self {
            pipeline,
            position_buffer,
            color_buffer,
            index_buffer,
            uniform_buffer,
            uniform_bind_group,
            uniform_bind_group_layout,
            uniform_stride,
            vertex_capacity,
            index_capacity,
            uniform_capacity: INITIAL_VOLUME_CAPACITY,
            depth_texture,
            depth_view,
            depth_size: (gpu.width(), gpu.height()),
        }
    }

    fn create_vertex_buffer(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_index_buffer(device: &wgpu::Device, size: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Volume Indices"),
            size,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_uniform_buffer(device: &wgpu::Device, slots: u32, stride: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Volume Uniforms"),
            size: slots as u64 * stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_uniform_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Volume Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<VolumeUniforms>() as u64),
                }),
            }],
        })
    }

    fn create_depth_texture(gpu: &GpuContext) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    /// Recreates the depth buffer if the surface has been resized.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            let (texture, view) = Self::create_depth_texture(gpu);
            self.depth_texture = texture;
            self.depth_view = view;
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// View of the depth buffer for the frame's render pass.
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    fn ensure_vertex_capacity(&mut self, gpu: &GpuContext, vertices: u64) {
        let needed = vertices * VEC3_STRIDE;
        if needed <= self.vertex_capacity {
            return;
        }
        let capacity = needed.next_power_of_two();
        self.position_buffer =
            Self::create_vertex_buffer(&gpu.device, "Volume Positions", capacity);
        self.color_buffer = Self::create_vertex_buffer(&gpu.device, "Volume Colors", capacity);
        self.vertex_capacity = capacity;
    }

    fn ensure_index_capacity(&mut self, gpu: &GpuContext, indices: u64) {
        let needed = indices * std::mem::size_of::<u32>() as u64;
        if needed <= self.index_capacity {
            return;
        }
        let capacity = needed.next_power_of_two();
        self.index_buffer = Self::create_index_buffer(&gpu.device, capacity);
        self.index_capacity = capacity;
    }

    fn ensure_uniform_capacity(&mut self, gpu: &GpuContext, volumes: u32) {
        if volumes <= self.uniform_capacity {
            return;
        }
        let capacity = volumes.next_power_of_two();
        self.uniform_buffer =
            Self::create_uniform_buffer(&gpu.device, capacity, self.uniform_stride);
        self.uniform_bind_group = Self::create_uniform_bind_group(
            &gpu.device,
            &self.uniform_bind_group_layout,
            &self.uniform_buffer,
        );
        self.uniform_capacity = capacity;
    }

    /// Uploads one frame's assembled scene data.
    ///
    /// Vertex, index, and uniform contents are rewritten from scratch;
    /// nothing from the previous frame survives.
    pub fn upload(&mut self, gpu: &GpuContext, buffers: &SceneBuffers) {
        self.ensure_vertex_capacity(gpu, buffers.positions.len() as u64);
        self.ensure_index_capacity(gpu, buffers.indices.len() as u64);
        self.ensure_uniform_capacity(gpu, buffers.spans.len() as u32);

        if !buffers.positions.is_empty() {
            gpu.queue
                .write_buffer(&self.position_buffer, 0, bytemuck::cast_slice(&buffers.positions));
            gpu.queue
                .write_buffer(&self.color_buffer, 0, bytemuck::cast_slice(&buffers.colors));
        }
        if !buffers.indices.is_empty() {
            gpu.queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&buffers.indices));
        }

        // One aligned slot per volume so each draw can bind its own matrix.
        if !buffers.mvps.is_empty() {
            let mut staging = vec![0u8; buffers.mvps.len() * self.uniform_stride as usize];
            for (i, mvp) in buffers.mvps.iter().enumerate() {
                let uniforms = VolumeUniforms {
                    mvp: mvp.to_cols_array_2d(),
                };
                let start = i * self.uniform_stride as usize;
                staging[start..start + std::mem::size_of::<VolumeUniforms>()]
                    .copy_from_slice(bytemuck::bytes_of(&uniforms));
            }
            gpu.queue.write_buffer(&self.uniform_buffer, 0, &staging);
        }
    }

    /// Issues one indexed draw per volume, in scene order.
    ///
    /// Each span's uniform slot is bound immediately before its draw and
    /// consumed by that draw alone. An empty scene draws nothing.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass, buffers: &SceneBuffers) {
        if buffers.spans.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, self.position_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.color_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        for (i, span) in buffers.spans.iter().enumerate() {
            let offset = (i as u64 * self.uniform_stride) as u32;
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
            render_pass.draw_indexed(
                span.first_index..span.first_index + span.index_count,
                0,
                0..1,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_rounds_up_to_the_alignment() {
        assert_eq!(aligned_stride(64, 256), 256);
        assert_eq!(aligned_stride(256, 256), 256);
        assert_eq!(aligned_stride(257, 256), 512);
        assert_eq!(aligned_stride(64, 16), 64);
    }
}
