use crate::camera::OrbitCamera;
use crate::shaders;
use crate::torus::{TorusGeometry, Vertex};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use ringflow_anim::{AnimationContext, RingInstance};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
}

impl InstanceData {
    fn from_ring(ring: &RingInstance) -> Self {
        let cols = ring.transform.model_matrix().to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color: ring.color.to_linear_rgba(ring.opacity),
        }
    }
}

/// Instance data for up to `max` rings, farthest from `eye` first so blending
/// composes back to front.
fn build_instances(
    rings: impl Iterator<Item = RingInstance>,
    max: usize,
    eye: Vec3,
) -> Vec<InstanceData> {
    let mut rings: Vec<(f32, RingInstance)> = rings
        .take(max)
        .map(|r| (r.transform.position.distance_squared(eye), r))
        .collect();
    rings.sort_by(|a, b| b.0.total_cmp(&a.0));
    rings.iter().map(|(_, r)| InstanceData::from_ring(r)).collect()
}

/// wgpu-based ring renderer.
pub struct WgpuRenderer {
    ring_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    torus_vertex_buffer: wgpu::Buffer,
    torus_index_buffer: wgpu::Buffer,
    torus_index_count: u32,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    depth_texture: wgpu::TextureView,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        geometry: &TorusGeometry,
        max_instances: u32,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let ring_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ring_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::RING_SHADER.into()),
        });

        // Transparent rings: blend over what is behind, test depth but never
        // write it, so overlapping rings all show through.
        let ring_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ring_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &ring_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &ring_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let (torus_verts, torus_indices) = geometry.build();
        let torus_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("torus_vertex_buffer"),
            contents: bytemuck::cast_slice(&torus_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let torus_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("torus_index_buffer"),
            contents: bytemuck::cast_slice(&torus_indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let torus_index_count = torus_indices.len() as u32;

        let max_instances = max_instances.max(1);
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (max_instances as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        tracing::debug!(
            vertices = torus_verts.len(),
            indices = torus_index_count,
            max_instances,
            "ring pipeline ready"
        );

        Self {
            ring_pipeline,
            uniform_buffer,
            uniform_bind_group,
            torus_vertex_buffer,
            torus_index_buffer,
            torus_index_count,
            instance_buffer,
            max_instances,
            depth_texture,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Render one frame: every active ring over a black background.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &OrbitCamera,
        anim: &AnimationContext,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: camera.view_projection().to_cols_array_2d(),
            }),
        );

        let instances = build_instances(
            anim.visible_rings(),
            self.max_instances as usize,
            camera.eye(),
        );
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            if !instances.is_empty() {
                pass.set_pipeline(&self.ring_pipeline);
                pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                pass.set_vertex_buffer(0, self.torus_vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                pass.set_index_buffer(self.torus_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.torus_index_count, 0, 0..instances.len() as u32);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringflow_anim::AnimationConfig;

    #[test]
    fn instances_are_sorted_far_to_near() {
        let mut anim = AnimationContext::new(AnimationConfig::default()).unwrap();
        let config = anim.config().clone();
        anim.frame(config.activation_delay_ms(3));

        let instances = build_instances(anim.visible_rings(), 16, Vec3::ZERO);
        assert_eq!(instances.len(), 4);
        let depths: Vec<f32> = instances.iter().map(|i| i.model_3[2]).collect();
        assert!(depths.windows(2).all(|w| w[0] <= w[1]), "{depths:?}");
        // the newest ring is still at the start, nearest the camera
        assert!((depths[3] + 0.25).abs() < 1e-6);
    }

    #[test]
    fn instance_alpha_is_ring_opacity() {
        let mut anim = AnimationContext::new(AnimationConfig::default()).unwrap();
        anim.frame(30_000.0);
        let ring = anim.visible_rings().next().unwrap();
        let instance = InstanceData::from_ring(&ring);
        assert_eq!(instance.color[3], ring.opacity);
        assert!(ring.opacity < 1.0);
        assert_eq!(instance.model_0[0], ring.transform.scale.x);
    }

    #[test]
    fn instances_respect_capacity() {
        let mut anim = AnimationContext::new(AnimationConfig::default()).unwrap();
        anim.frame(100_000.0);
        assert_eq!(build_instances(anim.visible_rings(), 2, Vec3::ZERO).len(), 2);
    }

    #[test]
    fn instances_are_sorted_by_distance_to_eye() {
        let mut anim = AnimationContext::new(AnimationConfig::default()).unwrap();
        let config = anim.config().clone();
        anim.frame(config.activation_delay_ms(3));

        // orbited round behind the rings: the ring nearest the start is now farthest
        let eye = Vec3::new(0.0, 0.0, -10.0);
        let instances = build_instances(anim.visible_rings(), 16, eye);
        let depths: Vec<f32> = instances.iter().map(|i| i.model_3[2]).collect();
        assert!(depths.windows(2).all(|w| w[0] >= w[1]), "{depths:?}");
        assert!((depths[0] + 0.25).abs() < 1e-6);
    }
}
