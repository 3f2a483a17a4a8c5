//! Instanced matcap renderer.
//!
//! Every ring becomes one instanced draw of its shared mesh; the
//! centerpiece is the same pipeline with a single identity instance. Meshes
//! shared between rings are uploaded once.

use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::{
    assets::{matcap::MatcapImage, GeometryAsset},
    camera::core::CameraUniform,
    geometry::Vertex,
    gpu::{
        pipeline_helpers, render_context::RenderContext,
        texture::MatcapTexture,
    },
    layout::InstanceTransform,
    renderer::pipeline_util,
    scene::ComposedScene,
};

// ==================== VERTEX FORMAT ====================

fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 12,
                shader_location: 1,
            },
        ],
    }
}

/// Per-instance model matrix, uploaded as four column attributes.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    /// Column-major model matrix.
    pub model: [[f32; 4]; 4],
}

impl InstanceRaw {
    /// GPU form of `transform`.
    pub fn from_transform(transform: &InstanceTransform) -> Self {
        Self {
            model: transform.matrix().to_cols_array_2d(),
        }
    }

    fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 0,
                    shader_location: 2,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 16,
                    shader_location: 3,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 32,
                    shader_location: 4,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 48,
                    shader_location: 5,
                },
            ],
        }
    }
}

/// Per-draw material parameters.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    /// Linear RGB color; `w` is unused.
    pub color: [f32; 4],
    /// Nonzero to apply ACES filmic tone mapping.
    pub tone_mapping: u32,
    _pad: [u32; 3],
}

impl MaterialUniform {
    /// Material with the given linear color.
    pub fn new(color: [f32; 3], tone_mapping: bool) -> Self {
        Self {
            color: [color[0], color[1], color[2], 1.0],
            tone_mapping: u32::from(tone_mapping),
            _pad: [0; 3],
        }
    }
}

// ==================== GPU RESOURCES ====================

struct GpuMesh {
    source: Arc<GeometryAsset>,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, source: Arc<GeometryAsset>) -> Self {
        let vertices = source.mesh.vertices();
        let indices = &source.mesh.indices;
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Vertex Buffer", source.name)),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Index Buffer", source.name)),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Self {
            index_count: indices.len() as u32,
            source,
            vertex_buffer,
            index_buffer,
        }
    }
}

struct DrawBatch {
    mesh: usize,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
    material_bind_group: wgpu::BindGroup,
}

/// Renders a [`ComposedScene`] with a matcap material.
pub struct MatcapRenderer {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    matcap_bind_group: wgpu::BindGroup,
    meshes: Vec<GpuMesh>,
    batches: Vec<DrawBatch>,
    _matcap: MatcapTexture,
}

impl MatcapRenderer {
    /// Upload the scene's meshes, instances, materials and the matcap
    /// texture, and build the pipeline.
    pub fn new(
        context: &RenderContext,
        scene: &ComposedScene,
        matcap: &MatcapImage,
        tone_mapping: bool,
        sample_count: u32,
    ) -> Self {
        let device = &context.device;

        let camera_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[pipeline_helpers::uniform_buffer(
                    0,
                    wgpu::ShaderStages::VERTEX_FRAGMENT,
                )],
            });
        let matcap_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Matcap Bind Group Layout"),
                entries: &[
                    pipeline_helpers::texture_2d(0),
                    pipeline_helpers::filtering_sampler(1),
                ],
            });
        let material_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Material Bind Group Layout"),
                entries: &[pipeline_helpers::uniform_buffer(
                    0,
                    wgpu::ShaderStages::FRAGMENT,
                )],
            });

        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[CameraUniform::new()]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Camera Bind Group"),
                layout: &camera_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                }],
            });

        let matcap_texture =
            MatcapTexture::upload(device, &context.queue, matcap);
        let sampler = pipeline_helpers::linear_sampler(device, "Matcap Sampler");
        let matcap_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Matcap Bind Group"),
                layout: &matcap_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(
                            &matcap_texture.view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            });

        let pipeline = Self::create_pipeline(
            context,
            &[&camera_layout, &matcap_layout, &material_layout],
            sample_count,
        );

        let mut meshes = Vec::new();
        let mut batches = Vec::with_capacity(scene.drawable_count());
        let mut push = |label: &str,
                        geometry: &Arc<GeometryAsset>,
                        color: [f32; 3],
                        instances: &[InstanceTransform]| {
            let mesh = mesh_slot(device, &mut meshes, geometry);
            let raw: Vec<InstanceRaw> =
                instances.iter().map(InstanceRaw::from_transform).collect();
            let instance_buffer =
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{label} Instance Buffer")),
                    contents: bytemuck::cast_slice(&raw),
                    usage: wgpu::BufferUsages::VERTEX,
                });
            let material_buffer =
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{label} Material Buffer")),
                    contents: bytemuck::cast_slice(&[MaterialUniform::new(
                        color,
                        tone_mapping,
                    )]),
                    usage: wgpu::BufferUsages::UNIFORM,
                });
            let material_bind_group =
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("{label} Material Bind Group")),
                    layout: &material_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: material_buffer.as_entire_binding(),
                    }],
                });
            batches.push(DrawBatch {
                mesh,
                instance_buffer,
                instance_count: raw.len() as u32,
                material_bind_group,
            });
        };

        let centerpiece = &scene.centerpiece;
        push(
            "Centerpiece",
            &centerpiece.geometry,
            centerpiece.color,
            std::slice::from_ref(&centerpiece.transform),
        );
        for ring in &scene.rings {
            push(
                &format!("Ring {}", ring.spec.index),
                &ring.geometry,
                ring.color,
                &ring.instances,
            );
        }

        log::debug!(
            "matcap renderer: {} meshes, {} draws, {} instances",
            meshes.len(),
            batches.len(),
            scene.instance_count()
        );

        Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            matcap_bind_group,
            meshes,
            batches,
            _matcap: matcap_texture,
        }
    }

    fn create_pipeline(
        context: &RenderContext,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
        sample_count: u32,
    ) -> wgpu::RenderPipeline {
        let shader =
            context
                .device
                .create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some("Matcap Shader"),
                    source: wgpu::ShaderSource::Wgsl(
                        include_str!("../../assets/shaders/matcap.wgsl").into(),
                    ),
                });

        let pipeline_layout = context.device.create_pipeline_layout(
            &wgpu::PipelineLayoutDescriptor {
                label: Some("Matcap Pipeline Layout"),
                bind_group_layouts,
                push_constant_ranges: &[],
            },
        );

        context
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Matcap Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[
                        vertex_buffer_layout(),
                        InstanceRaw::buffer_layout(),
                    ],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &pipeline_util::surface_fragment_targets(
                        context.format(),
                    ),
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: Some(pipeline_util::depth_stencil_state()),
                multisample: wgpu::MultisampleState {
                    count: sample_count,
                    ..Default::default()
                },
                multiview: None,
                cache: None,
            })
    }

    /// Upload the camera uniform for this frame.
    pub fn update_camera(&self, queue: &wgpu::Queue, uniform: &CameraUniform) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[*uniform]),
        );
    }

    /// Record every draw into `pass`.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        pass.set_bind_group(1, &self.matcap_bind_group, &[]);

        for batch in &self.batches {
            let Some(mesh) = self.meshes.get(batch.mesh) else {
                continue;
            };
            pass.set_bind_group(2, &batch.material_bind_group, &[]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, batch.instance_buffer.slice(..));
            pass.set_index_buffer(
                mesh.index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            pass.draw_indexed(0..mesh.index_count, 0, 0..batch.instance_count);
        }
    }

    /// Number of distinct meshes on the GPU.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Number of instanced draws per frame.
    pub fn draw_count(&self) -> usize {
        self.batches.len()
    }
}

/// Index of the uploaded copy of `geometry`, uploading it on first use.
fn mesh_slot(
    device: &wgpu::Device,
    meshes: &mut Vec<GpuMesh>,
    geometry: &Arc<GeometryAsset>,
) -> usize {
    if let Some(index) =
        meshes.iter().position(|m| Arc::ptr_eq(&m.source, geometry))
    {
        return index;
    }
    meshes.push(GpuMesh::upload(device, Arc::clone(geometry)));
    meshes.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Quat, Vec3};

    #[test]
    fn gpu_layouts_match_shader_expectations() {
        assert_eq!(size_of::<InstanceRaw>(), 64);
        assert_eq!(size_of::<MaterialUniform>(), 32);
        assert_eq!(size_of::<Vertex>(), 24);
    }

    #[test]
    fn instance_raw_is_column_major_matrix() {
        let transform = InstanceTransform {
            position: Vec3::new(1.0, 2.0, -3.0),
            rotation: Quat::from_rotation_z(0.5),
            scale: 0.5,
        };
        let raw = InstanceRaw::from_transform(&transform);
        let expected = Mat4::from_scale_rotation_translation(
            Vec3::splat(0.5),
            Quat::from_rotation_z(0.5),
            Vec3::new(1.0, 2.0, -3.0),
        );
        assert_eq!(raw.model, expected.to_cols_array_2d());
        assert_eq!(raw.model[3][..3], [1.0, 2.0, -3.0]);
    }

    #[test]
    fn material_encodes_tone_mapping_flag() {
        let on = MaterialUniform::new([0.1, 0.2, 0.3], true);
        assert_eq!(on.color, [0.1, 0.2, 0.3, 1.0]);
        assert_eq!(on.tone_mapping, 1);
        assert_eq!(MaterialUniform::new([0.0; 3], false).tone_mapping, 0);
    }
}
