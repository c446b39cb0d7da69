use crate::frame::{Environment, InstanceData, SceneBatches, Uniforms};
use crate::mesh::{SPRITE_CORNERS, SPRITE_INDICES, Vertex, cube_mesh, plane_mesh};
use crate::shaders;
use gallery_assets::{ImageLibrary, PaintingImage};
use gallery_render::RenderView;
use gallery_scene::SceneGraph;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// An index buffer plus the instances drawn with it.
struct Batch {
    instances: wgpu::Buffer,
    count: u32,
}

struct IndexedMesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

impl IndexedMesh {
    fn upload(device: &wgpu::Device, label: &str, vertices: &[Vertex], indices: &[u16]) -> Self {
        Self {
            vertices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}_vertex_buffer")),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            indices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}_index_buffer")),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            }),
            index_count: indices.len() as u32,
        }
    }
}

/// A canvas image on the GPU with the planes that show it.
struct Canvas {
    bind_group: wgpu::BindGroup,
    batch: Batch,
}

/// wgpu renderer for the gallery.
///
/// Scene geometry is static, so instance buffers are built once at construction. Each frame
/// only rewrites the uniform block (camera and particle rotation).
pub struct WgpuRenderer {
    surface_pipeline: wgpu::RenderPipeline,
    textured_pipeline: wgpu::RenderPipeline,
    particle_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    cube: IndexedMesh,
    plane: IndexedMesh,
    sprite: IndexedMesh,
    cubes: Option<Batch>,
    planes: Option<Batch>,
    canvases: Vec<Canvas>,
    particles: Option<Batch>,
    environment: Environment,
    depth_texture: wgpu::TextureView,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        scene: &SceneGraph,
        images: &ImageLibrary,
    ) -> Self {
        let environment = Environment::from_scene(scene);
        let uniforms = environment.uniforms(scene, &RenderView::default());
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
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
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let canvas_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("canvas_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let surface_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("surface_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });
        let textured_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("textured_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &canvas_layout],
            push_constant_ranges: &[],
        });

        let surface_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("surface_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::surface_shader().into()),
        });
        let surface_pipeline = build_surface_pipeline(
            device,
            &surface_layout,
            &surface_shader,
            "fs_main",
            surface_format,
        );
        let textured_pipeline = build_surface_pipeline(
            device,
            &textured_layout,
            &surface_shader,
            "fs_textured",
            surface_format,
        );

        let particle_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particle_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::particle_shader().into()),
        });
        let particle_pipeline =
            build_particle_pipeline(device, &surface_layout, &particle_shader, surface_format);

        let (cube_verts, cube_indices) = cube_mesh();
        let (plane_verts, plane_indices) = plane_mesh();
        let sprite_verts: Vec<Vertex> = SPRITE_CORNERS
            .iter()
            .map(|&[x, y]| Vertex {
                position: [x, y, 0.0],
                normal: [0.0, 0.0, 1.0],
                uv: [x + 0.5, 0.5 - y],
            })
            .collect();

        let batches = SceneBatches::collect(scene, images);
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("canvas_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let canvases = batches
            .canvases
            .iter()
            .filter_map(|(digest, instances)| {
                let image = images.image(*digest)?;
                let view = upload_canvas(device, queue, image);
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("canvas_{digest}")),
                    layout: &canvas_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(&view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(&sampler),
                        },
                    ],
                });
                let batch = instance_batch(device, "canvas", instances)?;
                Some(Canvas { bind_group, batch })
            })
            .collect::<Vec<_>>();

        let particles = scene.particles().and_then(|field| {
            let centers: Vec<[f32; 3]> = field.positions().iter().map(|p| p.to_array()).collect();
            if centers.is_empty() {
                return None;
            }
            Some(Batch {
                instances: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("particle_instance_buffer"),
                    contents: bytemuck::cast_slice(&centers),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                count: centers.len() as u32,
            })
        });

        tracing::info!(
            cubes = batches.cubes.len(),
            planes = batches.planes.len(),
            canvases = batches.canvas_count(),
            textures = canvases.len(),
            lights = environment.light_count,
            "gallery uploaded to GPU"
        );

        Self {
            surface_pipeline,
            textured_pipeline,
            particle_pipeline,
            uniform_buffer,
            uniform_bind_group,
            cube: IndexedMesh::upload(device, "cube", &cube_verts, &cube_indices),
            plane: IndexedMesh::upload(device, "plane", &plane_verts, &plane_indices),
            sprite: IndexedMesh::upload(device, "sprite", &sprite_verts, &SPRITE_INDICES),
            cubes: instance_batch(device, "cube", &batches.cubes),
            planes: instance_batch(device, "plane", &batches.planes),
            canvases,
            particles,
            environment,
            depth_texture: Self::create_depth_texture(device, width, height),
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Render one frame: opaque surfaces, image-mapped canvases, then the dust.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        scene: &SceneGraph,
        view: &RenderView,
    ) {
        let uniforms: Uniforms = self.environment.uniforms(scene, view);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.environment.clear),
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

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            pass.set_pipeline(&self.surface_pipeline);
            for (mesh, batch) in [(&self.cube, &self.cubes), (&self.plane, &self.planes)] {
                if let Some(batch) = batch {
                    draw_instanced(&mut pass, mesh, batch);
                }
            }

            if !self.canvases.is_empty() {
                pass.set_pipeline(&self.textured_pipeline);
                for canvas in &self.canvases {
                    pass.set_bind_group(1, &canvas.bind_group, &[]);
                    draw_instanced(&mut pass, &self.plane, &canvas.batch);
                }
            }

            if let Some(particles) = &self.particles {
                pass.set_pipeline(&self.particle_pipeline);
                pass.set_vertex_buffer(0, self.sprite.vertices.slice(..));
                pass.set_vertex_buffer(1, particles.instances.slice(..));
                pass.set_index_buffer(self.sprite.indices.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..self.sprite.index_count, 0, 0..particles.count);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
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
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

fn draw_instanced(pass: &mut wgpu::RenderPass<'_>, mesh: &IndexedMesh, batch: &Batch) {
    pass.set_vertex_buffer(0, mesh.vertices.slice(..));
    pass.set_vertex_buffer(1, batch.instances.slice(..));
    pass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint16);
    pass.draw_indexed(0..mesh.index_count, 0, 0..batch.count);
}

fn instance_batch(device: &wgpu::Device, label: &str, instances: &[InstanceData]) -> Option<Batch> {
    if instances.is_empty() {
        return None;
    }
    Some(Batch {
        instances: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_instance_buffer")),
            contents: bytemuck::cast_slice(instances),
            usage: wgpu::BufferUsages::VERTEX,
        }),
        count: instances.len() as u32,
    })
}

fn upload_canvas(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &PaintingImage,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: image.width,
        height: image.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&format!("canvas_texture_{}", image.digest)),
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
        &image.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width),
            rows_per_image: Some(image.height),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn depth_state(write: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: Default::default(),
        bias: Default::default(),
    }
}

fn build_surface_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    fragment_entry: &str,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(fragment_entry),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x2,
                    ],
                },
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<InstanceData>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![
                        3 => Float32x4,
                        4 => Float32x4,
                        5 => Float32x4,
                        6 => Float32x4,
                        7 => Float32x4,
                        8 => Float32x4,
                        9 => Float32x4,
                    ],
                },
            ],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: Some(wgpu::Face::Back),
            ..Default::default()
        },
        depth_stencil: Some(depth_state(true)),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

fn build_particle_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("particle_pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_particle"),
            compilation_options: Default::default(),
            buffers: &[
                // sprite corners come from the shared Vertex layout's position.xy
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                },
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![1 => Float32x3],
                },
            ],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_particle"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(depth_state(false)),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}
