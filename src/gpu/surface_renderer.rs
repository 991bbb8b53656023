//! wgpu implementation of the view's [`Renderer`].
//!
//! The renderer owns the camera uniform and a depth target sized to the
//! drawing buffer. Each frame it uploads the camera, clears the target and
//! hands a render pass to the scene.

use std::marker::PhantomData;

use wgpu::util::DeviceExt;

use crate::camera::core::{Camera, CameraUniform};
use crate::gpu::render_context::RenderContext;
use crate::surface::Renderer;

/// Depth attachment format used by [`SurfaceRenderer`]. Scene pipelines
/// must be created with a matching depth-stencil state.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// What a scene draws into the pass the renderer opens for it.
pub trait ScenePass {
    /// Colour the target is cleared to before drawing.
    fn clear_color(&self) -> wgpu::Color {
        wgpu::Color::BLACK
    }

    /// Record draw calls. The camera bind group is already set at index 0;
    /// it is also passed for pipelines that bind it elsewhere.
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>, camera_bind_group: &wgpu::BindGroup);
}

/// Renderer bound to one [`RenderContext`].
pub struct SurfaceRenderer<Sc> {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,
    size: (u32, u32),
    uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_layout: wgpu::BindGroupLayout,
    camera_bind_group: wgpu::BindGroup,
    depth: wgpu::Texture,
    depth_view: wgpu::TextureView,
    scene: PhantomData<fn(&Sc)>,
}

impl<Sc> SurfaceRenderer<Sc> {
    /// Device the renderer draws with, for building scene pipelines.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Queue the renderer submits to.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Colour target format.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Layout of the camera bind group (group 0 in scene pipelines).
    pub fn camera_layout(&self) -> &wgpu::BindGroupLayout {
        &self.camera_layout
    }

    /// The last camera uniform uploaded.
    pub fn camera_uniform(&self) -> &CameraUniform {
        &self.uniform
    }
}

impl<Sc: ScenePass> Renderer for SurfaceRenderer<Sc> {
    type Context = RenderContext;
    type Scene = Sc;

    fn create(context: &mut RenderContext) -> Self {
        let device = context.device.clone();
        let uniform = CameraUniform::new();

        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });

        let camera_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &camera_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                }],
                label: Some("Camera Bind Group"),
            });

        let size = context.config.width.max(1);
        let size = (size, context.config.height.max(1));
        let depth = create_depth_texture(&device, size);
        let depth_view =
            depth.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            device,
            queue: context.queue.clone(),
            format: context.format(),
            size,
            uniform,
            camera_buffer,
            camera_layout,
            camera_bind_group,
            depth,
            depth_view,
            scene: PhantomData,
        }
    }

    fn set_size(&mut self, width: u32, height: u32) {
        let size = (width.max(1), height.max(1));
        if size == self.size {
            return;
        }
        self.depth.destroy();
        self.depth = create_depth_texture(&self.device, size);
        self.depth_view = self
            .depth
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.size = size;
    }

    fn back_buffer_size(&self) -> (u32, u32) {
        self.size
    }

    fn render(&mut self, context: &mut RenderContext, scene: &Sc, camera: &Camera) {
        self.uniform.update_view_proj(camera);
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.uniform]),
        );

        let Some(target) = context.begin_frame() else {
            return;
        };

        let mut encoder = context.create_encoder();
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Scene Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &target,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(scene.clear_color()),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth_view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    ..Default::default()
                });
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            scene.draw(&mut pass, &self.camera_bind_group);
        }
        context.submit(encoder);
    }

    fn dispose(self) {
        self.camera_buffer.destroy();
        self.depth.destroy();
    }
}

fn create_depth_texture(
    device: &wgpu::Device,
    (width, height): (u32, u32),
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    })
}
