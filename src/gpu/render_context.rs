use std::fmt;
use std::future::{ready, Ready};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::surface::{ContextId, GraphicsContext};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Errors that can occur during GPU context initialization.
#[derive(Debug)]
pub enum RenderContextError {
    /// Failed to create a wgpu surface from the window handle.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    AdapterRequest(wgpu::RequestAdapterError),
    /// GPU device request failed (limits or features not met).
    DeviceRequest(wgpu::RequestDeviceError),
    /// Surface configuration not supported by the selected adapter.
    UnsupportedSurface,
}

impl fmt::Display for RenderContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceCreation(e) => {
                write!(f, "surface creation failed: {e}")
            }
            Self::AdapterRequest(e) => {
                write!(f, "no compatible GPU adapter found: {e}")
            }
            Self::DeviceRequest(e) => write!(f, "device request failed: {e}"),
            Self::UnsupportedSurface => {
                write!(f, "surface configuration not supported by adapter")
            }
        }
    }
}

impl std::error::Error for RenderContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SurfaceCreation(e) => Some(e),
            Self::AdapterRequest(e) => Some(e),
            Self::DeviceRequest(e) => Some(e),
            Self::UnsupportedSurface => None,
        }
    }
}

/// Owns the core wgpu resources of one view: device, queue, surface and
/// configuration.
///
/// This is the graphics context the lifecycle manager holds. Each instance
/// gets a fresh [`ContextId`], so re-creating a context after a loss is
/// always seen as a new one.
pub struct RenderContext {
    /// The wgpu logical device.
    pub device: wgpu::Device,
    /// The wgpu command queue.
    pub queue: wgpu::Queue,
    /// The window surface for presentation (`None` in texture-only mode).
    pub surface: Option<wgpu::Surface<'static>>,
    /// Current surface configuration (format, size, present mode).
    pub config: wgpu::SurfaceConfiguration,
    id: ContextId,
    /// Physical pixels per logical pixel.
    scale_factor: f64,
    /// Swapchain texture acquired for the frame being rendered.
    pending_frame: Option<wgpu::SurfaceTexture>,
    /// Render target used when there is no surface.
    offscreen: Option<wgpu::Texture>,
}

impl RenderContext {
    /// Create a new render context from the given window surface target.
    /// `initial_size` is in physical pixels.
    ///
    /// # Errors
    ///
    /// Returns `RenderContextError` if surface creation, adapter request,
    /// device request, or surface configuration fails.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        initial_size: (u32, u32),
        scale_factor: f64,
    ) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(RenderContextError::SurfaceCreation)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                power_preference: wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::AdapterRequest)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("View Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::DeviceRequest)?;

        let (width, height) = (initial_size.0.max(1), initial_size.1.max(1));
        let mut config = surface
            .get_default_config(&adapter, width, height)
            .ok_or(RenderContextError::UnsupportedSurface)?;
        config.present_mode = wgpu::PresentMode::Fifo;
        surface.configure(&device, &config);

        Ok(Self::assemble(device, queue, Some(surface), config, scale_factor))
    }

    /// Blocking variant of [`new`](Self::new) for hosts without an async
    /// executor.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn new_blocking(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        initial_size: (u32, u32),
        scale_factor: f64,
    ) -> Result<Self, RenderContextError> {
        pollster::block_on(Self::new(window, initial_size, scale_factor))
    }

    /// Create a render context from an externally-owned device and queue.
    /// Frames are drawn into an offscreen texture instead of a surface.
    #[must_use]
    pub fn from_device(
        device: wgpu::Device,
        queue: wgpu::Queue,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
        };
        Self::assemble(device, queue, None, config, 1.0)
    }

    fn assemble(
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface: Option<wgpu::Surface<'static>>,
        config: wgpu::SurfaceConfiguration,
        scale_factor: f64,
    ) -> Self {
        let id = ContextId(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed));
        log::debug!(
            "render context {id} ready ({}x{}, {:?})",
            config.width,
            config.height,
            config.format
        );
        Self {
            device,
            queue,
            surface,
            config,
            id,
            scale_factor: sanitize_scale(scale_factor),
            pending_frame: None,
            offscreen: None,
        }
    }

    /// The surface texture format.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Physical pixels per logical pixel.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Change the display density. The drawing buffer follows on the next
    /// fit: call [`OrbitView::refit`](crate::view::OrbitView::refit) (or
    /// `SurfaceLifecycleManager::refit`) when the layout size is unchanged.
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = sanitize_scale(scale_factor);
    }

    /// Returns `true` if this context has a presentation surface.
    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// The offscreen render target, in texture-only mode, once a frame has
    /// been drawn.
    pub fn offscreen_target(&self) -> Option<&wgpu::Texture> {
        self.offscreen.as_ref()
    }

    /// Reconfigure the surface for a new physical size. Ignores zero-sized
    /// dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if (width, height) == (self.config.width, self.config.height) {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        if let Some(ref surface) = self.surface {
            surface.configure(&self.device, &self.config);
        }
        if let Some(texture) = self.offscreen.take() {
            texture.destroy();
        }
    }

    /// Acquire the view the next frame is drawn into. Returns `None` if the
    /// surface could not produce a texture this frame.
    pub fn begin_frame(&mut self) -> Option<wgpu::TextureView> {
        let Some(surface) = self.surface.as_ref() else {
            let texture = self.offscreen_texture();
            return Some(
                texture.create_view(&wgpu::TextureViewDescriptor::default()),
            );
        };

        if self.pending_frame.is_none() {
            match surface.get_current_texture() {
                Ok(frame) => self.pending_frame = Some(frame),
                Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                    log::warn!("surface outdated, reconfiguring");
                    surface.configure(&self.device, &self.config);
                    return None;
                }
                Err(e) => {
                    log::warn!("skipping frame: {e}");
                    return None;
                }
            }
        }
        self.pending_frame.as_ref().map(|frame| {
            frame
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default())
        })
    }

    /// Create a new command encoder for recording GPU commands.
    pub fn create_encoder(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("View Encoder"),
            })
    }

    /// Finish the encoder and submit its command buffer to the GPU queue.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) {
        let _ = self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn offscreen_texture(&mut self) -> &wgpu::Texture {
        let config = &self.config;
        let device = &self.device;
        self.offscreen.get_or_insert_with(|| {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Offscreen Target"),
                size: wgpu::Extent3d {
                    width: config.width,
                    height: config.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: config.format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::COPY_SRC
                    | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            })
        })
    }
}

impl GraphicsContext for RenderContext {
    type Destroy = Ready<bool>;

    fn id(&self) -> ContextId {
        self.id
    }

    fn drawing_buffer_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn fit_layout(&mut self, width: u32, height: u32) {
        let (w, h) = physical_size(width, height, self.scale_factor);
        self.resize(w, h);
    }

    fn end_frame(&mut self) {
        if let Some(frame) = self.pending_frame.take() {
            frame.present();
        }
    }

    fn destroy(mut self) -> Self::Destroy {
        // An acquired but unpresented texture must be released before the
        // device goes away.
        drop(self.pending_frame.take());
        if let Some(texture) = self.offscreen.take() {
            texture.destroy();
        }
        drop(self.surface.take());
        self.device.destroy();
        log::debug!("render context {} destroyed", self.id);
        ready(true)
    }
}

fn sanitize_scale(scale_factor: f64) -> f64 {
    if scale_factor.is_finite() && scale_factor > 0.0 {
        scale_factor
    } else {
        1.0
    }
}

/// Logical layout size to physical drawing-buffer size, never below 1x1.
fn physical_size(width: u32, height: u32, scale_factor: f64) -> (u32, u32) {
    let scale = |v: u32| ((f64::from(v) * scale_factor).round() as u32).max(1);
    (scale(width), scale(height))
}
