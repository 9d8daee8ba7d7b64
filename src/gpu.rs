//! GPU context: device, queue, surface, and surface configuration.
//!
//! [`GpuContext`] is the explicit render-context value passed into every
//! update and draw operation. It is created once at startup from a winit
//! window and owns the handles that would otherwise end up as process-wide
//! globals.

use std::sync::Arc;
use winit::window::Window;

/// Owns the wgpu surface, device, queue, and surface configuration.
///
/// Fields are public so callers can reach the full wgpu API when the
/// high-level surface is not enough. Created once at startup, then passed
/// by reference to the render pass every frame.
pub struct GpuContext {
    /// The surface frames are presented to.
    pub surface: wgpu::Surface<'static>,
    /// The logical device for creating resources and pipelines.
    pub device: wgpu::Device,
    /// The queue buffer writes and command submissions go through.
    pub queue: wgpu::Queue,
    /// Current surface configuration (format, size, present mode).
    pub config: wgpu::SurfaceConfiguration,
}

impl GpuContext {
    /// Initializes wgpu against a window and configures the surface with an
    /// sRGB format and vsync presentation.
    ///
    /// The default device profile is enough here: the volume pipeline needs
    /// no optional features, and the baseline limits comfortably cover two
    /// small vertex streams and one dynamic-offset uniform buffer.
    ///
    /// # Panics
    ///
    /// Panics if no compatible adapter exists or device creation fails.
    /// There is no rendering without a device, so startup stops here.
    pub fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .expect("window handle is not usable as a surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            compatible_surface: Some(&surface),
            ..Default::default()
        }))
        .expect("no GPU adapter compatible with the surface");

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Phalanx Device"),
            ..Default::default()
        }))
        .expect("failed to create the GPU device");

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .unwrap_or(caps.formats[0]);

        // A window can report a zero extent before its first real resize;
        // a surface cannot be configured that small.
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Self {
            surface,
            device,
            queue,
            config,
        }
    }

    /// Reconfigures the surface for a new window size.
    ///
    /// Zero-sized dimensions are ignored; they show up while the window is
    /// minimized and would fail wgpu validation.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Current surface width in pixels.
    pub fn width(&self) -> u32 {
        self.config.width
    }

    /// Current surface height in pixels.
    pub fn height(&self) -> u32 {
        self.config.height
    }

    /// Current aspect ratio (width / height), fed into the projection.
    pub fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height as f32
    }

    /// Device alignment for dynamic uniform offsets, in bytes.
    ///
    /// The volume pass sizes its per-volume matrix slots with this.
    pub fn uniform_alignment(&self) -> u64 {
        self.device.limits().min_uniform_buffer_offset_alignment as u64
    }
}
