//! The application loop: window, frame phases, and the setup/frame API.
//!
//! A program hands [`run`] a setup closure; setup populates the scene,
//! positions the camera, optionally swaps in a shader from disk, and
//! returns the frame closure that runs once per frame. Each frame the
//! phases execute strictly in order on one thread: input snapshot, frame
//! closure, matrix update, geometry assembly, buffer upload, then the
//! render pass. A phase always completes before the next begins, and a
//! close request only takes effect between frames.

use std::sync::Arc;
use std::time::Instant;

use glam::Mat4;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::camera::Camera;
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::scene::Scene;
use crate::shader::ShaderSource;
use crate::volume_pass::VolumePass;

/// Context provided during app setup.
///
/// Setup runs once, after the window and device exist but before the first
/// frame. Push volumes into the scene, place the camera, and pick a shader
/// here; whatever state this leaves behind is what the first frame sees.
pub struct SetupContext<'a> {
    pub gpu: &'a GpuContext,
    pub scene: &'a mut Scene,
    pub camera: &'a mut Camera,
    shader: &'a mut ShaderSource,
}

impl SetupContext<'_> {
    /// Replaces the builtin volume shader with one loaded from disk.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be read. A program pointed at a missing
    /// shader file has nothing sensible to draw, so startup stops here.
    /// A file that reads fine but fails validation is handled later, at
    /// pipeline creation: the diagnostic is logged and the builtin shader
    /// takes over.
    pub fn volume_shader_from_path(&mut self, path: &str) {
        match ShaderSource::from_path(path) {
            Ok(source) => *self.shader = source,
            Err(e) => panic!("failed to read shader '{}': {}", path, e),
        }
    }
}

/// Context provided to the frame closure each frame.
///
/// The closure mutates volumes and the camera through this; everything it
/// leaves behind is what gets drawn. Matrix recomputation and buffer
/// assembly happen after the closure returns.
pub struct Frame<'a> {
    /// GPU context, for callers that need the raw device or queue.
    pub gpu: &'a GpuContext,
    /// The scene's volumes, mutable for animation.
    pub scene: &'a mut Scene,
    /// The camera, mutable for look and movement input.
    pub camera: &'a mut Camera,
    /// Input state for this frame.
    pub input: &'a Input,
    /// Total elapsed time in seconds.
    pub time: f32,
    /// Delta time since the last frame in seconds.
    pub dt: f32,
    exit: &'a mut bool,
}

impl Frame<'_> {
    /// Requests exit; the loop terminates after this frame completes.
    pub fn exit(&mut self) {
        *self.exit = true;
    }

    /// Current frames per second.
    pub fn fps(&self) -> f32 {
        if self.dt > 0.0 { 1.0 / self.dt } else { 0.0 }
    }

    /// Window width in pixels.
    pub fn width(&self) -> u32 {
        self.gpu.width()
    }

    /// Window height in pixels.
    pub fn height(&self) -> u32 {
        self.gpu.height()
    }
}

/// Configuration for the app window and projection.
///
/// Fixed for the lifetime of the program; only the aspect ratio tracks the
/// window.
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Color the frame is cleared to before volumes draw.
    pub clear_color: wgpu::Color,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Phalanx".to_string(),
            width: 512,
            height: 512,
            clear_color: wgpu::Color::BLACK,
            fov_y: 1.3,
            near: 1.0,
            far: 40.0,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn clear_color(mut self, r: f64, g: f64, b: f64) -> Self {
        self.clear_color = wgpu::Color { r, g, b, a: 1.0 };
        self
    }

    pub fn projection(mut self, fov_y: f32, near: f32, far: f32) -> Self {
        self.fov_y = fov_y;
        self.near = near;
        self.far = far;
        self
    }
}

/// Runs an application with the default configuration.
///
/// # Example
/// ```ignore
/// phalanx::run(|ctx| {
///     ctx.scene.push(Volume::new(Shape::Cube).at([0.0, 0.0, -3.0]));
///
///     move |frame| {
///         frame.scene.volumes_mut()[0].rotation.y = frame.time;
///     }
/// });
/// ```
pub fn run<S, F>(setup: S)
where
    S: FnOnce(&mut SetupContext) -> F + 'static,
    F: FnMut(&mut Frame) + 'static,
{
    run_with_config(AppConfig::default(), setup);
}

/// Runs an application with a custom configuration.
///
/// # Example
/// ```ignore
/// phalanx::run_with_config(
///     AppConfig::new().title("Spinning Cube").clear_color(0.39, 0.58, 0.93),
///     |ctx| {
///         ctx.scene.push(Volume::new(Shape::Cube).at([0.0, 0.0, -3.0]));
///
///         move |frame| {
///             frame.scene.volumes_mut()[0].rotation.y = 0.55 * frame.time;
///         }
///     },
/// );
/// ```
pub fn run_with_config<S, F>(config: AppConfig, setup: S)
where
    S: FnOnce(&mut SetupContext) -> F + 'static,
    F: FnMut(&mut Frame) + 'static,
{
    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = PhalanxApp::Pending {
        config,
        setup: Some(Box::new(move |gpu, scene, camera, shader| {
            let mut ctx = SetupContext {
                gpu,
                scene,
                camera,
                shader,
            };
            Box::new(setup(&mut ctx)) as Box<dyn FnMut(&mut Frame)>
        })),
    };

    event_loop.run_app(&mut app).unwrap();
}

type SetupFn = Box<
    dyn FnOnce(
        &GpuContext,
        &mut Scene,
        &mut Camera,
        &mut ShaderSource,
    ) -> Box<dyn FnMut(&mut Frame)>,
>;

enum PhalanxApp {
    Pending {
        config: AppConfig,
        setup: Option<SetupFn>,
    },
    Running {
        window: Arc<Window>,
        gpu: GpuContext,
        pass: VolumePass,
        scene: Scene,
        camera: Camera,
        input: Input,
        frame_fn: Box<dyn FnMut(&mut Frame)>,
        config: AppConfig,
        start_time: Instant,
        last_frame: Instant,
    },
}

impl ApplicationHandler for PhalanxApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let PhalanxApp::Pending { config, setup } = self {
            let window_attrs = WindowAttributes::default()
                .with_title(&config.title)
                .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

            let window = Arc::new(event_loop.create_window(window_attrs).unwrap());
            let gpu = GpuContext::new(window.clone());

            let mut scene = Scene::new();
            let mut camera = Camera::new();
            let mut shader = ShaderSource::builtin();

            let setup_fn = setup.take().unwrap();
            let frame_fn = setup_fn(&gpu, &mut scene, &mut camera, &mut shader);

            let pass = VolumePass::new(&gpu, &shader);

            *self = PhalanxApp::Running {
                window,
                gpu,
                pass,
                scene,
                camera,
                input: Input::new(),
                frame_fn,
                config: std::mem::take(config),
                start_time: Instant::now(),
                last_frame: Instant::now(),
            };
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let PhalanxApp::Running {
            window,
            gpu,
            pass,
            scene,
            camera,
            input,
            frame_fn,
            config,
            start_time,
            last_frame,
        } = self
        else {
            return;
        };

        input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let time = start_time.elapsed().as_secs_f32();
                let dt = now.duration_since(*last_frame).as_secs_f32();
                *last_frame = now;

                let mut exit = false;
                let mut frame = Frame {
                    gpu,
                    scene,
                    camera,
                    input,
                    time,
                    dt,
                    exit: &mut exit,
                };
                frame_fn(&mut frame);
                if exit {
                    event_loop.exit();
                    return;
                }

                // Update phase: matrices, concatenated buffers, upload.
                let projection =
                    Mat4::perspective_rh(config.fov_y, gpu.aspect(), config.near, config.far);
                scene.update_matrices(camera, projection);
                let buffers = scene.assemble();

                pass.ensure_depth_size(gpu);
                pass.upload(gpu, &buffers);

                // Render phase: clear, one draw per volume, present.
                let output = match gpu.surface.get_current_texture() {
                    Ok(output) => output,
                    Err(e) => {
                        eprintln!("[scene] dropped a frame: {}", e);
                        window.request_redraw();
                        return;
                    }
                };
                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                let mut encoder = gpu
                    .device
                    .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                        label: Some("Frame Encoder"),
                    });

                {
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Volume Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(config.clear_color),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        })],
                        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                            view: pass.depth_view(),
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        }),
                        timestamp_writes: None,
                        occlusion_query_set: None,
                    });

                    pass.draw(&mut render_pass, &buffers);
                }

                gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();

                input.begin_frame();
                window.request_redraw();
            }
            _ => {}
        }
    }
}
