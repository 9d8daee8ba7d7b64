//! # Phalanx
//!
//! **A tiny retained scene of volumes with a freelook camera and one tidy
//! draw loop on top of wgpu.**
//!
//! Push shapes into a scene, animate them from a single closure, and let
//! the loop handle matrices, buffer assembly, and the per-volume draws.
//!
//! ## Quick Start
//!
//! ```no_run
//! use phalanx::*;
//!
//! fn main() {
//!     run(|ctx| {
//!         ctx.scene.push(Volume::new(Shape::Cube).at([0.0, 0.0, -3.0]));
//!
//!         move |frame| {
//!             let cube = &mut frame.scene.volumes_mut()[0];
//!             cube.rotation = Vec3::new(0.15 * frame.time, 0.55 * frame.time, 0.0);
//!         }
//!     });
//! }
//! ```
//!
//! ## Shape of a frame
//!
//! Every frame runs the same phases in the same order on one thread: the
//! frame closure mutates volumes and the camera, the scene recomputes each
//! volume's model-view-projection matrix, all geometry is concatenated into
//! flat buffers and uploaded, then one indexed draw is issued per volume in
//! scene order with that volume's matrix bound immediately before it.

mod app;
mod camera;
mod gpu;
mod input;
mod scene;
mod shader;
mod shape;
mod volume;
mod volume_pass;

pub use app::{AppConfig, Frame, SetupContext, run, run_with_config};
pub use camera::Camera;
pub use gpu::GpuContext;
pub use input::Input;
pub use scene::{DrawSpan, Scene, SceneBuffers};
pub use shader::ShaderSource;
pub use shape::{GeometryError, Shape, verify_geometry};
pub use volume::Volume;
pub use volume_pass::VolumePass;

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec2, Vec3};

// Re-export commonly used winit types for convenience
pub use winit::keyboard::KeyCode;
