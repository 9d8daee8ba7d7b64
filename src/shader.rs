use std::fs;
use std::path::{Path, PathBuf};

use crate::gpu::GpuContext;

/// WGSL source for the volume pipeline, read from disk or compiled in.
///
/// One file carries both stage entry points: `vs` for the vertex stage and
/// `fs` for the fragment stage.
#[derive(Debug)]
pub struct ShaderSource {
    source: String,
    origin: Option<PathBuf>,
}

impl ShaderSource {
    /// The compiled-in default shader.
    pub fn builtin() -> Self {
        Self {
            source: include_str!("shaders/volume.wgsl").to_string(),
            origin: None,
        }
    }

    /// Reads a whole WGSL file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let source = fs::read_to_string(&path)?;
        Ok(Self {
            source,
            origin: Some(path),
        })
    }

    /// The WGSL text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Name used in diagnostics: the file path, or "builtin".
    pub fn describe(&self) -> String {
        match &self.origin {
            Some(path) => path.display().to_string(),
            None => "builtin".to_string(),
        }
    }
}

/// Compiles WGSL inside a validation error scope.
///
/// Returns `None` after logging the diagnostic if validation rejects the
/// source; the caller picks the fallback.
pub(crate) fn try_compile(gpu: &GpuContext, shader: &ShaderSource) -> Option<wgpu::ShaderModule> {
    gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = gpu
        .device
        .create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Volume Shader"),
            source: wgpu::ShaderSource::Wgsl(shader.source().into()),
        });

    match pollster::block_on(gpu.device.pop_error_scope()) {
        None => Some(module),
        Some(error) => {
            eprintln!("[shader] {} failed to compile: {}", shader.describe(), error);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_shader_carries_both_entry_points() {
        let shader = ShaderSource::builtin();
        assert!(shader.source().contains("fn vs"));
        assert!(shader.source().contains("fn fs"));
        assert_eq!(shader.describe(), "builtin");
    }

    #[test]
    fn missing_file_reports_not_found() {
        let err = ShaderSource::from_path("no/such/shader.wgsl").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
