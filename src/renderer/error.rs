//! Ripple renderer errors

/// Anything that stops the ripple background from drawing
#[derive(Debug, thiserror::Error)]
pub enum RippleError {
    #[error("failed to create canvas surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("ripple shader failed to compile: {0}")]
    ShaderCompile(String),

    #[error("could not acquire frame: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}
