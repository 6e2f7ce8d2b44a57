use thiserror::Error;

/// Failures of the frame harness. The kernel itself cannot fail.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no compatible GPU adapter found")]
    NoAdapter,

    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("kernel shader rejected by the GPU backend: {0}")]
    Shader(String),

    #[error("failed to read back rendered frame: {0}")]
    Readback(#[from] wgpu::BufferAsyncError),

    #[error("readback channel closed before the frame was mapped")]
    ReadbackChannel,

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
