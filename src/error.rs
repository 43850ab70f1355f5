//! Error types for starfield.
//!
//! Generating and animating patterns cannot fail. Errors come only from
//! opening the window, bringing up the GPU and reading the sprite image.

use std::fmt;
use std::path::PathBuf;

/// The GPU could not be brought up for the window.
#[derive(Debug)]
pub enum GpuError {
    Surface(wgpu::CreateSurfaceError),
    /// No adapter can present to the window surface.
    NoAdapter,
    /// The surface advertises no texture format to render into.
    NoSurfaceFormat,
    Device(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::Surface(e) => write!(f, "cannot create a render surface for the window: {}", e),
            GpuError::NoAdapter => f.write_str("no GPU adapter can draw to this window (Vulkan, Metal, DX12 or GL required)"),
            GpuError::NoSurfaceFormat => f.write_str("the window surface reports no supported color formats"),
            GpuError::Device(e) => write!(f, "GPU adapter refused to open a device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::Surface(e) => Some(e),
            GpuError::Device(e) => Some(e),
            GpuError::NoAdapter | GpuError::NoSurfaceFormat => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::Surface(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::Device(e)
    }
}

/// The star sprite could not be turned into RGBA pixels.
#[derive(Debug)]
pub enum TextureError {
    /// The sprite file could not be read.
    Read { path: PathBuf, source: std::io::Error },
    /// The bytes are not a PNG or JPEG image.
    Decode(image::ImageError),
    /// Pixel data does not cover `width * height` RGBA texels.
    SizeMismatch { expected: usize, actual: usize },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::Read { path, source } => {
                write!(f, "cannot read sprite {}: {}", path.display(), source)
            }
            TextureError::Decode(e) => write!(f, "sprite is not a readable PNG or JPEG: {}", e),
            TextureError::SizeMismatch { expected, actual } => {
                write!(f, "sprite has {} bytes of pixels, {} needed", actual, expected)
            }
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::Read { source, .. } => Some(source),
            TextureError::Decode(e) => Some(e),
            TextureError::SizeMismatch { .. } => None,
        }
    }
}

impl From<image::ImageError> for TextureError {
    fn from(e: image::ImageError) -> Self {
        TextureError::Decode(e)
    }
}

/// Anything that stops [`Starfield::run`](crate::Starfield::run).
#[derive(Debug)]
pub enum AppError {
    EventLoop(winit::error::EventLoopError),
    Window(winit::error::OsError),
    Gpu(GpuError),
    Sprite(TextureError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::EventLoop(e) => write!(f, "event loop failed: {}", e),
            AppError::Window(e) => write!(f, "cannot open window: {}", e),
            AppError::Gpu(e) => e.fmt(f),
            AppError::Sprite(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::EventLoop(e) => Some(e),
            AppError::Window(e) => Some(e),
            AppError::Gpu(e) => e.source(),
            AppError::Sprite(e) => e.source(),
        }
    }
}

impl From<winit::error::EventLoopError> for AppError {
    fn from(e: winit::error::EventLoopError) -> Self {
        AppError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for AppError {
    fn from(e: winit::error::OsError) -> Self {
        AppError::Window(e)
    }
}

impl From<GpuError> for AppError {
    fn from(e: GpuError) -> Self {
        AppError::Gpu(e)
    }
}

impl From<TextureError> for AppError {
    fn from(e: TextureError) -> Self {
        AppError::Sprite(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_sprite_read_error_names_path() {
        let err: AppError = TextureError::Read {
            path: PathBuf::from("assets/star.png"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        }
        .into();
        let message = err.to_string();
        assert!(message.contains("assets/star.png"));
        assert!(message.contains("no such file"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_size_mismatch_message() {
        let err = TextureError::SizeMismatch { expected: 16, actual: 12 };
        assert_eq!(err.to_string(), "sprite has 12 bytes of pixels, 16 needed");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_missing_surface_format_is_not_an_adapter_error() {
        let err = AppError::from(GpuError::NoSurfaceFormat);
        assert!(err.to_string().contains("no supported color formats"));
        assert!(!err.to_string().contains("adapter"));
        assert!(matches!(err, AppError::Gpu(GpuError::NoSurfaceFormat)));
    }
}
