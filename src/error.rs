//! Error types for GPU setup, audio playback, asset loading and parameter parsing.

use std::fmt;

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found"),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors from audio playback and analysis setup.
#[derive(Debug)]
pub enum AudioError {
    /// Analyser configuration rejected.
    InvalidConfig(String),
    /// No default output device available.
    NoOutputDevice,
    /// Output stream could not be opened.
    Stream(String),
    /// Track could not be decoded.
    Decode(rodio::decoder::DecoderError),
    /// Track could not be read.
    Io(std::io::Error),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::InvalidConfig(msg) => write!(f, "Invalid analyser config: {}", msg),
            AudioError::NoOutputDevice => write!(f, "No audio output device found"),
            AudioError::Stream(msg) => write!(f, "Failed to open audio stream: {}", msg),
            AudioError::Decode(e) => write!(f, "Failed to decode audio track: {}", e),
            AudioError::Io(e) => write!(f, "Failed to read audio track: {}", e),
        }
    }
}

impl std::error::Error for AudioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AudioError::Decode(e) => Some(e),
            AudioError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rodio::decoder::DecoderError> for AudioError {
    fn from(e: rodio::decoder::DecoderError) -> Self {
        AudioError::Decode(e)
    }
}

impl From<std::io::Error> for AudioError {
    fn from(e: std::io::Error) -> Self {
        AudioError::Io(e)
    }
}

impl From<rodio::StreamError> for AudioError {
    fn from(e: rodio::StreamError) -> Self {
        AudioError::Stream(e.to_string())
    }
}

impl From<rodio::PlayError> for AudioError {
    fn from(e: rodio::PlayError) -> Self {
        AudioError::Stream(e.to_string())
    }
}

/// Errors that can occur while loading models and textures.
#[derive(Debug)]
pub enum AssetError {
    /// Failed to read file from disk.
    Io(std::io::Error),
    /// Failed to decode image.
    Image(image::ImageError),
    /// Failed to import glTF document.
    Gltf(gltf::Error),
    /// Document contained no triangle geometry.
    EmptyModel(String),
    /// Loader thread went away before delivering.
    Disconnected,
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io(e) => write!(f, "Failed to read asset: {}", e),
            AssetError::Image(e) => write!(f, "Failed to load image: {}", e),
            AssetError::Gltf(e) => write!(f, "Failed to import glTF: {}", e),
            AssetError::EmptyModel(path) => write!(f, "Model '{}' has no triangle meshes", path),
            AssetError::Disconnected => write!(f, "Asset loader stopped before delivering"),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io(e) => Some(e),
            AssetError::Image(e) => Some(e),
            AssetError::Gltf(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AssetError {
    fn from(e: std::io::Error) -> Self {
        AssetError::Io(e)
    }
}

impl From<image::ImageError> for AssetError {
    fn from(e: image::ImageError) -> Self {
        AssetError::Image(e)
    }
}

impl From<gltf::Error> for AssetError {
    fn from(e: gltf::Error) -> Self {
        AssetError::Gltf(e)
    }
}

/// Errors from parsing user-supplied parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// Color string is not `#rrggbb`.
    InvalidColor(String),
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamError::InvalidColor(s) => write!(f, "Invalid color '{}', expected #rrggbb", s),
        }
    }
}

impl std::error::Error for ParamError {}
