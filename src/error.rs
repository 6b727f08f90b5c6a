//! Error types for mesh construction, audio sessions, rendering and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Base mesh construction failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// A non-positive (or non-finite) radius would place vertices at the origin
    #[error("degenerate mesh: sphere radius must be finite and > 0, got {0}")]
    DegenerateMesh(f32),

    #[error("tessellation too coarse: need >= 3x2 segments, got {width}x{height}")]
    Tessellation { width: u32, height: u32 },
}

/// Audio decoding, playback and analysis failures
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("audio file {0} contains no samples")]
    EmptyTrack(PathBuf),

    #[error("no audio output device found")]
    NoOutputDevice,

    #[error("failed to query output config: {0}")]
    OutputConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("unsupported output sample format {0:?}")]
    SampleFormat(cpal::SampleFormat),

    #[error("invalid analyser config: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to spawn analysis thread: {0}")]
    Thread(#[from] std::io::Error),
}

/// GPU setup and presentation failures
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to find suitable GPU adapter")]
    NoAdapter,

    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("vertex count mismatch: buffer holds {expected}, frame has {actual}")]
    VertexCount { expected: usize, actual: usize },
}

/// Invalid configuration values
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("FFT size must be a power of 2 >= 32, got {0}")]
    FftSize(usize),

    #[error("smoothing time constant must be in [0, 1], got {0}")]
    Smoothing(f32),

    #[error("min_decibels ({min}) must be below max_decibels ({max})")]
    DecibelRange { min: f32, max: f32 },
}
