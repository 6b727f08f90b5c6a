//! Beatolizer library - Audio-reactive wireframe sphere

pub mod audio;
pub mod cli;
pub mod controls;
pub mod error;
pub mod frame;
pub mod params;
pub mod rendering;
pub mod sphere;
