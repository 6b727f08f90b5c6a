//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

use crate::params::{MeshConfig, ParamRange, SphereParams};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Beatolizer")]
#[command(about = "Audio-reactive wireframe sphere", long_about = None)]
pub struct Args {
    /// WAV file to play and visualise (a file can also be dropped on the window)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Rotation about the Y axis per frame (radians, 0-0.02)
    #[arg(long, value_name = "RADIANS")]
    pub rotation_speed: Option<f32>,

    /// Maximum radial displacement (0-2)
    #[arg(long, value_name = "UNITS")]
    pub displacement: Option<f32>,

    /// Blend between spectrum (0) and noise (1)
    #[arg(long, value_name = "BLEND")]
    pub noise: Option<f32>,

    /// Base sphere radius (0.5-5)
    #[arg(long, value_name = "UNITS")]
    pub radius: Option<f32>,

    /// Hue multiplier for the spectrum average (0.1-3)
    #[arg(long, value_name = "FACTOR")]
    pub color_sensitivity: Option<f32>,

    /// Sphere segments in both directions
    #[arg(long, value_name = "COUNT", default_value = "64")]
    pub segments: u32,
}

impl Args {
    /// Initial parameters: defaults overridden by flags, clamped to their ranges
    pub fn sphere_params(&self) -> SphereParams {
        let defaults = SphereParams::default();
        SphereParams {
            rotation_speed: pick(
                "rotation-speed",
                self.rotation_speed,
                defaults.rotation_speed,
                SphereParams::ROTATION_SPEED,
            ),
            displacement_amount: pick(
                "displacement",
                self.displacement,
                defaults.displacement_amount,
                SphereParams::DISPLACEMENT_AMOUNT,
            ),
            noise_intensity: pick(
                "noise",
                self.noise,
                defaults.noise_intensity,
                SphereParams::NOISE_INTENSITY,
            ),
            sphere_radius: pick(
                "radius",
                self.radius,
                defaults.sphere_radius,
                SphereParams::SPHERE_RADIUS,
            ),
            color_sensitivity: pick(
                "color-sensitivity",
                self.color_sensitivity,
                defaults.color_sensitivity,
                SphereParams::COLOR_SENSITIVITY,
            ),
        }
    }

    /// Tessellation from `--segments` (at least 3 around, 2 pole to pole)
    pub fn mesh_config(&self) -> MeshConfig {
        MeshConfig {
            width_segments: self.segments.max(3),
            height_segments: self.segments.max(2),
        }
    }
}

fn pick(flag: &str, value: Option<f32>, default: f32, range: ParamRange) -> f32 {
    let Some(value) = value else {
        return default;
    };
    let clamped = range.clamp(value);
    if !range.contains(value) {
        log::warn!(
            "--{} {} outside [{}, {}], using {}",
            flag,
            value,
            range.min,
            range.max,
            clamped
        );
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_flags() {
        let args = Args::parse_from(["beatolizer"]);
        assert!(args.file.is_none());
        assert_eq!(args.sphere_params(), SphereParams::default());
        assert_eq!(args.mesh_config(), MeshConfig::default());
    }

    #[test]
    fn test_flags_override_and_clamp() {
        let args = Args::parse_from([
            "beatolizer",
            "song.wav",
            "--noise",
            "0.5",
            "--radius",
            "40",
            "--rotation-speed=-1",
        ]);
        let params = args.sphere_params();

        assert_eq!(args.file, Some(PathBuf::from("song.wav")));
        assert_eq!(params.noise_intensity, 0.5);
        assert_eq!(params.sphere_radius, 5.0);
        assert_eq!(params.rotation_speed, 0.0);
        assert_eq!(params.color_sensitivity, 1.0);
    }

    #[test]
    fn test_in_range_flag_passes_through() {
        let args = Args::parse_from(["beatolizer", "--color-sensitivity", "3"]);
        assert_eq!(args.sphere_params().color_sensitivity, 3.0);
    }

    #[test]
    fn test_segments_floor() {
        let args = Args::parse_from(["beatolizer", "--segments", "1"]);
        let mesh = args.mesh_config();
        assert_eq!(mesh.width_segments, 3);
        assert_eq!(mesh.height_segments, 2);
    }
}
