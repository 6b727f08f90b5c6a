//! Spectrum- and noise-driven radial displacement of the base mesh.

use std::sync::Arc;

use super::mesh::{BaseMesh, DisplacedVertexSet, Vertex};
use crate::audio::SpectrumSnapshot;
use crate::error::MeshError;
use crate::params::{MeshConfig, SphereParams};

/// Noise phase advance per second of clock time (radians)
pub const NOISE_PHASE_RATE: f64 = 1000.0;

/// Noise phase offset between consecutive vertices (radians)
pub const NOISE_VERTEX_PHASE: f64 = 0.1;

/// Bin of a B-bin snapshot that vertex `index` of `vertex_count` reads
///
/// `floor(index / N * B)` in exact integer arithmetic, clamped to the last bin.
/// Returns `None` for an empty snapshot.
pub fn bin_index(index: usize, vertex_count: usize, bin_count: usize) -> Option<usize> {
    if bin_count == 0 || vertex_count == 0 {
        return None;
    }
    let bin = (index as u128 * bin_count as u128 / vertex_count as u128) as usize;
    Some(bin.min(bin_count - 1))
}

/// Deterministic pseudo-noise in [0, 1] for vertex `index` at `clock_s`
pub fn vertex_noise(clock_s: f64, index: usize) -> f32 {
    ((clock_s * NOISE_PHASE_RATE + index as f64 * NOISE_VERTEX_PHASE).sin() * 0.5 + 0.5) as f32
}

/// Displace every base vertex along its normal
///
/// Pure function of its inputs. Without a snapshot the base positions are
/// returned unchanged.
///
/// # Arguments
/// * `base` - Undisplaced sphere mesh (N vertices, none at the origin)
/// * `snapshot` - Current spectrum (B bins), or `None` without audio
/// * `clock_s` - Wall-clock time in seconds (noise phase)
/// * `params` - Displacement amount and noise blend
pub fn compute_displacement(
    base: &BaseMesh,
    snapshot: Option<&SpectrumSnapshot>,
    clock_s: f64,
    params: &SphereParams,
) -> DisplacedVertexSet {
    let Some(snapshot) = snapshot else {
        return base.to_vertices();
    };

    let n = base.len();
    let b = snapshot.len();
    let noise_intensity = params.noise_intensity;

    let vertices = base
        .positions()
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let freq = bin_index(i, n, b).map_or(0.0, |bin| snapshot.magnitude(bin));
            let noise = vertex_noise(clock_s, i);
            let displacement = (freq * (1.0 - noise_intensity) + noise * noise_intensity)
                * params.displacement_amount;

            // Base mesh guarantees |p| > 0
            let normal = p / p.length();
            Vertex::from(p + normal * displacement)
        })
        .collect();

    DisplacedVertexSet { vertices }
}

/// Owns the base mesh cache and rebuilds it when the radius changes
pub struct DisplacementEngine {
    base: Arc<BaseMesh>,
}

impl DisplacementEngine {
    /// Create engine with a mesh at `radius`
    pub fn new(radius: f32, tessellation: MeshConfig) -> Result<Self, MeshError> {
        Ok(Self {
            base: Arc::new(BaseMesh::new(radius, tessellation)?),
        })
    }

    /// Engine over a prebuilt mesh
    pub fn with_mesh(base: BaseMesh) -> Self {
        Self {
            base: Arc::new(base),
        }
    }

    /// Current base mesh
    pub fn base(&self) -> &Arc<BaseMesh> {
        &self.base
    }

    /// Make sure the base mesh matches `radius`, rebuilding if needed
    ///
    /// Only radius invalidates the mesh. On failure the previous mesh stays
    /// in place.
    pub fn ensure_radius(&mut self, radius: f32) -> Result<&Arc<BaseMesh>, MeshError> {
        if self.base.radius() != radius {
            let rebuilt = self.base.with_radius(radius)?;
            log::info!(
                "Rebuilt base mesh: radius {} -> {} ({} vertices)",
                self.base.radius(),
                radius,
                rebuilt.len()
            );
            self.base = Arc::new(rebuilt);
        }
        Ok(&self.base)
    }

    /// Rebuild for `params.sphere_radius` if needed, then displace
    pub fn displace(
        &mut self,
        snapshot: Option<&SpectrumSnapshot>,
        clock_s: f64,
        params: &SphereParams,
    ) -> DisplacedVertexSet {
        if let Err(e) = self.ensure_radius(params.sphere_radius) {
            log::warn!("Keeping previous base mesh: {}", e);
        }
        compute_displacement(&self.base, snapshot, clock_s, params)
    }
}
