//! UV sphere base mesh and per-tick vertex buffers.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::collections::HashSet;
use std::f32::consts::PI;

use crate::error::MeshError;
use crate::params::MeshConfig;

/// Vertex data uploaded to the GPU (position only, wireframe)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl From<Vec3> for Vertex {
    fn from(v: Vec3) -> Self {
        Self {
            position: v.to_array(),
        }
    }
}

/// Immutable sphere geometry for one radius
///
/// No vertex sits at the origin: construction rejects radii that would allow it.
#[derive(Debug, Clone)]
pub struct BaseMesh {
    positions: Vec<Vec3>,
    /// Unique wireframe edges as vertex index pairs (line list)
    edges: Vec<u32>,
    radius: f32,
    /// `None` for meshes built from explicit positions
    tessellation: Option<MeshConfig>,
}

impl BaseMesh {
    /// Build a UV sphere
    ///
    /// Vertex rows run from the +Y pole to the -Y pole; each row holds
    /// `width_segments + 1` vertices with a duplicated seam column.
    pub fn new(radius: f32, tessellation: MeshConfig) -> Result<Self, MeshError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(MeshError::DegenerateMesh(radius));
        }
        let MeshConfig {
            width_segments: width,
            height_segments: height,
        } = tessellation;
        if width < 3 || height < 2 {
            return Err(MeshError::Tessellation { width, height });
        }

        let mut positions = Vec::with_capacity(tessellation.vertex_count());
        for iy in 0..=height {
            let theta = iy as f32 / height as f32 * PI;
            for ix in 0..=width {
                let phi = ix as f32 / width as f32 * 2.0 * PI;
                positions.push(Vec3::new(
                    -radius * phi.cos() * theta.sin(),
                    radius * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                ));
            }
        }

        let edges = wireframe_edges(&triangle_indices(width, height));

        Ok(Self {
            positions,
            edges,
            radius,
            tessellation: Some(tessellation),
        })
    }

    /// Mesh from explicit positions (tests and custom geometry)
    ///
    /// Every position must lie away from the origin.
    pub fn from_positions(positions: Vec<Vec3>, edges: Vec<u32>) -> Result<Self, MeshError> {
        if let Some(p) = positions
            .iter()
            .find(|p| !(p.is_finite() && p.length_squared() > 0.0))
        {
            return Err(MeshError::DegenerateMesh(p.length()));
        }
        let radius = positions.iter().map(|p| p.length()).fold(0.0, f32::max);
        Ok(Self {
            positions,
            edges,
            radius,
            tessellation: None,
        })
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn edges(&self) -> &[u32] {
        &self.edges
    }

    /// Number of vertices (N)
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Radius the mesh was built for
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn tessellation(&self) -> Option<MeshConfig> {
        self.tessellation
    }

    /// Same geometry at a new radius
    ///
    /// UV spheres are regenerated from their tessellation; explicit meshes are
    /// scaled about the origin, keeping vertex count and edges.
    pub fn with_radius(&self, radius: f32) -> Result<Self, MeshError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(MeshError::DegenerateMesh(radius));
        }
        match self.tessellation {
            Some(tessellation) => Self::new(radius, tessellation),
            None => {
                let scale = radius / self.radius;
                Self::from_positions(
                    self.positions.iter().map(|&p| p * scale).collect(),
                    self.edges.clone(),
                )
            }
        }
    }

    /// Undisplaced copy of the positions, ready for upload
    pub fn to_vertices(&self) -> DisplacedVertexSet {
        DisplacedVertexSet {
            vertices: self.positions.iter().copied().map(Vertex::from).collect(),
        }
    }
}

/// Triangle list over the vertex grid, skipping the degenerate pole triangles
fn triangle_indices(width: u32, height: u32) -> Vec<u32> {
    let row = width + 1;
    let mut indices = Vec::with_capacity((width * height * 6) as usize);

    for iy in 0..height {
        for ix in 0..width {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    indices
}

/// Deduplicate triangle edges into a line list
fn wireframe_edges(triangles: &[u32]) -> Vec<u32> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();

    for tri in triangles.chunks_exact(3) {
        for (from, to) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            let key = (from.min(to), from.max(to));
            if seen.insert(key) {
                edges.extend_from_slice(&[key.0, key.1]);
            }
        }
    }

    edges
}

/// Displaced positions for one tick, one per base-mesh vertex
#[derive(Debug, Clone, PartialEq)]
pub struct DisplacedVertexSet {
    pub vertices: Vec<Vertex>,
}

impl DisplacedVertexSet {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.vertices
            .get(index)
            .map(|v| Vec3::from_array(v.position))
    }
}
