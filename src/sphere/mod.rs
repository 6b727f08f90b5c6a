//! Audio-reactive sphere: base mesh, radial displacement and hue mapping.

mod color;
mod displacement;
mod mesh;

// Re-export public types
pub use color::{hue_for_average, hue_to_rgb, srgb_to_linear, ColorMapper, INITIAL_HUE_DEGREES};
pub use displacement::{
    bin_index, compute_displacement, vertex_noise, DisplacementEngine, NOISE_PHASE_RATE,
    NOISE_VERTEX_PHASE,
};
pub use mesh::{BaseMesh, DisplacedVertexSet, Vertex};
