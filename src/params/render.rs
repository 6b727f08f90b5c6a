//! Rendering and mesh configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Camera distance from the sphere center along +Z (world units)
    pub camera_distance: f32,

    /// Near clipping plane
    pub near_plane: f32,

    /// Far clipping plane
    pub far_plane: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 75.0,
            camera_distance: 8.0,
            near_plane: 0.1,
            far_plane: 1000.0,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }
}

/// Sphere tessellation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshConfig {
    /// Segments around the equator (longitude)
    pub width_segments: u32,

    /// Segments from pole to pole (latitude)
    pub height_segments: u32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            width_segments: 64,
            height_segments: 64,
        }
    }
}

impl MeshConfig {
    /// Vertex count of a UV sphere with this tessellation
    pub fn vertex_count(&self) -> usize {
        (self.width_segments as usize + 1) * (self.height_segments as usize + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_tracks_window_size() {
        let mut config = RenderConfig::default();
        assert!((config.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);

        config.window_width = 800;
        config.window_height = 0;
        assert_eq!(config.aspect_ratio(), 800.0);
    }

    #[test]
    fn test_default_mesh_vertex_count() {
        assert_eq!(MeshConfig::default().vertex_count(), 65 * 65);
    }
}
