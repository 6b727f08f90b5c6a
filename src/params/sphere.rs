//! Audio-reactive sphere parameters and their declared ranges.

/// Inclusive range and step of one adjustable parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    /// Increment applied by a single control step
    pub step: f32,
}

impl ParamRange {
    /// Clamp a value into the range; NaN falls back to `min`
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Move `value` by `steps` increments, staying inside the range
    pub fn step_by(&self, value: f32, steps: i32) -> f32 {
        self.clamp(value + self.step * steps as f32)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Per-tick displacement and color parameters
///
/// Instances are immutable snapshots: controls publish a whole new value
/// through [`ParamStore`](super::ParamStore) instead of editing fields in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereParams {
    /// Rotation about the Y axis per tick (radians per frame)
    pub rotation_speed: f32,

    /// Maximum radial displacement (world units)
    pub displacement_amount: f32,

    /// Blend between spectrum (0) and pseudo-noise (1)
    pub noise_intensity: f32,

    /// Base sphere radius (world units)
    pub sphere_radius: f32,

    /// Hue multiplier applied to the spectrum average
    pub color_sensitivity: f32,
}

impl SphereParams {
    pub const ROTATION_SPEED: ParamRange = ParamRange {
        min: 0.0,
        max: 0.02,
        step: 0.001,
    };

    pub const DISPLACEMENT_AMOUNT: ParamRange = ParamRange {
        min: 0.0,
        max: 2.0,
        step: 0.1,
    };

    pub const NOISE_INTENSITY: ParamRange = ParamRange {
        min: 0.0,
        max: 1.0,
        step: 0.05,
    };

    /// Radius is unbounded above in principle; controls keep it to a sane window
    pub const SPHERE_RADIUS: ParamRange = ParamRange {
        min: 0.5,
        max: 5.0,
        step: 0.1,
    };

    pub const COLOR_SENSITIVITY: ParamRange = ParamRange {
        min: 0.1,
        max: 3.0,
        step: 0.1,
    };

    /// Copy with every field clamped into its declared range
    pub fn clamped(&self) -> Self {
        Self {
            rotation_speed: Self::ROTATION_SPEED.clamp(self.rotation_speed),
            displacement_amount: Self::DISPLACEMENT_AMOUNT.clamp(self.displacement_amount),
            noise_intensity: Self::NOISE_INTENSITY.clamp(self.noise_intensity),
            sphere_radius: Self::SPHERE_RADIUS.clamp(self.sphere_radius),
            color_sensitivity: Self::COLOR_SENSITIVITY.clamp(self.color_sensitivity),
        }
    }

    /// True when every field already sits inside its declared range
    pub fn in_range(&self) -> bool {
        Self::ROTATION_SPEED.contains(self.rotation_speed)
            && Self::DISPLACEMENT_AMOUNT.contains(self.displacement_amount)
            && Self::NOISE_INTENSITY.contains(self.noise_intensity)
            && Self::SPHERE_RADIUS.contains(self.sphere_radius)
            && Self::COLOR_SENSITIVITY.contains(self.color_sensitivity)
    }
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            rotation_speed: 0.005,
            displacement_amount: 0.5,
            noise_intensity: 0.2,
            sphere_radius: 2.0,
            color_sensitivity: 1.0,
        }
    }
}
