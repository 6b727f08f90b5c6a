//! Global surface hue from overall spectrum intensity.

use crate::audio::SpectrumSnapshot;

/// Hue of the sphere before any audio arrives (pure green)
pub const INITIAL_HUE_DEGREES: f32 = 120.0;

/// Hue in degrees for a spectrum average in [0, 1]
///
/// Wraps into [0, 360) for any sensitivity, never negative.
pub fn hue_for_average(average: f32, sensitivity: f32) -> f32 {
    let hue = (average * 360.0 * sensitivity).rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if hue.is_finite() && hue < 360.0 {
        hue
    } else {
        0.0
    }
}

/// Maps spectrum snapshots to a hue, holding the last value while audio is absent
#[derive(Debug, Clone)]
pub struct ColorMapper {
    last_hue: f32,
}

impl ColorMapper {
    pub fn new() -> Self {
        Self {
            last_hue: INITIAL_HUE_DEGREES,
        }
    }

    /// Hue for this tick
    ///
    /// Absent snapshot keeps the previous hue; otherwise
    /// `hue = (mean / 255 * 360 * sensitivity) mod 360`.
    pub fn compute_hue(&mut self, snapshot: Option<&SpectrumSnapshot>, sensitivity: f32) -> f32 {
        if let Some(snapshot) = snapshot {
            self.last_hue = hue_for_average(snapshot.average(), sensitivity);
        }
        self.last_hue
    }

    pub fn last_hue(&self) -> f32 {
        self.last_hue
    }
}

impl Default for ColorMapper {
    fn default() -> Self {
        Self::new()
    }
}

/// RGB (sRGB, 0..=1) of HSL(hue, 100%, 50%)
pub fn hue_to_rgb(hue_degrees: f32) -> [f32; 3] {
    let h = hue_degrees.rem_euclid(360.0) / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();

    match h as u32 {
        0 => [1.0, x, 0.0],
        1 => [x, 1.0, 0.0],
        2 => [0.0, 1.0, x],
        3 => [0.0, x, 1.0],
        4 => [x, 0.0, 1.0],
        _ => [1.0, 0.0, x],
    }
}

/// sRGB component to linear light
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wrap_around_example() {
        // average 0.9, sensitivity 2 => raw 648 => 288
        assert!((hue_for_average(0.9, 2.0) - 288.0).abs() < 1e-3);

        // mean(255, 204) / 255 = 0.9
        let snapshot = SpectrumSnapshot::from(vec![255, 204]);
        let mut mapper = ColorMapper::new();
        assert!((mapper.compute_hue(Some(&snapshot), 2.0) - 288.0).abs() < 1e-3);
    }

    #[test]
    fn test_absent_snapshot_is_sticky() {
        let mut mapper = ColorMapper::new();
        assert_eq!(mapper.compute_hue(None, 1.0), INITIAL_HUE_DEGREES);

        let snapshot = SpectrumSnapshot::from(vec![51; 8]);
        let hue = mapper.compute_hue(Some(&snapshot), 1.0);
        assert!((hue - 72.0).abs() < 1e-3);

        assert_eq!(mapper.compute_hue(None, 3.0), hue);
        assert_eq!(mapper.last_hue(), hue);
    }

    #[test]
    fn test_full_scale_wraps_to_zero() {
        // 1.0 * 360 * 1.0 = 360 => 0
        assert_eq!(hue_for_average(1.0, 1.0), 0.0);
    }

    #[test]
    fn test_hue_to_rgb_primaries() {
        assert_eq!(hue_to_rgb(0.0), [1.0, 0.0, 0.0]);
        assert_eq!(hue_to_rgb(120.0), [0.0, 1.0, 0.0]);
        assert_eq!(hue_to_rgb(240.0), [0.0, 0.0, 1.0]);

        let yellow = hue_to_rgb(60.0);
        assert!((yellow[0] - 1.0).abs() < 1e-6 && (yellow[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_srgb_to_linear_endpoints() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
        assert!((srgb_to_linear(0.5) - 0.214).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_hue_in_range(
            bins in prop::collection::vec(any::<u8>(), 0..300),
            sensitivity in 0.001f32..50.0,
        ) {
            let mut mapper = ColorMapper::new();
            let snapshot = SpectrumSnapshot::from(bins);
            let hue = mapper.compute_hue(Some(&snapshot), sensitivity);
            prop_assert!((0.0..360.0).contains(&hue));
        }

        #[test]
        fn prop_equal_snapshots_same_hue(
            bins in prop::collection::vec(any::<u8>(), 1..300),
            sensitivity in 0.1f32..3.0,
        ) {
            let a = SpectrumSnapshot::from(bins.clone());
            let b = SpectrumSnapshot::from(bins);
            prop_assert_eq!(
                ColorMapper::new().compute_hue(Some(&a), sensitivity),
                ColorMapper::new().compute_hue(Some(&b), sensitivity)
            );
        }
    }
}
