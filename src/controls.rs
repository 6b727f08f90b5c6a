//! Keyboard parameter surface.

use std::sync::Arc;
use winit::keyboard::KeyCode;

use crate::params::{ParamRange, ParamStore, SphereParams};

/// One adjustable sphere parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamControl {
    RotationSpeed,
    DisplacementAmount,
    NoiseIntensity,
    SphereRadius,
    ColorSensitivity,
}

impl ParamControl {
    pub fn range(self) -> ParamRange {
        match self {
            ParamControl::RotationSpeed => SphereParams::ROTATION_SPEED,
            ParamControl::DisplacementAmount => SphereParams::DISPLACEMENT_AMOUNT,
            ParamControl::NoiseIntensity => SphereParams::NOISE_INTENSITY,
            ParamControl::SphereRadius => SphereParams::SPHERE_RADIUS,
            ParamControl::ColorSensitivity => SphereParams::COLOR_SENSITIVITY,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ParamControl::RotationSpeed => "rotation speed",
            ParamControl::DisplacementAmount => "displacement",
            ParamControl::NoiseIntensity => "noise intensity",
            ParamControl::SphereRadius => "sphere radius",
            ParamControl::ColorSensitivity => "color sensitivity",
        }
    }

    pub fn get(self, params: &SphereParams) -> f32 {
        match self {
            ParamControl::RotationSpeed => params.rotation_speed,
            ParamControl::DisplacementAmount => params.displacement_amount,
            ParamControl::NoiseIntensity => params.noise_intensity,
            ParamControl::SphereRadius => params.sphere_radius,
            ParamControl::ColorSensitivity => params.color_sensitivity,
        }
    }

    /// Copy of `params` with this control set to `value`
    pub fn with_value(self, params: &SphereParams, value: f32) -> SphereParams {
        let mut next = *params;
        match self {
            ParamControl::RotationSpeed => next.rotation_speed = value,
            ParamControl::DisplacementAmount => next.displacement_amount = value,
            ParamControl::NoiseIntensity => next.noise_intensity = value,
            ParamControl::SphereRadius => next.sphere_radius = value,
            ParamControl::ColorSensitivity => next.color_sensitivity = value,
        }
        next
    }
}

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// Move a parameter by a number of steps
    Adjust(ParamControl, i32),
    TogglePause,
    PrintParams,
    Quit,
}

/// Key bindings: Q/A, W/S, E/D, R/F, T/G raise/lower, Space pauses, P prints, Esc quits
pub fn action_for_key(key: KeyCode) -> Option<ControlAction> {
    use ControlAction::*;
    use ParamControl::*;

    let action = match key {
        KeyCode::KeyQ => Adjust(RotationSpeed, 1),
        KeyCode::KeyA => Adjust(RotationSpeed, -1),
        KeyCode::KeyW => Adjust(DisplacementAmount, 1),
        KeyCode::KeyS => Adjust(DisplacementAmount, -1),
        KeyCode::KeyE => Adjust(NoiseIntensity, 1),
        KeyCode::KeyD => Adjust(NoiseIntensity, -1),
        KeyCode::KeyR => Adjust(SphereRadius, 1),
        KeyCode::KeyF => Adjust(SphereRadius, -1),
        KeyCode::KeyT => Adjust(ColorSensitivity, 1),
        KeyCode::KeyG => Adjust(ColorSensitivity, -1),
        KeyCode::Space => TogglePause,
        KeyCode::KeyP => PrintParams,
        KeyCode::Escape => Quit,
        _ => return None,
    };
    Some(action)
}

/// Step one parameter and publish the resulting snapshot
pub fn adjust(store: &ParamStore, control: ParamControl, steps: i32) -> Arc<SphereParams> {
    let range = control.range();
    let next = store.update(|current| {
        control.with_value(current, range.step_by(control.get(current), steps))
    });
    log::info!("{} = {:.3}", control.label(), control.get(&next));
    next
}

/// Multi-line summary for the P key
pub fn describe(params: &SphereParams) -> String {
    format!(
        "rotation speed    {:.3}\n\
         displacement      {:.2}\n\
         noise intensity   {:.2}\n\
         sphere radius     {:.2}\n\
         color sensitivity {:.2}",
        params.rotation_speed,
        params.displacement_amount,
        params.noise_intensity,
        params.sphere_radius,
        params.color_sensitivity
    )
}

/// Controls help printed at startup
pub const HELP: &str = "Controls:
  Q / A   rotation speed + / -
  W / S   displacement + / -
  E / D   noise intensity + / -
  R / F   sphere radius + / -
  T / G   color sensitivity + / -
  SPACE   pause / resume audio
  P       print parameters
  ESC     quit
  Drop a .wav file on the window to play it";
