//! Parameter definitions with documented units and ranges.
//!
//! All tuned values live here:
//! - Declared ranges for every user-adjustable scalar
//! - Defaults for the initial slider positions
//! - Validation for configs that can be wrong at startup

mod audio;
mod render;
mod sphere;
mod store;

// Re-export all types
pub use audio::AnalyserConfig;
pub use render::{MeshConfig, RenderConfig};
pub use sphere::{ParamRange, SphereParams};
pub use store::{ParamStore, ParamSubscription};
