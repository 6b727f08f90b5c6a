//! Audio decoding, playback and spectrum analysis.
//!
//! A session decodes a WAV file, plays it through cpal and runs a
//! background FFT whose byte spectrum drives the sphere.

mod analyser;
mod decode;
mod session;
mod spectrum;

// Re-export public types
pub use analyser::{blackman_window, SpectrumAnalyser};
pub use decode::DecodedTrack;
pub use session::AudioSession;
pub use spectrum::{AnalysisSession, SpectrumSnapshot, SpectrumSource};
