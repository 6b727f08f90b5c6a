//! Per-frame orchestration: rotation, displacement, hue and publication to the renderer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::audio::{AnalysisSession, SpectrumSource};
use crate::error::{MeshError, RenderError};
use crate::params::{MeshConfig, ParamSubscription, SphereParams};
use crate::sphere::{BaseMesh, ColorMapper, DisplacedVertexSet, DisplacementEngine};

/// Cumulative rotation about the Y axis (radians)
///
/// Advanced once per tick, never wrapped; reset only by building a new driver.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationState {
    angle: f64,
}

impl RotationState {
    pub fn advance(&mut self, speed: f32) {
        self.angle += speed as f64;
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub vertices: DisplacedVertexSet,
    pub hue_degrees: f32,
    pub rotation: f64,
}

/// Consumer of finished frames (GPU renderer, or a recorder in tests)
pub trait RenderSink {
    fn present(&mut self, frame: &FrameOutput) -> Result<(), RenderError>;
}

/// One tick of the pipeline: rotation, spectrum pull, displacement and hue
pub struct FrameDriver {
    engine: DisplacementEngine,
    colors: ColorMapper,
    rotation: RotationState,
}

impl FrameDriver {
    /// Create driver with a base mesh at the configured radius
    pub fn new(params: &SphereParams, mesh: MeshConfig) -> Result<Self, MeshError> {
        Ok(Self::with_engine(DisplacementEngine::new(
            params.sphere_radius,
            mesh,
        )?))
    }

    pub fn with_engine(engine: DisplacementEngine) -> Self {
        Self {
            engine,
            colors: ColorMapper::new(),
            rotation: RotationState::default(),
        }
    }

    pub fn base_mesh(&self) -> &Arc<BaseMesh> {
        self.engine.base()
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    /// Run one tick against the given parameter snapshot
    ///
    /// Without a spectrum the sphere still rotates; vertices stay at their
    /// base positions and the hue holds its last value.
    pub fn tick(
        &mut self,
        params: &SphereParams,
        source: &SpectrumSource,
        clock_s: f64,
    ) -> FrameOutput {
        self.rotation.advance(params.rotation_speed);

        let snapshot = source.current_snapshot();

        let vertices = self.engine.displace(snapshot.as_ref(), clock_s, params);
        let hue_degrees = self
            .colors
            .compute_hue(snapshot.as_ref(), params.color_sensitivity);

        FrameOutput {
            vertices,
            hue_degrees,
            rotation: self.rotation.angle(),
        }
    }
}

/// Cancellation flag shared between the loop and whoever may stop it
#[derive(Debug, Clone, Default)]
pub struct LoopToken {
    cancelled: Arc<AtomicBool>,
}

impl LoopToken {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Whether the host should schedule another tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Next,
    Stop,
}

/// Self-scheduling animation loop
///
/// Owns the driver, the spectrum source and the parameter subscription.
/// The host calls [`FrameLoop::tick`] from its redraw callback and requests
/// another redraw while it returns [`Schedule::Next`].
pub struct FrameLoop {
    driver: FrameDriver,
    source: SpectrumSource,
    params: Option<ParamSubscription>,
    token: LoopToken,
    frames: u64,
}

impl FrameLoop {
    pub fn new(driver: FrameDriver, source: SpectrumSource, params: ParamSubscription) -> Self {
        Self {
            driver,
            source,
            params: Some(params),
            token: LoopToken::default(),
            frames: 0,
        }
    }

    /// Token that stops the loop when cancelled
    pub fn token(&self) -> LoopToken {
        self.token.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled() && self.params.is_some()
    }

    pub fn driver(&self) -> &FrameDriver {
        &self.driver
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn has_audio(&self) -> bool {
        self.source.has_session()
    }

    /// Swap in a new analysis session (previous one is closed first)
    pub fn load_session(&mut self, session: Box<dyn AnalysisSession>) {
        if self.is_running() {
            self.source.replace(session);
        }
    }

    /// Pause or resume the playing track; `None` without audio
    pub fn toggle_pause(&mut self) -> Option<bool> {
        if !self.is_running() {
            return None;
        }
        self.source.toggle_pause()
    }

    /// Run one tick and publish it to `sink`
    pub fn tick(&mut self, clock_s: f64, sink: &mut dyn RenderSink) -> Schedule {
        if self.token.is_cancelled() {
            self.teardown();
            return Schedule::Stop;
        }
        let Some(subscription) = self.params.as_mut() else {
            return Schedule::Stop;
        };

        if subscription.take_changed() {
            log::debug!("Frame {}: picked up new parameters", self.frames);
        }
        // One snapshot for the whole tick
        let params = subscription.load();

        let frame = self.driver.tick(&params, &self.source, clock_s);
        if let Err(e) = sink.present(&frame) {
            log::warn!("Render error: {}", e);
        }
        self.frames += 1;

        Schedule::Next
    }

    /// Stop scheduling, close the audio session and detach from parameters
    ///
    /// Safe to call any number of times; the session is closed once.
    pub fn teardown(&mut self) {
        self.token.cancel();
        self.source.close();
        if self.params.take().is_some() {
            log::info!("Frame loop stopped after {} frames", self.frames);
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Seconds since the Unix epoch (noise clock)
pub fn wall_clock_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
