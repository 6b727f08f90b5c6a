//! Spectrum snapshots and the source the frame loop pulls them from.

use std::sync::Arc;

/// One read of the byte frequency spectrum (0..=255 per bin)
///
/// Cheap to clone: the bins are shared behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectrumSnapshot {
    bins: Arc<[u8]>,
}

impl SpectrumSnapshot {
    pub fn new(bins: impl Into<Arc<[u8]>>) -> Self {
        Self { bins: bins.into() }
    }

    pub fn bins(&self) -> &[u8] {
        &self.bins
    }

    /// Number of bins (B)
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Normalized magnitude of `bin` in [0, 1]; missing bins read as 0
    pub fn magnitude(&self, bin: usize) -> f32 {
        self.bins.get(bin).map_or(0.0, |&m| m as f32 / 255.0)
    }

    /// Mean magnitude normalized to [0, 1]; an empty snapshot averages 0
    pub fn average(&self) -> f32 {
        if self.bins.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.bins.iter().map(|&m| m as u64).sum();
        (sum as f64 / self.bins.len() as f64 / 255.0) as f32
    }
}

impl From<Vec<u8>> for SpectrumSnapshot {
    fn from(bins: Vec<u8>) -> Self {
        Self::new(bins)
    }
}

/// An active audio-analysis session
///
/// `snapshot` must return immediately with cached data (or `None`), and must
/// return `None` once the session is closed. `close` is idempotent.
pub trait AnalysisSession {
    fn snapshot(&self) -> Option<SpectrumSnapshot>;

    fn close(&mut self);

    fn is_closed(&self) -> bool;

    /// Pause or resume playback; sessions without transport ignore it
    fn set_paused(&mut self, _paused: bool) {}

    fn is_paused(&self) -> bool {
        false
    }
}

/// Source of per-tick spectrum snapshots
///
/// Holds at most one analysis session; loading a new one closes the old one.
#[derive(Default)]
pub struct SpectrumSource {
    session: Option<Box<dyn AnalysisSession>>,
}

impl SpectrumSource {
    /// Source with no session attached (every snapshot is absent)
    pub fn new() -> Self {
        Self { session: None }
    }

    pub fn with_session(session: Box<dyn AnalysisSession>) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// Current snapshot, or `None` without an active session
    pub fn current_snapshot(&self) -> Option<SpectrumSnapshot> {
        self.session.as_ref()?.snapshot()
    }

    /// Replace the active session, closing the previous one first
    pub fn replace(&mut self, session: Box<dyn AnalysisSession>) {
        self.close();
        self.session = Some(session);
    }

    /// Close and release the active session
    pub fn close(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.close();
            log::info!("Audio session closed");
        }
    }

    /// Flip pause on the active session; returns the new state
    pub fn toggle_pause(&mut self) -> Option<bool> {
        let session = self.session.as_mut().filter(|s| !s.is_closed())?;
        let paused = !session.is_paused();
        session.set_paused(paused);
        Some(session.is_paused())
    }

    pub fn has_session(&self) -> bool {
        self.session.as_ref().is_some_and(|s| !s.is_closed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FixedSession {
        snapshot: SpectrumSnapshot,
        closed: bool,
        close_calls: Rc<Cell<usize>>,
    }

    impl AnalysisSession for FixedSession {
        fn snapshot(&self) -> Option<SpectrumSnapshot> {
            (!self.closed).then(|| self.snapshot.clone())
        }

        fn close(&mut self) {
            if !self.closed {
                self.closed = true;
                self.close_calls.set(self.close_calls.get() + 1);
            }
        }

        fn is_closed(&self) -> bool {
            self.closed
        }
    }

    fn fixed(bins: Vec<u8>, close_calls: &Rc<Cell<usize>>) -> Box<dyn AnalysisSession> {
        Box::new(FixedSession {
            snapshot: bins.into(),
            closed: false,
            close_calls: Rc::clone(close_calls),
        })
    }

    #[test]
    fn test_magnitude_and_average() {
        let snapshot = SpectrumSnapshot::from(vec![255, 0, 255, 0]);
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.magnitude(0), 1.0);
        assert_eq!(snapshot.magnitude(1), 0.0);
        assert_eq!(snapshot.magnitude(99), 0.0);
        assert!((snapshot.average() - 0.5).abs() < 1e-6);
        assert_eq!(SpectrumSnapshot::from(vec![]).average(), 0.0);
    }

    #[test]
    fn test_source_without_session_is_absent() {
        let source = SpectrumSource::new();
        assert!(source.current_snapshot().is_none());
        assert!(!source.has_session());
    }

    #[test]
    fn test_replace_closes_previous_session() {
        let calls = Rc::new(Cell::new(0));
        let mut source = SpectrumSource::with_session(fixed(vec![1, 2], &calls));
        assert_eq!(source.current_snapshot().map(|s| s.len()), Some(2));

        source.replace(fixed(vec![1, 2, 3], &calls));
        assert_eq!(calls.get(), 1);
        assert_eq!(source.current_snapshot().map(|s| s.len()), Some(3));

        source.close();
        source.close();
        assert_eq!(calls.get(), 2);
        assert!(source.current_snapshot().is_none());
    }

    struct PausableSession {
        paused: bool,
        closed: bool,
    }

    impl AnalysisSession for PausableSession {
        fn snapshot(&self) -> Option<SpectrumSnapshot> {
            None
        }
        fn close(&mut self) {
            self.closed = true;
        }
        fn is_closed(&self) -> bool {
            self.closed
        }
        fn set_paused(&mut self, paused: bool) {
            self.paused = paused;
        }
        fn is_paused(&self) -> bool {
            self.paused
        }
    }

    #[test]
    fn test_toggle_pause() {
        let mut source = SpectrumSource::new();
        assert_eq!(source.toggle_pause(), None);

        source.replace(Box::new(PausableSession {
            paused: false,
            closed: false,
        }));
        assert_eq!(source.toggle_pause(), Some(true));
        assert_eq!(source.toggle_pause(), Some(false));

        // Sessions without transport stay playing
        let calls = Rc::new(Cell::new(0));
        source.replace(fixed(vec![1], &calls));
        assert_eq!(source.toggle_pause(), Some(false));
    }
}
