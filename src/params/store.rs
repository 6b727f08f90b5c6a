//! Atomically replaced parameter snapshots shared between controls and the frame loop.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

use super::SphereParams;

struct Shared {
    current: ArcSwap<SphereParams>,
    /// Bumped on every publish
    version: AtomicU64,
    subscribers: AtomicUsize,
}

/// Writer side of the parameter surface
///
/// Every change publishes a complete, clamped [`SphereParams`] snapshot, so a
/// reader sees either the old or the new set and never a partial update.
#[derive(Clone)]
pub struct ParamStore {
    shared: Arc<Shared>,
}

impl ParamStore {
    pub fn new(initial: SphereParams) -> Self {
        Self {
            shared: Arc::new(Shared {
                current: ArcSwap::from_pointee(initial.clamped()),
                version: AtomicU64::new(0),
                subscribers: AtomicUsize::new(0),
            }),
        }
    }

    /// Current snapshot
    pub fn load(&self) -> Arc<SphereParams> {
        self.shared.current.load_full()
    }

    /// Replace the whole snapshot (clamped to declared ranges)
    pub fn publish(&self, params: SphereParams) {
        if !params.in_range() {
            log::debug!("Clamping out-of-range params: {:?}", params);
        }
        let params = params.clamped();
        self.shared.current.store(Arc::new(params));
        self.shared.version.fetch_add(1, Ordering::Release);
        log::debug!("Params updated: {:?}", params);
    }

    /// Derive a new snapshot from the current one and publish it
    pub fn update(&self, f: impl Fn(&SphereParams) -> SphereParams) -> Arc<SphereParams> {
        let previous = self
            .shared
            .current
            .rcu(|current| Arc::new(f(current.as_ref()).clamped()));
        self.shared.version.fetch_add(1, Ordering::Release);
        let next = self.load();
        log::debug!("Params updated: {:?} -> {:?}", *previous, *next);
        next
    }

    /// Attach a reader; dropping the subscription detaches it
    pub fn subscribe(&self) -> ParamSubscription {
        self.shared.subscribers.fetch_add(1, Ordering::AcqRel);
        ParamSubscription {
            shared: Arc::clone(&self.shared),
            seen_version: self.shared.version.load(Ordering::Acquire),
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.load(Ordering::Acquire)
    }
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new(SphereParams::default())
    }
}

/// Reader side of the parameter surface, held by the frame loop
pub struct ParamSubscription {
    shared: Arc<Shared>,
    seen_version: u64,
}

impl ParamSubscription {
    /// Snapshot to use for the whole tick
    pub fn load(&self) -> Arc<SphereParams> {
        self.shared.current.load_full()
    }

    /// True once per batch of publishes since the last call
    pub fn take_changed(&mut self) -> bool {
        let version = self.shared.version.load(Ordering::Acquire);
        let changed = version != self.seen_version;
        self.seen_version = version;
        changed
    }
}

impl Drop for ParamSubscription {
    fn drop(&mut self) {
        self.shared.subscribers.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_clamps_and_replaces() {
        let store = ParamStore::default();
        let sub = store.subscribe();

        store.publish(SphereParams {
            noise_intensity: 4.0,
            ..SphereParams::default()
        });

        assert_eq!(sub.load().noise_intensity, 1.0);
    }

    #[test]
    fn test_update_derives_from_current() {
        let store = ParamStore::default();
        let next = store.update(|p| SphereParams {
            sphere_radius: p.sphere_radius + 1.0,
            ..*p
        });
        assert!((next.sphere_radius - 3.0).abs() < 1e-6);
        assert!((store.load().sphere_radius - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_subscription_tracks_changes_and_detaches() {
        let store = ParamStore::default();
        let mut sub = store.subscribe();
        assert_eq!(store.subscriber_count(), 1);
        assert!(!sub.take_changed());

        store.publish(SphereParams::default());
        assert!(sub.take_changed());
        assert!(!sub.take_changed());

        drop(sub);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_old_snapshot_survives_replacement() {
        let store = ParamStore::default();
        let before = store.load();
        store.publish(SphereParams {
            sphere_radius: 4.0,
            ..SphereParams::default()
        });
        assert_eq!(before.sphere_radius, 2.0);
        assert_eq!(store.load().sphere_radius, 4.0);
    }
}
