//! Process-wide counters for the packaged-call lifecycle.

use std::sync::atomic::{AtomicU64, Ordering};

static PACKAGED: AtomicU64 = AtomicU64::new(0);
static RELEASED: AtomicU64 = AtomicU64::new(0);
static SPAWNED: AtomicU64 = AtomicU64::new(0);
static JOINED: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallStats {
    /// Packaged calls ever built.
    pub packaged: u64,
    /// Packaged calls whose storage has been released.
    pub released: u64,
    /// Threads started for asynchronous calls.
    pub spawned: u64,
    /// Calls whose result has been collected.
    pub joined: u64,
}

impl CallStats {
    /// Packaged calls built but not yet released.
    pub fn live_packages(&self) -> u64 {
        self.packaged.saturating_sub(self.released)
    }

    /// Spawned calls not yet joined.
    pub fn outstanding(&self) -> u64 {
        self.spawned.saturating_sub(self.joined)
    }
}

pub fn snapshot() -> CallStats {
    // Released is read first so a concurrent release never makes
    // `released > packaged` in the snapshot.
    let released = RELEASED.load(Ordering::SeqCst);
    let joined = JOINED.load(Ordering::SeqCst);
    CallStats {
        packaged: PACKAGED.load(Ordering::SeqCst),
        released,
        spawned: SPAWNED.load(Ordering::SeqCst),
        joined,
    }
}

pub(crate) fn record_packaged() {
    PACKAGED.fetch_add(1, Ordering::SeqCst);
}

pub(crate) fn record_released() {
    RELEASED.fetch_add(1, Ordering::SeqCst);
}

pub(crate) fn record_spawned() {
    SPAWNED.fetch_add(1, Ordering::SeqCst);
}

pub(crate) fn record_joined() {
    JOINED.fetch_add(1, Ordering::SeqCst);
}
