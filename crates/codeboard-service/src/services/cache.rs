//! Listing cache
//!
//! Holds the shared (unpersonalized) list of active codes for a short TTL.
//! Posts and claims invalidate it. A generation counter stops a fetch that
//! started before an invalidation from storing its stale result.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use codeboard_core::entities::Code;

#[derive(Debug)]
struct Slot {
    generation: u64,
    cached: Option<(Instant, Arc<Vec<Code>>)>,
}

/// Short-lived cache of the active code list
#[derive(Debug)]
pub struct ListCache {
    ttl: Duration,
    slot: RwLock<Slot>,
}

impl ListCache {
    /// A zero `ttl` disables caching
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(Slot {
                generation: 0,
                cached: None,
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// The cached list if it is still fresh
    pub fn get(&self) -> Option<Arc<Vec<Code>>> {
        if !self.is_enabled() {
            return None;
        }
        let slot = self.slot.read();
        slot.cached
            .as_ref()
            .filter(|(at, _)| at.elapsed() < self.ttl)
            .map(|(_, codes)| Arc::clone(codes))
    }

    /// Token to pass to [`ListCache::store`] after fetching
    pub fn generation(&self) -> u64 {
        self.slot.read().generation
    }

    /// Cache `codes` unless the cache was invalidated since `generation`
    pub fn store(&self, generation: u64, codes: Vec<Code>) -> Arc<Vec<Code>> {
        let codes = Arc::new(codes);
        if self.is_enabled() {
            let mut slot = self.slot.write();
            if slot.generation == generation {
                slot.cached = Some((Instant::now(), Arc::clone(&codes)));
            }
        }
        codes
    }

    pub fn invalidate(&self) {
        let mut slot = self.slot.write();
        slot.generation = slot.generation.wrapping_add(1);
        slot.cached = None;
    }
}

impl Default for ListCache {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000))
    }
}
