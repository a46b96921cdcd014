//! Minimal resource governor.
//!
//! spec.md treats the resource governor as an external collaborator (bounded
//! counters with acquire/release back-pressure), but the cache cannot choose
//! between tiers without one, so this module carries a first-party
//! implementation: one atomic counter per resource, checked against the
//! ceilings in [`crate::config::CacheConfig`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// The seven resources the cache negotiates for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Reserved pixel area (`columns*rows`) across every open cache.
    Area,
    /// Anonymous/heap memory tier bytes.
    Memory,
    /// File-mapped tier bytes.
    Map,
    /// Disk tier bytes.
    Disk,
    /// Open disk file descriptors.
    File,
    /// Worker threads.
    Thread,
}

impl Resource {
    fn label(self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::Memory => "memory",
            Self::Map => "map",
            Self::Disk => "disk",
            Self::File => "file",
            Self::Thread => "thread",
        }
    }
}

/// Bounded counters for the seven resource kinds, plus the process-start
/// instant used for wall-time throttling.
#[derive(Debug)]
pub struct ResourceGovernor {
    area_limit: u64,
    memory_limit: u64,
    map_limit: u64,
    disk_limit: u64,
    file_limit: u64,
    thread_limit: u64,
    time_limit: Option<std::time::Duration>,

    area_used: AtomicU64,
    memory_used: AtomicU64,
    map_used: AtomicU64,
    disk_used: AtomicU64,
    file_used: AtomicU64,
    thread_used: AtomicU64,

    started_at: Instant,
}

/// An acquired reservation. Releases the corresponding counter on drop,
/// mirroring the paired acquire/release the spec requires on every exit path.
///
/// Owns an `Arc` to the governor rather than borrowing it so a guard can be
/// stored inside a [`crate::tier::StorageTier`] for the lifetime of the
/// backing it protects, not just for one call stack.
#[must_use = "dropping a guard immediately releases the reservation"]
pub struct ResourceGuard {
    governor: Arc<ResourceGovernor>,
    resource: Resource,
    amount: u64,
    released: bool,
}

impl ResourceGuard {
    /// Releases the reservation early (idempotent; `Drop` no-ops afterward).
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if self.released {
            return;
        }
        self.governor.counter(self.resource).fetch_sub(self.amount, Ordering::AcqRel);
        self.released = true;
    }
}

impl Drop for ResourceGuard {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl ResourceGovernor {
    /// Builds a governor from resolved [`crate::config::CacheConfig`] limits.
    pub fn new(config: &crate::config::CacheConfig) -> Self {
        Self {
            area_limit: config.area_limit,
            memory_limit: config.memory_limit,
            map_limit: config.map_limit,
            disk_limit: config.disk_limit,
            file_limit: config.file_limit,
            thread_limit: config.thread_limit,
            time_limit: config.time_limit,
            area_used: AtomicU64::new(0),
            memory_used: AtomicU64::new(0),
            map_used: AtomicU64::new(0),
            disk_used: AtomicU64::new(0),
            file_used: AtomicU64::new(0),
            thread_used: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    fn counter(&self, resource: Resource) -> &AtomicU64 {
        match resource {
            Resource::Area => &self.area_used,
            Resource::Memory => &self.memory_used,
            Resource::Map => &self.map_used,
            Resource::Disk => &self.disk_used,
            Resource::File => &self.file_used,
            Resource::Thread => &self.thread_used,
        }
    }

    fn limit(&self, resource: Resource) -> u64 {
        match resource {
            Resource::Area => self.area_limit,
            Resource::Memory => self.memory_limit,
            Resource::Map => self.map_limit,
            Resource::Disk => self.disk_limit,
            Resource::File => self.file_limit,
            Resource::Thread => self.thread_limit,
        }
    }

    /// Attempts to reserve `amount` units of `resource`. Returns `None` if
    /// the ceiling would be exceeded; otherwise returns a guard that releases
    /// the reservation on drop. Takes `self` behind an `Arc` so the guard can
    /// outlive the call that created it.
    pub fn acquire(self: &Arc<Self>, resource: Resource, amount: u64) -> Option<ResourceGuard> {
        let limit = self.limit(resource);
        let counter = self.counter(resource);
        let mut current = counter.load(Ordering::Acquire);
        loop {
            let next = current.checked_add(amount)?;
            if next > limit {
                return None;
            }
            match counter.compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire) {
                Ok(_) => {
                    return Some(ResourceGuard {
                        governor: Arc::clone(self),
                        resource,
                        amount,
                        released: false,
                    })
                }
                Err(observed) => current = observed,
            }
        }
    }

    /// Current usage of a resource, for diagnostics and the file-descriptor guard.
    pub fn used(&self, resource: Resource) -> u64 {
        self.counter(resource).load(Ordering::Acquire)
    }

    /// `true` when `resource` usage is at or above its configured ceiling.
    pub fn is_over_limit(&self, resource: Resource) -> bool {
        self.used(resource) >= self.limit(resource)
    }

    /// Checks the wall-clock ceiling against the governor's start time,
    /// returning a [`crate::error::Error::TimeLimitExceeded`] when exceeded.
    pub fn check_time_limit(&self) -> crate::error::Result<()> {
        if let Some(limit) = self.time_limit {
            let elapsed = self.started_at.elapsed();
            if elapsed > limit {
                return Err(crate::error::Error::TimeLimitExceeded {
                    elapsed_secs: elapsed.as_secs(),
                    limit_secs: limit.as_secs(),
                });
            }
        }
        Ok(())
    }
}

/// Converts an exhausted [`Resource`] acquisition into a structured error.
pub fn exhausted(resource: Resource, path: impl Into<String>) -> crate::error::Error {
    crate::error::Error::resources_exhausted(resource.label(), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;

    fn governor_with(memory_limit: u64) -> Arc<ResourceGovernor> {
        let mut config = CacheConfig::default();
        config.memory_limit = memory_limit;
        Arc::new(ResourceGovernor::new(&config))
    }

    #[test]
    fn acquire_then_release_frees_the_counter() {
        let gov = governor_with(1024);
        {
            let guard = gov.acquire(Resource::Memory, 512).expect("should admit");
            assert_eq!(gov.used(Resource::Memory), 512);
            guard.release();
        }
        assert_eq!(gov.used(Resource::Memory), 0);
    }

    #[test]
    fn acquire_denies_past_the_ceiling() {
        let gov = governor_with(100);
        let _first = gov.acquire(Resource::Memory, 80).unwrap();
        assert!(gov.acquire(Resource::Memory, 21).is_none());
        assert!(gov.acquire(Resource::Memory, 20).is_some());
    }

    #[test]
    fn drop_releases_without_explicit_call() {
        let gov = governor_with(64);
        {
            let _guard = gov.acquire(Resource::Disk, 64).unwrap();
            assert!(gov.is_over_limit(Resource::Disk));
        }
        assert_eq!(gov.used(Resource::Disk), 0);
    }

    #[test]
    fn zero_limit_forces_tier_fallback() {
        let gov = governor_with(0);
        assert!(gov.acquire(Resource::Memory, 1).is_none());
    }
}
