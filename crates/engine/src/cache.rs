//! Per-engine compilation caches.
//!
//! Entries are created once per selector string (or part source) and live
//! as long as the engine; nothing is ever invalidated.

use crate::engine::CompiledSelector;
use crate::native::NativePlan;
use crate::strategy::CompiledPart;
use core::sync::atomic::{AtomicUsize, Ordering};
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;

type Store<V> = DashMap<String, Arc<V>, FxBuildHasher>;

/// Snapshot of cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub interpreted_hits: usize,
    pub interpreted_misses: usize,
    pub interpreted_entries: usize,
    pub native_entries: usize,
    pub part_entries: usize,
}

#[derive(Debug, Default)]
pub struct QueryCache {
    /// Selector string -> text for the host's matcher. Only compatible
    /// selectors get an entry.
    native: Store<NativePlan>,
    /// Selector string -> compiled groups.
    interpreted: Store<CompiledSelector>,
    /// Part `raw` -> compiled part.
    parts: Store<CompiledPart>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

fn get_or_insert_with<V>(store: &Store<V>, key: &str, build: impl FnOnce() -> V) -> (Arc<V>, bool) {
    if let Some(entry) = store.get(key) {
        return (Arc::clone(entry.value()), true);
    }
    let built = Arc::new(build());
    let entry = store.entry(key.to_owned()).or_insert(built);
    (Arc::clone(entry.value()), false)
}

impl QueryCache {
    pub fn interpreted_or_insert_with(
        &self,
        selector: &str,
        build: impl FnOnce() -> CompiledSelector,
    ) -> Arc<CompiledSelector> {
        let (compiled, hit) = get_or_insert_with(&self.interpreted, selector, build);
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
            log::trace!(target: "query_engine", "interpreted cache hit for `{selector}`");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        compiled
    }

    pub fn native_or_insert_with(
        &self,
        selector: &str,
        build: impl FnOnce() -> NativePlan,
    ) -> Arc<NativePlan> {
        get_or_insert_with(&self.native, selector, build).0
    }

    pub fn part_or_insert_with(
        &self,
        raw: &str,
        build: impl FnOnce() -> CompiledPart,
    ) -> Arc<CompiledPart> {
        get_or_insert_with(&self.parts, raw, build).0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            interpreted_hits: self.hits.load(Ordering::Relaxed),
            interpreted_misses: self.misses.load(Ordering::Relaxed),
            interpreted_entries: self.interpreted.len(),
            native_entries: self.native.len(),
            part_entries: self.parts.len(),
        }
    }
}
