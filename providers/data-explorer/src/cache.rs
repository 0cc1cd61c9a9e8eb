//! In-process memoization of extremes queries
//!
//! Extremes views are pure functions of (dataset, request), so a cached
//! table is always identical to a fresh computation. Entries never expire;
//! the datasets they derive from are loaded once per explorer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use frame_common::ExtremesRequest;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::explorer::Dataset;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    dataset: Dataset,
    request: ExtremesRequest,
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Debug, Default)]
pub struct ExtremesCache {
    entries: DashMap<CacheKey, Arc<DataFrame>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ExtremesCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `(dataset, request)`, computing it on a miss.
    ///
    /// `compute` runs outside the map lock. When two callers miss on the same
    /// key concurrently the first insert wins and both get the same table.
    pub fn get_or_compute<E>(
        &self,
        dataset: Dataset,
        request: &ExtremesRequest,
        compute: impl FnOnce() -> Result<DataFrame, E>,
    ) -> Result<Arc<DataFrame>, E> {
        let key = CacheKey {
            dataset,
            request: request.clone(),
        };

        if let Some(hit) = self.entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Cache HIT for {:?} {:?}", dataset, request);
            return Ok(Arc::clone(hit.value()));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("Cache MISS for {:?} {:?}", dataset, request);
        let table = Arc::new(compute()?);
        let entry = self.entries.entry(key).or_insert(table);
        Ok(Arc::clone(entry.value()))
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }

    /// Drop every entry belonging to `dataset`.
    pub fn invalidate(&self, dataset: Dataset) {
        self.entries.retain(|key, _| key.dataset != dataset);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
