//! Process-wide memo table of generator matrices keyed by `(k, m)`

use super::matrix::GeneratorMatrix;
use crate::coding::traits::Result;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::trace;

static GENERATORS: Lazy<MatrixCache> = Lazy::new(MatrixCache::new);

/// Shared generator for `(k, m)`, built on first use
pub fn generator(data_shards: usize, parity_shards: usize) -> Result<Arc<GeneratorMatrix>> {
    GENERATORS.get_or_build(data_shards, parity_shards)
}

/// Thread-safe memo table of generator matrices.
///
/// Only fully built matrices are published. Two threads racing on the same
/// first-time key may both build; the first insert wins and both callers get
/// the same `Arc`.
#[derive(Debug, Default)]
pub struct MatrixCache {
    matrices: DashMap<(usize, usize), Arc<GeneratorMatrix>>,
}

impl MatrixCache {
    /// Empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up or build the generator for `(k, m)`
    pub fn get_or_build(
        &self,
        data_shards: usize,
        parity_shards: usize,
    ) -> Result<Arc<GeneratorMatrix>> {
        let key = (data_shards, parity_shards);
        if let Some(found) = self.matrices.get(&key) {
            trace!(k = data_shards, m = parity_shards, "generator cache hit");
            return Ok(Arc::clone(found.value()));
        }

        // Build outside the map lock; construction may take a while for large k.
        let built = Arc::new(GeneratorMatrix::new(data_shards, parity_shards)?);
        let entry = self.matrices.entry(key).or_insert(built);
        Ok(Arc::clone(entry.value()))
    }

    /// Number of cached matrices
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    /// Whether nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }
}
