//! Shard execution and top-N merging.
//!
//! One shard algorithm serves both execution modes: parallel fans the
//! shards out over the rayon pool, sequential drives them one at a time
//! on the calling thread. Merging imposes the canonical order after all
//! shards complete, so results never depend on completion order and the
//! two modes are equivalent by construction. A failed shard fails the
//! whole request; no partial ranking is ever returned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{QueryError, QueryResult};
use crate::request::ExecMode;

/// Cooperative cancellation handle shared between a request and its
/// shard workers. Workers observe it between shards, not mid-shard.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn check(&self) -> QueryResult<()> {
        if self.is_cancelled() {
            Err(QueryError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Run one closure per shard, returning per-shard outputs in shard
/// order regardless of completion order.
pub fn run_shards<S, T, F>(
    mode: ExecMode,
    shards: Vec<S>,
    cancel: &CancelToken,
    f: F,
) -> QueryResult<Vec<T>>
where
    S: Send,
    T: Send,
    F: Fn(S) -> QueryResult<T> + Sync + Send,
{
    cancel.check()?;
    match mode {
        ExecMode::Parallel => shards
            .into_par_iter()
            .map(|shard| {
                cancel.check()?;
                f(shard)
            })
            .collect(),
        ExecMode::Sequential => shards
            .into_iter()
            .map(|shard| {
                cancel.check()?;
                f(shard)
            })
            .collect(),
    }
}

/// Merge shard-local top-N lists into a global top-N using the same
/// ordering rule the shards used: ascending key, then ascending row id
/// as the stable tie-break.
pub fn merge_top_n<T, K>(shard_lists: Vec<Vec<T>>, n: usize, key: K) -> Vec<T>
where
    K: Fn(&T) -> (f64, usize),
{
    let mut merged: Vec<T> = shard_lists.into_iter().flatten().collect();
    merged.sort_by(|a, b| {
        let (ka, ra) = key(a);
        let (kb, rb) = key(b);
        ka.total_cmp(&kb).then(ra.cmp(&rb))
    });
    merged.truncate(n);
    merged
}
