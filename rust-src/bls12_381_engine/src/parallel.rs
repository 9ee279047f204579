//! Execution context for the operations that split their input into shards
//! and process the shards on a worker pool.
//!
//! The context is passed explicitly to every parallel operation. Shard
//! boundaries are fixed by the caller and never depend on the number of
//! threads, and results are combined in shard order, so the output of an
//! operation is the same for every pool size.
use log::{debug, trace, warn};
use rayon::prelude::*;
use std::ops::Range;
use thiserror::Error;

/// Environment variable read by [ExecutionContext::from_env].
pub const NUM_THREADS_ENV: &str = "BLS_ENGINE_NUM_THREADS";

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("The number of worker threads must be positive.")]
    ZeroThreads,
    #[error("Could not build the worker pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),
}

/// A bounded pool of worker threads, or sequential execution on the calling
/// thread.
pub struct ExecutionContext {
    pool:        Option<rayon::ThreadPool>,
    num_threads: usize,
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("num_threads", &self.num_threads)
            .finish()
    }
}

impl ExecutionContext {
    /// A context running on `num_threads` workers. A single thread means
    /// sequential execution on the caller's thread.
    pub fn new(num_threads: usize) -> Result<Self, ExecutionError> {
        if num_threads == 0 {
            return Err(ExecutionError::ZeroThreads);
        }
        if num_threads == 1 {
            return Ok(Self::sequential());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("bls-worker-{}", i))
            .build()?;
        debug!("Created execution context with {} worker threads.", num_threads);
        Ok(ExecutionContext {
            pool: Some(pool),
            num_threads,
        })
    }

    pub fn sequential() -> Self {
        ExecutionContext {
            pool:        None,
            num_threads: 1,
        }
    }

    /// Size the pool from the `BLS_ENGINE_NUM_THREADS` environment variable,
    /// or from the number of available cores if it is not set.
    pub fn from_env() -> Result<Self, ExecutionError> {
        let num_threads = match std::env::var(NUM_THREADS_ENV) {
            Ok(v) => match v.trim().parse::<usize>() {
                Ok(n) => n,
                Err(_) => {
                    warn!(
                        "Ignoring {} = {:?}, which is not a thread count.",
                        NUM_THREADS_ENV, v
                    );
                    num_cpus::get()
                }
            },
            Err(_) => num_cpus::get(),
        };
        Self::new(num_threads)
    }

    pub fn num_threads(&self) -> usize { self.num_threads }

    /// Split `0..len` into consecutive ranges of `shard_size` elements (the
    /// last one possibly shorter), apply `f` to each range and return the
    /// results in range order.
    pub fn map_shards<T, F>(&self, len: usize, shard_size: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(Range<usize>) -> T + Sync + Send, {
        let shard_size = shard_size.max(1);
        let ranges: Vec<Range<usize>> = (0..len)
            .step_by(shard_size)
            .map(|start| start..usize::min(start + shard_size, len))
            .collect();
        trace!(
            "Processing {} elements in {} shards of at most {}.",
            len,
            ranges.len(),
            shard_size
        );
        match &self.pool {
            Some(pool) if ranges.len() > 1 => pool.install(|| ranges.into_par_iter().map(&f).collect()),
            _ => ranges.into_iter().map(f).collect(),
        }
    }
}

impl Default for ExecutionContext {
    /// Same as [ExecutionContext::from_env], falling back to sequential
    /// execution if the pool cannot be built.
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|e| {
            warn!("Falling back to sequential execution: {}", e);
            Self::sequential()
        })
    }
}
