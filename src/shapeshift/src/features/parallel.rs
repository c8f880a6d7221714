use std::{fmt, sync::Arc};

use rayon::prelude::*;

use super::Feature;
use crate::{Error, Result};

/// Distributes per-member conversion of objects over worker threads.
///
/// Member values are converted into a pre-sized slot vector in
/// parallel and committed to the container on the calling thread.
/// On deserialization, present members are moved out of the object,
/// updated in place on the pool and moved back.
/// Objects with fewer than [`ParallelProcessing::min_members`]
/// members are processed sequentially.
#[derive(Clone)]
pub struct ParallelProcessing {
    min_members: usize,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl ParallelProcessing {
    /// The default member count from which work is distributed.
    pub const DEFAULT_MIN_MEMBERS: usize = 4;

    /// Runs on the global rayon pool.
    pub fn new() -> Self {
        Self {
            min_members: Self::DEFAULT_MIN_MEMBERS,
            pool: None,
        }
    }

    /// Runs on a dedicated pool of `threads` workers.
    pub fn with_threads(threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|idx| format!("shapeshift-worker-{idx}"))
            .build()
            .map_err(Error::configuration)?;

        Ok(Self {
            min_members: Self::DEFAULT_MIN_MEMBERS,
            pool: Some(Arc::new(pool)),
        })
    }

    /// Sets the member count from which work is distributed.
    pub fn min_members(mut self, min_members: usize) -> Self {
        self.min_members = min_members;
        self
    }

    pub(crate) fn applies(&self, members: usize) -> bool {
        members >= self.min_members.max(2)
    }

    /// Maps `items` in parallel, preserving their order.
    pub(crate) fn map<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Send + Sync,
    {
        let run = || items.par_iter().map(&f).collect::<Vec<R>>();
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    /// Like [`ParallelProcessing::map`], with exclusive access to each
    /// item.
    pub(crate) fn map_mut<T, R, F>(&self, items: &mut [T], f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(&mut T) -> R + Send + Sync,
    {
        let mut run = || items.par_iter_mut().map(&f).collect::<Vec<R>>();
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }
}

impl Default for ParallelProcessing {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParallelProcessing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParallelProcessing")
            .field("min_members", &self.min_members)
            .field(
                "threads",
                &self.pool.as_ref().map(|pool| pool.current_num_threads()),
            )
            .finish()
    }
}

impl Feature for ParallelProcessing {}
