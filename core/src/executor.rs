//! Concurrency-bounded execution of independent network operations.
//!
//! Every strategy and the confirmation pass push their per-item work through the same
//! [`Executor`]. Clones share one permit pool, so the configured limit holds for the
//! whole run and not just for a single strategy.

use std::future::Future;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::Semaphore;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Executor {
    limit: usize,
    permits: Arc<Semaphore>,
}

impl Executor {
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            limit,
            permits: Arc::new(Semaphore::new(limit)),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Runs `op` for every item with at most `limit` operations in flight.
    ///
    /// A new operation starts as soon as a permit frees up. A failing item is logged and
    /// contributes nothing; it never aborts the batch. Output order is completion order.
    pub async fn run<I, T, F, Fut, R>(&self, items: I, op: F) -> Vec<R>
    where
        I: IntoIterator<Item = T>,
        F: Fn(T) -> Fut,
        Fut: Future<Output = anyhow::Result<Vec<R>>>,
    {
        let permits: &Semaphore = &self.permits;

        let outcomes: Vec<anyhow::Result<Vec<R>>> = stream::iter(items)
            .map(|item| {
                let work = op(item);
                async move {
                    // The pool is never closed, so acquiring only waits.
                    let _permit = permits.acquire().await?;
                    work.await
                }
            })
            .buffer_unordered(self.limit)
            .collect()
            .await;

        let mut results: Vec<R> = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(found) => results.extend(found),
                Err(e) => debug!("{e:#}"),
            }
        }
        results
    }

    /// Runs a single operation under a permit from the shared pool. Unlike [`run`], the
    /// error is handed back to the caller.
    ///
    /// [`run`]: Executor::run
    pub async fn submit<Fut, T>(&self, work: Fut) -> anyhow::Result<T>
    where
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let _permit = self.permits.acquire().await?;
        work.await
    }
}
