//! # Discovery Orchestrator
//!
//! Implements the core "find hostnames for these targets" use case.
//!
//! Every selected [`Strategy`] is launched at once against the same target set. The
//! strategies do not know about each other; each one returns its own collection, and
//! the collections are merged only after all of them finished. A strategy that fails
//! as a whole (rejected credentials, for instance) fails the run, and whatever its
//! siblings found is discarded.

use std::sync::Arc;
use std::time::Duration;

use futures::future;
use tracing::info;

use hostsweep_common::SweepError;
use hostsweep_common::config::Config;
use hostsweep_common::dns::Resolver;
use hostsweep_common::network::target::TargetSet;
use hostsweep_common::record::Record;
use hostsweep_protocols::http::HttpClients;

use crate::confirm;
use crate::executor::Executor;
use crate::strategy::{self, Strategy};

pub struct DiscoveryService {
    strategies: Vec<Box<dyn Strategy>>,
    resolver: Arc<dyn Resolver>,
    executor: Executor,
    fcrdns: bool,
    deadline: Option<Duration>,
}

impl DiscoveryService {
    /// Builds the service with the strategies selected in `config`.
    pub fn new(
        config: &Config,
        resolver: Arc<dyn Resolver>,
        clients: &HttpClients,
    ) -> Result<Self, SweepError> {
        let strategies = strategy::build_strategies(config, resolver.clone(), clients)?;
        Ok(Self::with_strategies(config, resolver, strategies))
    }

    /// Builds the service around an explicit set of strategies.
    pub fn with_strategies(
        config: &Config,
        resolver: Arc<dyn Resolver>,
        strategies: Vec<Box<dyn Strategy>>,
    ) -> Self {
        Self {
            strategies,
            resolver,
            executor: Executor::new(config.concurrency),
            fcrdns: config.fcrdns,
            deadline: config.deadline,
        }
    }

    /// Discovery followed by the optional confirmation pass, bounded by the deadline.
    pub async fn perform_discovery(&self, targets: &TargetSet) -> Result<Vec<Record>, SweepError> {
        let run = async {
            let records = self.discover(targets).await?;
            if !self.fcrdns {
                return Ok(records);
            }
            Ok(confirm::confirm(records, self.resolver.as_ref(), &self.executor).await)
        };

        match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, run)
                .await
                .map_err(|_| SweepError::DeadlineExceeded(deadline))?,
            None => run.await,
        }
    }

    /// Runs every strategy concurrently and flattens their records.
    pub async fn discover(&self, targets: &TargetSet) -> Result<Vec<Record>, SweepError> {
        let launches = self.strategies.iter().map(|strategy| async move {
            let source = strategy.source();
            info!("Starting {source} discovery");
            let records = strategy.execute(targets, &self.executor).await?;
            info!("{source} discovery finished with {} records", records.len());
            Ok::<Vec<Record>, SweepError>(records)
        });

        let collections: Vec<Vec<Record>> = future::try_join_all(launches).await?;
        Ok(collections.into_iter().flatten().collect())
    }
}
