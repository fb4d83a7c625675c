use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;

use hostsweep_common::SweepError;
use hostsweep_common::dns::Resolver;
use hostsweep_common::network::target::TargetSet;
use hostsweep_common::record::{Record, Source};

use super::{Strategy, records_for};
use crate::executor::Executor;

/// PTR lookup for every target.
pub struct ReverseLookup {
    resolver: Arc<dyn Resolver>,
}

impl ReverseLookup {
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Strategy for ReverseLookup {
    fn source(&self) -> Source {
        Source::Reverse
    }

    async fn execute(
        &self,
        targets: &TargetSet,
        executor: &Executor,
    ) -> Result<Vec<Record>, SweepError> {
        let records = executor
            .run(targets.iter().copied(), |ip| async move {
                let names = self
                    .resolver
                    .reverse(ip)
                    .await
                    .with_context(|| format!("reverse lookup of {ip}"))?;
                Ok(records_for(ip, names, Source::Reverse))
            })
            .await;
        Ok(records)
    }
}
