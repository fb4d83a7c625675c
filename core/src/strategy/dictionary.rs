//! Hostname guessing from a word list under a target domain.
//!
//! A zone with a wildcard record answers every guess, so before touching the word list
//! the strategy resolves a label that cannot exist. If that resolves, the whole attack
//! is skipped and contributes zero records.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use hostsweep_common::SweepError;
use hostsweep_common::config::DictionaryConfig;
use hostsweep_common::dns::Resolver;
use hostsweep_common::network::target::TargetSet;
use hostsweep_common::record::{Record, Source};

use super::Strategy;
use crate::executor::Executor;

pub const WILDCARD_PROBE_LABEL: &str = "youmustconstructadditionalpylons";

pub struct DictionaryAttack {
    resolver: Arc<dyn Resolver>,
    config: DictionaryConfig,
}

impl DictionaryAttack {
    /// The domain is normalized once here, so the wildcard check and the guesses are
    /// always built under the same zone.
    pub fn new(resolver: Arc<dyn Resolver>, config: DictionaryConfig) -> Self {
        let domain = normalize_domain(&config.domain);
        Self {
            resolver,
            config: DictionaryConfig { domain, ..config },
        }
    }

    pub fn domain(&self) -> &str {
        &self.config.domain
    }

    fn probe_name(&self) -> String {
        format!(
            "{WILDCARD_PROBE_LABEL}-{:08x}.{}",
            rand::random::<u32>(),
            self.config.domain
        )
    }

    /// Whether the target domain answers for a name that was never registered.
    pub async fn is_wildcard(&self, executor: &Executor) -> bool {
        let probe = self.probe_name();
        let lookup = executor.submit(self.resolver.forward(&probe)).await;
        match lookup {
            Ok(addrs) => !addrs.is_empty(),
            Err(e) => {
                debug!("Wildcard probe {probe} did not resolve: {e}");
                false
            }
        }
    }
}

/// `.Target.Example.` and `target.example` name the same zone.
fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_matches('.').to_ascii_lowercase()
}

#[async_trait]
impl Strategy for DictionaryAttack {
    fn source(&self) -> Source {
        Source::Dictionary
    }

    /// Ignores `targets`: guesses are derived from the domain, not from addresses.
    async fn execute(
        &self,
        _targets: &TargetSet,
        executor: &Executor,
    ) -> Result<Vec<Record>, SweepError> {
        let domain = self.domain();

        if self.is_wildcard(executor).await {
            warn!("Skipping dictionary lookups for wildcard domain *.{domain}");
            return Ok(Vec::new());
        }

        let names: Vec<String> = self
            .config
            .words
            .iter()
            .map(|word| format!("{word}.{domain}"))
            .collect();
        info!("Trying {} names under {domain}", names.len());

        let records = executor
            .run(names, |name: String| async move {
                let addrs = self
                    .resolver
                    .forward(&name)
                    .await
                    .with_context(|| format!("resolving {name}"))?;
                Ok(addrs
                    .into_iter()
                    .filter_map(|ip| Record::new(&name, ip, Source::Dictionary))
                    .collect::<Vec<Record>>())
            })
            .await;

        Ok(records)
    }
}
