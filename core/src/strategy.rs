//! The **Strategy Descriptor**: the one shape every discovery technique conforms to.
//!
//! The orchestrator only ever talks to `dyn Strategy`. Each implementation receives the
//! target set and the shared [`Executor`], runs its per-target work through it and hands
//! back its own collection of records. Per-item failures stay inside the strategy as
//! "no result"; only whole-strategy setup failures (a rejected API key, say) are returned
//! as errors.

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;

use hostsweep_common::SweepError;
use hostsweep_common::config::{Config, StrategySelection};
use hostsweep_common::dns::Resolver;
use hostsweep_common::network::target::TargetSet;
use hostsweep_common::record::{Record, Source};
use hostsweep_protocols::http::HttpClients;

use crate::executor::Executor;

pub mod bing;
pub mod cert;
pub mod dictionary;
pub mod headers;
pub mod reverse;
pub mod robtex;

#[async_trait]
pub trait Strategy: Send + Sync {
    /// Tag stamped on every record this strategy produces.
    fn source(&self) -> Source;

    async fn execute(
        &self,
        targets: &TargetSet,
        executor: &Executor,
    ) -> Result<Vec<Record>, SweepError>;
}

/// Instantiates every strategy enabled in `config`, in [`StrategySelection::enabled`] order.
pub fn build_strategies(
    config: &Config,
    resolver: Arc<dyn Resolver>,
    clients: &HttpClients,
) -> Result<Vec<Box<dyn Strategy>>, SweepError> {
    let selection: &StrategySelection = &config.selection;
    let mut strategies: Vec<Box<dyn Strategy>> = Vec::new();

    for source in selection.enabled() {
        let strategy: Box<dyn Strategy> = match source {
            Source::Reverse => Box::new(reverse::ReverseLookup::new(resolver.clone())),
            Source::Cert => Box::new(cert::CertificateNames::new(config.request_timeout)?),
            Source::Bing => {
                let Some(mode) = selection.bing.clone() else { continue };
                Box::new(bing::BingSearch::new(clients.api.clone(), mode))
            }
            Source::Robtex => Box::new(robtex::Robtex::new(clients.api.clone())),
            Source::Dictionary => {
                let Some(dictionary) = selection.dictionary.clone() else { continue };
                Box::new(dictionary::DictionaryAttack::new(resolver.clone(), dictionary))
            }
            Source::Headers => Box::new(headers::HeaderInspection::new(clients.target.clone())),
        };
        strategies.push(strategy);
    }

    Ok(strategies)
}

/// One record per name found for `ip`; empty names are dropped.
pub(crate) fn records_for(ip: IpAddr, names: Vec<String>, source: Source) -> Vec<Record> {
    names
        .iter()
        .filter_map(|name| Record::new(name, ip, source))
        .collect()
}
