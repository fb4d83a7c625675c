use std::net::IpAddr;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use hostsweep_common::SweepError;
use hostsweep_common::network::target::TargetSet;
use hostsweep_common::record::{Record, Source};

use super::{Strategy, records_for};
use crate::executor::Executor;

pub const ROBTEX_API: &str = "https://freeapi.robtex.com/ipquery";

/// Answer of the Robtex IP query API.
#[derive(Debug, Deserialize)]
struct IpQuery {
    #[serde(default)]
    status: String,
    /// Names currently pointing at the address.
    #[serde(default)]
    act: Vec<DnsEntry>,
    /// Names that pointed at the address in the past.
    #[serde(default)]
    pas: Vec<DnsEntry>,
}

#[derive(Debug, Deserialize)]
struct DnsEntry {
    o: String,
}

/// Passive DNS aggregation through Robtex.
pub struct Robtex {
    client: Client,
    api_base: String,
}

impl Robtex {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            api_base: ROBTEX_API.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    async fn query(&self, ip: IpAddr) -> anyhow::Result<Vec<String>> {
        let url = format!("{}/{ip}", self.api_base.trim_end_matches('/'));
        let answer: IpQuery = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        anyhow::ensure!(answer.status == "ok", "robtex answered '{}'", answer.status);

        Ok(answer
            .act
            .into_iter()
            .chain(answer.pas)
            .map(|entry| entry.o)
            .collect())
    }
}

#[async_trait]
impl Strategy for Robtex {
    fn source(&self) -> Source {
        Source::Robtex
    }

    async fn execute(
        &self,
        targets: &TargetSet,
        executor: &Executor,
    ) -> Result<Vec<Record>, SweepError> {
        let records = executor
            .run(targets.iter().copied(), |ip| async move {
                let names = self
                    .query(ip)
                    .await
                    .with_context(|| format!("robtex lookup of {ip}"))?;
                Ok(records_for(ip, names, Source::Robtex))
            })
            .await;
        Ok(records)
    }
}
