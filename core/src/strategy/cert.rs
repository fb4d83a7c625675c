use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use hostsweep_common::SweepError;
use hostsweep_common::network::target::TargetSet;
use hostsweep_common::record::{Record, Source};
use hostsweep_protocols::tls::{CertFetcher, HTTPS_PORT};

use super::{Strategy, records_for};
use crate::executor::Executor;

/// Names from the TLS certificate each target serves on 443.
pub struct CertificateNames {
    fetcher: CertFetcher,
    port: u16,
}

impl CertificateNames {
    pub fn new(timeout: Duration) -> Result<Self, SweepError> {
        let fetcher = CertFetcher::new(timeout).map_err(|e| SweepError::Strategy {
            strategy: Source::Cert,
            reason: format!("{e:#}"),
        })?;
        Ok(Self {
            fetcher,
            port: HTTPS_PORT,
        })
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

#[async_trait]
impl Strategy for CertificateNames {
    fn source(&self) -> Source {
        Source::Cert
    }

    async fn execute(
        &self,
        targets: &TargetSet,
        executor: &Executor,
    ) -> Result<Vec<Record>, SweepError> {
        let records = executor
            .run(targets.iter().copied(), |ip| async move {
                let names = self
                    .fetcher
                    .names(ip, self.port)
                    .await
                    .with_context(|| format!("certificate from {ip}:{}", self.port))?;
                Ok(records_for(ip, names, Source::Cert))
            })
            .await;
        Ok(records)
    }
}
