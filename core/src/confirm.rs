//! Forward-confirmed reverse DNS.
//!
//! Narrows a record stream to the records whose name resolves back to their address.
//! Never adds records and never rewrites one.

use anyhow::Context;
use tracing::info;

use hostsweep_common::dns::Resolver;
use hostsweep_common::record::Record;

use crate::executor::Executor;

pub async fn confirm(
    records: Vec<Record>,
    resolver: &dyn Resolver,
    executor: &Executor,
) -> Vec<Record> {
    if records.is_empty() {
        return records;
    }

    let before = records.len();
    let confirmed = executor
        .run(records, |record| async move {
            let addrs = resolver
                .forward(&record.name)
                .await
                .with_context(|| format!("forward lookup of {}", record.name))?;

            if addrs.contains(&record.ip) {
                Ok(vec![record])
            } else {
                Ok(Vec::new())
            }
        })
        .await;

    info!("{} of {before} records passed forward confirmation", confirmed.len());
    confirmed
}
