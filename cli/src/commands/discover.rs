use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use tracing::info;

use hostsweep_common::config::Config;
use hostsweep_common::dns::Resolver;
use hostsweep_common::network::target::TargetSet;
use hostsweep_core::DiscoveryService;
use hostsweep_core::report::{self, ResultSet};
use hostsweep_protocols::dns::DnsResolver;
use hostsweep_protocols::http::HttpClients;

use crate::terminal::{print, spinner};

pub async fn discover(targets: &TargetSet, cfg: &Config) -> anyhow::Result<()> {
    let resolver: Arc<dyn Resolver> = Arc::new(DnsResolver::new(cfg.request_timeout));
    let clients = HttpClients::new(cfg.request_timeout)?;
    let service = DiscoveryService::new(cfg, resolver, &clients)?;

    print::header("starting sweep", cfg.quiet);
    info!("Started at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    spinner::start(targets.len(), cfg.selection.enabled().len(), cfg.quiet);

    let start_time = Instant::now();
    let outcome = service.perform_discovery(targets).await;
    spinner::finish();
    let records = outcome?;

    info!("Finished at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

    let output = report::render(&records, cfg.output)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    let hosts = ResultSet::from_records(&records).len();
    print::summary(records.len(), hosts, start_time.elapsed(), cfg.quiet);
    Ok(())
}
