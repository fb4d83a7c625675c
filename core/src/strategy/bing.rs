//! Virtual-host discovery through Bing's `ip:` search operator.
//!
//! With an account key the search API is used, after finding which of the known API
//! paths accepts the key. Without one, the public result page is scraped instead.

use std::net::IpAddr;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};

use hostsweep_common::SweepError;
use hostsweep_common::config::BingMode;
use hostsweep_common::network::target::TargetSet;
use hostsweep_common::record::{Record, Source};
use hostsweep_protocols::http;

use super::{Strategy, records_for};
use crate::executor::Executor;

pub const API_BASE: &str = "https://api.datamarket.azure.com";
/// Candidate API paths, tried in order until one accepts the key.
pub const API_PATHS: [&str; 2] = [
    "/Data.ashx/Bing/Search/v1/Web",
    "/Data.ashx/Bing/SearchWeb/v1/Web",
];
pub const SEARCH_URL: &str = "https://www.bing.com/search";

const PROBE_QUERY: &str = "'I<3BSW'";
/// Result links on these domains belong to the search engine itself.
const ENGINE_DOMAINS: [&str; 6] = [
    "bing.com",
    "bing.net",
    "microsoft.com",
    "msn.com",
    "live.com",
    "microsofttranslator.com",
];

#[derive(Debug, Deserialize)]
struct ApiResponse {
    d: ApiResults,
}

#[derive(Debug, Deserialize)]
struct ApiResults {
    #[serde(default)]
    results: Vec<ApiResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiResult {
    url: String,
}

pub struct BingSearch {
    client: Client,
    mode: BingMode,
    api_base: String,
    search_url: String,
}

impl BingSearch {
    pub fn new(client: Client, mode: BingMode) -> Self {
        Self {
            client,
            mode,
            api_base: API_BASE.to_string(),
            search_url: SEARCH_URL.to_string(),
        }
    }

    pub fn with_endpoints(
        mut self,
        api_base: impl Into<String>,
        search_url: impl Into<String>,
    ) -> Self {
        self.api_base = api_base.into();
        self.search_url = search_url.into();
        self
    }

    /// First API endpoint that answers the probe query with 200 OK.
    /// Each key check holds an executor permit while in flight.
    pub async fn detect_endpoint(
        &self,
        key: &str,
        executor: &Executor,
    ) -> Result<String, SweepError> {
        for path in API_PATHS {
            let endpoint = format!("{}{path}", self.api_base.trim_end_matches('/'));
            let request = self
                .client
                .get(&endpoint)
                .basic_auth(key, Some(key))
                .query(&[("Query", PROBE_QUERY)]);
            let response = executor
                .submit(async { request.send().await.map_err(anyhow::Error::from) })
                .await;

            match response {
                Ok(res) if res.status() == StatusCode::OK => {
                    info!("Using Bing API endpoint {endpoint}");
                    return Ok(endpoint);
                }
                Ok(res) => debug!("{endpoint} rejected the key with {}", res.status()),
                Err(e) => debug!("{endpoint} unreachable: {e}"),
            }
        }

        Err(SweepError::InvalidCredential { service: "bing" })
    }

    async fn api_query(&self, endpoint: &str, key: &str, ip: IpAddr) -> anyhow::Result<Vec<String>> {
        let query = format!("'ip:{ip}'");
        let answer: ApiResponse = self
            .client
            .get(endpoint)
            .basic_auth(key, Some(key))
            .query(&[("Query", query.as_str()), ("$format", "json")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(answer
            .d
            .results
            .iter()
            .filter_map(|result| http::host_from_url(&result.url))
            .collect())
    }

    async fn scrape(&self, ip: IpAddr) -> anyhow::Result<Vec<String>> {
        let query = format!("ip:{ip}");
        let html = self
            .client
            .get(&self.search_url)
            .query(&[("q", query.as_str())])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(http::hostnames_from_links(&html, &ENGINE_DOMAINS))
    }
}

#[async_trait]
impl Strategy for BingSearch {
    fn source(&self) -> Source {
        Source::Bing
    }

    async fn execute(
        &self,
        targets: &TargetSet,
        executor: &Executor,
    ) -> Result<Vec<Record>, SweepError> {
        let records = match &self.mode {
            BingMode::Api { key } => {
                let endpoint = self.detect_endpoint(key, executor).await?;
                let endpoint = endpoint.as_str();
                executor
                    .run(targets.iter().copied(), |ip| async move {
                        let names = self
                            .api_query(endpoint, key, ip)
                            .await
                            .with_context(|| format!("bing api search for {ip}"))?;
                        Ok(records_for(ip, names, Source::Bing))
                    })
                    .await
            }
            BingMode::Scrape => {
                warn!("No Bing API key provided, scraping search results instead");
                executor
                    .run(targets.iter().copied(), |ip| async move {
                        let names = self
                            .scrape(ip)
                            .await
                            .with_context(|| format!("bing search for {ip}"))?;
                        Ok(records_for(ip, names, Source::Bing))
                    })
                    .await
            }
        };
        Ok(records)
    }
}
