use std::io::Write;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use hostsweep_common::config::{
    BingMode, Config, DictionaryConfig, OutputMode, StrategySelection,
};
use hostsweep_common::dns::Resolver;
use hostsweep_common::network::target::TargetSet;
use hostsweep_common::record::Source;
use hostsweep_common::SweepError;
use hostsweep_core::report::{self, ResultSet};
use hostsweep_core::strategy::bing::BingSearch;
use hostsweep_core::strategy::reverse::ReverseLookup;
use hostsweep_core::strategy::robtex::Robtex;
use hostsweep_core::{DiscoveryService, Strategy};
use hostsweep_protocols::http::HttpClients;
use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::StaticResolver;

fn reverse_only() -> Config {
    Config {
        selection: StrategySelection {
            reverse: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn clients() -> HttpClients {
    HttpClients::new(Duration::from_secs(2)).unwrap()
}

fn client() -> Client {
    clients().api
}

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

/// A /30 with one named host, rendered as JSON.
#[tokio::test]
async fn reverse_sweep_of_small_range() {
    let resolver: Arc<dyn Resolver> = Arc::new(StaticResolver::new().ptr("10.0.0.1", &["host1"]));
    let cfg = reverse_only();
    let service = DiscoveryService::new(&cfg, resolver, &clients()).unwrap();
    let targets = TargetSet::from_range("10.0.0.0/30").unwrap();

    let records = service.perform_discovery(&targets).await.unwrap();
    let output = report::render(&records, OutputMode::Json).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed, json!([{ "ip": "10.0.0.1", "names": ["host1"] }]));
    assert!(output.starts_with("[\n {\n  \"ip\""));
}

#[tokio::test]
async fn dictionary_without_targets() {
    let resolver: Arc<dyn Resolver> =
        Arc::new(StaticResolver::new().a("www.example.com", &["1.2.3.4"]));
    let cfg = Config {
        selection: StrategySelection {
            dictionary: Some(DictionaryConfig {
                domain: "example.com".into(),
                words: vec!["www".into(), "mail".into()],
            }),
            ..Default::default()
        },
        ..Default::default()
    };
    let service = DiscoveryService::new(&cfg, resolver, &clients()).unwrap();

    let records = service.perform_discovery(&TargetSet::default()).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "www.example.com");
    assert_eq!(records[0].ip, ip("1.2.3.4"));
    assert_eq!(records[0].source, Source::Dictionary);
}

#[tokio::test]
async fn fcrdns_keeps_only_confirmed_names() {
    let resolver: Arc<dyn Resolver> = Arc::new(
        StaticResolver::new()
            .ptr("10.0.0.1", &["good.example.com", "stale.example.com"])
            .a("good.example.com", &["10.0.0.1"])
            .a("stale.example.com", &["10.0.0.9"]),
    );
    let cfg = Config {
        fcrdns: true,
        ..reverse_only()
    };
    let service = DiscoveryService::new(&cfg, resolver, &clients()).unwrap();
    let targets = TargetSet::from_range("10.0.0.0/30").unwrap();

    let records = service.perform_discovery(&targets).await.unwrap();
    let output = report::render(&records, OutputMode::Csv).unwrap();

    assert_eq!(output, "good.example.com,10.0.0.1,reverse\n");
}

#[tokio::test]
async fn addresses_from_input_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "192.0.2.7\n\n192.0.2.9   ").unwrap();

    let resolver: Arc<dyn Resolver> = Arc::new(
        StaticResolver::new()
            .ptr("192.0.2.7", &["Seven.Example.COM."])
            .ptr("192.0.2.9", &["nine.example.com"]),
    );
    let service = DiscoveryService::new(&reverse_only(), resolver, &clients()).unwrap();
    let targets = TargetSet::select(None, Some(file.path())).unwrap();
    assert_eq!(targets.len(), 2);

    let records = service.perform_discovery(&targets).await.unwrap();
    let output = report::render(&records, OutputMode::Clean).unwrap();

    assert_eq!(
        output,
        "192.0.2.7:\n    seven.example.com\n192.0.2.9:\n    nine.example.com\n"
    );
}

#[tokio::test]
async fn concurrency_budget_holds_across_strategies() {
    let resolver = Arc::new(
        StaticResolver::new()
            .ptr("10.1.0.1", &["a.example.com"])
            .with_delay(Duration::from_millis(5)),
    );
    let cfg = Config {
        concurrency: 4,
        ..reverse_only()
    };
    let shared: Arc<dyn Resolver> = resolver.clone();
    let strategies: Vec<Box<dyn Strategy>> = vec![
        Box::new(ReverseLookup::new(shared.clone())),
        Box::new(ReverseLookup::new(shared.clone())),
    ];
    let service = DiscoveryService::with_strategies(&cfg, shared, strategies);
    let targets = TargetSet::from_range("10.1.0.0/27").unwrap();

    let records = service.perform_discovery(&targets).await.unwrap();

    assert_eq!(records.len(), 2);
    assert!(resolver.peak() <= 4, "peak was {}", resolver.peak());
}

#[tokio::test]
async fn robtex_and_reverse_are_merged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ipquery/10.0.0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "act": [{ "o": "shop.example.com" }],
            "pas": [{ "o": "host1" }]
        })))
        .mount(&server)
        .await;

    let resolver: Arc<dyn Resolver> = Arc::new(StaticResolver::new().ptr("10.0.0.1", &["host1"]));
    let strategies: Vec<Box<dyn Strategy>> = vec![
        Box::new(ReverseLookup::new(resolver.clone())),
        Box::new(Robtex::new(client()).with_api_base(format!("{}/ipquery", server.uri()))),
    ];
    let service = DiscoveryService::with_strategies(&reverse_only(), resolver, strategies);
    let targets = TargetSet::from_range("10.0.0.0/30").unwrap();

    let records = service.perform_discovery(&targets).await.unwrap();
    let results = ResultSet::from_records(&records);

    assert_eq!(records.len(), 3);
    assert_eq!(results.len(), 1);
    let names = results.names(&ip("10.0.0.1")).unwrap();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"host1".to_string()));
    assert!(names.contains(&"shop.example.com".to_string()));
}

#[tokio::test]
async fn rejected_bing_key_aborts_the_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex("^/Data.ashx/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let resolver: Arc<dyn Resolver> = Arc::new(StaticResolver::new().ptr("10.0.0.1", &["host1"]));
    let bing = BingSearch::new(client(), BingMode::Api { key: "bad".into() })
        .with_endpoints(server.uri(), format!("{}/search", server.uri()));
    let strategies: Vec<Box<dyn Strategy>> = vec![
        Box::new(ReverseLookup::new(resolver.clone())),
        Box::new(bing),
    ];
    let service = DiscoveryService::with_strategies(&reverse_only(), resolver, strategies);
    let targets = TargetSet::from_range("10.0.0.0/30").unwrap();

    let err = service.perform_discovery(&targets).await.unwrap_err();

    assert!(matches!(err, SweepError::InvalidCredential { service: "bing" }));
}

#[test]
fn malformed_range_is_rejected_up_front() {
    let err = TargetSet::select(Some("10.0.0.0/33"), None).unwrap_err();
    assert!(matches!(err, SweepError::InvalidRange { .. }));

    let err = TargetSet::select(None, Some(std::path::Path::new("/nonexistent/ips.txt"))).unwrap_err();
    assert!(matches!(err, SweepError::InvalidInput { .. }));
}
