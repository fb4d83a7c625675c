use std::net::IpAddr;

use async_trait::async_trait;
use reqwest::Client;

use hostsweep_common::SweepError;
use hostsweep_common::network::target::TargetSet;
use hostsweep_common::record::{Record, Source};
use hostsweep_protocols::http;

use super::{Strategy, records_for};
use crate::executor::Executor;

/// Scheme and port pairs probed on every target.
pub const DEFAULT_ENDPOINTS: [(&str, u16); 2] = [("http", 80), ("https", 443)];

/// Hostnames leaked through HTTP and HTTPS response headers.
pub struct HeaderInspection {
    client: Client,
    endpoints: Vec<(&'static str, u16)>,
}

impl HeaderInspection {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoints: DEFAULT_ENDPOINTS.to_vec(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: Vec<(&'static str, u16)>) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Names from every endpoint that answered. Fails only if none did.
    async fn inspect(&self, ip: IpAddr) -> anyhow::Result<Vec<String>> {
        let mut names: Vec<String> = Vec::new();
        let mut answered = false;
        let mut last_error = None;

        for &(scheme, port) in &self.endpoints {
            let url = url_for(scheme, ip, port);
            match self.client.get(&url).send().await {
                Ok(response) => {
                    answered = true;
                    for name in http::hostnames_from_headers(response.headers()) {
                        if !names.contains(&name) {
                            names.push(name);
                        }
                    }
                }
                Err(e) => last_error = Some(e),
            }
        }

        match (answered, last_error) {
            (false, Some(e)) => Err(anyhow::anyhow!("no http answer from {ip}: {e}")),
            _ => Ok(names),
        }
    }
}

fn url_for(scheme: &str, ip: IpAddr, port: u16) -> String {
    let host = match ip {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => format!("[{v6}]"),
    };
    let default_port = match scheme {
        "https" => 443,
        _ => 80,
    };
    if port == default_port {
        format!("{scheme}://{host}/")
    } else {
        format!("{scheme}://{host}:{port}/")
    }
}

#[async_trait]
impl Strategy for HeaderInspection {
    fn source(&self) -> Source {
        Source::Headers
    }

    async fn execute(
        &self,
        targets: &TargetSet,
        executor: &Executor,
    ) -> Result<Vec<Record>, SweepError> {
        let records = executor
            .run(targets.iter().copied(), |ip| async move {
                let names = self.inspect(ip).await?;
                Ok(records_for(ip, names, Source::Headers))
            })
            .await;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};
    use wiremock::{Mock, MockServer, ResponseTemplate, matchers::method};

    #[test]
    fn urls_omit_default_ports() {
        let v4 = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));
        assert_eq!(url_for("http", v4, 80), "http://192.0.2.1/");
        assert_eq!(url_for("https", v4, 443), "https://192.0.2.1/");
        assert_eq!(url_for("http", v4, 8080), "http://192.0.2.1:8080/");
        assert_eq!(
            url_for("https", IpAddr::V6(Ipv6Addr::LOCALHOST), 443),
            "https://[::1]/"
        );
    }

    #[tokio::test]
    async fn redirect_target_becomes_a_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", "https://intranet.example.com/login")
                    .insert_header("Set-Cookie", "sid=1; Domain=.example.com; Path=/"),
            )
            .mount(&server)
            .await;

        let port = server.address().port();
        let client = http::build_target_client(std::time::Duration::from_secs(5)).unwrap();
        let strategy = HeaderInspection::new(client).with_endpoints(vec![("http", port)]);
        let targets: TargetSet = [IpAddr::V4(Ipv4Addr::LOCALHOST)].into_iter().collect();

        let records = strategy.execute(&targets, &Executor::new(1)).await.unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();

        assert_eq!(names, vec!["intranet.example.com", "example.com"]);
        assert!(records.iter().all(|r| r.ip == IpAddr::V4(Ipv4Addr::LOCALHOST)));
    }
}
