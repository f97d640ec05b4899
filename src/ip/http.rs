use std::net::Ipv4Addr;
use reqwest::{Client, IntoUrl, StatusCode, Url};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_URL: &str = "https://api.ipify.org";

/// Asks a plain-text IP echo service such as ipify for the public address.
#[derive(Debug)]
pub struct HttpIpLookup {
    url: Url,
    client: Client,
}

impl HttpIpLookup {
    pub fn new<U: IntoUrl>(url: U) -> Result<Self, IpLookupError> {
        Ok(Self {
            url: url.into_url()?,
            client: Client::new(),
        })
    }
}

#[async_trait::async_trait]
impl super::IpLookup for HttpIpLookup {
    type Error = IpLookupError;

    #[tracing::instrument(skip(self))]
    async fn public_ip(&self) -> Result<Ipv4Addr, Self::Error> {
        let response = self.client.get(self.url.clone())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IpLookupError::Status(response.status()));
        }

        let body = response.text().await?;
        debug!(url = %self.url, body = body.trim(), "got answer from IP service");

        parse_ip(&body)
    }
}

fn parse_ip(body: &str) -> Result<Ipv4Addr, IpLookupError> {
    let body = body.trim();
    body.parse()
        .map_err(|_| IpLookupError::InvalidAddress(body.to_owned()))
}

#[derive(Debug, Error)]
pub enum IpLookupError {
    #[error("network error while looking up public IP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IP service returned {0}")]
    Status(StatusCode),
    #[error("IP service returned {0:?}, which is not an IPv4 address")]
    InvalidAddress(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ip::IpLookup;
    use httptest::{matchers::*, responders::*, Expectation, Server};

    #[test]
    fn parse_ip_trims_whitespace() {
        assert_eq!(parse_ip("5.6.7.8\n").unwrap(), Ipv4Addr::new(5, 6, 7, 8));
        assert_eq!(parse_ip("  10.0.0.1 ").unwrap(), Ipv4Addr::new(10, 0, 0, 1));
    }

    #[test]
    fn parse_ip_rejects_garbage_and_v6() {
        assert!(matches!(parse_ip("<html>"), Err(IpLookupError::InvalidAddress(s)) if s == "<html>"));
        assert!(matches!(parse_ip("2001:db8::1"), Err(IpLookupError::InvalidAddress(_))));
        assert!(matches!(parse_ip(""), Err(IpLookupError::InvalidAddress(_))));
    }

    #[test]
    fn rejects_relative_url() {
        assert!(matches!(HttpIpLookup::new("api.ipify.org"), Err(IpLookupError::Http(_))));
    }

    #[tokio::test]
    async fn fetches_ip_with_single_get() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/"))
                .times(1)
                .respond_with(status_code(200).body("5.6.7.8\n")),
        );

        let lookup = HttpIpLookup::new(server.url_str("/")).unwrap();
        assert_eq!(lookup.public_ip().await.unwrap(), Ipv4Addr::new(5, 6, 7, 8));
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/"))
                .respond_with(status_code(503)),
        );

        let lookup = HttpIpLookup::new(server.url_str("/")).unwrap();
        let result = lookup.public_ip().await;
        assert!(matches!(result, Err(IpLookupError::Status(StatusCode::SERVICE_UNAVAILABLE))));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_network_error() {
        let lookup = HttpIpLookup::new("http://127.0.0.1:1/").unwrap();
        assert!(matches!(lookup.public_ip().await, Err(IpLookupError::Http(_))));
    }
}
