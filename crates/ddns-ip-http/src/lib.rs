// # HTTP IP Source
//
// This crate provides an HTTP-based IP source for the DDNS system.
//
// ## Architecture
//
// Fetches the current IP from an external "what is my IP" service
// (e.g., api.ipify.org, icanhazip.com) with a single GET. The body is
// trimmed, since some services append a newline and some do not, then
// parsed as an IPv4 or IPv6 address.
//
// There is no polling and no caching: one call, one request.

use ddns_core::config::{IpSourceConfig, IpVersion};
use ddns_core::traits::IpSource;
use ddns_core::{Error, Result};

use std::net::IpAddr;
use std::time::Duration;

/// Longest body excerpt quoted in an invalid-address error
const MAX_QUOTED_BODY: usize = 64;

/// HTTP-based IP source
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// IP version to accept
    version: IpVersion,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch IP from (e.g., "https://api.ipify.org")
    /// - `version`: IP version to accept
    /// - `timeout`: Request timeout
    pub fn new(url: impl Into<String>, version: IpVersion, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            version,
            client,
        })
    }

    /// Create an IP source from configuration
    pub fn from_config(config: &IpSourceConfig) -> Result<Self> {
        config.validate()?;
        Self::new(
            config.url.clone(),
            config.version,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Fetch current IP from HTTP service
    async fn fetch_ip(&self) -> Result<IpAddr> {
        tracing::debug!("Fetching current IP from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::network(format!("Request to {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::network(format!(
                "{} returned HTTP {}",
                self.url,
                response.status()
            )));
        }

        let ip_text = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response: {}", e)))?;

        parse_ip(&ip_text, self.version)
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<IpAddr> {
        self.fetch_ip().await
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}

/// Parse a service response body into an accepted IP address
pub fn parse_ip(body: &str, version: IpVersion) -> Result<IpAddr> {
    let ip_text = body.trim();

    let ip: IpAddr = ip_text
        .parse()
        .map_err(|_| Error::invalid_address(format!("{:?}", quote(ip_text))))?;

    if !version.accepts(&ip) {
        let expected = match version {
            IpVersion::V4 => "IPv4",
            IpVersion::V6 => "IPv6",
            IpVersion::Both => "IPv4 or IPv6",
        };
        return Err(Error::invalid_address(format!(
            "expected {}, got {}",
            expected, ip
        )));
    }

    Ok(ip)
}

fn quote(text: &str) -> String {
    match text.char_indices().nth(MAX_QUOTED_BODY) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
