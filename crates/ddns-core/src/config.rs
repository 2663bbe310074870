//! Configuration types for the DDNS system
//!
//! This module defines all configuration structures used throughout the crate.
//! Values are passed explicitly into constructors; there is no process-wide
//! configuration state.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Default provider API endpoint
pub const DEFAULT_PROVIDER_ENDPOINT: &str = "https://api.dreamhost.com/";

/// Default "what is my IP" service (plain text body, no trailing newline)
pub const DEFAULT_IP_SOURCE_URL: &str = "https://api.ipify.org";

/// Comment attached to records re-added by the engine
pub const DEFAULT_RECORD_COMMENT: &str = "set by ddns script";

/// Main DDNS configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// IP source configuration
    #[serde(default)]
    pub ip_source: IpSourceConfig,

    /// DNS records to keep current
    pub records: Vec<RecordConfig>,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl DdnsConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.records.is_empty() {
            return Err(crate::Error::config("No records configured"));
        }

        if self.records.iter().any(|r| r.name.trim().is_empty()) {
            return Err(crate::Error::config("Record name cannot be empty"));
        }

        self.provider.validate()?;
        self.ip_source.validate()?;

        Ok(())
    }
}

/// DNS provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider API key
    /// ⚠️ NEVER log this value
    pub api_key: String,

    /// API endpoint that receives the `cmd` requests
    #[serde(default = "default_provider_endpoint")]
    pub endpoint: String,

    /// Request timeout (in seconds)
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,

    /// Dry-run mode: list records, but only log remove/add commands
    #[serde(default)]
    pub dry_run: bool,
}

impl ProviderConfig {
    /// Create a provider configuration with default endpoint and timeout
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_key.is_empty() {
            return Err(crate::Error::config("Provider API key cannot be empty"));
        }
        if self.endpoint.is_empty() {
            return Err(crate::Error::config("Provider endpoint cannot be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("Provider timeout must be > 0"));
        }
        Ok(())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_provider_endpoint(),
            timeout_secs: default_provider_timeout_secs(),
            dry_run: false,
        }
    }
}

// The API key must not leak through `{:?}`
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<REDACTED>")
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// IP source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpSourceConfig {
    /// URL to fetch the current IP from
    #[serde(default = "default_ip_source_url")]
    pub url: String,

    /// Address family the resolved IP must belong to
    #[serde(default)]
    pub version: IpVersion,

    /// Request timeout (in seconds)
    #[serde(default = "default_ip_source_timeout_secs")]
    pub timeout_secs: u64,
}

impl IpSourceConfig {
    /// Validate the IP source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.url.is_empty() {
            return Err(crate::Error::config("IP source URL cannot be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("IP source timeout must be > 0"));
        }
        Ok(())
    }
}

impl Default for IpSourceConfig {
    fn default() -> Self {
        Self {
            url: default_ip_source_url(),
            version: IpVersion::default(),
            timeout_secs: default_ip_source_timeout_secs(),
        }
    }
}

/// IP version to accept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpVersion {
    /// IPv4 only
    V4,
    /// IPv6 only
    V6,
    /// Both IPv4 and IPv6
    #[default]
    Both,
}

impl IpVersion {
    /// Whether `ip` belongs to an accepted family
    pub fn accepts(&self, ip: &IpAddr) -> bool {
        match self {
            IpVersion::V4 => ip.is_ipv4(),
            IpVersion::V6 => ip.is_ipv6(),
            IpVersion::Both => true,
        }
    }
}

impl std::str::FromStr for IpVersion {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v4" | "4" | "ipv4" => Ok(IpVersion::V4),
            "v6" | "6" | "ipv6" => Ok(IpVersion::V6),
            "both" | "any" => Ok(IpVersion::Both),
            other => Err(crate::Error::config(format!(
                "Unknown IP version '{}'. Valid: v4, v6, both",
                other
            ))),
        }
    }
}

/// DNS record configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Fully-qualified record name (e.g., "home.example.com")
    pub name: String,

    /// Record type to look up
    #[serde(default)]
    pub record_type: RecordType,
}

impl RecordConfig {
    /// Create a new record configuration (A record)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_type: RecordType::default(),
        }
    }

    /// Set the record type
    pub fn with_record_type(mut self, record_type: RecordType) -> Self {
        self.record_type = record_type;
        self
    }
}

/// DNS record type used for the lookup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    /// A record (IPv4)
    #[default]
    A,
    /// AAAA record (IPv6)
    Aaaa,
    /// Pick A or AAAA from the current IP's family
    Auto,
}

impl RecordType {
    /// Wire name of the type to look up for `current_ip`
    pub fn resolve(&self, current_ip: &IpAddr) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Auto => match current_ip {
                IpAddr::V4(_) => "A",
                IpAddr::V6(_) => "AAAA",
            },
        }
    }
}

impl std::str::FromStr for RecordType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a" => Ok(RecordType::A),
            "aaaa" => Ok(RecordType::Aaaa),
            "auto" => Ok(RecordType::Auto),
            other => Err(crate::Error::config(format!(
                "Unknown record type '{}'. Valid: a, aaaa, auto",
                other
            ))),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Comment attached to every record the engine re-adds
    #[serde(default = "default_record_comment")]
    pub comment: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            comment: default_record_comment(),
        }
    }
}

fn default_provider_endpoint() -> String {
    DEFAULT_PROVIDER_ENDPOINT.to_string()
}

fn default_provider_timeout_secs() -> u64 {
    30
}

fn default_ip_source_url() -> String {
    DEFAULT_IP_SOURCE_URL.to_string()
}

fn default_ip_source_timeout_secs() -> u64 {
    10
}

fn default_record_comment() -> String {
    DEFAULT_RECORD_COMMENT.to_string()
}
