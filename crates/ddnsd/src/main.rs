// # ddnsd - DDNS Reconciler
//
// The ddnsd binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Building the IP source, the DreamHost record store and the engine
// 4. Running ONE reconciliation pass and printing one status line per domain
//
// It is meant to be started by a scheduler (cron, systemd timer). Overlapping
// runs are not coordinated; serialize invocations externally if needed.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### DNS Provider
// - `DDNS_PROVIDER_API_KEY`: DreamHost API key (required)
// - `DDNS_PROVIDER_ENDPOINT`: API endpoint (default: https://api.dreamhost.com/)
// - `DDNS_PROVIDER_TIMEOUT_SECS`: Request timeout (default: 30)
// - `DDNS_MODE`: Set to `dry-run` to log remove/add commands instead of sending them
//
// ### Records
// - `DDNS_RECORDS`: Comma-separated list of records, each `name` or `name:type`
// - `DDNS_RECORD_TYPE`: Type for entries without one: a, aaaa, auto (default: a)
// - `DDNS_RECORD_COMMENT`: Comment attached to re-added records
//
// ### IP Source
// - `DDNS_IP_SOURCE_URL`: URL returning the caller's IP as plain text
// - `DDNS_IP_VERSION`: Accepted family: v4, v6, both (default: both)
//
// ### Output
// - `DDNS_OUTPUT`: `text` (default) or `json` (one JSON object per line)
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info); logs go to stderr
//
// ## Example
//
// ```bash
// export DDNS_PROVIDER_API_KEY=6SHU5P2HLDAYECUM
// export DDNS_RECORDS=home.example.com,vpn.example.com:auto
//
// ddnsd
// ```

use anyhow::{Context, Result};
use ddns_core::config::{DdnsConfig, IpVersion, ProviderConfig, RecordConfig, RecordType};
use ddns_core::{DdnsEngine, ReconcileReport};
use ddns_ip_http::HttpIpSource;
use ddns_provider_dreamhost::DreamhostProvider;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Every domain reconciled without failure
/// - 1: Configuration or startup error
/// - 2: Fatal run error (IP lookup or record listing failed)
/// - 3: Run completed, but at least one domain failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
    DomainFailures = 3,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// How status lines are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

/// Application configuration
#[derive(Debug)]
struct Config {
    ddns: DdnsConfig,
    output: OutputFormat,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut provider = ProviderConfig::new(var("DDNS_PROVIDER_API_KEY").unwrap_or_default());
        if let Some(endpoint) = var("DDNS_PROVIDER_ENDPOINT") {
            provider.endpoint = endpoint;
        }
        if let Some(timeout) = var("DDNS_PROVIDER_TIMEOUT_SECS") {
            provider.timeout_secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("DDNS_PROVIDER_TIMEOUT_SECS is not a number: {}", timeout))?;
        }
        provider.dry_run = var("DDNS_MODE")
            .map(|mode| mode.trim().eq_ignore_ascii_case("dry-run"))
            .unwrap_or(false);

        let default_type = match var("DDNS_RECORD_TYPE") {
            Some(raw) => raw.trim().parse::<RecordType>()?,
            None => RecordType::default(),
        };
        let records = parse_records(&var("DDNS_RECORDS").unwrap_or_default(), default_type)?;

        let mut ddns = DdnsConfig {
            provider,
            records,
            ..DdnsConfig::default()
        };
        if let Some(url) = var("DDNS_IP_SOURCE_URL") {
            ddns.ip_source.url = url;
        }
        if let Some(version) = var("DDNS_IP_VERSION") {
            ddns.ip_source.version = version.trim().parse::<IpVersion>()?;
        }
        if let Some(comment) = var("DDNS_RECORD_COMMENT") {
            ddns.engine.comment = comment;
        }

        let output = match var("DDNS_OUTPUT").map(|o| o.trim().to_ascii_lowercase()) {
            None => OutputFormat::Text,
            Some(o) if o == "text" => OutputFormat::Text,
            Some(o) if o == "json" => OutputFormat::Json,
            Some(o) => anyhow::bail!("DDNS_OUTPUT '{}' is not valid. Valid: text, json", o),
        };

        Ok(Self {
            ddns,
            output,
            log_level: var("DDNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// This performs comprehensive validation including:
    /// - Required field presence
    /// - Domain name format
    /// - URL schemes
    /// - Log level enumeration
    fn validate(&self) -> Result<()> {
        let api_key = &self.ddns.provider.api_key;
        if api_key.is_empty() {
            anyhow::bail!(
                "DDNS_PROVIDER_API_KEY is required. \
                Set it via: export DDNS_PROVIDER_API_KEY=your_key"
            );
        }

        // Check for obvious placeholder keys (common mistake)
        let key_lower = api_key.to_lowercase();
        if key_lower.contains("your_key") || key_lower.contains("replace_me") || key_lower == "key" {
            anyhow::bail!(
                "DDNS_PROVIDER_API_KEY appears to be a placeholder. \
                Use an actual API key from the DreamHost panel."
            );
        }

        if self.ddns.records.is_empty() {
            anyhow::bail!(
                "DDNS_RECORDS must contain at least one record. \
                Set it via: export DDNS_RECORDS=example.com,www.example.com"
            );
        }

        for record in &self.ddns.records {
            validate_domain_name(&record.name)?;
        }

        for (name, url) in [
            ("DDNS_PROVIDER_ENDPOINT", &self.ddns.provider.endpoint),
            ("DDNS_IP_SOURCE_URL", &self.ddns.ip_source.url),
        ] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                anyhow::bail!("{} must use HTTP or HTTPS scheme. Got: {}", name, url);
            }
        }

        if parse_log_level(&self.log_level).is_none() {
            anyhow::bail!(
                "DDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            );
        }

        self.ddns.validate()?;

        Ok(())
    }
}

/// Parse `DDNS_RECORDS`: comma-separated `name` or `name:type` entries
fn parse_records(raw: &str, default_type: RecordType) -> Result<Vec<RecordConfig>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| -> Result<RecordConfig> {
            let (name, record_type) = match entry.split_once(':') {
                Some((name, record_type)) => (name.trim(), record_type.trim().parse::<RecordType>()?),
                None => (entry, default_type),
            };
            Ok(RecordConfig::new(name).with_record_type(record_type))
        })
        .collect()
}

/// Validate that a string is a valid domain name
///
/// This implements basic DNS domain name validation per RFC 1035.
/// It's not comprehensive but catches common errors.
fn validate_domain_name(domain: &str) -> Result<()> {
    if domain.is_empty() {
        anyhow::bail!("Domain name cannot be empty");
    }

    // Total length limit (RFC 1035: 253 chars max)
    if domain.len() > 253 {
        anyhow::bail!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        );
    }

    for label in domain.split('.') {
        if label.is_empty() {
            anyhow::bail!("Domain name has empty label: '{}'", domain);
        }

        if label.len() > 63 {
            anyhow::bail!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            );
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            anyhow::bail!(
                "Domain label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric and hyphen only.",
                label
            );
        }

        if label.starts_with('-') || label.ends_with('-') {
            anyhow::bail!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            );
        }
    }

    Ok(())
}

fn parse_log_level(level: &str) -> Option<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Render one status line per domain
fn render(report: &ReconcileReport, format: OutputFormat) -> Result<Vec<String>> {
    report
        .outcomes
        .iter()
        .map(|outcome| match format {
            OutputFormat::Text => Ok(outcome.to_string()),
            OutputFormat::Json => serde_json::to_string(outcome).context("serialize outcome"),
        })
        .collect()
}

fn exit_code_for(report: &ReconcileReport) -> DdnsExitCode {
    if report.has_failures() {
        DdnsExitCode::DomainFailures
    } else {
        DdnsExitCode::Success
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return DdnsExitCode::ConfigError.into();
    }

    // Logs go to stderr; stdout carries only status lines
    let log_level = parse_log_level(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!(
        "Starting ddnsd: {} record(s){}",
        config.ddns.records.len(),
        if config.ddns.provider.dry_run { " [DRY-RUN]" } else { "" }
    );

    // Domains are processed one at a time; no worker pool needed
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let report = match rt.block_on(run_once(&config)) {
        Ok(report) => report,
        Err(e) => {
            error!("Reconciliation aborted: {:#}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    match render(&report, config.output) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(e) => {
            error!("Failed to render report: {:#}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    }

    exit_code_for(&report).into()
}

/// Build the components and run one reconciliation pass
async fn run_once(config: &Config) -> Result<ReconcileReport> {
    let ip_source = HttpIpSource::from_config(&config.ddns.ip_source)?;
    let provider = DreamhostProvider::from_config(&config.ddns.provider)?;

    let engine = DdnsEngine::new(Box::new(ip_source), Box::new(provider), config.ddns.clone())?;
    let report = engine.run().await?;

    info!(
        "Reconciled {} record(s) against {}, {} failure(s)",
        report.outcomes.len(),
        report.current_ip,
        report.failure_count()
    );
    Ok(report)
}
