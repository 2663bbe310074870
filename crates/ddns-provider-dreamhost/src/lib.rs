// # DreamHost DNS Provider
//
// This crate provides the DreamHost record store for the DDNS system.
//
// ## Command API
//
// Every operation is a single GET against one endpoint. The query string
// carries the API key, the command name and the command parameters:
//
// ```http
// GET /?key=<key>&cmd=dns-list_records
// GET /?key=<key>&cmd=dns-remove_record&record=a.example.com&type=A&value=9.9.9.9
// GET /?key=<key>&cmd=dns-add_record&record=a.example.com&type=A&value=1.2.3.4&comment=...
// ```
//
// A successful body starts with the line `success`. For list commands the
// rest of the body is a tab-separated table (see [`tabular`]). Anything
// else is the provider's error text, surfaced as `Error::Provider`.
//
// ## Trust Level: Untrusted (DNS Provider)
//
// - ✅ One HTTP request per trait call
// - ✅ Full error propagation; no retry, no backoff
// - ✅ Dry-run mode for safe testing
// - ❌ NO decision about whether a record needs to change (owned by DdnsEngine)
// - ❌ NO caching of the record list between calls
//
// ## Security Requirements
//
// - API key NEVER appears in logs or `Debug` output
// - Provider MUST fail fast if the key is empty
//
// ## API Reference
//
// - https://help.dreamhost.com/hc/en-us/articles/217555707-DNS-API-commands

pub mod tabular;

use async_trait::async_trait;
use ddns_core::config::ProviderConfig;
use ddns_core::record::{DnsRecord, NewRecord};
use ddns_core::traits::RecordStore;
use ddns_core::{Error, Result};
use std::time::Duration;

const PROVIDER_NAME: &str = "dreamhost";

/// First line of every successful response
const SUCCESS_MARKER: &str = "success";

/// Commands understood by the DreamHost API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    ListRecords,
    RemoveRecord,
    AddRecord,
}

impl Command {
    fn as_str(&self) -> &'static str {
        match self {
            Command::ListRecords => "dns-list_records",
            Command::RemoveRecord => "dns-remove_record",
            Command::AddRecord => "dns-add_record",
        }
    }
}

/// DreamHost record store
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform `dns-list_records` as usual
/// - Log the remove/add command it would send
/// - **NOT** actually modify DNS records
pub struct DreamhostProvider {
    /// DreamHost API key
    /// ⚠️ NEVER log this value
    api_key: String,

    /// Endpoint receiving the command requests
    endpoint: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, list records but skip remove/add
    dry_run: bool,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for DreamhostProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DreamhostProvider")
            .field("api_key", &"<REDACTED>")
            .field("endpoint", &self.endpoint)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl DreamhostProvider {
    /// Create a new DreamHost provider
    ///
    /// # Parameters
    ///
    /// - `api_key`: DreamHost API key with `dns-*` permissions
    /// - `endpoint`: API endpoint (normally `https://api.dreamhost.com/`)
    /// - `timeout`: Per-request timeout
    /// - `dry_run`: If true, list records but skip remove/add
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
        dry_run: bool,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::config("DreamHost API key cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            endpoint: endpoint.into(),
            client,
            dry_run,
        })
    }

    /// Create a provider from configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        if config.dry_run {
            tracing::warn!("DreamHost provider running in DRY-RUN mode - no changes will be made");
        }

        Self::new(
            config.api_key.clone(),
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
            config.dry_run,
        )
    }

    /// Whether mutations are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Issue one command and return the body that follows the success marker
    ///
    /// # Errors
    ///
    /// - `Error::Network`: request failed or non-success HTTP status
    /// - `Error::Provider`: the body does not start with the success marker
    async fn execute(&self, command: Command, params: &[(&str, &str)]) -> Result<String> {
        // Logged without the query string, which carries the key
        tracing::debug!("GET {} (cmd={})", self.endpoint, command.as_str());

        let mut query: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 2);
        query.push(("key", self.api_key.as_str()));
        query.push(("cmd", command.as_str()));
        query.extend_from_slice(params);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                Error::network(format!(
                    "{} request failed: {}",
                    command.as_str(),
                    e.without_url()
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return Err(match status.as_u16() {
                429 => Error::network(format!(
                    "Rate limit exceeded. Please retry later. Status: {}",
                    status
                )),
                500..=599 => Error::network(format!(
                    "DreamHost server error (transient): {} - {}",
                    status,
                    error_text.trim()
                )),
                _ => Error::network(format!(
                    "{} failed: {} - {}",
                    command.as_str(),
                    status,
                    error_text.trim()
                )),
            });
        }

        let body = response.text().await.map_err(|e| {
            Error::network(format!("Failed to read response: {}", e.without_url()))
        })?;

        strip_success_marker(&body).map(str::to_string)
    }
}

#[async_trait]
impl RecordStore for DreamhostProvider {
    async fn list_records(&self) -> Result<Vec<DnsRecord>> {
        let table = self.execute(Command::ListRecords, &[]).await?;

        let records: Vec<DnsRecord> = tabular::decode(&table)
            .iter()
            .map(record_from_row)
            .collect();

        tracing::debug!("Decoded {} DNS record(s)", records.len());
        Ok(records)
    }

    async fn remove_record(&self, record: &DnsRecord) -> Result<()> {
        let params = [
            ("record", record.record.as_str()),
            ("type", record.record_type.as_str()),
            ("value", record.value.as_str()),
        ];

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send {} for {} {} {}",
                Command::RemoveRecord.as_str(),
                record.record,
                record.record_type,
                record.value
            );
            return Ok(());
        }

        let detail = self.execute(Command::RemoveRecord, &params).await?;
        tracing::debug!("Removed {} {}: {}", record.record, record.record_type, detail.trim());
        Ok(())
    }

    async fn add_record(&self, record: &NewRecord) -> Result<()> {
        let params = [
            ("record", record.record.as_str()),
            ("type", record.record_type.as_str()),
            ("value", record.value.as_str()),
            ("comment", record.comment.as_str()),
        ];

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send {} for {} {} {}",
                Command::AddRecord.as_str(),
                record.record,
                record.record_type,
                record.value
            );
            return Ok(());
        }

        let detail = self.execute(Command::AddRecord, &params).await?;
        tracing::debug!("Added {} {}: {}", record.record, record.record_type, detail.trim());
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Split a response body into the payload after the success marker
///
/// The marker must be the whole first line, matched case-sensitively.
/// Any other body is treated as the provider's error text.
pub fn strip_success_marker(body: &str) -> Result<&str> {
    match body.strip_prefix(SUCCESS_MARKER) {
        Some("") => Ok(""),
        Some(rest) if rest.starts_with('\n') => Ok(&rest[1..]),
        _ => Err(Error::provider(PROVIDER_NAME, error_text(body))),
    }
}

/// The provider's error text without the leading `error` line
fn error_text(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "empty response".to_string();
    }

    match body.strip_prefix("error") {
        Some(rest) if !rest.trim().is_empty() => rest.trim().replace('\n', ": "),
        _ => body.to_string(),
    }
}

/// Convert a decoded row into a record
///
/// Missing columns become empty strings. A row without an `editable`
/// column is therefore treated as not editable.
fn record_from_row(row: &tabular::Row) -> DnsRecord {
    let field = |name: &str| row.get(name).cloned().unwrap_or_default();

    DnsRecord {
        account_id: field("account_id"),
        zone: field("zone"),
        record: field("record"),
        record_type: field("type"),
        value: field("value"),
        comment: field("comment"),
        editable: field("editable"),
    }
}
