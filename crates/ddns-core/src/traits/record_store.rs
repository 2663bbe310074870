// # Record Store Trait
//
// Defines the interface to the DNS provider's record table.
//
// ## Implementations
//
// - DreamHost command API: `ddns-provider-dreamhost` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{NewRecord, RecordStore};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let store = /* RecordStore implementation */;
//
//     let records = store.list_records().await?;
//     if let Some(old) = records.iter().find(|r| r.matches("home.example.com", "A")) {
//         store.remove_record(old).await?;
//         store.add_record(&NewRecord::new("home.example.com", "1.2.3.4")).await?;
//     }
//
//     Ok(())
// }
// ```

use crate::record::{DnsRecord, NewRecord};
use async_trait::async_trait;

/// Trait for provider record tables
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - ✅ Perform HTTP/HTTPS API calls to their endpoint only
/// - ✅ Parse provider-specific responses
/// - ✅ Return success or failure
///
/// ## Forbidden Capabilities
/// - ❌ Implement retry logic or backoff
/// - ❌ Decide whether an update is needed (owned by `DdnsEngine`)
/// - ❌ Cache records beyond a single request
///
/// ## No Atomic Replace
///
/// Providers behind this trait expose only remove and add. Neither call is
/// idempotent at the provider (adding an existing record may duplicate it),
/// so callers must not issue redundant mutations.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch every record the account holds
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<DnsRecord>)`: Records in provider order
    /// - `Err(Error::Network)`: Transport failure or non-success status
    /// - `Err(Error::Provider)`: The response lacks the success marker
    async fn list_records(&self) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Remove the record identified by its name, type and value
    async fn remove_record(&self, record: &DnsRecord) -> Result<(), crate::Error>;

    /// Add a new record
    async fn add_record(&self, record: &NewRecord) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
