// # IP Source Trait
//
// Defines the interface for resolving the caller's current public IP.
//
// ## Implementations
//
// - HTTP "what is my IP" services: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let current_ip = source.current().await?;
//     println!("Current IP: {}", current_ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for IP source implementations
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Trust Level: Semi-Trusted
///
/// ## Allowed Capabilities
/// - ✅ Perform a single request to their configured service
/// - ✅ Validate the answer as an IP address
///
/// ## Forbidden Capabilities
/// - ❌ Perform DNS updates (use `RecordStore`)
/// - ❌ Implement retry logic (retry policy belongs to the scheduler)
/// - ❌ Cache an address between runs
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current IP address
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The current, validated IP address
    /// - `Err(Error::Network)`: The service could not be reached or answered
    ///   with a non-success status
    /// - `Err(Error::InvalidAddress)`: The answer is not a usable IP address
    async fn current(&self) -> Result<IpAddr, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str {
        "unknown"
    }
}
