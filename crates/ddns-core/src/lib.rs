// # ddns-core
//
// Core library for the DDNS reconciliation system.
//
// ## Architecture Overview
//
// This library holds everything that decides *whether* a DNS record must
// change. The network collaborators live in their own crates:
// - **IpSource**: Trait for resolving the caller's current public IP
// - **RecordStore**: Trait for listing, removing and adding provider records
// - **DdnsEngine**: Reconciles the configured domains against one snapshot
//   of provider state and issues remove-then-add mutations
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Decision logic is separate from HTTP plumbing
// 2. **Stateless Runs**: Every run re-reads provider truth, nothing is cached
// 3. **Library-First**: All core functionality can be used as a library
// 4. **Idempotency**: A record already holding the current IP is never touched

pub mod config;
pub mod engine;
pub mod error;
pub mod record;
pub mod traits;

// Re-export core types for convenience
pub use config::{DdnsConfig, EngineConfig, IpSourceConfig, ProviderConfig, RecordConfig, RecordType};
pub use engine::{DdnsEngine, DomainOutcome, MutationStage, ReconcileReport};
pub use error::{Error, Result};
pub use record::{DnsRecord, NewRecord};
pub use traits::{IpSource, RecordStore};
