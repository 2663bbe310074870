//! Core traits for the DDNS system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpSource`]: Resolve the current public IP
//! - [`RecordStore`]: List, remove and add provider records

pub mod ip_source;
pub mod record_store;

pub use ip_source::IpSource;
pub use record_store::RecordStore;
