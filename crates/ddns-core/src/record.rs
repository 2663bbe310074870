//! Provider record model
//!
//! [`DnsRecord`] is one row of provider state as fetched in a single
//! snapshot. It is never mutated locally: a change is always expressed as
//! removing the old row and adding a [`NewRecord`].

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// One DNS record as reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Opaque account identifier
    pub account_id: String,
    /// Zone (domain root) the record belongs to
    pub zone: String,
    /// Fully-qualified record name
    pub record: String,
    /// Record type ("A", "AAAA", "CNAME", ...)
    #[serde(rename = "type")]
    pub record_type: String,
    /// Record value; an address in textual form for A/AAAA
    pub value: String,
    /// Free-form comment, may be empty
    pub comment: String,
    /// Provider permission flag, "1" or "0" on the wire
    pub editable: String,
}

impl DnsRecord {
    /// Whether the provider allows this record to be changed
    ///
    /// The wire flag is text. Only the exact string `"1"` means editable;
    /// anything else, including an empty or missing column, does not.
    pub fn is_editable(&self) -> bool {
        self.editable == "1"
    }

    /// Whether this record answers a `(name, type)` lookup
    pub fn matches(&self, name: &str, record_type: &str) -> bool {
        self.record == name && self.record_type == record_type
    }

    /// Whether the record value already points at `ip`
    ///
    /// Values are compared as addresses, so `2001:db8::1` and
    /// `2001:0db8:0:0:0:0:0:1` are equal. A value that is not an address
    /// never holds `ip`.
    pub fn holds_ip(&self, ip: &IpAddr) -> bool {
        self.value
            .trim()
            .parse::<IpAddr>()
            .map(|value| value == *ip)
            .unwrap_or(false)
    }
}

/// A record to be added at the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    /// Fully-qualified record name
    pub record: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: String,
    /// Record value
    pub value: String,
    /// Comment stored alongside the record
    pub comment: String,
}

impl NewRecord {
    /// Create an A record with the default comment
    pub fn new(record: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            record: record.into(),
            record_type: "A".to_string(),
            value: value.into(),
            comment: crate::config::DEFAULT_RECORD_COMMENT.to_string(),
        }
    }

    /// Set the record type
    pub fn with_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = record_type.into();
        self
    }

    /// Set the comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}
