//! Test doubles and common utilities for reconciliation contract tests
//!
//! This module provides minimal test doubles that record every call the
//! engine makes without touching the network.

#![allow(dead_code)]

use ddns_core::config::{DdnsConfig, ProviderConfig, RecordConfig};
use ddns_core::error::{Error, Result};
use ddns_core::record::{DnsRecord, NewRecord};
use ddns_core::traits::{IpSource, RecordStore};
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An IP source that always returns the same address
pub struct FixedIpSource {
    ip: IpAddr,
    call_count: Arc<AtomicUsize>,
}

impl FixedIpSource {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn parse(ip: &str) -> Self {
        Self::new(ip.parse().expect("valid test IP"))
    }
}

#[async_trait::async_trait]
impl IpSource for FixedIpSource {
    async fn current(&self) -> Result<IpAddr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip)
    }

    fn source_name(&self) -> &'static str {
        "fixed"
    }
}

/// An IP source that always fails with the given error
pub struct FailingIpSource {
    error: Error,
}

impl FailingIpSource {
    pub fn new(error: Error) -> Self {
        Self { error }
    }
}

#[async_trait::async_trait]
impl IpSource for FailingIpSource {
    async fn current(&self) -> Result<IpAddr> {
        Err(self.error.clone())
    }
}

/// One call received by [`MockRecordStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List,
    Remove(DnsRecord),
    Add(NewRecord),
}

/// A record store that serves a fixed snapshot and records every call
///
/// Clones share the call log, so a test can hand one clone to the engine
/// and inspect the other.
#[derive(Clone)]
pub struct MockRecordStore {
    records: Vec<DnsRecord>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    list_error: Option<Error>,
    failing_removes: Arc<HashSet<String>>,
    failing_adds: Arc<HashSet<String>>,
}

impl MockRecordStore {
    pub fn new(records: Vec<DnsRecord>) -> Self {
        Self {
            records,
            calls: Arc::new(Mutex::new(Vec::new())),
            list_error: None,
            failing_removes: Arc::new(HashSet::new()),
            failing_adds: Arc::new(HashSet::new()),
        }
    }

    /// Make `list_records()` fail
    pub fn failing_list(mut self, error: Error) -> Self {
        self.list_error = Some(error);
        self
    }

    /// Make `remove_record()` fail for the given domain
    pub fn failing_remove(mut self, domain: &str) -> Self {
        Arc::make_mut(&mut self.failing_removes).insert(domain.to_string());
        self
    }

    /// Make `add_record()` fail for the given domain
    pub fn failing_add(mut self, domain: &str) -> Self {
        Arc::make_mut(&mut self.failing_adds).insert(domain.to_string());
        self
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Only the remove/add calls
    pub fn mutations(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, StoreCall::List))
            .collect()
    }

    /// Mutations that touched the given domain
    pub fn mutations_for(&self, domain: &str) -> Vec<StoreCall> {
        self.mutations()
            .into_iter()
            .filter(|c| match c {
                StoreCall::Remove(r) => r.record == domain,
                StoreCall::Add(r) => r.record == domain,
                StoreCall::List => false,
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl RecordStore for MockRecordStore {
    async fn list_records(&self) -> Result<Vec<DnsRecord>> {
        self.calls.lock().unwrap().push(StoreCall::List);
        match &self.list_error {
            Some(e) => Err(e.clone()),
            None => Ok(self.records.clone()),
        }
    }

    async fn remove_record(&self, record: &DnsRecord) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::Remove(record.clone()));
        if self.failing_removes.contains(&record.record) {
            return Err(Error::network("connection reset"));
        }
        Ok(())
    }

    async fn add_record(&self, record: &NewRecord) -> Result<()> {
        self.calls.lock().unwrap().push(StoreCall::Add(record.clone()));
        if self.failing_adds.contains(&record.record) {
            return Err(Error::provider("mock", "record_add_failed"));
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Build a provider row
pub fn record(name: &str, record_type: &str, value: &str, editable: &str) -> DnsRecord {
    DnsRecord {
        account_id: "1234".to_string(),
        zone: "example.com".to_string(),
        record: name.to_string(),
        record_type: record_type.to_string(),
        value: value.to_string(),
        comment: String::new(),
        editable: editable.to_string(),
    }
}

/// Helper to create a minimal DdnsConfig for testing
pub fn minimal_config(domains: &[&str]) -> DdnsConfig {
    DdnsConfig {
        provider: ProviderConfig::new("test-key"),
        records: domains.iter().map(|d| RecordConfig::new(*d)).collect(),
        ..DdnsConfig::default()
    }
}
