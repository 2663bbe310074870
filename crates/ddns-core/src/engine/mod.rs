//! Core DDNS engine
//!
//! The DdnsEngine is responsible for:
//! - Resolving the current IP via IpSource
//! - Fetching one snapshot of provider records via RecordStore
//! - Deciding, per configured domain, whether the record must change
//! - Replacing stale records with a remove-then-add pair
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐        ┌──────────────┐
//! │  IpSource   │──ip───▶│              │
//! └─────────────┘        │  DdnsEngine  │───▶ ReconcileReport
//! ┌─────────────┐        │              │
//! │ RecordStore │◀──────▶│              │
//! └─────────────┘        └──────────────┘
//!     list / remove / add
//! ```
//!
//! ## Per-Domain State Machine
//!
//! 1. No `(name, type)` match → `NotFound`, no calls (records are never created)
//! 2. Match, editable flag not `"1"` → `NotEditable`, no calls
//! 3. Match, value already the current IP → `UpToDate`, no calls
//! 4. Match, value differs → `remove_record(old)` then `add_record(new)`,
//!    keeping the old record's type
//!
//! ## Partial Failure
//!
//! The provider has no atomic replace. If the remove succeeds and the add
//! fails, the domain has no record until the next successful run. This is
//! reported as [`DomainOutcome::Failed`] with [`MutationStage::Add`].
//!
//! Only resolving the IP and listing records are fatal to a run. A failed
//! mutation is scoped to its domain and the loop moves on.

use crate::config::{DdnsConfig, RecordConfig};
use crate::error::Result;
use crate::record::{DnsRecord, NewRecord};
use crate::traits::{IpSource, RecordStore};
use serde::Serialize;
use std::fmt;
use std::net::IpAddr;
use tracing::{debug, error, info, warn};

/// Where a domain's reconciliation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationStage {
    /// Before any provider call; the record is untouched
    Precheck,
    /// The remove call failed; the record is untouched
    Remove,
    /// The remove succeeded but the add failed; the domain has no record
    Add,
}

/// Result of reconciling one target domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DomainOutcome {
    /// No record of the looked-up type exists for the domain
    NotFound {
        domain: String,
        record_type: String,
    },

    /// A record exists, but the provider does not allow changing it
    NotEditable {
        domain: String,
        record_type: String,
    },

    /// The record already points at the current IP
    UpToDate {
        domain: String,
        record_type: String,
        ip: IpAddr,
    },

    /// The record was replaced
    Updated {
        domain: String,
        record_type: String,
        previous: String,
        current: IpAddr,
    },

    /// The record could not be brought up to date
    Failed {
        domain: String,
        record_type: String,
        stage: MutationStage,
        error: String,
    },
}

impl DomainOutcome {
    /// The domain this outcome is about
    pub fn domain(&self) -> &str {
        match self {
            DomainOutcome::NotFound { domain, .. }
            | DomainOutcome::NotEditable { domain, .. }
            | DomainOutcome::UpToDate { domain, .. }
            | DomainOutcome::Updated { domain, .. }
            | DomainOutcome::Failed { domain, .. } => domain,
        }
    }

    /// Whether this outcome is a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, DomainOutcome::Failed { .. })
    }
}

impl fmt::Display for DomainOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainOutcome::NotFound {
                domain,
                record_type,
            } => write!(f, "Could not find matching {} record for {}", record_type, domain),
            DomainOutcome::NotEditable { domain, .. } => {
                write!(f, "DNS record for {} is not editable", domain)
            }
            DomainOutcome::UpToDate { domain, ip, .. } => {
                write!(f, "DNS record for {} is already set to {}", domain, ip)
            }
            DomainOutcome::Updated {
                domain,
                previous,
                current,
                ..
            } => write!(f, "Updated {} from {} to {}", domain, previous, current),
            DomainOutcome::Failed {
                domain,
                record_type,
                stage,
                error,
            } => match stage {
                MutationStage::Precheck => write!(f, "Skipped {}: {}", domain, error),
                MutationStage::Remove => write!(
                    f,
                    "Failed to update {}: remove failed, record left unchanged: {}",
                    domain, error
                ),
                MutationStage::Add => write!(
                    f,
                    "Failed to update {}: old record was removed but the add failed, \
                     {} has no {} record until the next successful run: {}",
                    domain, domain, record_type, error
                ),
            },
        }
    }
}

/// Outcome of one reconciliation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// The IP every domain was compared against
    pub current_ip: IpAddr,
    /// One outcome per target domain, in target order
    pub outcomes: Vec<DomainOutcome>,
}

impl ReconcileReport {
    /// Number of domains that failed
    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    /// Whether any domain failed
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(DomainOutcome::is_failure)
    }
}

/// Core DDNS engine
///
/// The engine performs one reconciliation pass per call. It holds no state
/// between passes: every pass re-resolves the IP and re-reads the records.
///
/// ## Threading
///
/// Domains are processed strictly one at a time. The IP and the record
/// snapshot are read-only for the whole pass.
pub struct DdnsEngine {
    /// IP source for the current address
    ip_source: Box<dyn IpSource>,

    /// Provider record table
    store: Box<dyn RecordStore>,

    /// DNS records to keep current
    records: Vec<RecordConfig>,

    /// Comment attached to re-added records
    comment: String,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `store`: Record store implementation
    /// - `config`: DDNS configuration
    pub fn new(
        ip_source: Box<dyn IpSource>,
        store: Box<dyn RecordStore>,
        config: DdnsConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            ip_source,
            store,
            records: config.records,
            comment: config.engine.comment,
        })
    }

    /// Reconcile every configured record
    pub async fn run(&self) -> Result<ReconcileReport> {
        self.reconcile(&self.records).await
    }

    /// Reconcile the given target records
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileReport)`: The pass completed; individual domains may
    ///   still have failed
    /// - `Err(Error)`: The current IP or the record list could not be
    ///   obtained, and no mutation was attempted
    pub async fn reconcile(&self, targets: &[RecordConfig]) -> Result<ReconcileReport> {
        let current_ip = self.ip_source.current().await?;
        info!(
            "Current IP: {} (via {})",
            current_ip,
            self.ip_source.source_name()
        );

        let records = self.store.list_records().await?;
        debug!(
            "Fetched {} record(s) from {}",
            records.len(),
            self.store.provider_name()
        );

        let mut outcomes = Vec::with_capacity(targets.len());
        for target in targets {
            let outcome = self.reconcile_domain(target, current_ip, &records).await;
            if outcome.is_failure() {
                warn!("{}", outcome);
            } else {
                info!("{}", outcome);
            }
            outcomes.push(outcome);
        }

        Ok(ReconcileReport {
            current_ip,
            outcomes,
        })
    }

    /// Walk one domain through the state machine
    async fn reconcile_domain(
        &self,
        target: &RecordConfig,
        current_ip: IpAddr,
        records: &[DnsRecord],
    ) -> DomainOutcome {
        let domain = target.name.clone();
        let lookup_type = target.record_type.resolve(&current_ip);

        let Some(existing) = find_record(records, &target.name, lookup_type) else {
            return DomainOutcome::NotFound {
                domain,
                record_type: lookup_type.to_string(),
            };
        };

        let record_type = existing.record_type.clone();

        if !existing.is_editable() {
            return DomainOutcome::NotEditable {
                domain,
                record_type,
            };
        }

        if existing.holds_ip(&current_ip) {
            return DomainOutcome::UpToDate {
                domain,
                record_type,
                ip: current_ip,
            };
        }

        // The add would be rejected after the remove already went through
        if !type_fits_ip(&record_type, &current_ip) {
            return DomainOutcome::Failed {
                error: format!("{} record cannot hold {}", record_type, current_ip),
                domain,
                record_type,
                stage: MutationStage::Precheck,
            };
        }

        info!(
            "Updating {} from {} to {}",
            domain, existing.value, current_ip
        );

        if let Err(e) = self.store.remove_record(existing).await {
            return DomainOutcome::Failed {
                domain,
                record_type,
                stage: MutationStage::Remove,
                error: e.to_string(),
            };
        }

        let replacement = NewRecord::new(domain.clone(), current_ip.to_string())
            .with_type(record_type.clone())
            .with_comment(self.comment.clone());

        if let Err(e) = self.store.add_record(&replacement).await {
            error!(
                "Record {} {} was removed but re-adding it failed",
                domain, record_type
            );
            return DomainOutcome::Failed {
                domain,
                record_type,
                stage: MutationStage::Add,
                error: e.to_string(),
            };
        }

        DomainOutcome::Updated {
            domain,
            record_type,
            previous: existing.value.clone(),
            current: current_ip,
        }
    }
}

/// First record answering the `(name, type)` lookup
fn find_record<'a>(records: &'a [DnsRecord], name: &str, record_type: &str) -> Option<&'a DnsRecord> {
    records.iter().find(|r| r.matches(name, record_type))
}

fn type_fits_ip(record_type: &str, ip: &IpAddr) -> bool {
    match record_type {
        "A" => ip.is_ipv4(),
        "AAAA" => ip.is_ipv6(),
        _ => true,
    }
}
