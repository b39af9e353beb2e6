// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone job pipeline.
//!
//! A [`ZoneSyncer`] runs one zone job end to end:
//!
//! 1. Fetch the destination state snapshot
//! 2. Transfer the zone from its authoritative server
//! 3. Map transferred records to the normalized model
//! 4. Reconcile against the destination state
//! 5. Submit the resulting changes in concurrent batches
//!
//! Transfer and fetch failures abort the job. Validation and batch failures are
//! logged and reflected in the [`ZoneSyncReport`].

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::constants::{LIST_PAGE_SIZE, MAX_CHANGE_BATCH_SIZE};
use crate::errors::SyncError;
use crate::fetcher::fetch_destination_state;
use crate::mapper::TypeMapper;
use crate::provider::DnsProvider;
use crate::reconciler::{reconcile, ReconcileOptions};
use crate::record::Change;
use crate::submitter::{submit_changes, SubmissionReport};
use crate::transfer::ZoneTransfer;

/// A zone to replicate and where it goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneJob {
    /// Fully qualified zone name (trailing dot)
    pub zone: String,
    /// Authoritative nameserver, `host`, `ip` or `ip:port`
    pub server: String,
    /// Destination zone identifier at the provider
    pub zone_id: String,
}

/// Pipeline settings shared by every job of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Record sets requested per destination list call
    pub page_size: u32,
    /// Maximum changes per submitted batch
    pub batch_size: usize,
    /// Source record mapping rules
    pub mapper: TypeMapper,
    /// Reconciliation switches
    pub reconcile: ReconcileOptions,
    /// Compute and log changes without submitting them
    pub dry_run: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            page_size: LIST_PAGE_SIZE,
            batch_size: MAX_CHANGE_BATCH_SIZE,
            mapper: TypeMapper::default(),
            reconcile: ReconcileOptions::default(),
            dry_run: false,
        }
    }
}

/// Structured result of one zone job.
#[derive(Debug, Clone)]
pub struct ZoneSyncReport {
    /// Zone name
    pub zone: String,
    /// Destination zone identifier
    pub zone_id: String,
    /// Records received from the transfer, all types
    pub transferred: usize,
    /// Cause of a transfer that ended early, if any
    pub truncated: Option<String>,
    /// Records mapped to a supported type
    pub mapped: usize,
    /// Unsupported or filtered record types
    pub skipped: usize,
    /// Records dropped by validation
    pub invalid: usize,
    /// Destination keys matched by a source record
    pub matched: usize,
    /// Changes dropped because the destination already matched
    pub unchanged: usize,
    /// Destination keys absent from the source zone, sorted
    pub leftover: Vec<String>,
    /// Changes computed for the zone, in submission order
    pub changes: Vec<Change>,
    /// Batch outcomes, `None` for a dry run
    pub submission: Option<SubmissionReport>,
}

impl ZoneSyncReport {
    /// True if every attempted batch was accepted.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.submission.as_ref().is_none_or(|s| s.failed() == 0)
    }
}

/// Runs zone jobs against a transfer source and a destination provider.
pub struct ZoneSyncer {
    transfer: Arc<dyn ZoneTransfer>,
    provider: Arc<dyn DnsProvider>,
    options: SyncOptions,
}

impl ZoneSyncer {
    /// Create a syncer over a transfer source and a destination provider.
    #[must_use]
    pub fn new(
        transfer: Arc<dyn ZoneTransfer>,
        provider: Arc<dyn DnsProvider>,
        options: SyncOptions,
    ) -> Self {
        Self {
            transfer,
            provider,
            options,
        }
    }

    /// Pipeline settings applied to every job.
    #[must_use]
    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Run one zone job.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Fetch`] if the destination state cannot be listed and
    /// [`SyncError::Transfer`] if the zone transfer cannot be started. Batch
    /// failures are not errors; they are reported in [`ZoneSyncReport::submission`].
    pub async fn sync_zone(&self, job: &ZoneJob) -> Result<ZoneSyncReport, SyncError> {
        info!(
            zone = %job.zone,
            server = %job.server,
            zone_id = %job.zone_id,
            "Starting zone sync"
        );

        let destination =
            fetch_destination_state(self.provider.as_ref(), &job.zone_id, self.options.page_size)
                .await?;
        info!(
            zone = %job.zone,
            zone_id = %job.zone_id,
            record_sets = destination.len(),
            "Fetched destination state"
        );

        let outcome = self.transfer.transfer(&job.zone, &job.server).await?;
        if let Some(cause) = &outcome.truncated {
            warn!(
                zone = %job.zone,
                server = %job.server,
                records = outcome.records.len(),
                cause = %cause,
                "Zone transfer ended early, continuing with partial zone"
            );
        }
        info!(
            zone = %job.zone,
            records = outcome.records.len(),
            envelopes = outcome.envelopes,
            "Transferred zone"
        );

        let mapped = self.options.mapper.map_all(&outcome.records);
        info!(
            zone = %job.zone,
            mapped = mapped.records.len(),
            skipped = mapped.skipped,
            "Mapped transferred records"
        );
        let mapped_count = mapped.records.len();

        let reconciliation = reconcile(mapped.records, destination, self.options.reconcile);
        info!(
            zone = %job.zone,
            changes = reconciliation.changes.len(),
            matched = reconciliation.matched,
            invalid = reconciliation.invalid,
            unchanged = reconciliation.unchanged,
            leftover = reconciliation.leftover.len(),
            "Computed changes"
        );
        if !reconciliation.leftover.is_empty() {
            debug!(
                zone = %job.zone,
                leftover = ?reconciliation.leftover,
                "Destination record sets not present in source zone"
            );
        }

        let submission = if self.options.dry_run {
            for change in &reconciliation.changes {
                info!(
                    zone = %job.zone,
                    action = change.action.as_str(),
                    name = %change.record.name(),
                    record_type = %change.record.record_type(),
                    values = ?change.record.values(),
                    ttl = change.record.ttl(),
                    "Dry run: change not submitted"
                );
            }
            None
        } else if reconciliation.changes.is_empty() {
            info!(zone = %job.zone, "No changes to submit");
            Some(SubmissionReport::default())
        } else {
            let comment = format!("zonesync {} at {}", job.zone, Utc::now().to_rfc3339());
            let report = submit_changes(
                self.provider.as_ref(),
                &job.zone_id,
                &reconciliation.changes,
                self.options.batch_size,
                &comment,
            )
            .await;
            info!(
                zone = %job.zone,
                zone_id = %job.zone_id,
                batches = report.batches.len(),
                succeeded = report.succeeded(),
                failed = report.failed(),
                submitted = report.submitted_changes(),
                "Submitted changes"
            );
            Some(report)
        };

        Ok(ZoneSyncReport {
            zone: job.zone.clone(),
            zone_id: job.zone_id.clone(),
            transferred: outcome.records.len(),
            truncated: outcome.truncated,
            mapped: mapped_count,
            skipped: mapped.skipped,
            invalid: reconciliation.invalid,
            matched: reconciliation.matched,
            unchanged: reconciliation.unchanged,
            leftover: reconciliation.leftover,
            changes: reconciliation.changes,
            submission,
        })
    }

    /// Run every job in order.
    ///
    /// A failed job is logged and does not stop the remaining jobs. Results are
    /// returned in job order.
    pub async fn sync_all(&self, jobs: &[ZoneJob]) -> Vec<Result<ZoneSyncReport, SyncError>> {
        let mut results = Vec::with_capacity(jobs.len());

        for job in jobs {
            let result = self.sync_zone(job).await;
            if let Err(e) = &result {
                error!(
                    zone = %job.zone,
                    zone_id = %job.zone_id,
                    reason = e.reason(),
                    error = %e,
                    "Zone sync failed"
                );
            }
            results.push(result);
        }

        results
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod sync_tests;
