// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Batched, concurrent submission of changes to the destination.
//!
//! The change list is split into consecutive batches of at most
//! [`MAX_CHANGE_BATCH_SIZE`] entries. Every batch is dispatched at once and the
//! submitter waits for all of them. Batch outcomes are independent: a failed batch
//! is logged and neither cancels nor rolls back the others. Nothing is retried.

use futures::future::join_all;
use tracing::{error, info};

use crate::constants::MAX_CHANGE_BATCH_SIZE;
use crate::errors::SubmissionError;
use crate::provider::{ChangeInfo, DnsProvider};
use crate::record::Change;

/// Outcome of one change batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// 0-based batch index
    pub index: usize,
    /// Number of changes in the batch
    pub changes: usize,
    /// Provider receipt or the reason the batch failed
    pub result: Result<ChangeInfo, SubmissionError>,
}

/// Outcomes of every batch submitted for a zone, in batch order.
#[derive(Debug, Clone, Default)]
pub struct SubmissionReport {
    /// One entry per batch
    pub batches: Vec<BatchOutcome>,
}

impl SubmissionReport {
    /// Number of batches the provider accepted.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.batches.iter().filter(|b| b.result.is_ok()).count()
    }

    /// Number of batches the provider rejected or that could not be sent.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.batches.len() - self.succeeded()
    }

    /// Number of changes carried by accepted batches.
    #[must_use]
    pub fn submitted_changes(&self) -> usize {
        self.batches
            .iter()
            .filter(|b| b.result.is_ok())
            .map(|b| b.changes)
            .sum()
    }

    /// Errors of every failed batch.
    pub fn errors(&self) -> impl Iterator<Item = &SubmissionError> {
        self.batches.iter().filter_map(|b| b.result.as_ref().err())
    }
}

/// Split `changes` into consecutive batches of at most `batch_size` entries.
///
/// `batch_size` is clamped to `1..=MAX_CHANGE_BATCH_SIZE`.
#[must_use]
pub fn partition_changes(changes: &[Change], batch_size: usize) -> Vec<&[Change]> {
    changes
        .chunks(batch_size.clamp(1, MAX_CHANGE_BATCH_SIZE))
        .collect()
}

/// Submit every change for a zone and wait for all batches to complete.
///
/// # Arguments
///
/// * `provider` - Destination provider client
/// * `zone_id` - Destination zone identifier
/// * `changes` - Ordered change list
/// * `batch_size` - Maximum changes per batch (clamped to the provider ceiling)
/// * `comment` - Human-readable comment attached to every batch
pub async fn submit_changes(
    provider: &dyn DnsProvider,
    zone_id: &str,
    changes: &[Change],
    batch_size: usize,
    comment: &str,
) -> SubmissionReport {
    let batches = partition_changes(changes, batch_size);

    info!(
        zone_id = %zone_id,
        changes = changes.len(),
        batches = batches.len(),
        "Submitting change batches"
    );

    let submissions = batches.into_iter().enumerate().map(|(index, batch)| async move {
        let result = provider
            .submit_change_batch(zone_id, batch, comment)
            .await
            .map_err(|source| SubmissionError {
                zone_id: zone_id.to_string(),
                batch: index,
                changes: batch.len(),
                source,
            });

        match &result {
            Ok(info) => info!(
                zone_id = %zone_id,
                batch = index,
                changes = batch.len(),
                change_id = %info.id,
                status = %info.status,
                "Change batch accepted"
            ),
            Err(e) => error!(
                zone_id = %zone_id,
                batch = index,
                changes = batch.len(),
                error = %e,
                "Change batch failed"
            ),
        }

        BatchOutcome {
            index,
            changes: batch.len(),
            result,
        }
    });

    SubmissionReport {
        batches: join_all(submissions).await,
    }
}

#[cfg(test)]
#[path = "submitter_tests.rs"]
mod submitter_tests;
