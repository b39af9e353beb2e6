// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation of mapped source records against destination state.
//!
//! Produces the ordered change list for a zone:
//!
//! 1. Each record's `name:TYPE` key is looked up in the destination state and, if
//!    present, moved out of it. This is bookkeeping only: a matched record is still
//!    upserted since its values may have drifted.
//! 2. Records failing validation are logged and dropped.
//! 3. A record whose key equals the key of the previously emitted change is merged
//!    into that change. Only adjacent duplicates coalesce; a duplicate key that
//!    reappears later in transfer order yields a second change.
//!
//! Keys compare on the normalized owner name (see [`crate::record::normalize_name`]).
//!
//! Destination keys never matched by a source record are reported as leftovers.
//! They are never deleted.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::fetcher::DestinationState;
use crate::provider::DestinationRecordSet;
use crate::record::{Change, Record};

/// Reconciliation behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOptions {
    /// Drop changes whose values and TTL already match the destination
    #[serde(default)]
    pub skip_unchanged: bool,
}

/// Result of reconciling one zone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Changes in transfer order, adjacent duplicates coalesced
    pub changes: Vec<Change>,
    /// Distinct destination keys matched by a source record
    pub matched: usize,
    /// Records dropped by validation
    pub invalid: usize,
    /// Changes dropped because the destination already matched
    pub unchanged: usize,
    /// Destination keys no source record matched, sorted
    pub leftover: Vec<String>,
}

/// Reconcile mapped records against the destination state.
///
/// `destination` is consumed: matched keys are moved out and whatever remains is
/// reported in [`Reconciliation::leftover`].
#[must_use]
pub fn reconcile(
    records: Vec<Record>,
    mut destination: DestinationState,
    options: ReconcileOptions,
) -> Reconciliation {
    let mut result = Reconciliation::default();
    let mut matched: HashMap<String, DestinationRecordSet> = HashMap::new();

    for record in records {
        let key = record.key().state_key();

        if let Some(existing) = destination.remove(&key) {
            matched.insert(key, existing);
        }

        if let Err(e) = record.validate() {
            warn!(error = %e, "Dropping invalid record");
            result.invalid += 1;
            continue;
        }

        match result.changes.last_mut() {
            Some(previous) if previous.key() == record.key() => previous.record.absorb(record),
            _ => result.changes.push(Change::upsert(record)),
        }
    }

    if options.skip_unchanged {
        let before = result.changes.len();
        result.changes.retain(|change| {
            matched
                .get(&change.key().state_key())
                .is_none_or(|existing| !is_unchanged(&change.record, existing))
        });
        result.unchanged = before - result.changes.len();
    }

    result.matched = matched.len();
    result.leftover = destination.into_keys().collect();
    result.leftover.sort();

    debug!(
        changes = result.changes.len(),
        matched = result.matched,
        invalid = result.invalid,
        unchanged = result.unchanged,
        leftover = result.leftover.len(),
        "Reconciled source records against destination state"
    );

    result
}

/// True if the destination already holds exactly these values (in any order) and TTL.
fn is_unchanged(record: &Record, existing: &DestinationRecordSet) -> bool {
    if existing.ttl != Some(record.ttl()) {
        return false;
    }

    let mut wanted: Vec<&str> = record.values().iter().map(String::as_str).collect();
    let mut current: Vec<&str> = existing.values.iter().map(String::as_str).collect();
    wanted.sort_unstable();
    current.sort_unstable();
    wanted == current
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod reconciler_tests;
