// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Destination state fetching.
//!
//! Builds a point-in-time snapshot of the destination zone by paging through the
//! provider's record listing. The snapshot is rebuilt on every run and never cached.

use std::collections::HashMap;
use tracing::debug;

use crate::errors::FetchError;
use crate::provider::{DestinationRecordSet, DnsProvider, ListCursor};

/// Destination record sets keyed by `name:TYPE`.
pub type DestinationState = HashMap<String, DestinationRecordSet>;

/// List all record sets of a zone with automatic pagination.
///
/// Each request after the first carries the previous page's cursor. Pagination
/// stops at the first page not flagged as truncated.
///
/// # Arguments
///
/// * `provider` - Destination provider client
/// * `zone_id` - Destination zone identifier
/// * `page_size` - Maximum record sets requested per page
///
/// # Errors
///
/// Returns [`FetchError::ListFailed`] if any list call fails, or
/// [`FetchError::MissingCursor`] if a truncated page carries no cursor.
pub async fn fetch_destination_state(
    provider: &dyn DnsProvider,
    zone_id: &str,
    page_size: u32,
) -> Result<DestinationState, FetchError> {
    let mut state = DestinationState::new();
    let mut cursor: Option<ListCursor> = None;
    let mut page_count = 0;

    loop {
        page_count += 1;
        let result = provider
            .list_records(zone_id, page_size, cursor.as_ref())
            .await
            .map_err(|source| FetchError::ListFailed {
                zone_id: zone_id.to_string(),
                page: page_count,
                source,
            })?;

        let item_count = result.record_sets.len();
        for record_set in result.record_sets {
            state.insert(record_set.key(), record_set);
        }

        debug!(
            zone_id = %zone_id,
            page = page_count,
            items_in_page = item_count,
            total_items = state.len(),
            "Fetched page of destination record sets"
        );

        if !result.truncated {
            break;
        }

        match result.next {
            Some(next) => cursor = Some(next),
            None => {
                return Err(FetchError::MissingCursor {
                    zone_id: zone_id.to_string(),
                    page: page_count,
                })
            }
        }
    }

    debug!(
        zone_id = %zone_id,
        total_pages = page_count,
        total_items = state.len(),
        "Completed destination state fetch"
    );

    Ok(state)
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod fetcher_tests;
