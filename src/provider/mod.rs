// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Managed DNS provider interface.
//!
//! The pipeline needs two operations from the destination: a paginated record
//! listing and an atomic change batch submission. [`DnsProvider`] captures exactly
//! that so the fetcher and submitter can be driven by any backend.
//!
//! [`http::HttpProvider`] implements it over a Route 53 shaped JSON API.

pub mod http;

pub use http::HttpProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::record::{state_key, Change};

/// Resume position for the next page of a record listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCursor {
    /// Owner name of the first record set on the next page
    pub name: String,
    /// Record type of the first record set on the next page
    pub record_type: String,
    /// Set identifier, for weighted or latency routed record sets
    pub identifier: Option<String>,
}

/// A record set as the destination currently holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationRecordSet {
    /// Fully qualified owner name
    pub name: String,
    /// Record type mnemonic (may be a type the pipeline never writes, e.g. NS or SOA)
    pub record_type: String,
    /// Time to live, absent for alias record sets
    pub ttl: Option<u32>,
    /// Record values
    pub values: Vec<String>,
    /// Set identifier, for weighted or latency routed record sets
    pub set_identifier: Option<String>,
}

impl DestinationRecordSet {
    /// Normalized `name:TYPE` key, matching [`crate::record::RecordKey::state_key`].
    #[must_use]
    pub fn key(&self) -> String {
        state_key(&self.name, &self.record_type)
    }
}

/// One page of a record listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSetPage {
    /// Record sets on this page
    pub record_sets: Vec<DestinationRecordSet>,
    /// Where the next page starts, if any
    pub next: Option<ListCursor>,
    /// True if more pages follow
    pub truncated: bool,
}

/// Receipt for a submitted change batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeInfo {
    /// Provider-assigned change identifier
    pub id: String,
    /// Change status (e.g. PENDING, INSYNC)
    pub status: String,
}

/// Destination record store.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List one page of record sets in a zone.
    ///
    /// `cursor` is `None` for the first page and the previous page's
    /// [`RecordSetPage::next`] afterwards.
    async fn list_records(
        &self,
        zone_id: &str,
        page_size: u32,
        cursor: Option<&ListCursor>,
    ) -> Result<RecordSetPage, ProviderError>;

    /// Submit a batch of changes as one atomic call.
    async fn submit_change_batch(
        &self,
        zone_id: &str,
        changes: &[Change],
        comment: &str,
    ) -> Result<ChangeInfo, ProviderError>;
}
