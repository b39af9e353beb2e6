// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory fakes of the transfer client and provider for unit tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;

use crate::errors::{ProviderError, TransferError};
use crate::provider::{ChangeInfo, DestinationRecordSet, DnsProvider, ListCursor, RecordSetPage};
use crate::record::Change;
use crate::transfer::{SourceRecord, TransferOutcome, ZoneTransfer};

/// Build a destination record set.
pub(crate) fn record_set(name: &str, record_type: &str, values: &[&str]) -> DestinationRecordSet {
    DestinationRecordSet {
        name: name.to_string(),
        record_type: record_type.to_string(),
        ttl: Some(60),
        values: values.iter().map(ToString::to_string).collect(),
        set_identifier: None,
    }
}

/// Build a cursor pointing at `name`/`record_type`.
pub(crate) fn cursor(name: &str, record_type: &str) -> ListCursor {
    ListCursor {
        name: name.to_string(),
        record_type: record_type.to_string(),
        identifier: None,
    }
}

/// Provider serving fixed pages and recording every call.
#[derive(Default)]
pub(crate) struct FakeProvider {
    pages: Vec<RecordSetPage>,
    fail_list_on_page: Option<usize>,
    fail_batch_containing: Option<String>,
    batch_barrier: Option<Arc<Barrier>>,
    list_calls: Mutex<Vec<Option<ListCursor>>>,
    batches: Mutex<Vec<(Vec<Change>, String)>>,
}

impl FakeProvider {
    /// Serve `pages` in order. Page `n + 1` is served for the cursor in page `n`.
    pub(crate) fn with_pages(pages: Vec<RecordSetPage>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    /// Serve a single non-truncated page.
    pub(crate) fn with_record_sets(record_sets: Vec<DestinationRecordSet>) -> Self {
        Self::with_pages(vec![RecordSetPage {
            record_sets,
            next: None,
            truncated: false,
        }])
    }

    /// Fail the list call for the given 1-based page.
    pub(crate) fn failing_list_on_page(mut self, page: usize) -> Self {
        self.fail_list_on_page = Some(page);
        self
    }

    /// Fail any batch carrying a change for `name`.
    pub(crate) fn failing_batches_containing(mut self, name: &str) -> Self {
        self.fail_batch_containing = Some(name.to_string());
        self
    }

    /// Hold every batch submission until `barrier` releases.
    pub(crate) fn with_batch_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.batch_barrier = Some(barrier);
        self
    }

    pub(crate) fn list_calls(&self) -> Vec<Option<ListCursor>> {
        self.list_calls.lock().unwrap().clone()
    }

    pub(crate) fn batches(&self) -> Vec<(Vec<Change>, String)> {
        self.batches.lock().unwrap().clone()
    }

    fn api_error(reason: &str) -> ProviderError {
        ProviderError::UnexpectedHttpResponse {
            endpoint: "fake".to_string(),
            status_code: 400,
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl DnsProvider for FakeProvider {
    async fn list_records(
        &self,
        _zone_id: &str,
        _page_size: u32,
        cursor: Option<&ListCursor>,
    ) -> Result<RecordSetPage, ProviderError> {
        let call = {
            let mut calls = self.list_calls.lock().unwrap();
            calls.push(cursor.cloned());
            calls.len()
        };

        if self.fail_list_on_page == Some(call) {
            return Err(Self::api_error("Throttling"));
        }

        let index = match cursor {
            None => 0,
            Some(c) => self
                .pages
                .iter()
                .position(|p| p.next.as_ref() == Some(c))
                .map(|i| i + 1)
                .ok_or_else(|| Self::api_error("unknown cursor"))?,
        };

        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }

    async fn submit_change_batch(
        &self,
        _zone_id: &str,
        changes: &[Change],
        comment: &str,
    ) -> Result<ChangeInfo, ProviderError> {
        let batch = {
            let mut batches = self.batches.lock().unwrap();
            batches.push((changes.to_vec(), comment.to_string()));
            batches.len()
        };

        if let Some(barrier) = &self.batch_barrier {
            barrier.wait().await;
        }

        if let Some(name) = &self.fail_batch_containing {
            if changes.iter().any(|c| c.record.name() == name) {
                return Err(Self::api_error("InvalidChangeBatch"));
            }
        }

        Ok(ChangeInfo {
            id: format!("/change/C{batch}"),
            status: "PENDING".to_string(),
        })
    }
}

/// Transfer client returning a canned outcome.
pub(crate) struct FakeTransfer {
    outcome: Result<TransferOutcome, TransferError>,
}

impl FakeTransfer {
    pub(crate) fn with_records(records: Vec<SourceRecord>) -> Self {
        Self {
            outcome: Ok(TransferOutcome {
                envelopes: 1,
                records,
                truncated: None,
            }),
        }
    }

    pub(crate) fn with_outcome(outcome: Result<TransferOutcome, TransferError>) -> Self {
        Self { outcome }
    }
}

#[async_trait]
impl ZoneTransfer for FakeTransfer {
    async fn transfer(&self, _zone: &str, _server: &str) -> Result<TransferOutcome, TransferError> {
        self.outcome.clone()
    }
}
