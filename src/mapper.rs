// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Type mapping from transferred records to the normalized record model.
//!
//! Each supported [`SourceRecord`] variant normalizes to a single destination value.
//! Unrecognized record types, and supported types excluded by the configured
//! filter, produce nothing and are counted as skipped.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, trace};

use crate::constants::DEFAULT_RECORD_TTL_SECS;
use crate::record::{Record, RecordType};
use crate::transfer::SourceRecord;

/// Where destination TTLs come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtlPolicy {
    /// Use the TTL from the transferred record header
    Source,
    /// Use the configured default TTL for every record
    #[default]
    Fixed,
}

/// Maps source records to destination-shaped [`Record`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapper {
    record_types: BTreeSet<RecordType>,
    ttl_policy: TtlPolicy,
    default_ttl: u32,
}

impl Default for TypeMapper {
    fn default() -> Self {
        Self {
            record_types: RecordType::ALL.into_iter().collect(),
            ttl_policy: TtlPolicy::Fixed,
            default_ttl: DEFAULT_RECORD_TTL_SECS,
        }
    }
}

/// Records produced by [`TypeMapper::map_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedRecords {
    /// Mapped records in transfer order
    pub records: Vec<Record>,
    /// Source records that produced no value
    pub skipped: usize,
}

impl TypeMapper {
    /// Create a mapper for the given record types and TTL policy.
    #[must_use]
    pub fn new(
        record_types: impl IntoIterator<Item = RecordType>,
        ttl_policy: TtlPolicy,
        default_ttl: u32,
    ) -> Self {
        Self {
            record_types: record_types.into_iter().collect(),
            ttl_policy,
            default_ttl,
        }
    }

    /// True if records of `record_type` are replicated.
    #[must_use]
    pub fn supports(&self, record_type: RecordType) -> bool {
        self.record_types.contains(&record_type)
    }

    /// Map one source record.
    ///
    /// Returns `None` for unrecognized types and types excluded by the filter.
    #[must_use]
    pub fn map(&self, source: &SourceRecord) -> Option<Record> {
        let record_type = source.record_type().filter(|t| self.supports(*t))?;
        let value = source.normalized_value()?;

        let ttl = match self.ttl_policy {
            TtlPolicy::Source => source.ttl(),
            TtlPolicy::Fixed => self.default_ttl,
        };

        Some(Record::new(source.name(), record_type, vec![value], ttl))
    }

    /// Map every source record, preserving transfer order.
    #[must_use]
    pub fn map_all(&self, sources: &[SourceRecord]) -> MappedRecords {
        let mut mapped = MappedRecords::default();

        for source in sources {
            if let Some(record) = self.map(source) {
                mapped.records.push(record);
            } else {
                trace!(name = %source.name(), record = ?source, "Skipping unsupported record");
                mapped.skipped += 1;
            }
        }

        debug!(
            mapped = mapped.records.len(),
            skipped = mapped.skipped,
            "Mapped transferred records"
        );

        mapped
    }
}

#[cfg(test)]
#[path = "mapper_tests.rs"]
mod mapper_tests;
