// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Normalized record model shared by the mapper, reconciler and submitter.
//!
//! A [`Record`] is identified by its [`RecordKey`] (owner name and type) and carries
//! the destination-shaped values for that key in transfer order. A [`Change`] pairs a
//! record with the action to apply at the destination.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::CHANGE_ACTION_UPSERT;
use crate::errors::RecordError;

/// Record types the pipeline can replicate to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record
    A,
    /// IPv6 address record
    Aaaa,
    /// Canonical name record
    Cname,
    /// Mail exchange record
    Mx,
    /// Text record
    Txt,
}

impl RecordType {
    /// Every supported record type.
    pub const ALL: [Self; 5] = [Self::A, Self::Aaaa, Self::Cname, Self::Mx, Self::Txt];

    /// Wire mnemonic of the record type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "CNAME" => Ok(Self::Cname),
            "MX" => Ok(Self::Mx),
            "TXT" => Ok(Self::Txt),
            other => Err(format!("Unsupported record type '{other}'")),
        }
    }
}

/// Identity of a record: owner name plus type.
///
/// Displays as `name:TYPE`, the same format used to key destination state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    /// Fully qualified owner name (trailing dot)
    pub name: String,
    /// Record type
    pub record_type: RecordType,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.record_type)
    }
}

impl RecordKey {
    /// Key used to look the record up in destination state.
    #[must_use]
    pub fn state_key(&self) -> String {
        state_key(&self.name, self.record_type.as_str())
    }
}

/// Canonical form of an owner name for comparison.
///
/// DNS names compare case-insensitively, and providers escape special characters
/// in listings as `\DDD` octal (a wildcard comes back as `\052`). Both sides are
/// folded to lowercase with escapes decoded.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let bytes = name.as_bytes();
    let mut out = String::with_capacity(name.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' {
            let digits = bytes.get(i + 1..i + 4);
            let decoded = digits
                .filter(|d| d.iter().all(|b| (b'0'..=b'7').contains(b)))
                .and_then(|d| u8::from_str_radix(std::str::from_utf8(d).ok()?, 8).ok());
            if let Some(byte) = decoded {
                out.push(char::from(byte).to_ascii_lowercase());
                i += 4;
                continue;
            }
        }
        // Multi-byte characters are copied through unchanged.
        let ch = name[i..].chars().next().unwrap_or_default();
        out.push(ch.to_ascii_lowercase());
        i += ch.len_utf8().max(1);
    }

    out
}

/// Destination state key: normalized owner name and uppercase type, `name:TYPE`.
#[must_use]
pub fn state_key(name: &str, record_type: &str) -> String {
    format!(
        "{}:{}",
        normalize_name(name),
        record_type.to_ascii_uppercase()
    )
}

/// A normalized resource record set.
///
/// Values are kept in transfer order. The only mutation after construction is
/// appending values of an adjacent record with the same key during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    name: String,
    record_type: RecordType,
    values: Vec<String>,
    ttl: u32,
}

impl Record {
    /// Create a record from its parts.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        record_type: RecordType,
        values: Vec<String>,
        ttl: u32,
    ) -> Self {
        Self {
            name: name.into(),
            record_type,
            values,
            ttl,
        }
    }

    /// Owner name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record type.
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    /// Values in transfer order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Time to live in seconds.
    #[must_use]
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Identity key of this record.
    #[must_use]
    pub fn key(&self) -> RecordKey {
        RecordKey {
            name: self.name.clone(),
            record_type: self.record_type,
        }
    }

    /// Check that the record can be represented at the destination.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidRecordData`] if the owner name is empty, the
    /// record has no values, or any value is blank.
    pub fn validate(&self) -> Result<(), RecordError> {
        let invalid = |reason: &str| RecordError::InvalidRecordData {
            name: self.name.clone(),
            record_type: self.record_type.to_string(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("record name is empty"));
        }
        if self.values.is_empty() {
            return Err(invalid("record has no values"));
        }
        if self.values.iter().any(|v| v.trim().is_empty()) {
            return Err(invalid("record contains a blank value"));
        }
        Ok(())
    }

    /// Append the values of another record with the same key.
    pub(crate) fn absorb(&mut self, other: Record) {
        debug_assert_eq!(self.key(), other.key());
        self.values.extend(other.values);
    }
}

/// Action applied to a record at the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeAction {
    /// Create the record set, or replace it if it exists
    #[serde(rename = "UPSERT")]
    Upsert,
}

impl ChangeAction {
    /// Wire name of the action.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upsert => CHANGE_ACTION_UPSERT,
        }
    }
}

/// A single change to submit to the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    /// Action to apply
    pub action: ChangeAction,
    /// Record set the action applies to
    pub record: Record,
}

impl Change {
    /// Build an UPSERT change for a record.
    #[must_use]
    pub fn upsert(record: Record) -> Self {
        Self {
            action: ChangeAction::Upsert,
            record,
        }
    }

    /// Identity key of the record this change applies to.
    #[must_use]
    pub fn key(&self) -> RecordKey {
        self.record.key()
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod record_tests;
