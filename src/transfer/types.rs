// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Source-side record representation produced by the zone transfer client.

use hickory_client::rr::{RData, Record};
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::record::RecordType;

/// A resource record as received from the authoritative nameserver.
///
/// One variant per supported record type. Anything else decodes into
/// [`SourceRecord::Unrecognized`], which the mapper ignores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRecord {
    /// IPv4 address record
    A {
        /// Owner name
        name: String,
        /// Time to live in seconds
        ttl: u32,
        /// IPv4 address
        address: Ipv4Addr,
    },
    /// IPv6 address record
    Aaaa {
        /// Owner name
        name: String,
        /// Time to live in seconds
        ttl: u32,
        /// IPv6 address
        address: Ipv6Addr,
    },
    /// Canonical name record
    Cname {
        /// Owner name
        name: String,
        /// Time to live in seconds
        ttl: u32,
        /// Canonical target name
        target: String,
    },
    /// Mail exchange record
    Mx {
        /// Owner name
        name: String,
        /// Time to live in seconds
        ttl: u32,
        /// Exchange preference, lower is preferred
        preference: u16,
        /// Mail exchange host
        exchange: String,
    },
    /// Text record
    Txt {
        /// Owner name
        name: String,
        /// Time to live in seconds
        ttl: u32,
        /// Character strings in wire order
        segments: Vec<String>,
    },
    /// Any record type the pipeline does not replicate
    Unrecognized {
        /// Owner name
        name: String,
        /// Time to live in seconds
        ttl: u32,
        /// Record type mnemonic
        record_type: String,
    },
}

impl SourceRecord {
    /// Owner name of the record.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::A { name, .. }
            | Self::Aaaa { name, .. }
            | Self::Cname { name, .. }
            | Self::Mx { name, .. }
            | Self::Txt { name, .. }
            | Self::Unrecognized { name, .. } => name,
        }
    }

    /// TTL from the record header.
    #[must_use]
    pub fn ttl(&self) -> u32 {
        match self {
            Self::A { ttl, .. }
            | Self::Aaaa { ttl, .. }
            | Self::Cname { ttl, .. }
            | Self::Mx { ttl, .. }
            | Self::Txt { ttl, .. }
            | Self::Unrecognized { ttl, .. } => *ttl,
        }
    }

    /// Supported record type, or `None` for unrecognized records.
    #[must_use]
    pub fn record_type(&self) -> Option<RecordType> {
        match self {
            Self::A { .. } => Some(RecordType::A),
            Self::Aaaa { .. } => Some(RecordType::Aaaa),
            Self::Cname { .. } => Some(RecordType::Cname),
            Self::Mx { .. } => Some(RecordType::Mx),
            Self::Txt { .. } => Some(RecordType::Txt),
            Self::Unrecognized { .. } => None,
        }
    }

    /// Destination-shaped value of this record.
    ///
    /// MX preference is not carried over. TXT segments are joined with a single
    /// space and wrapped in one pair of double quotes.
    #[must_use]
    pub fn normalized_value(&self) -> Option<String> {
        match self {
            Self::A { address, .. } => Some(address.to_string()),
            Self::Aaaa { address, .. } => Some(address.to_string()),
            Self::Cname { target, .. } => Some(target.clone()),
            Self::Mx { exchange, .. } => Some(exchange.clone()),
            Self::Txt { segments, .. } => Some(format!("\"{}\"", segments.join(" "))),
            Self::Unrecognized { .. } => None,
        }
    }
}

impl From<&Record> for SourceRecord {
    fn from(record: &Record) -> Self {
        let name = record.name().to_string();
        let ttl = record.ttl();

        match record.data() {
            Some(RData::A(a)) => Self::A {
                name,
                ttl,
                address: a.0,
            },
            Some(RData::AAAA(aaaa)) => Self::Aaaa {
                name,
                ttl,
                address: aaaa.0,
            },
            Some(RData::CNAME(cname)) => Self::Cname {
                name,
                ttl,
                target: cname.0.to_string(),
            },
            Some(RData::MX(mx)) => Self::Mx {
                name,
                ttl,
                preference: mx.preference(),
                exchange: mx.exchange().to_string(),
            },
            Some(RData::TXT(txt)) => Self::Txt {
                name,
                ttl,
                segments: txt
                    .txt_data()
                    .iter()
                    .map(|segment| String::from_utf8_lossy(segment).into_owned())
                    .collect(),
            },
            _ => Self::Unrecognized {
                name,
                ttl,
                record_type: record.record_type().to_string(),
            },
        }
    }
}

/// Result of a zone transfer.
///
/// A transfer that fails part way through is still a success: `records` holds
/// everything received before the failing envelope and `truncated` carries the cause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Records in transfer order
    pub records: Vec<SourceRecord>,
    /// Number of response envelopes consumed successfully
    pub envelopes: usize,
    /// Why the stream ended early, if it did
    pub truncated: Option<String>,
}

impl TransferOutcome {
    /// True if the stream ended on an error envelope.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.truncated.is_some()
    }
}
