// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the zone sync pipeline.
//!
//! This module provides specialized error types for each pipeline stage:
//! - Zone transfers (AXFR) from the authoritative nameserver
//! - Provider API operations (record listing and change submission)
//! - Destination state fetching
//! - Record validation before a change is emitted
//!
//! Transfer and fetch failures abort the zone job they occur in. Validation and
//! submission failures are absorbed at the record or batch level and only logged.

use thiserror::Error;

/// Errors that can occur while transferring a zone from the authoritative nameserver.
///
/// Every variant is raised before records start streaming. A failure in the middle
/// of the stream is not an error: it truncates the transfer and is reported through
/// [`crate::transfer::TransferOutcome::truncated`].
#[derive(Error, Debug, Clone)]
pub enum TransferError {
    /// The nameserver address could not be parsed or resolved
    #[error("Invalid nameserver address '{server}': {reason}")]
    InvalidServerAddress {
        /// The server address as configured
        server: String,
        /// Why the address could not be used
        reason: String,
    },

    /// The zone name is not a valid DNS name
    #[error("Invalid zone name '{zone}': {reason}")]
    InvalidZoneName {
        /// The zone name as configured
        zone: String,
        /// Why the name was rejected
        reason: String,
    },

    /// TSIG key material is unusable (bad base64, unsupported algorithm, bad key name)
    #[error("TSIG key '{key_name}' is unusable: {reason}")]
    InvalidTsigKey {
        /// The TSIG key name
        key_name: String,
        /// Why the signer could not be created
        reason: String,
    },

    /// TCP connection to the nameserver could not be established
    #[error("Failed to connect to {server} for zone transfer of '{zone}': {reason}")]
    ConnectionFailed {
        /// The zone being transferred
        zone: String,
        /// The nameserver (IP:port)
        server: String,
        /// Reason for the connection failure
        reason: String,
    },

    /// The nameserver refused the transfer before sending any records
    ///
    /// Typically caused by TSIG verification failures, the server not being
    /// authoritative for the zone, or an `allow-transfer` ACL.
    #[error("Zone transfer for '{zone}' rejected by {server}: {reason}")]
    TransferRejected {
        /// The zone being transferred
        zone: String,
        /// The nameserver that rejected the transfer
        server: String,
        /// Reason reported for the rejection
        reason: String,
    },

    /// The blocking transfer task panicked or was cancelled
    #[error("Zone transfer task for '{zone}' failed: {reason}")]
    TaskFailed {
        /// The zone being transferred
        zone: String,
        /// Join error message
        reason: String,
    },
}

/// Errors returned by a [`crate::provider::DnsProvider`] implementation.
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// HTTP connection failed (network unreachable, connection refused)
    #[error("HTTP connection to {endpoint} failed: {reason}")]
    HttpConnectionFailed {
        /// The endpoint that couldn't be reached
        endpoint: String,
        /// Reason for the connection failure
        reason: String,
    },

    /// HTTP request timeout
    #[error("HTTP request to {endpoint} timed out")]
    HttpRequestTimeout {
        /// The endpoint that timed out
        endpoint: String,
    },

    /// Provider API answered with a non-success status code
    #[error("Unexpected HTTP response from {endpoint}: {status_code} {reason}")]
    UnexpectedHttpResponse {
        /// The endpoint that returned the response
        endpoint: String,
        /// HTTP status code
        status_code: u16,
        /// Response body or error message
        reason: String,
    },

    /// Provider API answered with a body that could not be decoded
    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse {
        /// The endpoint that returned the response
        endpoint: String,
        /// Decoder error message
        reason: String,
    },
}

/// Errors that can occur while building the destination state for a zone.
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    /// A list call failed part way through pagination
    #[error("Failed to list records for zone {zone_id} (page {page}): {source}")]
    ListFailed {
        /// The destination zone identifier
        zone_id: String,
        /// 1-based page number of the failing call
        page: usize,
        /// Underlying provider error
        #[source]
        source: ProviderError,
    },

    /// The provider reported a truncated page without a cursor to resume from
    #[error("Provider reported page {page} of zone {zone_id} as truncated without a resume cursor")]
    MissingCursor {
        /// The destination zone identifier
        zone_id: String,
        /// 1-based page number of the offending page
        page: usize,
    },
}

/// Record validation errors.
///
/// Raised when a mapped record cannot be represented at the destination. The record
/// is dropped and the zone job continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Invalid record data (empty name, no values, blank value)
    #[error("Invalid record data for '{name}' ({record_type}): {reason}")]
    InvalidRecordData {
        /// The record owner name
        name: String,
        /// The record type
        record_type: String,
        /// Explanation of what is invalid
        reason: String,
    },
}

/// A single change batch could not be submitted.
#[derive(Error, Debug, Clone)]
#[error("Change batch {batch} ({changes} changes) for zone {zone_id} failed: {source}")]
pub struct SubmissionError {
    /// The destination zone identifier
    pub zone_id: String,
    /// 0-based batch index
    pub batch: usize,
    /// Number of changes carried by the batch
    pub changes: usize,
    /// Underlying provider error
    #[source]
    pub source: ProviderError,
}

/// Composite error type that encompasses all pipeline errors.
#[derive(Error, Debug, Clone)]
pub enum SyncError {
    /// Zone transfer error
    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// Destination state could not be fetched
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A record failed validation
    #[error(transparent)]
    Record(#[from] RecordError),

    /// A change batch could not be submitted
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl SyncError {
    /// Returns true if this error aborts the zone job it occurred in.
    ///
    /// Transfer and fetch failures are fatal since reconciliation cannot proceed
    /// without both sides. Record and batch level failures are not.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Transfer(_) | Self::Fetch(_) => true,
            Self::Record(_) | Self::Submission(_) => false,
        }
    }

    /// Returns a stable reason code for log output.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Transfer(TransferError::InvalidServerAddress { .. }) => "InvalidServerAddress",
            Self::Transfer(TransferError::InvalidZoneName { .. }) => "InvalidZoneName",
            Self::Transfer(TransferError::InvalidTsigKey { .. }) => "InvalidTsigKey",
            Self::Transfer(TransferError::ConnectionFailed { .. }) => "TransferConnectionFailed",
            Self::Transfer(TransferError::TransferRejected { .. }) => "TransferRejected",
            Self::Transfer(TransferError::TaskFailed { .. }) => "TransferTaskFailed",

            Self::Fetch(FetchError::ListFailed { .. }) => "DestinationListFailed",
            Self::Fetch(FetchError::MissingCursor { .. }) => "DestinationMissingCursor",

            Self::Record(RecordError::InvalidRecordData { .. }) => "InvalidRecordData",

            Self::Submission(_) => "ChangeBatchFailed",
        }
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
