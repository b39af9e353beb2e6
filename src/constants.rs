// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for zonesync.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// DNS Protocol Constants
// ============================================================================

/// Standard DNS port for queries and zone transfers
pub const DNS_PORT: u16 = 53;

/// TSIG signature validity window (fudge) in seconds
pub const TSIG_FUDGE_TIME_SECS: u64 = 300;

/// TSIG key name used when the configuration does not name one
pub const DEFAULT_TSIG_KEY_NAME: &str = "axrf.";

/// TTL applied to destination records under the fixed TTL policy
pub const DEFAULT_RECORD_TTL_SECS: u32 = 60;

// ============================================================================
// Provider API Constants
// ============================================================================

/// Maximum number of changes the provider accepts in a single change batch
pub const MAX_CHANGE_BATCH_SIZE: usize = 500;

/// Page size requested from the provider's record listing API
pub const LIST_PAGE_SIZE: u32 = 1000;

/// Change action understood by the provider for create-or-replace
pub const CHANGE_ACTION_UPSERT: &str = "UPSERT";

/// Default HTTP request timeout for provider API calls
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the provider bearer token
pub const DEFAULT_PROVIDER_TOKEN_ENV: &str = "ZONESYNC_PROVIDER_TOKEN";

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of Tokio worker threads for the sync runtime
pub const TOKIO_WORKER_THREADS: usize = 4;

/// Environment variable pointing at the configuration file
pub const CONFIG_PATH_ENV: &str = "ZONESYNC_CONFIG";

#[cfg(test)]
#[path = "constants_tests.rs"]
mod constants_tests;
