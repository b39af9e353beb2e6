// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # zonesync - DNS zone replication into a managed DNS provider
//!
//! zonesync pulls a complete zone from its authoritative nameserver over a
//! TSIG-authenticated AXFR, reconciles it against the record sets a managed DNS
//! provider currently holds for that zone, and submits the resulting UPSERT
//! changes in concurrent, size-bounded batches.
//!
//! ## Modules
//!
//! - [`transfer`] - AXFR client and transferred record model
//! - [`mapper`] - Mapping of transferred records to the normalized [`record`] model
//! - [`provider`] - Destination provider interface and HTTP client
//! - [`fetcher`] - Paginated destination state snapshot
//! - [`reconciler`] - Change list computation
//! - [`submitter`] - Batched, concurrent change submission
//! - [`sync`] - Zone job pipeline tying the stages together
//! - [`config`] - YAML run configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use zonesync::provider::HttpProvider;
//! use zonesync::sync::{SyncOptions, ZoneJob, ZoneSyncer};
//! use zonesync::transfer::{AxfrClient, TsigAlgorithm, TsigKeyData};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let key = TsigKeyData {
//!     name: "axrf.".to_string(),
//!     algorithm: TsigAlgorithm::HmacSha256,
//!     secret: "c2VjcmV0".to_string(),
//! };
//! let provider = HttpProvider::new("https://dns.example.net", None, Duration::from_secs(30))?;
//! let syncer = ZoneSyncer::new(
//!     Arc::new(AxfrClient::new(key)),
//!     Arc::new(provider),
//!     SyncOptions::default(),
//! );
//!
//! let report = syncer
//!     .sync_zone(&ZoneJob {
//!         zone: "example.com.".to_string(),
//!         server: "192.0.2.53".to_string(),
//!         zone_id: "Z0123456789".to_string(),
//!     })
//!     .await?;
//! println!("{} changes", report.changes.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod errors;
pub mod fetcher;
pub mod mapper;
pub mod provider;
pub mod reconciler;
pub mod record;
pub mod submitter;
pub mod sync;
pub mod transfer;

#[cfg(test)]
mod testing;
