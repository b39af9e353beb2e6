// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Run configuration.
//!
//! Loaded from a YAML file and threaded explicitly into the pipeline. Example:
//!
//! ```yaml
//! jobs:
//!   - zone: example.com.
//!     server: 192.0.2.53
//!     zone_id: Z0123456789
//! tsig:
//!   name: axrf.
//!   algorithm: hmac-sha256
//!   secret: c2VjcmV0
//! provider:
//!   endpoint: https://dns.example.net
//! sync:
//!   batch_size: 500
//!   record_types: [A, CNAME, MX, TXT]
//!   ttl: fixed
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::constants::{
    DEFAULT_PROVIDER_TIMEOUT_SECS, DEFAULT_PROVIDER_TOKEN_ENV, DEFAULT_RECORD_TTL_SECS,
    DEFAULT_TSIG_KEY_NAME, LIST_PAGE_SIZE, MAX_CHANGE_BATCH_SIZE,
};
use crate::mapper::{TtlPolicy, TypeMapper};
use crate::reconciler::ReconcileOptions;
use crate::record::RecordType;
use crate::sync::{SyncOptions, ZoneJob};
use crate::transfer::{parse_tsig_key_file, TsigAlgorithm, TsigKeyData};

/// Complete run configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Zones to replicate
    #[serde(default)]
    pub jobs: Vec<ZoneJob>,
    /// Key used to sign zone transfer requests
    pub tsig: TsigConfig,
    /// Destination provider connection
    pub provider: ProviderConfig,
    /// Pipeline tuning
    #[serde(default)]
    pub sync: SyncSettings,
}

/// TSIG key, inline or from a BIND key file.
#[derive(Clone, Deserialize)]
#[serde(untagged)]
pub enum TsigConfig {
    /// Key read from a BIND key file
    KeyFile {
        /// Path to the key file
        key_file: String,
    },
    /// Key given directly in the configuration
    Inline {
        /// Key name as configured on the nameserver
        #[serde(default = "default_tsig_key_name")]
        name: String,
        /// HMAC algorithm
        #[serde(default)]
        algorithm: TsigAlgorithm,
        /// Base64-encoded secret
        secret: String,
    },
}

impl std::fmt::Debug for TsigConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeyFile { key_file } => f
                .debug_struct("KeyFile")
                .field("key_file", key_file)
                .finish(),
            Self::Inline {
                name, algorithm, ..
            } => f
                .debug_struct("Inline")
                .field("name", name)
                .field("algorithm", algorithm)
                .field("secret", &"<redacted>")
                .finish(),
        }
    }
}

fn default_tsig_key_name() -> String {
    DEFAULT_TSIG_KEY_NAME.to_string()
}

impl TsigConfig {
    /// Resolve to key material, reading the key file if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the key file cannot be read or parsed.
    pub fn resolve(&self) -> Result<TsigKeyData> {
        match self {
            Self::KeyFile { key_file } => {
                let content = std::fs::read_to_string(key_file)
                    .with_context(|| format!("Failed to read TSIG key file {key_file}"))?;
                parse_tsig_key_file(&content)
                    .with_context(|| format!("Failed to parse TSIG key file {key_file}"))
            }
            Self::Inline {
                name,
                algorithm,
                secret,
            } => Ok(TsigKeyData {
                name: name.clone(),
                algorithm: *algorithm,
                secret: secret.clone(),
            }),
        }
    }
}

/// Destination provider connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the provider API
    pub endpoint: String,
    /// Environment variable holding the bearer token
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

fn default_token_env() -> String {
    DEFAULT_PROVIDER_TOKEN_ENV.to_string()
}

fn default_provider_timeout() -> u64 {
    DEFAULT_PROVIDER_TIMEOUT_SECS
}

impl ProviderConfig {
    /// Request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Pipeline tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Maximum changes per batch (1 to 500)
    pub batch_size: usize,
    /// Record sets requested per list call
    pub page_size: u32,
    /// Record types replicated to the destination
    pub record_types: Vec<RecordType>,
    /// Where record TTLs come from
    pub ttl: TtlPolicy,
    /// TTL used by the fixed policy, in seconds
    pub default_ttl: u32,
    /// Skip records whose destination values and TTL already match
    pub skip_unchanged: bool,
    /// Compute and log changes without submitting them
    pub dry_run: bool,
    /// Zone transfer connection timeout, unbounded if unset
    pub transfer_timeout_secs: Option<u64>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            batch_size: MAX_CHANGE_BATCH_SIZE,
            page_size: LIST_PAGE_SIZE,
            record_types: RecordType::ALL.to_vec(),
            ttl: TtlPolicy::Fixed,
            default_ttl: DEFAULT_RECORD_TTL_SECS,
            skip_unchanged: false,
            dry_run: false,
            transfer_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load a configuration file. Call [`Config::validate`] once command-line
    /// overrides have been applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse a configuration document without validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML for [`Config`].
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse config YAML")
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if self.jobs.is_empty() {
            bail!("No zone jobs configured");
        }
        for job in &self.jobs {
            if job.zone.is_empty() || job.server.is_empty() || job.zone_id.is_empty() {
                bail!("Zone job {job:?} must set zone, server and zone_id");
            }
        }
        if self.sync.batch_size == 0 || self.sync.batch_size > MAX_CHANGE_BATCH_SIZE {
            bail!(
                "batch_size must be between 1 and {MAX_CHANGE_BATCH_SIZE}, got {}",
                self.sync.batch_size
            );
        }
        if self.sync.page_size == 0 {
            bail!("page_size must be greater than 0");
        }
        if self.sync.record_types.is_empty() {
            bail!("record_types must name at least one record type");
        }
        if self.provider.endpoint.is_empty() {
            bail!("provider endpoint must be set");
        }
        Ok(())
    }

    /// Pipeline options derived from the `sync` section.
    #[must_use]
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            page_size: self.sync.page_size,
            batch_size: self.sync.batch_size,
            mapper: TypeMapper::new(
                self.sync.record_types.iter().copied(),
                self.sync.ttl,
                self.sync.default_ttl,
            ),
            reconcile: ReconcileOptions {
                skip_unchanged: self.sync.skip_unchanged,
            },
            dry_run: self.sync.dry_run,
        }
    }

    /// Zone transfer timeout, if configured.
    #[must_use]
    pub fn transfer_timeout(&self) -> Option<Duration> {
        self.sync.transfer_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
