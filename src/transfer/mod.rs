// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone transfer client.
//!
//! Pulls a complete zone snapshot from an authoritative nameserver over AXFR,
//! authenticated with TSIG. The transfer runs on a blocking thread since
//! hickory's `SyncClient` drives its own runtime.
//!
//! # Partial transfers
//!
//! Failures before the first envelope arrives (connection refused, TSIG rejected,
//! server not authoritative) are returned as [`TransferError`]. A failure after at
//! least one good envelope ends the stream: the records received so far are kept
//! and the cause is recorded in [`TransferOutcome::truncated`]. The caller decides
//! whether a partial zone is acceptable.

pub mod tsig;
pub mod types;

pub use tsig::{create_tsig_signer, parse_tsig_key_file, TsigAlgorithm, TsigKeyData};
pub use types::{SourceRecord, TransferOutcome};

use async_trait::async_trait;
use hickory_client::client::{Client, SyncClient};
use hickory_client::op::{Message, ResponseCode};
use hickory_client::rr::Name;
use hickory_client::tcp::TcpClientConnection;
use std::fmt::Display;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::ops::Deref;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::constants::DNS_PORT;
use crate::errors::TransferError;

/// Source of complete zone snapshots.
#[async_trait]
pub trait ZoneTransfer: Send + Sync {
    /// Transfer every record of `zone` from `server`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransferError`] if the transfer cannot be set up or the server
    /// rejects it before sending any records.
    async fn transfer(&self, zone: &str, server: &str) -> Result<TransferOutcome, TransferError>;
}

/// AXFR client authenticated with a TSIG key.
#[derive(Debug, Clone)]
pub struct AxfrClient {
    key: TsigKeyData,
    timeout: Option<Duration>,
}

impl AxfrClient {
    /// Create a client signing every transfer request with `key`.
    #[must_use]
    pub fn new(key: TsigKeyData) -> Self {
        Self { key, timeout: None }
    }

    /// Bound the TCP connection and read timeout of the transfer session.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl ZoneTransfer for AxfrClient {
    async fn transfer(&self, zone: &str, server: &str) -> Result<TransferOutcome, TransferError> {
        let zone_name = Name::from_str(zone).map_err(|e| TransferError::InvalidZoneName {
            zone: zone.to_string(),
            reason: e.to_string(),
        })?;

        let signer = create_tsig_signer(&self.key).map_err(|e| TransferError::InvalidTsigKey {
            key_name: self.key.name.clone(),
            reason: format!("{e:#}"),
        })?;

        let zone_str = zone.to_string();
        let server_str = server.to_string();
        let timeout = self.timeout;

        info!(zone = %zone, server = %server, key = %self.key.name, "Starting zone transfer");

        tokio::task::spawn_blocking(move || {
            let server_addr = resolve_server_addr(&server_str)?;

            let connection_failed = |reason: String| TransferError::ConnectionFailed {
                zone: zone_str.clone(),
                server: server_addr.to_string(),
                reason,
            };

            let conn = match timeout {
                Some(timeout) => TcpClientConnection::with_timeout(server_addr, timeout),
                None => TcpClientConnection::new(server_addr),
            }
            .map_err(|e| connection_failed(e.to_string()))?;

            let client = SyncClient::with_tsigner(conn, signer);

            let responses = client
                .zone_transfer(&zone_name, None)
                .map_err(|e| connection_failed(e.to_string()))?;

            collect_envelopes(
                &zone_str,
                &server_addr.to_string(),
                responses.map(envelope_records),
            )
        })
        .await
        .map_err(|e| TransferError::TaskFailed {
            zone: zone.to_string(),
            reason: e.to_string(),
        })?
    }
}

/// Turn one transfer response into the records it carries.
///
/// Responses with a non-zero response code count as error envelopes.
fn envelope_records<R, E>(response: Result<R, E>) -> Result<Vec<SourceRecord>, String>
where
    R: Deref<Target = Message>,
    E: Display,
{
    let response = response.map_err(|e| e.to_string())?;

    let code = response.response_code();
    if code != ResponseCode::NoError {
        return Err(format!("server responded with {code}"));
    }

    Ok(response.answers().iter().map(SourceRecord::from).collect())
}

/// Consume a stream of transfer envelopes into a [`TransferOutcome`].
///
/// Stops at the first error envelope. If that is the very first envelope the
/// server is considered to have rejected the transfer; otherwise the records
/// accumulated so far are returned with the error recorded as the truncation cause.
///
/// # Errors
///
/// Returns [`TransferError::TransferRejected`] when the first envelope is an error.
pub fn collect_envelopes<I, E>(
    zone: &str,
    server: &str,
    envelopes: I,
) -> Result<TransferOutcome, TransferError>
where
    I: IntoIterator<Item = Result<Vec<SourceRecord>, E>>,
    E: Display,
{
    let mut outcome = TransferOutcome::default();

    for envelope in envelopes {
        match envelope {
            Ok(records) => {
                outcome.envelopes += 1;
                debug!(
                    zone = %zone,
                    envelope = outcome.envelopes,
                    records_in_envelope = records.len(),
                    "Received zone transfer envelope"
                );
                outcome.records.extend(records);
            }
            Err(e) if outcome.envelopes == 0 => {
                return Err(TransferError::TransferRejected {
                    zone: zone.to_string(),
                    server: server.to_string(),
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                warn!(
                    zone = %zone,
                    server = %server,
                    records = outcome.records.len(),
                    error = %e,
                    "Zone transfer ended early, keeping partial record set"
                );
                outcome.truncated = Some(e.to_string());
                break;
            }
        }
    }

    info!(
        zone = %zone,
        server = %server,
        records = outcome.records.len(),
        envelopes = outcome.envelopes,
        partial = outcome.is_partial(),
        "Zone transfer finished"
    );

    Ok(outcome)
}

/// Resolve a nameserver address.
///
/// Accepts `ip:port`, a bare IP (port 53 is implied), or a host name with or
/// without a port.
///
/// # Errors
///
/// Returns [`TransferError::InvalidServerAddress`] if the address cannot be resolved.
pub fn resolve_server_addr(server: &str) -> Result<SocketAddr, TransferError> {
    if let Ok(addr) = server.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(ip) = server.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DNS_PORT));
    }

    let invalid = |reason: String| TransferError::InvalidServerAddress {
        server: server.to_string(),
        reason,
    };

    let target = if server.contains(':') {
        server.to_string()
    } else {
        format!("{server}:{DNS_PORT}")
    };

    target
        .to_socket_addrs()
        .map_err(|e| invalid(e.to_string()))?
        .next()
        .ok_or_else(|| invalid("host name resolved to no addresses".to_string()))
}
