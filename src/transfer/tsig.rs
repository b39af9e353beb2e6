// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! TSIG key material for authenticated zone transfers.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hickory_client::rr::rdata::tsig::TsigAlgorithm as HickoryTsigAlgorithm;
use hickory_client::rr::Name;
use hickory_proto::rr::dnssec::tsig::TSigner;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::TSIG_FUDGE_TIME_SECS;

/// HMAC algorithm used to sign the transfer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TsigAlgorithm {
    HmacMd5,
    HmacSha1,
    HmacSha224,
    #[default]
    HmacSha256,
    HmacSha384,
    HmacSha512,
}

impl TsigAlgorithm {
    /// BIND name of the algorithm.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HmacMd5 => "hmac-md5",
            Self::HmacSha1 => "hmac-sha1",
            Self::HmacSha224 => "hmac-sha224",
            Self::HmacSha256 => "hmac-sha256",
            Self::HmacSha384 => "hmac-sha384",
            Self::HmacSha512 => "hmac-sha512",
        }
    }
}

impl FromStr for TsigAlgorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hmac-md5" => Ok(Self::HmacMd5),
            "hmac-sha1" => Ok(Self::HmacSha1),
            "hmac-sha224" => Ok(Self::HmacSha224),
            "hmac-sha256" => Ok(Self::HmacSha256),
            "hmac-sha384" => Ok(Self::HmacSha384),
            "hmac-sha512" => Ok(Self::HmacSha512),
            _ => anyhow::bail!("Unsupported TSIG algorithm '{s}'. Supported algorithms: hmac-md5, hmac-sha1, hmac-sha224, hmac-sha256, hmac-sha384, hmac-sha512"),
        }
    }
}

/// TSIG key used to authenticate zone transfers.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct TsigKeyData {
    /// Key name as configured on the nameserver (e.g. "axrf.")
    pub name: String,
    /// HMAC algorithm
    #[serde(default)]
    pub algorithm: TsigAlgorithm,
    /// Base64-encoded secret key
    pub secret: String,
}

impl fmt::Debug for TsigKeyData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TsigKeyData")
            .field("name", &self.name)
            .field("algorithm", &self.algorithm)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Parse a BIND9 key file to extract key metadata.
///
/// Expected format:
/// ```text
/// key "axrf." {
///     algorithm hmac-sha256;
///     secret "base64secret==";
/// };
/// ```
///
/// # Errors
///
/// Returns an error if the file format is invalid or required fields are missing.
pub fn parse_tsig_key_file(content: &str) -> Result<TsigKeyData> {
    let name = content
        .lines()
        .find(|line| line.trim_start().starts_with("key"))
        .and_then(|line| line.split('"').nth(1))
        .context("Failed to parse key name from TSIG key file")?
        .to_string();

    let algorithm_str = content
        .lines()
        .find(|line| line.contains("algorithm"))
        .and_then(|line| {
            line.split_whitespace()
                .nth(1)
                .map(|s| s.trim_end_matches(';').trim_matches('"'))
        })
        .context("Failed to parse algorithm from TSIG key file")?;
    let algorithm = algorithm_str
        .parse::<TsigAlgorithm>()
        .context("Unsupported algorithm in TSIG key file")?;

    let secret = content
        .lines()
        .find(|line| line.contains("secret"))
        .and_then(|line| line.split('"').nth(1))
        .context("Failed to parse secret from TSIG key file")?
        .to_string();

    Ok(TsigKeyData {
        name,
        algorithm,
        secret,
    })
}

/// Create a TSIG signer from key data.
///
/// The signer uses a fudge of [`TSIG_FUDGE_TIME_SECS`] and signs with the current
/// time when the request is sent.
///
/// # Errors
///
/// Returns an error if the algorithm is unsupported by the signing backend or the
/// key data is invalid.
pub fn create_tsig_signer(key_data: &TsigKeyData) -> Result<TSigner> {
    let algorithm = match key_data.algorithm {
        TsigAlgorithm::HmacMd5 => HickoryTsigAlgorithm::HmacMd5,
        TsigAlgorithm::HmacSha1 => HickoryTsigAlgorithm::HmacSha1,
        TsigAlgorithm::HmacSha224 => HickoryTsigAlgorithm::HmacSha224,
        TsigAlgorithm::HmacSha256 => HickoryTsigAlgorithm::HmacSha256,
        TsigAlgorithm::HmacSha384 => HickoryTsigAlgorithm::HmacSha384,
        TsigAlgorithm::HmacSha512 => HickoryTsigAlgorithm::HmacSha512,
    };

    let key_bytes = BASE64
        .decode(&key_data.secret)
        .context("Failed to decode TSIG key")?;

    let signer = TSigner::new(
        key_bytes,
        algorithm,
        Name::from_str(&key_data.name).context("Invalid TSIG key name")?,
        u16::try_from(TSIG_FUDGE_TIME_SECS).unwrap_or(300),
    )
    .with_context(|| {
        format!(
            "Failed to create TSIG signer with algorithm {}",
            key_data.algorithm.as_str()
        )
    })?;

    Ok(signer)
}

#[cfg(test)]
#[path = "tsig_tests.rs"]
mod tsig_tests;
