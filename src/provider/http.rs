// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP implementation of [`DnsProvider`].
//!
//! Talks to a Route 53 shaped REST API with JSON bodies:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | List record sets | `GET {endpoint}/2013-04-01/hostedzone/{zone_id}/rrset?maxitems=N[&name=&type=&identifier=]` |
//! | Submit change batch | `POST {endpoint}/2013-04-01/hostedzone/{zone_id}/rrset` |
//!
//! Requests carry a bearer token when one is configured. Failed calls are not
//! retried here; the submitter treats each batch outcome independently.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

use super::{ChangeInfo, DestinationRecordSet, DnsProvider, ListCursor, RecordSetPage};
use crate::errors::ProviderError;
use crate::record::Change;

/// API version prefix of every request path
const API_VERSION_PATH: &str = "2013-04-01";

/// Provider client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    /// HTTP client for API requests
    client: Arc<HttpClient>,
    /// Base URL without trailing slash
    base_url: String,
    /// Bearer token, if the endpoint requires one
    token: Option<Arc<String>>,
}

impl HttpProvider {
    /// Create a provider client with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_client(Arc::new(client), endpoint, token))
    }

    /// Create a provider client sharing an existing HTTP client.
    #[must_use]
    pub fn with_client(client: Arc<HttpClient>, endpoint: &str, token: Option<String>) -> Self {
        Self {
            client,
            base_url: Self::build_api_url(endpoint),
            token: token.map(Arc::new),
        }
    }

    /// Build the API base URL from an endpoint address
    ///
    /// Converts "dns-api.internal:8443" to `<http://dns-api.internal:8443>` and strips
    /// trailing slashes from URLs that already carry a scheme.
    #[must_use]
    pub fn build_api_url(endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", endpoint.trim_end_matches('/'))
        }
    }

    fn rrset_url(&self, zone_id: &str) -> Result<Url, ProviderError> {
        let raw = format!(
            "{}/{API_VERSION_PATH}/hostedzone/{zone_id}/rrset",
            self.base_url
        );
        Url::parse(&raw).map_err(|e| ProviderError::HttpConnectionFailed {
            endpoint: self.base_url.clone(),
            reason: format!("Invalid request URL {raw}: {e}"),
        })
    }

    /// Execute a request and decode the JSON response body.
    async fn provider_request<T, R>(
        &self,
        method: Method,
        url: Url,
        body: Option<&T>,
    ) -> Result<R, ProviderError>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        debug!(
            method = %method,
            url = %url,
            auth_enabled = self.token.is_some(),
            "HTTP API request to provider"
        );

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body_data) = body {
            request = request.json(body_data);
        }
        if let Some(token_value) = &self.token {
            request = request.header("Authorization", format!("Bearer {token_value}"));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::HttpRequestTimeout {
                    endpoint: self.base_url.clone(),
                }
            } else {
                ProviderError::HttpConnectionFailed {
                    endpoint: self.base_url.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(
                method = %method,
                url = %url,
                status = %status,
                error = %error_text,
                "HTTP API request failed"
            );
            return Err(ProviderError::UnexpectedHttpResponse {
                endpoint: self.base_url.clone(),
                status_code: status.as_u16(),
                reason: error_text,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::InvalidResponse {
                endpoint: self.base_url.clone(),
                reason: format!("Failed to read response body: {e}"),
            })?;

        debug!(
            method = %method,
            url = %url,
            status = %status,
            response_len = text.len(),
            "HTTP API request successful"
        );

        serde_json::from_str(&text).map_err(|e| ProviderError::InvalidResponse {
            endpoint: self.base_url.clone(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl DnsProvider for HttpProvider {
    async fn list_records(
        &self,
        zone_id: &str,
        page_size: u32,
        cursor: Option<&ListCursor>,
    ) -> Result<RecordSetPage, ProviderError> {
        let mut url = self.rrset_url(zone_id)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("maxitems", &page_size.to_string());
            if let Some(cursor) = cursor {
                query.append_pair("name", &cursor.name);
                query.append_pair("type", &cursor.record_type);
                if let Some(identifier) = &cursor.identifier {
                    query.append_pair("identifier", identifier);
                }
            }
        }

        let response: ListResourceRecordSetsResponse = self
            .provider_request(Method::GET, url, None::<&()>)
            .await?;

        Ok(response.into())
    }

    async fn submit_change_batch(
        &self,
        zone_id: &str,
        changes: &[Change],
        comment: &str,
    ) -> Result<ChangeInfo, ProviderError> {
        let url = self.rrset_url(zone_id)?;
        let request = ChangeResourceRecordSetsRequest {
            change_batch: WireChangeBatch {
                comment,
                changes: changes.iter().map(WireChange::from).collect(),
            },
        };

        let response: ChangeResourceRecordSetsResponse = self
            .provider_request(Method::POST, url, Some(&request))
            .await?;

        Ok(ChangeInfo {
            id: response.change_info.id,
            status: response.change_info.status,
        })
    }
}

// ===== Wire types =====

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireResourceRecord {
    value: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireRecordSet {
    name: String,
    #[serde(rename = "Type")]
    record_type: String,
    #[serde(rename = "TTL", default, skip_serializing_if = "Option::is_none")]
    ttl: Option<u32>,
    #[serde(default)]
    resource_records: Vec<WireResourceRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    set_identifier: Option<String>,
}

impl From<WireRecordSet> for DestinationRecordSet {
    fn from(wire: WireRecordSet) -> Self {
        Self {
            name: wire.name,
            record_type: wire.record_type,
            ttl: wire.ttl,
            values: wire.resource_records.into_iter().map(|r| r.value).collect(),
            set_identifier: wire.set_identifier,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListResourceRecordSetsResponse {
    #[serde(default)]
    resource_record_sets: Vec<WireRecordSet>,
    #[serde(default)]
    is_truncated: bool,
    #[serde(default)]
    next_record_name: Option<String>,
    #[serde(default)]
    next_record_type: Option<String>,
    #[serde(default)]
    next_record_identifier: Option<String>,
}

impl From<ListResourceRecordSetsResponse> for RecordSetPage {
    fn from(response: ListResourceRecordSetsResponse) -> Self {
        let next = match (response.next_record_name, response.next_record_type) {
            (Some(name), Some(record_type)) => Some(ListCursor {
                name,
                record_type,
                identifier: response.next_record_identifier,
            }),
            _ => None,
        };

        Self {
            record_sets: response
                .resource_record_sets
                .into_iter()
                .map(DestinationRecordSet::from)
                .collect(),
            next,
            truncated: response.is_truncated,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireChange {
    action: &'static str,
    resource_record_set: WireRecordSet,
}

impl From<&Change> for WireChange {
    fn from(change: &Change) -> Self {
        let record = &change.record;
        Self {
            action: change.action.as_str(),
            resource_record_set: WireRecordSet {
                name: record.name().to_string(),
                record_type: record.record_type().to_string(),
                ttl: Some(record.ttl()),
                resource_records: record
                    .values()
                    .iter()
                    .map(|value| WireResourceRecord {
                        value: value.clone(),
                    })
                    .collect(),
                set_identifier: None,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireChangeBatch<'a> {
    comment: &'a str,
    changes: Vec<WireChange>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ChangeResourceRecordSetsRequest<'a> {
    change_batch: WireChangeBatch<'a>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireChangeInfo {
    id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ChangeResourceRecordSetsResponse {
    change_info: WireChangeInfo,
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod http_tests;
