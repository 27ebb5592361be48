// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare implementation of the `DnsProvider`
// trait used by the alias engine.
//
// ## Behavior
//
// - One logical API operation per trait call (list follows pagination)
// - Full error propagation to the engine; no retry, no backoff
// - HTTP timeout configured (30 seconds)
// - Specific error handling for HTTP status codes (401/403, 404, 409, 429, 5xx)
// - Dry-run mode: listing still hits the API, create/delete are only logged
//
// ## Security Requirements
//
// - API token NEVER appears in logs or `Debug` output
// - Provider MUST fail fast if token is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records?name=...&type=...`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Delete DNS Record: DELETE `/zones/:zone_id/dns_records/:record_id`

mod models;

use aname_core::traits::{DnsProvider, ManagedRecord, NewRecord, RecordFamily};
use aname_core::{Error, Result};
use async_trait::async_trait;
use models::{ApiResponse, CreateRecordRequest, DnsRecord};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Page size for record listing (API maximum is 5000, default 100)
const LIST_PAGE_SIZE: u32 = 100;

const PROVIDER: &str = "cloudflare";

/// Cloudflare DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform all GET requests (record listing)
/// - Log the intended POST/DELETE requests
/// - **NOT** actually modify DNS records
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL, overridable for testing
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip mutations
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permissions
    /// - `dry_run`: If true, perform GET requests but skip mutations
    ///
    /// # Returns
    ///
    /// `Err(Error::Config)` if the token is empty or the HTTP client cannot
    /// be built
    pub fn new(api_token: impl Into<String>, dry_run: bool) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            base_url: CLOUDFLARE_API_BASE.to_string(),
            client,
            dry_run,
        })
    }

    /// Create a new Cloudflare provider (production/live mode)
    pub fn new_live(api_token: impl Into<String>) -> Result<Self> {
        Self::new(api_token, false)
    }

    /// Create a new Cloudflare provider (dry-run mode)
    ///
    /// In dry-run mode, the provider lists records normally but skips
    /// creations and deletions, logging what would have been changed.
    pub fn new_dry_run(api_token: impl Into<String>) -> Result<Self> {
        Self::new(api_token, true)
    }

    /// Point the provider at another API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Whether mutations are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn records_url(&self, zone: &str) -> String {
        format!("{}/zones/{}/dns_records", self.base_url, zone)
    }

    /// Send a request and unwrap the response envelope
    ///
    /// Non-2xx statuses and `success: false` envelopes both become
    /// `Error::Provider`.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        action: &str,
    ) -> Result<ApiResponse<T>> {
        let response = request
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(status_error(status.as_u16(), action, &error_text));
        }

        let envelope: ApiResponse<T> = response.json().await.map_err(|e| {
            Error::provider(PROVIDER, format!("Failed to parse response: {}", e))
        })?;

        if !envelope.success {
            return Err(Error::provider_status(
                PROVIDER,
                status.as_u16(),
                format!("{} failed: {}", action, envelope.error_summary()),
            ));
        }

        Ok(envelope)
    }
}

/// Map a failed HTTP status to a provider error
fn status_error(status: u16, action: &str, body: &str) -> Error {
    let message = match status {
        401 | 403 => format!(
            "Authentication failed: Invalid API token or insufficient permissions. Status: {}",
            status
        ),
        404 => format!("{} failed: zone or record not found - {}", action, body),
        409 => format!(
            "Conflict: Record is being updated by another process. Status: {}",
            status
        ),
        429 => format!("Rate limit exceeded. Please retry later. Status: {}", status),
        500..=599 => format!("Cloudflare server error (transient): {} - {}", status, body),
        _ => format!("{} failed: {} - {}", action, status, body),
    };
    Error::provider_status(PROVIDER, status, message)
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// List records of one family, following pagination
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?name=example.com&type=A&page=1&per_page=100
    /// Authorization: Bearer <token>
    /// ```
    async fn list_records(
        &self,
        zone: &str,
        name: &str,
        family: RecordFamily,
    ) -> Result<Vec<ManagedRecord>> {
        let url = self.records_url(zone);
        let per_page = LIST_PAGE_SIZE.to_string();
        let mut records = Vec::new();
        let mut page: u32 = 1;

        loop {
            tracing::debug!("Listing {} records for {} (page {})", family, name, page);

            let page_param = page.to_string();
            let request = self.client.get(&url).query(&[
                ("name", name),
                ("type", family.as_str()),
                ("page", page_param.as_str()),
                ("per_page", per_page.as_str()),
            ]);
            let envelope: ApiResponse<Vec<DnsRecord>> = self.send(request, "Record listing").await?;

            let batch = envelope.result.unwrap_or_default();
            if batch.is_empty() {
                break;
            }
            for record in batch {
                records.push(ManagedRecord::try_from(record)?);
            }

            // Advance from our own counter; the echoed page may be stuck
            match envelope.result_info {
                Some(info) if page < info.total_pages => {
                    if info.page != page {
                        tracing::debug!(
                            "Requested page {} but API reported page {}",
                            page,
                            info.page
                        );
                    }
                    page += 1;
                }
                _ => break,
            }
        }

        Ok(records)
    }

    /// Create a record
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /zones/:zone_id/dns_records
    /// { "type": "A", "name": "example.com", "content": "1.2.3.4", "ttl": 60 }
    /// ```
    async fn create_record(&self, zone: &str, record: &NewRecord) -> Result<ManagedRecord> {
        let url = self.records_url(zone);
        let payload = CreateRecordRequest::from(record);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send POST request to {} with payload: {}",
                url,
                serde_json::to_string(&payload).unwrap_or_default()
            );
            return Ok(ManagedRecord {
                id: "dry-run".to_string(),
                family: record.family,
                name: record.name.clone(),
                content: record.content.clone(),
                ttl: record.ttl,
            });
        }

        let envelope: ApiResponse<DnsRecord> = self
            .send(self.client.post(&url).json(&payload), "Record creation")
            .await?;

        let created = envelope.result.ok_or_else(|| {
            Error::provider(PROVIDER, "Invalid response format: missing result")
        })?;
        ManagedRecord::try_from(created)
    }

    /// Delete a record
    ///
    /// # API Call
    ///
    /// ```http
    /// DELETE /zones/:zone_id/dns_records/:record_id
    /// ```
    async fn delete_record(&self, zone: &str, id: &str) -> Result<()> {
        let url = format!("{}/{}", self.records_url(zone), id);

        if self.dry_run {
            tracing::info!("[DRY-RUN] Would send DELETE request to {}", url);
            return Ok(());
        }

        let _: ApiResponse<serde_json::Value> =
            self.send(self.client.delete(&url), "Record deletion").await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
