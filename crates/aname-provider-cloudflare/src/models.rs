//! Cloudflare API v4 wire types

use aname_core::traits::{ManagedRecord, NewRecord, RecordFamily};
use aname_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Error entry in a response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    pub code: i64,
    pub message: String,
}

/// Response envelope shared by every endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiError>,
    pub result: Option<T>,
    pub result_info: Option<ResultInfo>,
}

impl<T> ApiResponse<T> {
    /// Joined error messages, e.g. "[1004] DNS Validation Error"
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return "request was not successful".to_string();
        }
        self.errors
            .iter()
            .map(|e| format!("[{}] {}", e.code, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Pagination info of list responses
#[derive(Debug, Deserialize)]
pub(crate) struct ResultInfo {
    pub page: u32,
    pub total_pages: u32,
}

/// A DNS record as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DnsRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
}

impl TryFrom<DnsRecord> for ManagedRecord {
    type Error = Error;

    fn try_from(record: DnsRecord) -> Result<Self> {
        let family = match record.record_type.as_str() {
            "A" => RecordFamily::A,
            "AAAA" => RecordFamily::Aaaa,
            other => {
                return Err(Error::provider(
                    "cloudflare",
                    format!("Unexpected record type {} for record {}", other, record.id),
                ));
            }
        };
        Ok(ManagedRecord {
            id: record.id,
            family,
            name: record.name,
            content: record.content,
            ttl: record.ttl,
        })
    }
}

/// Body of `POST /zones/:zone_id/dns_records`
#[derive(Debug, Serialize)]
pub(crate) struct CreateRecordRequest<'a> {
    #[serde(rename = "type")]
    pub record_type: &'static str,
    pub name: &'a str,
    pub content: &'a str,
    pub ttl: u32,
}

impl<'a> From<&'a NewRecord> for CreateRecordRequest<'a> {
    fn from(record: &'a NewRecord) -> Self {
        Self {
            record_type: record.family.as_str(),
            name: &record.name,
            content: &record.content,
            ttl: record.ttl,
        }
    }
}
